/// Convert a raw command argument into a typed value.
///
/// Parsing is culture-invariant: surrounding whitespace is ignored, integers
/// accept a leading sign, floats additionally accept a decimal point and
/// `,` group separators in the integer part. Exponents, `inf` and `NaN` are
/// rejected.
pub trait ArgumentConverter: Sized {
    fn convert(raw: &str) -> Option<Self>;
}

impl ArgumentConverter for bool {
    fn convert(raw: &str) -> Option<Self> {
        let value = raw.trim();
        if value.eq_ignore_ascii_case("true") {
            Some(true)
        } else if value.eq_ignore_ascii_case("false") {
            Some(false)
        } else {
            None
        }
    }
}

macro_rules! integer_converters {
    ($($ty:ty),* $(,)?) => {
        $(
            impl ArgumentConverter for $ty {
                fn convert(raw: &str) -> Option<Self> {
                    raw.trim().parse::<$ty>().ok()
                }
            }
        )*
    };
}

integer_converters!(i8, u8, i16, u16, i32, u32, i64, u64);

macro_rules! float_converters {
    ($($ty:ty),* $(,)?) => {
        $(
            impl ArgumentConverter for $ty {
                fn convert(raw: &str) -> Option<Self> {
                    normalize_number(raw)?.parse::<$ty>().ok()
                }
            }
        )*
    };
}

float_converters!(f32, f64);

/// Strip group separators from a decimal number, rejecting anything that is
/// not `[sign] digits [, digits]* [. digits]`.
fn normalize_number(raw: &str) -> Option<String> {
    let value = raw.trim();
    let unsigned = value.strip_prefix(['+', '-']).unwrap_or(value);
    let (integer, fraction) = match unsigned.split_once('.') {
        Some((integer, fraction)) => (integer, Some(fraction)),
        None => (unsigned, None),
    };

    let groups_ok = integer.is_empty()
        || integer
            .split(',')
            .all(|group| !group.is_empty() && group.bytes().all(|byte| byte.is_ascii_digit()));
    let fraction_ok =
        fraction.is_none_or(|fraction| fraction.bytes().all(|byte| byte.is_ascii_digit()));
    let has_digits = !integer.is_empty() || fraction.is_some_and(|fraction| !fraction.is_empty());

    if !(groups_ok && fraction_ok && has_digits) {
        return None;
    }

    Some(value.replace(',', ""))
}

/// Convert a raw argument, falling back to `default` when it is absent.
///
/// Returns `None` only when a value was given and failed to parse.
pub fn convert_or<T: ArgumentConverter>(raw: Option<&str>, default: T) -> Option<T> {
    match raw {
        Some(value) => T::convert(value),
        None => Some(default),
    }
}

/// Parse a compact duration token like `30s`, `10m`, `2h`, `1d`, or plain seconds.
pub fn parse_duration_seconds(raw: &str) -> Option<u64> {
    let value = raw.trim();
    if value.is_empty() {
        return None;
    }

    let mut chars = value.chars();
    let unit = chars.next_back();

    let (number_raw, multiplier) = match unit {
        Some('s') | Some('S') => (chars.as_str(), 1_u64),
        Some('m') | Some('M') => (chars.as_str(), 60_u64),
        Some('h') | Some('H') => (chars.as_str(), 60_u64 * 60),
        Some('d') | Some('D') => (chars.as_str(), 60_u64 * 60 * 24),
        Some(last) if last.is_ascii_digit() => (value, 1_u64),
        _ => return None,
    };

    let number = number_raw.parse::<u64>().ok()?;
    if number == 0 {
        return None;
    }

    number.checked_mul(multiplier)
}
