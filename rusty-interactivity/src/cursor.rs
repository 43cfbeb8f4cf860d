//! Page cursor over a fixed-length page sequence.
//!
//! Transitions and control enablement are both read from explicit
//! `(page count, policy)` tables so the single-page and two-page edges stay
//! easy to audit.

use std::{fmt, str::FromStr};

use crate::error::InteractivityError;

/// What happens when navigation runs past either end.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum WrapPolicy {
    /// Moving past an end cycles to the opposite end.
    Wrap,
    /// Moving past an end stays on it.
    #[default]
    Clamp,
}

impl FromStr for WrapPolicy {
    type Err = InteractivityError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "wrap" | "wraparound" | "wrap-around" => Ok(Self::Wrap),
            "clamp" | "ignore" => Ok(Self::Clamp),
            _ => Err(InteractivityError::InvalidPolicy {
                kind: "wrap",
                value: value.to_owned(),
            }),
        }
    }
}

impl fmt::Display for WrapPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Wrap => f.write_str("wrap"),
            Self::Clamp => f.write_str("clamp"),
        }
    }
}

/// A cursor movement.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Navigation {
    SkipToStart,
    Previous,
    Next,
    SkipToEnd,
}

/// One of the five logical pagination controls.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Control {
    SkipToStart,
    Previous,
    Stop,
    Next,
    SkipToEnd,
}

impl Control {
    /// Display order of the controls.
    pub const ALL: [Control; 5] = [
        Control::SkipToStart,
        Control::Previous,
        Control::Stop,
        Control::Next,
        Control::SkipToEnd,
    ];

    /// The cursor movement behind this control, `None` for stop.
    pub fn navigation(self) -> Option<Navigation> {
        match self {
            Self::SkipToStart => Some(Navigation::SkipToStart),
            Self::Previous => Some(Navigation::Previous),
            Self::Stop => None,
            Self::Next => Some(Navigation::Next),
            Self::SkipToEnd => Some(Navigation::SkipToEnd),
        }
    }
}

/// Enabled state of each control for the current cursor position.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Affordances {
    pub skip_to_start: bool,
    pub previous: bool,
    pub next: bool,
    pub skip_to_end: bool,
    pub stop: bool,
}

impl Affordances {
    /// Only stop is usable.
    pub const STOP_ONLY: Self = Self {
        skip_to_start: false,
        previous: false,
        next: false,
        skip_to_end: false,
        stop: true,
    };

    pub const ALL_ENABLED: Self = Self {
        skip_to_start: true,
        previous: true,
        next: true,
        skip_to_end: true,
        stop: true,
    };

    pub const ALL_DISABLED: Self = Self {
        skip_to_start: false,
        previous: false,
        next: false,
        skip_to_end: false,
        stop: false,
    };

    pub fn is_enabled(&self, control: Control) -> bool {
        match control {
            Control::SkipToStart => self.skip_to_start,
            Control::Previous => self.previous,
            Control::Stop => self.stop,
            Control::Next => self.next,
            Control::SkipToEnd => self.skip_to_end,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Shape {
    Single,
    Multi,
}

/// Index into a page sequence of fixed, non-zero length.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Cursor {
    index: usize,
    len: usize,
    policy: WrapPolicy,
}

impl Cursor {
    /// Create a cursor at index 0. `len` is raised to 1 when zero.
    pub fn new(len: usize, policy: WrapPolicy) -> Self {
        Self {
            index: 0,
            len: len.max(1),
            policy,
        }
    }

    /// Create a cursor at `index`, clamped into range.
    pub fn at(index: usize, len: usize, policy: WrapPolicy) -> Self {
        let mut cursor = Self::new(len, policy);
        cursor.index = index.min(cursor.last());
        cursor
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn policy(&self) -> WrapPolicy {
        self.policy
    }

    fn last(&self) -> usize {
        self.len - 1
    }

    fn shape(&self) -> Shape {
        if self.len == 1 {
            Shape::Single
        } else {
            Shape::Multi
        }
    }

    pub fn skip_to_start(&mut self) {
        self.navigate(Navigation::SkipToStart);
    }

    pub fn skip_to_end(&mut self) {
        self.navigate(Navigation::SkipToEnd);
    }

    pub fn next(&mut self) {
        self.navigate(Navigation::Next);
    }

    pub fn previous(&mut self) {
        self.navigate(Navigation::Previous);
    }

    /// Apply a movement. Never fails; the result is always a valid index.
    pub fn navigate(&mut self, navigation: Navigation) {
        let (i, last) = (self.index, self.last());

        self.index = match (navigation, self.policy) {
            (Navigation::SkipToStart, WrapPolicy::Wrap) => {
                if i == 0 {
                    last
                } else {
                    0
                }
            }
            (Navigation::SkipToStart, WrapPolicy::Clamp) => 0,
            (Navigation::SkipToEnd, WrapPolicy::Wrap) => {
                if i == last {
                    0
                } else {
                    last
                }
            }
            (Navigation::SkipToEnd, WrapPolicy::Clamp) => last,
            (Navigation::Next, WrapPolicy::Wrap) => {
                if i >= last {
                    0
                } else {
                    i + 1
                }
            }
            (Navigation::Next, WrapPolicy::Clamp) => (i + 1).min(last),
            (Navigation::Previous, WrapPolicy::Wrap) => {
                if i == 0 {
                    last
                } else {
                    i - 1
                }
            }
            (Navigation::Previous, WrapPolicy::Clamp) => i.saturating_sub(1),
        };
    }

    /// Enabled state of every control at the current position.
    pub fn affordances(&self) -> Affordances {
        let i = self.index;

        match (self.shape(), self.policy) {
            (Shape::Single, _) => Affordances::STOP_ONLY,
            (Shape::Multi, WrapPolicy::Wrap) => Affordances::ALL_ENABLED,
            (Shape::Multi, WrapPolicy::Clamp) => Affordances {
                skip_to_start: i >= 2,
                previous: i >= 1,
                next: i < self.len - 1,
                skip_to_end: i + 2 < self.len,
                stop: true,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn clamp_walkthrough_over_three_pages() {
        let mut cursor = Cursor::new(3, WrapPolicy::Clamp);

        cursor.next();
        cursor.next();
        cursor.next();
        assert_eq!(cursor.index(), 2);

        cursor.skip_to_start();
        assert_eq!(cursor.index(), 0);

        cursor.skip_to_end();
        assert_eq!(cursor.index(), 2);

        for _ in 0..5 {
            cursor.previous();
        }
        assert_eq!(cursor.index(), 0);
    }

    #[test]
    fn wrap_skip_to_start_toggles_on_two_pages() {
        let mut cursor = Cursor::new(2, WrapPolicy::Wrap);

        cursor.skip_to_start();
        assert_eq!(cursor.index(), 1);

        cursor.skip_to_start();
        assert_eq!(cursor.index(), 0);
    }

    #[test]
    fn wrap_skip_to_end_toggles() {
        let mut cursor = Cursor::new(4, WrapPolicy::Wrap);

        cursor.skip_to_end();
        assert_eq!(cursor.index(), 3);
        cursor.skip_to_end();
        assert_eq!(cursor.index(), 0);
    }

    #[test]
    fn wrap_previous_from_start_goes_to_last() {
        let mut cursor = Cursor::new(5, WrapPolicy::Wrap);
        cursor.previous();
        assert_eq!(cursor.index(), 4);
        cursor.next();
        assert_eq!(cursor.index(), 0);
    }

    #[test]
    fn clamp_affordances_follow_position() {
        let mut cursor = Cursor::new(4, WrapPolicy::Clamp);
        assert_eq!(
            cursor.affordances(),
            Affordances {
                skip_to_start: false,
                previous: false,
                next: true,
                skip_to_end: true,
                stop: true,
            }
        );

        cursor.next();
        let at_one = cursor.affordances();
        assert!(!at_one.skip_to_start);
        assert!(at_one.previous);
        assert!(at_one.skip_to_end);

        cursor.next();
        let at_two = cursor.affordances();
        assert!(at_two.skip_to_start);
        assert!(at_two.next);
        assert!(!at_two.skip_to_end);

        cursor.next();
        let at_last = cursor.affordances();
        assert!(!at_last.next);
        assert!(!at_last.skip_to_end);
        assert!(at_last.stop);
    }

    #[test]
    fn two_clamped_pages_never_enable_skips() {
        let mut cursor = Cursor::new(2, WrapPolicy::Clamp);
        let start = cursor.affordances();
        assert!(!start.skip_to_start && !start.skip_to_end);
        assert!(start.next && !start.previous);

        cursor.next();
        let end = cursor.affordances();
        assert!(!end.skip_to_start && !end.skip_to_end);
        assert!(!end.next && end.previous);
    }

    #[test]
    fn wrap_enables_every_control_on_multiple_pages() {
        let cursor = Cursor::new(2, WrapPolicy::Wrap);
        assert_eq!(cursor.affordances(), Affordances::ALL_ENABLED);
    }

    #[test]
    fn zero_length_is_treated_as_single_page() {
        let cursor = Cursor::at(7, 0, WrapPolicy::Wrap);
        assert_eq!(cursor.len(), 1);
        assert_eq!(cursor.index(), 0);
    }

    #[test]
    fn policies_parse_from_config_strings() {
        assert_eq!("Wrap".parse::<WrapPolicy>().unwrap(), WrapPolicy::Wrap);
        assert_eq!(" clamp ".parse::<WrapPolicy>().unwrap(), WrapPolicy::Clamp);
        assert!("sideways".parse::<WrapPolicy>().is_err());
    }

    fn navigation() -> impl Strategy<Value = Navigation> {
        prop_oneof![
            Just(Navigation::SkipToStart),
            Just(Navigation::Previous),
            Just(Navigation::Next),
            Just(Navigation::SkipToEnd),
        ]
    }

    fn policy() -> impl Strategy<Value = WrapPolicy> {
        prop_oneof![Just(WrapPolicy::Wrap), Just(WrapPolicy::Clamp)]
    }

    proptest! {
        #[test]
        fn single_page_only_allows_stop(
            policy in policy(),
            moves in prop::collection::vec(navigation(), 0..32),
        ) {
            let mut cursor = Cursor::new(1, policy);
            for step in moves {
                cursor.navigate(step);
            }
            prop_assert_eq!(cursor.index(), 0);
            prop_assert_eq!(cursor.affordances(), Affordances::STOP_ONLY);
        }

        #[test]
        fn index_stays_in_range(
            len in 1_usize..12,
            policy in policy(),
            moves in prop::collection::vec(navigation(), 0..64),
        ) {
            let mut cursor = Cursor::new(len, policy);
            for step in moves {
                cursor.navigate(step);
                prop_assert!(cursor.index() < len);
            }
        }

        #[test]
        fn clamped_next_stops_at_last(len in 1_usize..20, extra in 0_usize..5) {
            let mut cursor = Cursor::new(len, WrapPolicy::Clamp);
            for _ in 0..len + extra {
                cursor.next();
            }
            prop_assert_eq!(cursor.index(), len - 1);
        }

        #[test]
        fn wrapped_next_cycles_back(len in 1_usize..20, start in 0_usize..20) {
            let start = start % len;
            let mut cursor = Cursor::at(start, len, WrapPolicy::Wrap);
            for _ in 0..len {
                cursor.next();
            }
            prop_assert_eq!(cursor.index(), start);
        }

        #[test]
        fn wrapped_skip_to_start_toggles(len in 2_usize..20, start in 0_usize..20) {
            let start = start % len;
            let mut cursor = Cursor::at(start, len, WrapPolicy::Wrap);
            cursor.skip_to_start();
            let expected = if start == 0 { len - 1 } else { 0 };
            prop_assert_eq!(cursor.index(), expected);
        }
    }
}
