//! Reaction control set for legacy reaction-based pagination.

use crate::cursor::Control;

/// Unicode emojis standing in for the five pagination controls.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PaginationEmojis {
    pub skip_to_start: String,
    pub previous: String,
    pub stop: String,
    pub next: String,
    pub skip_to_end: String,
}

impl Default for PaginationEmojis {
    fn default() -> Self {
        Self {
            skip_to_start: "⏮".to_owned(),
            previous: "◀".to_owned(),
            stop: "⏹".to_owned(),
            next: "▶".to_owned(),
            skip_to_end: "⏭".to_owned(),
        }
    }
}

impl PaginationEmojis {
    pub fn emoji(&self, control: Control) -> &str {
        match control {
            Control::SkipToStart => &self.skip_to_start,
            Control::Previous => &self.previous,
            Control::Stop => &self.stop,
            Control::Next => &self.next,
            Control::SkipToEnd => &self.skip_to_end,
        }
    }

    /// Emojis in the order they should be added to the message.
    pub fn ordered(&self) -> [&str; 5] {
        Control::ALL.map(|control| self.emoji(control))
    }

    pub fn control_for(&self, emoji: &str) -> Option<Control> {
        Control::ALL
            .into_iter()
            .find(|control| self.emoji(*control) == emoji)
    }
}
