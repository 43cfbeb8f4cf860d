//! Button control set for component-based pagination.

use twilight_model::channel::message::{
    EmojiReactionType,
    component::{ActionRow, Button, ButtonStyle, Component},
};

use crate::cursor::{Affordances, Control};

/// Visual definition of one pagination button.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ButtonSpec {
    pub custom_id: String,
    pub label: Option<String>,
    pub emoji: Option<String>,
    pub style: ButtonStyle,
}

impl ButtonSpec {
    pub fn new(custom_id: impl Into<String>, label: impl Into<String>, style: ButtonStyle) -> Self {
        Self {
            custom_id: custom_id.into(),
            label: Some(label.into()),
            emoji: None,
            style,
        }
    }

    fn render(&self, disabled: bool) -> Component {
        Component::Button(Button {
            id: None,
            custom_id: Some(self.custom_id.clone()),
            disabled,
            emoji: self.emoji.as_ref().map(|name| EmojiReactionType::Unicode {
                name: name.clone(),
            }),
            label: self.label.clone(),
            style: self.style,
            url: None,
            sku_id: None,
        })
    }
}

/// The five pagination buttons.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PaginationButtons {
    pub skip_to_start: ButtonSpec,
    pub previous: ButtonSpec,
    pub stop: ButtonSpec,
    pub next: ButtonSpec,
    pub skip_to_end: ButtonSpec,
}

impl Default for PaginationButtons {
    fn default() -> Self {
        Self {
            skip_to_start: ButtonSpec::new("pg:first", "⏮ First", ButtonStyle::Secondary),
            previous: ButtonSpec::new("pg:prev", "◀ Prev", ButtonStyle::Secondary),
            stop: ButtonSpec::new("pg:stop", "Stop", ButtonStyle::Danger),
            next: ButtonSpec::new("pg:next", "Next ▶", ButtonStyle::Secondary),
            skip_to_end: ButtonSpec::new("pg:last", "Last ⏭", ButtonStyle::Secondary),
        }
    }
}

impl PaginationButtons {
    pub fn spec(&self, control: Control) -> &ButtonSpec {
        match control {
            Control::SkipToStart => &self.skip_to_start,
            Control::Previous => &self.previous,
            Control::Stop => &self.stop,
            Control::Next => &self.next,
            Control::SkipToEnd => &self.skip_to_end,
        }
    }

    /// Map a pressed button's custom ID back to its control.
    pub fn control_for(&self, custom_id: &str) -> Option<Control> {
        Control::ALL
            .into_iter()
            .find(|control| self.spec(*control).custom_id == custom_id)
    }

    /// Build the navigation action row for the given enablement.
    pub fn render(&self, affordances: Affordances) -> Component {
        Component::ActionRow(ActionRow {
            id: None,
            components: Control::ALL
                .into_iter()
                .map(|control| self.spec(control).render(!affordances.is_enabled(control)))
                .collect(),
        })
    }

    /// Build the action row with every button disabled.
    pub fn render_disabled(&self) -> Component {
        self.render(Affordances::ALL_DISABLED)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn disabled_flags(row: &Component) -> Vec<bool> {
        let Component::ActionRow(row) = row else {
            panic!("expected an action row");
        };
        row.components
            .iter()
            .map(|component| match component {
                Component::Button(button) => button.disabled,
                other => panic!("unexpected component {other:?}"),
            })
            .collect()
    }

    #[test]
    fn render_orders_buttons_and_applies_enablement() {
        let buttons = PaginationButtons::default();
        let row = buttons.render(Affordances::STOP_ONLY);

        assert_eq!(disabled_flags(&row), vec![true, true, false, true, true]);
    }

    #[test]
    fn disabled_render_disables_stop_too() {
        let buttons = PaginationButtons::default();
        let row = buttons.render_disabled();

        assert!(disabled_flags(&row).into_iter().all(|disabled| disabled));
    }

    #[test]
    fn custom_ids_map_back_to_controls() {
        let buttons = PaginationButtons::default();

        assert_eq!(buttons.control_for("pg:next"), Some(Control::Next));
        assert_eq!(buttons.control_for("pg:stop"), Some(Control::Stop));
        assert_eq!(buttons.control_for("pg:unknown"), None);
    }
}
