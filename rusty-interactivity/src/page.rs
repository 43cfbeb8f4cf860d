//! Page content units.

use twilight_model::channel::message::{component::Component, embed::Embed};

/// One page of a paginated message.
///
/// Pages are caller supplied and never change once a session owns them.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Page {
    pub content: Option<String>,
    pub embed: Option<Embed>,
    /// Extra component rows rendered above the pagination controls.
    pub components: Vec<Component>,
}

impl Page {
    /// A page with text content only.
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: Some(content.into()),
            ..Self::default()
        }
    }

    /// A page with a single embed.
    pub fn embed(embed: Embed) -> Self {
        Self {
            embed: Some(embed),
            ..Self::default()
        }
    }

    /// The embeds to send for this page.
    pub fn embeds(&self) -> &[Embed] {
        self.embed.as_slice()
    }
}
