//! The external message a pagination session renders into.

use async_trait::async_trait;
use twilight_model::channel::message::component::Component;

use crate::{cursor::Control, page::Page};

/// A control press as seen by the surface.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ControlPress {
    pub control: Control,
    /// Button custom ID or emoji name that was pressed.
    pub raw_id: String,
    pub actor_id: u64,
}

/// Render/update/delete operations on the paginated message.
///
/// Failures are returned as I/O-style errors to whoever drives the session.
#[async_trait]
pub trait Surface: Send + Sync {
    /// Replace the message content and component rows.
    async fn update(&self, page: &Page, components: &[Component]) -> anyhow::Result<()>;

    /// Delete the message.
    async fn delete(&self) -> anyhow::Result<()>;

    /// Remove every reaction from the message.
    async fn clear_reactions(&self) -> anyhow::Result<()>;

    /// Undo the visible side of a press, such as the user's reaction.
    async fn release(&self, _press: &ControlPress) -> anyhow::Result<()> {
        Ok(())
    }
}
