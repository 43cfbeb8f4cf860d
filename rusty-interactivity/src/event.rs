//! Events that can press a pagination control.

use std::sync::Arc;

use twilight_model::{
    application::interaction::InteractionData,
    channel::message::EmojiReactionType,
    gateway::payload::incoming::{InteractionCreate, ReactionAdd},
};

/// An incoming event that may carry a control press.
pub trait ControlEvent: Send + Sync {
    /// Button custom ID or emoji name, when the event presses something.
    fn control_id(&self) -> Option<&str>;

    /// User that caused the event.
    fn actor_id(&self) -> Option<u64>;
}

impl ControlEvent for InteractionCreate {
    fn control_id(&self) -> Option<&str> {
        match self.data.as_ref()? {
            InteractionData::MessageComponent(data) => Some(data.custom_id.as_str()),
            _ => None,
        }
    }

    fn actor_id(&self) -> Option<u64> {
        self.author_id().map(|id| id.get())
    }
}

impl ControlEvent for ReactionAdd {
    fn control_id(&self) -> Option<&str> {
        match &self.emoji {
            EmojiReactionType::Unicode { name } => Some(name.as_str()),
            EmojiReactionType::Custom { name, .. } => name.as_deref(),
        }
    }

    fn actor_id(&self) -> Option<u64> {
        Some(self.user_id.get())
    }
}

impl<T: ControlEvent + ?Sized> ControlEvent for Arc<T> {
    fn control_id(&self) -> Option<&str> {
        (**self).control_id()
    }

    fn actor_id(&self) -> Option<u64> {
        (**self).actor_id()
    }
}

impl<T: ControlEvent + ?Sized> ControlEvent for Box<T> {
    fn control_id(&self) -> Option<&str> {
        (**self).control_id()
    }

    fn actor_id(&self) -> Option<u64> {
        (**self).actor_id()
    }
}
