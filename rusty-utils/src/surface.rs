//! Discord message surface for pagination sessions.

use std::sync::Arc;

use async_trait::async_trait;
use twilight_http::{Client, request::channel::reaction::RequestReactionType};
use twilight_model::{
    channel::{Message, message::component::Component},
    id::{
        Id,
        marker::{ChannelMarker, MessageMarker},
    },
};

use rusty_interactivity::{ControlPress, Page, Surface};

/// A sent message that a pagination session renders into.
#[derive(Clone)]
pub struct MessageSurface {
    http: Arc<Client>,
    channel_id: Id<ChannelMarker>,
    message_id: Id<MessageMarker>,
}

impl MessageSurface {
    pub fn new(
        http: Arc<Client>,
        channel_id: Id<ChannelMarker>,
        message_id: Id<MessageMarker>,
    ) -> Self {
        Self {
            http,
            channel_id,
            message_id,
        }
    }

    /// Surface for a message the bot just created.
    pub fn for_message(http: Arc<Client>, message: &Message) -> Self {
        Self::new(http, message.channel_id, message.id)
    }

    pub fn message_id(&self) -> Id<MessageMarker> {
        self.message_id
    }
}

#[async_trait]
impl Surface for MessageSurface {
    async fn update(&self, page: &Page, components: &[Component]) -> anyhow::Result<()> {
        self.http
            .update_message(self.channel_id, self.message_id)
            .content(page.content.as_deref())
            .embeds(Some(page.embeds()))
            .components(Some(components))
            .await?;

        Ok(())
    }

    async fn delete(&self) -> anyhow::Result<()> {
        self.http
            .delete_message(self.channel_id, self.message_id)
            .await?;

        Ok(())
    }

    async fn clear_reactions(&self) -> anyhow::Result<()> {
        self.http
            .delete_all_reactions(self.channel_id, self.message_id)
            .await?;

        Ok(())
    }

    async fn release(&self, press: &ControlPress) -> anyhow::Result<()> {
        let Some(user_id) = Id::new_checked(press.actor_id) else {
            return Ok(());
        };

        let emoji = RequestReactionType::Unicode {
            name: &press.raw_id,
        };
        self.http
            .delete_reaction(self.channel_id, self.message_id, &emoji, user_id)
            .await?;

        Ok(())
    }
}
