//! Shared message and interaction response helpers for paginated flows.

use std::sync::Arc;

use tracing::debug;
use twilight_http::{Client, request::channel::reaction::RequestReactionType};
use twilight_model::{
    channel::{Message, message::MessageFlags},
    gateway::payload::incoming::InteractionCreate,
    http::interaction::{InteractionResponse, InteractionResponseType},
    id::{Id, marker::ChannelMarker},
};
use twilight_util::builder::InteractionResponseDataBuilder;

use rusty_interactivity::PaginationRequest;

use crate::surface::MessageSurface;

/// Generic message shown when a component no longer belongs to a live session.
pub const PAGINATION_EXPIRED_MESSAGE: &str =
    "This pagination session expired. Run the command again.";

/// Message shown when someone other than the session owner presses a control.
pub const PAGINATION_WRONG_USER_MESSAGE: &str =
    "Only the person who ran this command can turn its pages.";

/// Send the first page of a button session and return its surface.
pub async fn send_button_paginated_message(
    http: Arc<Client>,
    channel_id: Id<ChannelMarker>,
    request: &mut PaginationRequest,
) -> anyhow::Result<MessageSurface> {
    let components = request.controls()?;
    let page = request.current_view().page;

    let mut create = http
        .create_message(channel_id)
        .embeds(page.embeds())
        .components(&components);
    if let Some(content) = page.content.as_deref() {
        create = create.content(content);
    }

    let message = create.await?.model().await?;
    debug!(
        message_id = message.id.get(),
        pages = request.page_count(),
        "button paginated message sent"
    );

    Ok(MessageSurface::for_message(http, &message))
}

/// Send the first page of a reaction session, add its emojis in order and
/// return its surface.
pub async fn send_reaction_paginated_message(
    http: Arc<Client>,
    channel_id: Id<ChannelMarker>,
    request: &mut PaginationRequest,
) -> anyhow::Result<MessageSurface> {
    let emojis: Vec<String> = request
        .emojis()?
        .ordered()
        .into_iter()
        .map(ToOwned::to_owned)
        .collect();
    let page = request.current_view().page;

    let mut create = http
        .create_message(channel_id)
        .embeds(page.embeds())
        .components(&page.components);
    if let Some(content) = page.content.as_deref() {
        create = create.content(content);
    }

    let message: Message = create.await?.model().await?;

    for name in &emojis {
        let emoji = RequestReactionType::Unicode { name };
        http.create_reaction(message.channel_id, message.id, &emoji)
            .await?;
    }
    debug!(
        message_id = message.id.get(),
        pages = request.page_count(),
        "reaction paginated message sent"
    );

    Ok(MessageSurface::for_message(http, &message))
}

/// Acknowledge a component press without changing the message yet.
pub async fn defer_component_update(
    http: &Client,
    interaction: &InteractionCreate,
) -> anyhow::Result<()> {
    let response = InteractionResponse {
        kind: InteractionResponseType::DeferredUpdateMessage,
        data: None,
    };

    http.interaction(interaction.application_id)
        .create_response(interaction.id, &interaction.token, &response)
        .await?;

    Ok(())
}

/// Respond to a component interaction with an ephemeral message.
pub async fn respond_ephemeral_message(
    http: &Client,
    interaction: &InteractionCreate,
    content: &str,
) -> anyhow::Result<()> {
    let response = InteractionResponse {
        kind: InteractionResponseType::ChannelMessageWithSource,
        data: Some(
            InteractionResponseDataBuilder::new()
                .content(content)
                .flags(MessageFlags::EPHEMERAL)
                .build(),
        ),
    };

    http.interaction(interaction.application_id)
        .create_response(interaction.id, &interaction.token, &response)
        .await?;

    Ok(())
}

/// Respond with the standard expired pagination message.
pub async fn respond_expired(http: &Client, interaction: &InteractionCreate) -> anyhow::Result<()> {
    respond_ephemeral_message(http, interaction, PAGINATION_EXPIRED_MESSAGE).await
}

/// Respond to a press on a live session from someone who does not own it.
pub async fn respond_wrong_user(
    http: &Client,
    interaction: &InteractionCreate,
) -> anyhow::Result<()> {
    respond_ephemeral_message(http, interaction, PAGINATION_WRONG_USER_MESSAGE).await
}
