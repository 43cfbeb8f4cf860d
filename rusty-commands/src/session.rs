//! Glue between command handlers and the pagination engine.

use std::sync::Arc;

use tracing::{debug, warn};
use twilight_model::id::{
    Id,
    marker::{ChannelMarker, UserMarker},
};

use rusty_core::Context;
use rusty_interactivity::{CancelToken, PaginationRequest, WrapPolicy, paginate};
use rusty_utils::respond::{send_button_paginated_message, send_reaction_paginated_message};

/// Send a button-paginated message and drive it as a tracked background
/// session until it stops or times out.
pub async fn start_button_session(
    ctx: &Context,
    channel_id: Id<ChannelMarker>,
    owner_id: Id<UserMarker>,
    mut request: PaginationRequest,
) -> anyhow::Result<()> {
    let http = Arc::clone(&ctx.http);
    let surface = send_button_paginated_message(http, channel_id, &mut request).await?;

    let registry = ctx.components.clone();
    let token = CancelToken::with_timeout(ctx.config.pagination_timeout);
    let message_id = surface.message_id();

    ctx.sessions.spawn(async move {
        let owner = owner_id.get();
        match paginate(&registry, message_id, request, &surface, owner, token).await {
            Ok(end) => {
                debug!(?end, message_id = message_id.get(), "button pagination finished");
            }
            Err(source) => {
                warn!(
                    ?source,
                    message_id = message_id.get(),
                    "button pagination cleanup failed"
                );
            }
        }
    });

    Ok(())
}

/// Send a reaction-paginated message and drive it as a tracked background
/// session until it stops or times out.
pub async fn start_reaction_session(
    ctx: &Context,
    channel_id: Id<ChannelMarker>,
    owner_id: Id<UserMarker>,
    mut request: PaginationRequest,
) -> anyhow::Result<()> {
    let http = Arc::clone(&ctx.http);
    let surface = send_reaction_paginated_message(http, channel_id, &mut request).await?;

    let registry = ctx.reactions.clone();
    let token = CancelToken::with_timeout(ctx.config.pagination_timeout);
    let message_id = surface.message_id();

    ctx.sessions.spawn(async move {
        let owner = owner_id.get();
        match paginate(&registry, message_id, request, &surface, owner, token).await {
            Ok(end) => {
                debug!(?end, message_id = message_id.get(), "reaction pagination finished");
            }
            Err(source) => {
                warn!(
                    ?source,
                    message_id = message_id.get(),
                    "reaction pagination cleanup failed"
                );
            }
        }
    });

    Ok(())
}

/// Parse an optional `wrap`/`clamp` argument.
///
/// Returns `None` when a value was given but is not a policy name.
pub fn parse_wrap_arg(raw: Option<&str>, default: WrapPolicy) -> Option<WrapPolicy> {
    match raw {
        Some(value) => value.parse().ok(),
        None => Some(default),
    }
}
