pub mod session;
pub mod utility;

use std::sync::Arc;

use tracing::debug;
use twilight_model::gateway::payload::incoming::{InteractionCreate, MessageCreate, ReactionAdd};

use rusty_core::Context;
use rusty_interactivity::ControlEvent;
use rusty_utils::{
    COMMAND_PREFIX,
    respond::{
        defer_component_update, respond_ephemeral_message, respond_expired, respond_wrong_user,
    },
};

/// What to do with a component press no live session claimed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum UnclaimedRoute {
    Pagination,
    Poll,
}

fn route_unclaimed(custom_id: &str) -> Option<UnclaimedRoute> {
    const ROUTES: [(&str, UnclaimedRoute); 2] = [
        ("pg:", UnclaimedRoute::Pagination),
        ("poll:", UnclaimedRoute::Poll),
    ];

    ROUTES
        .into_iter()
        .find_map(|(prefix, route)| custom_id.starts_with(prefix).then_some(route))
}

// Global command meta data
pub struct CommandMeta {
    pub name: &'static str,
    pub desc: &'static str,
    pub category: &'static str,
    pub usage: &'static str,
}

pub const COMMANDS: &[CommandMeta] = &[
    utility::ping::META,
    utility::help::META,
    utility::pagetest::META,
    utility::reactpage::META,
    utility::poll::META,
    // Add new commands here
];

pub async fn handle_message(ctx: Context, msg: Box<MessageCreate>) -> anyhow::Result<()> {
    if msg.author.bot {
        return Ok(());
    }

    let content_owned = msg.content.clone();
    let content = content_owned.trim();

    if !content.starts_with(COMMAND_PREFIX) {
        return Ok(());
    }

    let content = content.trim_start_matches(COMMAND_PREFIX).trim();
    let mut command_and_rest = content.splitn(2, char::is_whitespace);
    let cmd = command_and_rest.next().unwrap_or("").to_ascii_lowercase();
    let rest = command_and_rest
        .next()
        .map(str::trim)
        .filter(|value| !value.is_empty());

    let (arg1, arg_tail) = split_args(rest);

    match cmd.as_str() {
        "ping" => utility::ping::run(ctx.clone(), msg).await?,
        "help" => utility::help::run(ctx.clone(), msg, arg1).await?,
        "pagetest" => utility::pagetest::run(ctx.clone(), msg, arg1, arg_tail).await?,
        "reactpage" => utility::reactpage::run(ctx.clone(), msg, arg1).await?,
        "poll" => utility::poll::run(ctx.clone(), msg, arg1, arg_tail).await?,
        // Add new commands here
        _ => {}
    }

    Ok(())
}

fn split_args(rest: Option<&str>) -> (Option<&str>, Option<&str>) {
    let Some(value) = rest else {
        return (None, None);
    };

    let mut args = value.splitn(2, char::is_whitespace);
    let first = args.next().filter(|arg| !arg.is_empty());
    let tail = args
        .next()
        .map(str::trim)
        .filter(|remaining| !remaining.is_empty());

    (first, tail)
}

/// Offer a component interaction to the sessions waiting on its message.
///
/// Claimed presses are acknowledged with a deferred update; the owning
/// session edits the message itself. Unclaimed presses get an ephemeral
/// explanation.
pub async fn handle_interaction(
    ctx: Context,
    interaction: Box<InteractionCreate>,
) -> anyhow::Result<()> {
    let interaction: Arc<InteractionCreate> = Arc::from(interaction);

    let Some(custom_id) = interaction.control_id().map(ToOwned::to_owned) else {
        return Ok(());
    };
    let Some(message_id) = interaction.message.as_ref().map(|message| message.id) else {
        return Ok(());
    };

    let outcome = ctx.components.dispatch(&message_id, &interaction);
    if outcome.is_handled() {
        debug!(message_id = message_id.get(), %custom_id, ?outcome, "component press claimed");
        return defer_component_update(&ctx.http, &interaction).await;
    }

    match route_unclaimed(&custom_id) {
        Some(UnclaimedRoute::Pagination) if ctx.components.pending(&message_id) > 0 => {
            respond_wrong_user(&ctx.http, &interaction).await?;
        }
        Some(UnclaimedRoute::Pagination) => respond_expired(&ctx.http, &interaction).await?,
        Some(UnclaimedRoute::Poll) => {
            respond_ephemeral_message(&ctx.http, &interaction, "This poll is closed.").await?;
        }
        None => {}
    }

    Ok(())
}

/// Offer a reaction to the sessions waiting on its message.
pub async fn handle_reaction(ctx: Context, reaction: Box<ReactionAdd>) -> anyhow::Result<()> {
    let reaction: Arc<ReactionAdd> = Arc::from(reaction);
    let message_id = reaction.message_id;

    let outcome = ctx.reactions.dispatch(&message_id, &reaction);
    if outcome.is_handled() {
        debug!(message_id = message_id.get(), ?outcome, "reaction claimed");
    }

    Ok(())
}
