use twilight_model::gateway::payload::incoming::MessageCreate;

use crate::{
    CommandMeta,
    session::{parse_wrap_arg, start_reaction_session},
    utility::pagetest::build_test_items,
};
use rusty_core::Context;
use rusty_interactivity::{CleanupPolicy, PaginationEmojis, PaginationRequest};
use rusty_utils::pages::build_list_pages;

pub const META: CommandMeta = CommandMeta {
    name: "reactpage",
    desc: "Try out reaction pagination.",
    category: "interactivity",
    usage: "!reactpage [wrap|clamp]",
};

const ITEMS_PER_PAGE: usize = 6;

/// Reaction pagination demo. Reactions cannot be disabled, so a configured
/// disable-controls cleanup falls back to removing them.
pub async fn run(ctx: Context, msg: Box<MessageCreate>, arg1: Option<&str>) -> anyhow::Result<()> {
    let Some(wrap) = parse_wrap_arg(arg1, ctx.config.wrap) else {
        let usage = format!("Usage: `{}`", META.usage);
        ctx.http.create_message(msg.channel_id).content(&usage).await?;
        return Ok(());
    };

    let pages = build_list_pages("Reaction Pagination Test", &build_test_items(), ITEMS_PER_PAGE)?;
    let request = PaginationRequest::reactions(
        pages,
        wrap,
        reaction_cleanup(ctx.config.cleanup),
        PaginationEmojis::default(),
    )?;

    start_reaction_session(&ctx, msg.channel_id, msg.author.id, request).await
}

fn reaction_cleanup(configured: CleanupPolicy) -> CleanupPolicy {
    match configured {
        CleanupPolicy::DisableControls => CleanupPolicy::StripControls,
        other => other,
    }
}
