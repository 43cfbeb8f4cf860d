use twilight_model::gateway::payload::incoming::MessageCreate;

use crate::{
    CommandMeta,
    session::{parse_wrap_arg, start_button_session},
};
use rusty_core::Context;
use rusty_interactivity::{PaginationButtons, PaginationRequest};
use rusty_utils::pages::{build_list_pages, parse_one_based_page};

pub const META: CommandMeta = CommandMeta {
    name: "pagetest",
    desc: "Try out button pagination.",
    category: "interactivity",
    usage: "!pagetest [page] [wrap|clamp]",
};

const ITEMS_PER_PAGE: usize = 5;

/// Button pagination demo.
///
/// Inputs:
/// - optional one-based start page.
/// - optional wrap policy, defaulting to the configured one.
///
/// Replies with usage text on invalid input or an out-of-range page.
pub async fn run(
    ctx: Context,
    msg: Box<MessageCreate>,
    arg1: Option<&str>,
    arg_tail: Option<&str>,
) -> anyhow::Result<()> {
    let http = &ctx.http;

    let (Some(requested_page), Some(wrap)) = (
        parse_one_based_page(arg1),
        parse_wrap_arg(arg_tail, ctx.config.wrap),
    ) else {
        let usage = format!("Usage: `{}` (page starts at 1)", META.usage);
        http.create_message(msg.channel_id).content(&usage).await?;
        return Ok(());
    };

    let pages = build_list_pages("Pagination Test", &build_test_items(), ITEMS_PER_PAGE)?;
    if requested_page > pages.len() {
        let out = format!(
            "Page {} does not exist. Available pages: 1-{}.",
            requested_page,
            pages.len()
        );
        http.create_message(msg.channel_id).content(&out).await?;
        return Ok(());
    }

    let request = PaginationRequest::buttons(
        pages,
        wrap,
        ctx.config.cleanup,
        PaginationButtons::default(),
    )?
    .starting_at(requested_page - 1);

    start_button_session(&ctx, msg.channel_id, msg.author.id, request).await
}

pub(crate) fn build_test_items() -> Vec<String> {
    (1..=24)
        .map(|index| format!("Sample pagination item #{index}"))
        .collect()
}
