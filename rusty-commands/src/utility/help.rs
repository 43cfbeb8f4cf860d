use twilight_model::gateway::payload::incoming::MessageCreate;

use crate::{COMMANDS, CommandMeta, session::start_button_session};
use rusty_core::Context;
use rusty_interactivity::{Page, PaginationButtons, PaginationRequest};
use rusty_utils::{
    embed::build_paginated_embed_with_footer_note,
    pages::{page_window, total_pages},
};

pub const META: CommandMeta = CommandMeta {
    name: "help",
    desc: "Lists out all available commands.",
    category: "utility",
    usage: "!help [category]",
};

const HELP_COMMANDS_PER_PAGE: usize = 8;

/// Render the command catalog as a button-paginated embed, optionally
/// filtered by category.
pub async fn run(ctx: Context, msg: Box<MessageCreate>, arg1: Option<&str>) -> anyhow::Result<()> {
    let http = &ctx.http;
    let category = arg1.map(str::to_ascii_lowercase);

    let categories = categories();
    if let Some(wanted) = category.as_deref()
        && !categories.contains(&wanted)
    {
        let out = format!(
            "Unknown category `{wanted}`. Available categories: {}.",
            categories.join(", ")
        );
        http.create_message(msg.channel_id).content(&out).await?;
        return Ok(());
    }

    let commands = sorted_commands(category.as_deref());
    let pages = help_pages(&commands, category.as_deref())?;
    let request = PaginationRequest::buttons(
        pages,
        ctx.config.wrap,
        ctx.config.cleanup,
        PaginationButtons::default(),
    )?;

    start_button_session(&ctx, msg.channel_id, msg.author.id, request).await
}

fn categories() -> Vec<&'static str> {
    let mut categories: Vec<&str> = COMMANDS.iter().map(|c| c.category).collect();
    categories.sort_unstable();
    categories.dedup();
    categories
}

fn sorted_commands(category: Option<&str>) -> Vec<&'static CommandMeta> {
    let mut filtered: Vec<&'static CommandMeta> = COMMANDS
        .iter()
        .filter(|cmd| category.is_none_or(|wanted| cmd.category == wanted))
        .collect();

    filtered.sort_unstable_by(|left, right| {
        left.category
            .cmp(right.category)
            .then_with(|| left.name.cmp(right.name))
    });

    filtered
}

fn help_pages(commands: &[&CommandMeta], category: Option<&str>) -> anyhow::Result<Vec<Page>> {
    let total = total_pages(commands.len(), HELP_COMMANDS_PER_PAGE).max(1);
    let note = category.map(|cat| format!("category: {cat}"));

    (1..=total)
        .map(|page| {
            let (start, end) = page_window(commands.len(), HELP_COMMANDS_PER_PAGE, page);
            let description = grouped_help_description(&commands[start..end]);
            let embed = build_paginated_embed_with_footer_note(
                "Available Commands",
                description,
                page,
                total,
                note.as_deref(),
            )?;
            Ok(Page::embed(embed))
        })
        .collect()
}

fn grouped_help_description(commands: &[&CommandMeta]) -> String {
    let mut out = String::new();
    let mut current = None;

    for cmd in commands {
        if current != Some(cmd.category) {
            if current.is_some() {
                out.push('\n');
            }
            out.push_str(&format!("**{}**\n", cmd.category));
            current = Some(cmd.category);
        }
        out.push_str(&format!("`{}` {}\n", cmd.usage, cmd.desc));
    }

    if out.is_empty() {
        out.push_str("*No commands.*");
    }

    out
}
