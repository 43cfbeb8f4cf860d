use twilight_model::channel::message::embed::Embed;
use twilight_util::builder::embed::{EmbedBuilder, EmbedFooterBuilder};

/// Default embed color used across the bot UI.
pub const DEFAULT_EMBED_COLOR: u32 = 0x90_54_30;

/// Build a standard paginated embed with consistent styling.
pub fn build_paginated_embed(
    title: &str,
    description: impl Into<String>,
    page: usize,
    total_pages: usize,
) -> anyhow::Result<Embed> {
    build_paginated_embed_with_footer_note(title, description, page, total_pages, None)
}

/// Build a standard paginated embed with an optional footer suffix.
pub fn build_paginated_embed_with_footer_note(
    title: &str,
    description: impl Into<String>,
    page: usize,
    total_pages: usize,
    footer_note: Option<&str>,
) -> anyhow::Result<Embed> {
    let footer_text = paginated_footer_text(page, total_pages, footer_note);

    let builder = EmbedBuilder::new()
        .title(title)
        .color(DEFAULT_EMBED_COLOR)
        .description(description);

    let embed = if footer_text.is_empty() {
        builder.validate()?.build()
    } else {
        let footer = EmbedFooterBuilder::new(footer_text).build();
        builder.footer(footer).validate()?.build()
    };

    Ok(embed)
}

/// Footer line for a paginated embed, e.g. `Page 2/5 • sorted by name`.
///
/// Single-page embeds only show the note.
pub fn paginated_footer_text(page: usize, total_pages: usize, footer_note: Option<&str>) -> String {
    let page = page.max(1);
    let total_pages = total_pages.max(1);
    let note = footer_note.filter(|note| !note.is_empty());

    match (total_pages > 1, note) {
        (true, Some(note)) => format!("Page {page}/{total_pages} • {note}"),
        (true, None) => format!("Page {page}/{total_pages}"),
        (false, Some(note)) => note.to_owned(),
        (false, None) => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn footer_text_variants() {
        assert_eq!(paginated_footer_text(2, 5, None), "Page 2/5");
        assert_eq!(paginated_footer_text(0, 3, Some("note")), "Page 1/3 • note");
        assert_eq!(paginated_footer_text(1, 1, Some("note")), "note");
        assert_eq!(paginated_footer_text(1, 1, Some("")), "");
    }

    #[test]
    fn paginated_embed_carries_footer() {
        let embed = build_paginated_embed("Title", "body", 1, 2).unwrap();
        assert_eq!(embed.title.as_deref(), Some("Title"));
        assert_eq!(embed.footer.map(|footer| footer.text).as_deref(), Some("Page 1/2"));
    }
}
