use std::{collections::HashMap, sync::Arc, time::Duration};

use tracing::{debug, warn};
use twilight_model::{
    channel::message::component::{ActionRow, Button, ButtonStyle, Component},
    gateway::payload::incoming::{InteractionCreate, MessageCreate},
};

use crate::CommandMeta;
use rusty_core::Context;
use rusty_interactivity::{CancelToken, ControlEvent, Page, Surface};
use rusty_utils::{parse::parse_duration_seconds, surface::MessageSurface};

pub const META: CommandMeta = CommandMeta {
    name: "poll",
    desc: "Run a yes/no poll that collects button votes until it closes.",
    category: "interactivity",
    usage: "!poll <duration> <question>",
};

pub const POLL_YES_ID: &str = "poll:yes";
pub const POLL_NO_ID: &str = "poll:no";

const MAX_POLL_SECS: u64 = 60 * 60;

/// Start a poll and tally it in the background once the duration elapses.
pub async fn run(
    ctx: Context,
    msg: Box<MessageCreate>,
    arg1: Option<&str>,
    arg_tail: Option<&str>,
) -> anyhow::Result<()> {
    let http = &ctx.http;

    let (Some(secs), Some(question)) = (
        arg1.and_then(parse_duration_seconds)
            .filter(|secs| (1..=MAX_POLL_SECS).contains(secs)),
        arg_tail,
    ) else {
        let usage = format!(
            "Usage: `{}` (duration like `30s`, `5m`, at most 1h)",
            META.usage
        );
        http.create_message(msg.channel_id).content(&usage).await?;
        return Ok(());
    };

    let content = format!("📊 **{question}**\nVoting closes in {secs}s.");
    let message = http
        .create_message(msg.channel_id)
        .content(&content)
        .components(&[vote_row()])
        .await?
        .model()
        .await?;

    let votes = ctx.components.collect(
        message.id,
        |event: &Arc<InteractionCreate>| {
            matches!(event.control_id(), Some(POLL_YES_ID | POLL_NO_ID))
        },
        CancelToken::with_timeout(Duration::from_secs(secs)),
    );
    let surface = MessageSurface::for_message(Arc::clone(&ctx.http), &message);
    let question = question.to_owned();

    ctx.sessions.spawn(async move {
        let events = votes.wait().await;
        let tally = Tally::count(&events);
        debug!(
            message_id = message.id.get(),
            yes = tally.yes,
            no = tally.no,
            "poll closed"
        );

        let results = Page::text(format!("📊 **{question}**\n{}", tally.summary()));
        if let Err(source) = surface.update(&results, &[]).await {
            warn!(?source, message_id = message.id.get(), "failed to post poll results");
        }
    });

    Ok(())
}

fn vote_row() -> Component {
    let button = |custom_id: &str, label: &str, style| {
        Component::Button(Button {
            id: None,
            custom_id: Some(custom_id.to_owned()),
            disabled: false,
            emoji: None,
            label: Some(label.to_owned()),
            style,
            url: None,
            sku_id: None,
        })
    };

    Component::ActionRow(ActionRow {
        id: None,
        components: vec![
            button(POLL_YES_ID, "Yes", ButtonStyle::Success),
            button(POLL_NO_ID, "No", ButtonStyle::Danger),
        ],
    })
}

#[derive(Debug, Default, PartialEq, Eq)]
struct Tally {
    yes: usize,
    no: usize,
}

impl Tally {
    /// Count votes in arrival order; a user's last vote wins.
    fn count<E: ControlEvent>(events: &[E]) -> Self {
        let mut latest = HashMap::new();
        for event in events {
            if let (Some(actor), Some(choice)) = (event.actor_id(), event.control_id()) {
                latest.insert(actor, choice == POLL_YES_ID);
            }
        }

        latest.values().fold(Self::default(), |mut tally, yes| {
            if *yes {
                tally.yes += 1;
            } else {
                tally.no += 1;
            }
            tally
        })
    }

    fn summary(&self) -> String {
        match self.yes + self.no {
            0 => "Poll closed with no votes.".to_owned(),
            1 => format!("Poll closed. Yes: {} • No: {} (1 voter)", self.yes, self.no),
            total => format!(
                "Poll closed. Yes: {} • No: {} ({total} voters)",
                self.yes, self.no
            ),
        }
    }
}
