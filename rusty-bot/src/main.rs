use std::{sync::Arc, time::Duration};

use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;
use twilight_gateway::{EventTypeFlags, Intents, Shard, ShardId, StreamExt as _};
use twilight_http::Client;
use twilight_model::gateway::event::Event;

use rustls::crypto::ring::default_provider;

use rusty_commands::{handle_interaction, handle_message, handle_reaction};
use rusty_core::{Config, Context};

/// How long shutdown waits for sessions to apply their cleanup policy.
const SHUTDOWN_GRACE: Duration = Duration::from_secs(10);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    default_provider()
        .install_default()
        .map_err(|_| anyhow::anyhow!("failed to install rustls ring provider"))?;

    // Load the .env file
    dotenvy::dotenv().ok();

    let config = Config::from_env()?;
    info!(
        timeout_secs = config.pagination_timeout.as_secs(),
        wrap = %config.wrap,
        cleanup = %config.cleanup,
        "configuration loaded"
    );

    // Create a single shared HTTP Client
    let http = Arc::new(Client::new(config.token.clone()));
    let token = config.token.clone();
    let ctx = Context::new(Arc::clone(&http), config);

    // Reactions are needed for reaction-driven pagination
    let intents = Intents::GUILDS
        | Intents::GUILD_MESSAGES
        | Intents::MESSAGE_CONTENT
        | Intents::GUILD_MESSAGE_REACTIONS;

    // A shard is one Gateway WebSocket connection to Discord
    let mut shard = Shard::new(ShardId::new(0, 1), token, intents);

    info!("Rusty is connecting...");

    loop {
        let item = tokio::select! {
            item = shard.next_event(EventTypeFlags::all()) => item,
            _ = tokio::signal::ctrl_c() => {
                info!("shutdown requested");
                break;
            }
        };

        let event = match item {
            Some(Ok(event)) => event,
            Some(Err(source)) => {
                error!(?source, "gateway event stream error");
                continue;
            }
            None => break,
        };

        match event {
            Event::Ready(_) => {
                info!("Rusty has successfully awoken!");
            }

            Event::MessageCreate(msg) => {
                let ctx = ctx.clone();
                tokio::spawn(async move {
                    if let Err(source) = handle_message(ctx, msg).await {
                        warn!(?source, "message command failed");
                    }
                });
            }
            Event::InteractionCreate(interaction) => {
                let ctx = ctx.clone();
                tokio::spawn(async move {
                    if let Err(source) = handle_interaction(ctx, interaction).await {
                        warn!(?source, "component interaction failed");
                    }
                });
            }
            Event::ReactionAdd(reaction) => {
                if let Err(source) = handle_reaction(ctx.clone(), reaction).await {
                    warn!(?source, "reaction handling failed");
                }
            }
            _ => {} // Ignore unused events
        }
    }

    // Wake every waiting session so each applies its cleanup policy.
    ctx.components.clear();
    ctx.reactions.clear();

    let unfinished = ctx.sessions.drain(SHUTDOWN_GRACE).await;
    if unfinished > 0 {
        warn!(unfinished, "sessions did not finish cleanup before shutdown");
    }

    Ok(()) // Return Success, shutdown cleanly
}
