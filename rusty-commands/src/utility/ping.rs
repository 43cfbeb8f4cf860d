use twilight_model::gateway::payload::incoming::MessageCreate;

use crate::CommandMeta;
use rusty_core::Context;

pub const META: CommandMeta = CommandMeta {
    name: "ping",
    desc: "Replies with Pong!",
    category: "utility",
    usage: "!ping",
};

/// Send a simple connectivity response, including how many messages
/// currently have live interactive sessions.
pub async fn run(ctx: Context, msg: Box<MessageCreate>) -> anyhow::Result<()> {
    let http = &ctx.http;
    let live = ctx.components.key_count() + ctx.reactions.key_count();
    let out = format!("Pong! ({live} live interactive messages)");
    http.create_message(msg.channel_id).content(&out).await?;

    Ok(())
}
