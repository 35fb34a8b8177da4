use slice_core::{Context, Error};

use crate::CommandMeta;

pub const META: CommandMeta = CommandMeta {
    name: "ping",
    desc: "Show the gateway latency.",
    category: "utility",
    usage: "!ping",
};

#[poise::command(prefix_command, slash_command, category = "Utility")]
pub async fn ping(ctx: Context<'_>) -> Result<(), Error> {
    let latency = ctx.ping().await;
    if latency.is_zero() {
        ctx.say("Pong! (gateway latency not measured yet)").await?;
    } else {
        ctx.say(format!("Pong! Gateway latency: {}ms", latency.as_millis()))
            .await?;
    }
    Ok(())
}
