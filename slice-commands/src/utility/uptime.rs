use slice_core::{Context, Error};
use slice_utils::formatting::format_uptime;

use crate::CommandMeta;

pub const META: CommandMeta = CommandMeta {
    name: "uptime",
    desc: "How long the bot has been running.",
    category: "utility",
    usage: "!uptime",
};

#[poise::command(prefix_command, slash_command, category = "Utility")]
pub async fn uptime(ctx: Context<'_>) -> Result<(), Error> {
    let elapsed = ctx.data().started_at.elapsed().as_secs();
    ctx.say(format!("Uptime: {}", format_uptime(elapsed))).await?;
    Ok(())
}
