use tracing::{error, info};

use crate::CommandMeta;
use slice_core::{Context, Error};

pub const META: CommandMeta = CommandMeta {
    name: "sync",
    desc: "Re-register slash commands globally (bot owners only).",
    category: "owner",
    usage: "!sync",
};

#[poise::command(prefix_command, slash_command, owners_only, hide_in_help, category = "Owner")]
pub async fn sync(ctx: Context<'_>) -> Result<(), Error> {
    ctx.defer_ephemeral().await?;

    let commands = &ctx.framework().options().commands;
    match poise::builtins::register_globally(ctx.http(), commands).await {
        Ok(()) => {
            info!(count = commands.len(), "slash commands registered globally");
            ctx.say(format!("Synced {} command(s).", commands.len()))
                .await?;
        }
        Err(source) => {
            error!(?source, "global command registration failed");
            ctx.say(format!("Sync failed: {}", source)).await?;
        }
    }

    Ok(())
}
