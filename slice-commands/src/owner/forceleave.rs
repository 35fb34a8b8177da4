use poise::serenity_prelude as serenity;
use tracing::{info, warn};

use crate::CommandMeta;
use crate::moderation::embeds::usage_message;
use slice_core::{Context, Error};
use slice_utils::parse::parse_snowflake;

pub const META: CommandMeta = CommandMeta {
    name: "forceleave",
    desc: "Make the bot leave a server (bot owners only).",
    category: "owner",
    usage: "!forceleave [guild_id]",
};

#[poise::command(prefix_command, slash_command, owners_only, hide_in_help, category = "Owner")]
pub async fn forceleave(
    ctx: Context<'_>,
    #[description = "Server id (defaults to this server)"] guild_id: Option<String>,
) -> Result<(), Error> {
    let target = match guild_id.as_deref() {
        Some(raw) => parse_snowflake(raw).map(serenity::GuildId::new),
        None => ctx.guild_id(),
    };

    let Some(target) = target else {
        ctx.say(usage_message(META.usage)).await?;
        return Ok(());
    };

    // Reply first; after leaving the current guild the channel is gone.
    ctx.say(format!("Leaving server `{}`.", target.get())).await?;

    match target.leave(ctx.http()).await {
        Ok(()) => info!(guild_id = target.get(), "left guild on owner request"),
        Err(source) => {
            warn!(?source, guild_id = target.get(), "forced leave failed");
            if Some(target) != ctx.guild_id() {
                ctx.say(format!("I couldn't leave `{}`: {}", target.get(), source))
                    .await?;
            }
        }
    }

    Ok(())
}
