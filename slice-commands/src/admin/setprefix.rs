use poise::serenity_prelude as serenity;
use tracing::info;

use crate::CommandMeta;
use crate::checks::guild_with_permission;
use crate::moderation::embeds::{guild_only_message, usage_message};
use slice_core::{Context, Error};

pub const META: CommandMeta = CommandMeta {
    name: "setprefix",
    desc: "Change the message-command prefix until the bot restarts.",
    category: "admin",
    usage: "!setprefix <prefix>",
};

pub const MAX_PREFIX_CHARS: usize = 5;

fn validate_prefix(raw: &str) -> Result<&str, &'static str> {
    let prefix = raw.trim();
    if prefix.is_empty() {
        return Err("The prefix can't be empty.");
    }
    if prefix.chars().count() > MAX_PREFIX_CHARS {
        return Err("The prefix can be at most 5 characters.");
    }
    if prefix.chars().any(char::is_whitespace) {
        return Err("The prefix can't contain spaces.");
    }
    Ok(prefix)
}

#[poise::command(prefix_command, slash_command, category = "Admin")]
pub async fn setprefix(
    ctx: Context<'_>,
    #[description = "New prefix (max 5 characters)"] prefix: Option<String>,
) -> Result<(), Error> {
    let Some(guild_id) = ctx.guild_id() else {
        ctx.say(guild_only_message()).await?;
        return Ok(());
    };

    if guild_with_permission(&ctx, guild_id, serenity::Permissions::ADMINISTRATOR)
        .await?
        .is_none()
    {
        return Ok(());
    }

    let Some(raw) = prefix else {
        ctx.say(usage_message(META.usage)).await?;
        return Ok(());
    };

    let prefix = match validate_prefix(&raw) {
        Ok(prefix) => prefix.to_owned(),
        Err(message) => {
            ctx.say(message).await?;
            return Ok(());
        }
    };

    ctx.data().set_prefix(prefix.clone()).await;
    info!(
        guild_id = guild_id.get(),
        moderator_id = ctx.author().id.get(),
        prefix = %prefix,
        "command prefix changed"
    );

    ctx.say(format!(
        "Prefix set to `{}`. Slash commands are unaffected.",
        prefix
    ))
    .await?;
    Ok(())
}
