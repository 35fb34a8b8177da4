use poise::serenity_prelude as serenity;

use crate::CommandMeta;
use crate::checks::guild_with_permission;
use crate::moderation::embeds::{guild_only_message, usage_message};
use slice_core::{Context, Error};

pub const META: CommandMeta = CommandMeta {
    name: "say",
    desc: "Make the bot say something in this channel.",
    category: "admin",
    usage: "!say <message>",
};

/// User and role pings go through; `@everyone` and `@here` never do.
pub fn relay_mentions() -> serenity::CreateAllowedMentions {
    serenity::CreateAllowedMentions::new()
        .all_users(true)
        .all_roles(false)
        .everyone(false)
}

#[poise::command(prefix_command, slash_command, category = "Admin")]
pub async fn say(
    ctx: Context<'_>,
    #[description = "What to say"]
    #[rest]
    message: Option<String>,
) -> Result<(), Error> {
    let Some(guild_id) = ctx.guild_id() else {
        ctx.say(guild_only_message()).await?;
        return Ok(());
    };

    if guild_with_permission(&ctx, guild_id, serenity::Permissions::MANAGE_MESSAGES)
        .await?
        .is_none()
    {
        return Ok(());
    }

    let Some(message) = message.filter(|text| !text.trim().is_empty()) else {
        ctx.say(usage_message(META.usage)).await?;
        return Ok(());
    };

    ctx.channel_id()
        .send_message(
            ctx.http(),
            serenity::CreateMessage::new()
                .content(message)
                .allowed_mentions(relay_mentions()),
        )
        .await?;

    match ctx {
        poise::Context::Prefix(prefix) => {
            let _ = prefix.msg.delete(ctx.http()).await;
        }
        poise::Context::Application(_) => {
            ctx.send(
                poise::CreateReply::default()
                    .content("Message sent.")
                    .ephemeral(true),
            )
            .await?;
        }
    }

    Ok(())
}
