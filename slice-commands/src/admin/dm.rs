use poise::serenity_prelude as serenity;
use tracing::{info, warn};

use crate::CommandMeta;
use crate::checks::guild_with_permission;
use crate::moderation::embeds::{guild_only_message, usage_message};
use slice_core::{Context, Error};
use slice_utils::embed::INFO_EMBED_COLOR;
use slice_utils::formatting::user_mention;

pub const META: CommandMeta = CommandMeta {
    name: "dm",
    desc: "Send a user a direct message from the server.",
    category: "admin",
    usage: "!dm <user> <message>",
};

#[poise::command(prefix_command, slash_command, category = "Admin")]
pub async fn dm(
    ctx: Context<'_>,
    #[description = "Who to message"] user: Option<serenity::User>,
    #[description = "Message to send"]
    #[rest]
    message: Option<String>,
) -> Result<(), Error> {
    let Some(guild_id) = ctx.guild_id() else {
        ctx.say(guild_only_message()).await?;
        return Ok(());
    };

    let Some(guild) =
        guild_with_permission(&ctx, guild_id, serenity::Permissions::MANAGE_MESSAGES).await?
    else {
        return Ok(());
    };

    let (Some(user), Some(message)) = (user, message.filter(|text| !text.trim().is_empty()))
    else {
        ctx.say(usage_message(META.usage)).await?;
        return Ok(());
    };

    if user.bot {
        ctx.say("I can't DM bots.").await?;
        return Ok(());
    }

    let mut embed = serenity::CreateEmbed::new()
        .title(format!("Message from {}", guild.name))
        .description(message)
        .color(INFO_EMBED_COLOR)
        .timestamp(serenity::Timestamp::now());
    if let Some(icon) = guild.icon_url() {
        embed = embed.thumbnail(icon);
    }

    let sent = match user.create_dm_channel(ctx.http()).await {
        Ok(channel) => channel
            .send_message(ctx.http(), serenity::CreateMessage::new().embed(embed))
            .await
            .map(|_| ()),
        Err(source) => Err(source),
    };

    let reply = match sent {
        Ok(()) => {
            info!(
                guild_id = guild_id.get(),
                moderator_id = ctx.author().id.get(),
                target_id = user.id.get(),
                "direct message sent"
            );
            format!("Message sent to {}.", user_mention(user.id.get()))
        }
        Err(source) => {
            warn!(?source, target_id = user.id.get(), "direct message failed");
            format!(
                "I couldn't DM {}. They may have DMs disabled.",
                user_mention(user.id.get())
            )
        }
    };

    ctx.send(
        poise::CreateReply::default()
            .content(reply)
            .ephemeral(true)
            .allowed_mentions(serenity::CreateAllowedMentions::new()),
    )
    .await?;
    Ok(())
}
