use poise::serenity_prelude as serenity;
use tracing::{info, warn};

use crate::CommandMeta;
use crate::checks::guild_with_permission;
use crate::moderation::embeds::{guild_only_message, usage_message};
use slice_core::{Context, Error};
use slice_utils::embed::{DEFAULT_EMBED_COLOR, display_name};
use slice_utils::formatting::channel_mention;

pub const META: CommandMeta = CommandMeta {
    name: "announce",
    desc: "Post an announcement embed to a channel.",
    category: "admin",
    usage: "!announce [channel] <title> <message>",
};

#[poise::command(prefix_command, slash_command, category = "Admin")]
pub async fn announce(
    ctx: Context<'_>,
    #[description = "Channel to post in (defaults to this one)"]
    channel: Option<serenity::GuildChannel>,
    #[description = "Announcement title"] title: Option<String>,
    #[description = "Announcement body"]
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

    let (Some(title), Some(message)) = (title, message) else {
        ctx.say(usage_message(META.usage)).await?;
        return Ok(());
    };

    let channel_id = match channel {
        Some(channel) if channel.guild_id != guild_id => {
            ctx.say("That channel isn't in this server.").await?;
            return Ok(());
        }
        Some(channel) => channel.id,
        None => ctx.channel_id(),
    };

    let embed = serenity::CreateEmbed::new()
        .title(title)
        .description(message)
        .color(DEFAULT_EMBED_COLOR)
        .footer(
            serenity::CreateEmbedFooter::new(format!("Announced by {}", display_name(ctx.author())))
                .icon_url(ctx.author().face()),
        )
        .timestamp(serenity::Timestamp::now());

    if let Err(source) = channel_id
        .send_message(ctx.http(), serenity::CreateMessage::new().embed(embed))
        .await
    {
        warn!(?source, channel_id = channel_id.get(), "announcement failed");
        ctx.say(format!(
            "I couldn't post in {}. Check my permissions there.",
            channel_mention(channel_id.get())
        ))
        .await?;
        return Ok(());
    }

    info!(
        guild_id = guild_id.get(),
        channel_id = channel_id.get(),
        moderator_id = ctx.author().id.get(),
        "announcement posted"
    );

    ctx.send(
        poise::CreateReply::default()
            .content(format!(
                "Announcement sent to {}.",
                channel_mention(channel_id.get())
            ))
            .ephemeral(true),
    )
    .await?;
    Ok(())
}
