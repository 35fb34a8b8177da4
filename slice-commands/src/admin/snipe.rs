use poise::serenity_prelude as serenity;

use crate::CommandMeta;
use crate::moderation::embeds::guild_only_message;
use slice_core::{Context, Error};
use slice_store::DeletedMessage;
use slice_utils::embed::{SNIPE_EMBED_COLOR, requested_by_footer};
use slice_utils::formatting::user_mention;
use slice_utils::time::discord_timestamp;

pub const META: CommandMeta = CommandMeta {
    name: "snipe",
    desc: "Show the most recently deleted message in this channel.",
    category: "admin",
    usage: "!snipe",
};

pub const NOTHING_TO_SNIPE: &str =
    "Nothing to show: no recently deleted messages in this channel.";

/// Discord's limit on an embed description.
const DESCRIPTION_LIMIT: usize = 4096;

fn snipe_description(message: &DeletedMessage) -> String {
    if message.content.trim().is_empty() {
        return "*no text content*".to_owned();
    }

    if message.content.chars().count() <= DESCRIPTION_LIMIT {
        return message.content.clone();
    }

    let mut clipped: String = message.content.chars().take(DESCRIPTION_LIMIT - 1).collect();
    clipped.push('…');
    clipped
}

fn snipe_embed(message: &DeletedMessage, requester: &serenity::User) -> serenity::CreateEmbed {
    let mut author = serenity::CreateEmbedAuthor::new(message.author_name.clone());
    if let Some(url) = message.author_avatar_url.as_deref() {
        author = author.icon_url(url);
    }

    serenity::CreateEmbed::new()
        .author(author)
        .color(SNIPE_EMBED_COLOR)
        .description(snipe_description(message))
        .field("Author", user_mention(message.author_id), true)
        .field("Sent", discord_timestamp(message.created_at, 'R'), true)
        .field("Deleted", discord_timestamp(message.deleted_at, 'R'), true)
        .footer(requested_by_footer(requester))
}

#[poise::command(prefix_command, slash_command, category = "Admin")]
pub async fn snipe(ctx: Context<'_>) -> Result<(), Error> {
    if ctx.guild_id().is_none() {
        ctx.say(guild_only_message()).await?;
        return Ok(());
    }

    let Some(message) = ctx.data().snipes.latest(ctx.channel_id().get()) else {
        ctx.say(NOTHING_TO_SNIPE).await?;
        return Ok(());
    };

    ctx.send(
        poise::CreateReply::default()
            .embed(snipe_embed(&message, ctx.author()))
            .allowed_mentions(serenity::CreateAllowedMentions::new()),
    )
    .await?;
    Ok(())
}
