use poise::serenity_prelude as serenity;

use crate::CommandMeta;
use crate::moderation::embeds::guild_only_message;
use slice_core::{Context, Error};
use slice_utils::embed::{INFO_EMBED_COLOR, lookup_embed};
use slice_utils::formatting::{EMBED_FIELD_LIMIT, title_case_identifier, user_mention};
use slice_utils::time::discord_timestamp_with_relative;

pub const META: CommandMeta = CommandMeta {
    name: "serverinfo",
    desc: "Show details about this server.",
    category: "utility",
    usage: "!serverinfo",
};

#[derive(Debug, Default, PartialEq, Eq)]
struct ChannelCounts {
    text: usize,
    voice: usize,
    categories: usize,
}

fn count_channels<'a>(kinds: impl IntoIterator<Item = &'a serenity::ChannelType>) -> ChannelCounts {
    let mut counts = ChannelCounts::default();
    for kind in kinds {
        match kind {
            serenity::ChannelType::Text
            | serenity::ChannelType::News
            | serenity::ChannelType::Forum => counts.text += 1,
            serenity::ChannelType::Voice | serenity::ChannelType::Stage => counts.voice += 1,
            serenity::ChannelType::Category => counts.categories += 1,
            _ => {}
        }
    }
    counts
}

fn features_value(features: &[String]) -> String {
    if features.is_empty() {
        return "None".to_owned();
    }

    let mut names: Vec<String> = features.iter().map(|raw| title_case_identifier(raw)).collect();
    names.sort_unstable();
    let joined = names.join(", ");
    if joined.len() <= EMBED_FIELD_LIMIT {
        joined
    } else {
        format!("{} features", names.len())
    }
}

#[poise::command(prefix_command, slash_command, category = "Utility")]
pub async fn serverinfo(ctx: Context<'_>) -> Result<(), Error> {
    let Some(guild_id) = ctx.guild_id() else {
        ctx.say(guild_only_message()).await?;
        return Ok(());
    };

    let guild = guild_id.to_partial_guild_with_counts(ctx.http()).await?;
    let channels = guild_id.channels(ctx.http()).await?;
    let counts = count_channels(channels.values().map(|channel| &channel.kind));

    let members = guild
        .approximate_member_count
        .map_or_else(|| "Unknown".to_owned(), |count| count.to_string());

    let mut embed = lookup_embed(guild.name.clone(), INFO_EMBED_COLOR, ctx.author())
        .field("Owner", user_mention(guild.owner_id.get()), true)
        .field("ID", guild_id.get().to_string(), true)
        .field("Members", members, true)
        .field(
            "Created",
            discord_timestamp_with_relative(guild_id.created_at().unix_timestamp()),
            false,
        )
        .field(
            "Channels",
            format!(
                "{} text | {} voice | {} categories",
                counts.text, counts.voice, counts.categories
            ),
            false,
        )
        .field("Roles", guild.roles.len().to_string(), true)
        .field("Emojis", guild.emojis.len().to_string(), true)
        .field(
            "Boosts",
            format!(
                "Level {} ({} boosts)",
                u8::from(guild.premium_tier),
                guild.premium_subscription_count.unwrap_or(0)
            ),
            true,
        )
        .field(
            "Verification",
            format!("{:?}", guild.verification_level),
            true,
        )
        .field("Features", features_value(&guild.features), false);

    if let Some(description) = guild.description.as_deref().filter(|text| !text.is_empty()) {
        embed = embed.description(description);
    }
    if let Some(icon) = guild.icon_url() {
        embed = embed.thumbnail(icon);
    }

    ctx.send(poise::CreateReply::default().embed(embed)).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn channel_kinds_are_bucketed() {
        let kinds = [
            serenity::ChannelType::Text,
            serenity::ChannelType::News,
            serenity::ChannelType::Voice,
            serenity::ChannelType::Category,
            serenity::ChannelType::Stage,
        ];
        assert_eq!(
            count_channels(kinds.iter()),
            ChannelCounts {
                text: 2,
                voice: 2,
                categories: 1
            }
        );
    }

    #[test]
    fn features_are_readable() {
        assert_eq!(features_value(&[]), "None");
        assert_eq!(
            features_value(&["COMMUNITY".to_owned(), "ANIMATED_ICON".to_owned()]),
            "Animated Icon, Community"
        );
    }
}
