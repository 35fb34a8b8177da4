use poise::serenity_prelude as serenity;

use crate::CommandMeta;
use crate::checks::{check_target, invoker_standing};
use crate::moderation::embeds::{
    NO_REASON, guild_only_message, moderation_action_embed, moderation_bot_target_message,
    send_moderation_target_dm, usage_message,
};
use crate::moderation::{log_action, report_platform_failure, settle_target_check};
use slice_core::{Context, Error};
use slice_utils::formatting::format_compact_duration;
use slice_utils::parse::parse_duration_seconds;
use slice_utils::time::now_unix_secs;

pub const META: CommandMeta = CommandMeta {
    name: "timeout",
    desc: "Timeout a user for a duration (default: 10m, max: 28d).",
    category: "moderation",
    usage: "!timeout <user> [duration] [reason]",
};

pub const DEFAULT_TIMEOUT_SECS: u64 = 10 * 60;
/// Discord refuses communication timeouts longer than 28 days.
pub const MAX_TIMEOUT_SECS: u64 = 28 * 86_400;

pub fn clamp_timeout(seconds: u64) -> u64 {
    seconds.min(MAX_TIMEOUT_SECS)
}

/// Resolve the duration argument, folding a word that is clearly not a
/// duration back into the reason. `None` means the token looked like a
/// duration but did not parse.
fn split_duration_and_reason(
    duration: Option<&str>,
    reason: Option<&str>,
) -> Option<(u64, Option<String>)> {
    let reason = reason.map(str::trim).filter(|value| !value.is_empty());

    let Some(token) = duration.map(str::trim).filter(|value| !value.is_empty()) else {
        return Some((DEFAULT_TIMEOUT_SECS, reason.map(str::to_owned)));
    };

    if let Some(seconds) = parse_duration_seconds(token) {
        return Some((clamp_timeout(seconds), reason.map(str::to_owned)));
    }

    if token.chars().any(|ch| ch.is_ascii_digit()) {
        return None;
    }

    let folded = match reason {
        Some(rest) => format!("{} {}", token, rest),
        None => token.to_owned(),
    };
    Some((DEFAULT_TIMEOUT_SECS, Some(folded)))
}

#[poise::command(prefix_command, slash_command, category = "Moderation")]
pub async fn timeout(
    ctx: Context<'_>,
    #[description = "The user to timeout"] user: Option<serenity::User>,
    #[description = "Duration (e.g. 10m, 2h, 1d)"] duration: Option<String>,
    #[description = "Reason for timeout"]
    #[rest]
    reason: Option<String>,
) -> Result<(), Error> {
    let Some(guild_id) = ctx.guild_id() else {
        ctx.say(guild_only_message()).await?;
        return Ok(());
    };

    let Some(user) = user else {
        ctx.say(usage_message(META.usage)).await?;
        return Ok(());
    };

    let Some((seconds, reason)) = split_duration_and_reason(duration.as_deref(), reason.as_deref())
    else {
        ctx.say(format!(
            "Invalid duration. Usage: `{}` (examples: 30s, 10m, 2h, 1d)",
            META.usage
        ))
        .await?;
        return Ok(());
    };

    let required = serenity::Permissions::MODERATE_MEMBERS;
    let guild = guild_id.to_partial_guild(ctx.http()).await?;
    let actor = invoker_standing(&ctx, &guild).await?;

    let check = check_target(&ctx, &guild, &actor, user.id, required, false).await?;
    if !settle_target_check(&ctx, check, "timeout").await? {
        return Ok(());
    }

    if user.bot {
        ctx.say(moderation_bot_target_message()).await?;
        return Ok(());
    }

    let until_unix = now_unix_secs().saturating_add(seconds);
    let until = serenity::Timestamp::from_unix_timestamp(i64::try_from(until_unix)?)?;
    let duration_label = format_compact_duration(seconds);

    let edit = serenity::EditMember::new().disable_communication_until_datetime(until);
    if let Err(source) = guild_id.edit_member(ctx.http(), user.id, edit).await {
        return report_platform_failure(&ctx, "timeout", source).await;
    }

    let reason_text = reason.as_deref().unwrap_or(NO_REASON);
    log_action("timeout", guild_id, ctx.author().id, user.id, reason_text);

    let _ = send_moderation_target_dm(
        ctx.http(),
        &user,
        &guild.name,
        "timed out",
        Some(reason_text),
        Some(&duration_label),
    )
    .await;

    let case = ctx.data().next_case();
    let embed = moderation_action_embed(
        &user,
        "timed out",
        reason.as_deref(),
        Some(&duration_label),
        case,
    );
    ctx.send(poise::CreateReply::default().embed(embed)).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_ten_minutes() {
        assert_eq!(
            split_duration_and_reason(None, None),
            Some((DEFAULT_TIMEOUT_SECS, None))
        );
    }

    #[test]
    fn long_durations_are_capped() {
        assert_eq!(clamp_timeout(60 * 86_400), MAX_TIMEOUT_SECS);
        assert_eq!(clamp_timeout(3_600), 3_600);
        assert_eq!(
            split_duration_and_reason(Some("90d"), Some("raid")),
            Some((MAX_TIMEOUT_SECS, Some("raid".to_owned())))
        );
    }

    #[test]
    fn plain_words_become_reason() {
        assert_eq!(
            split_duration_and_reason(Some("spamming"), Some("in general")),
            Some((DEFAULT_TIMEOUT_SECS, Some("spamming in general".to_owned())))
        );
    }

    #[test]
    fn malformed_durations_are_rejected() {
        assert_eq!(split_duration_and_reason(Some("10x"), None), None);
        assert_eq!(split_duration_and_reason(Some("0m"), None), None);
    }

    #[test]
    fn parsed_duration_keeps_reason() {
        assert_eq!(
            split_duration_and_reason(Some("2h"), Some("  cool off ")),
            Some((7_200, Some("cool off".to_owned())))
        );
    }
}
