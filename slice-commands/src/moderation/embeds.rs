use poise::serenity_prelude as serenity;

use slice_utils::embed::{DEFAULT_EMBED_COLOR, INFO_EMBED_COLOR, display_name, sanitize_mentions};

pub const NO_REASON: &str = "No reason provided";

/// Why Discord refused a moderation call.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlatformRejection {
    MissingPermissions,
    UnknownTarget,
    RateLimited,
    Other,
}

pub fn classify_platform_error(source: &serenity::Error) -> PlatformRejection {
    let serenity::Error::Http(serenity::HttpError::UnsuccessfulRequest(response)) = source else {
        return PlatformRejection::Other;
    };

    classify_status(response.status_code.as_u16(), response.error.code)
}

pub(crate) fn classify_status(status: u16, code: isize) -> PlatformRejection {
    match (status, code) {
        (403, _) | (_, 50013) => PlatformRejection::MissingPermissions,
        (404, _) | (_, 10007) | (_, 10013) | (_, 10026) => PlatformRejection::UnknownTarget,
        (429, _) => PlatformRejection::RateLimited,
        _ => PlatformRejection::Other,
    }
}

pub fn platform_error_message(action: &str, rejection: PlatformRejection) -> String {
    match rejection {
        PlatformRejection::MissingPermissions => format!(
            "I don't have permission to {action} that user. Check my role position and permissions."
        ),
        PlatformRejection::UnknownTarget => {
            format!("I couldn't {action} that user because Discord doesn't know them here.")
        }
        PlatformRejection::RateLimited => {
            "Discord is rate limiting me right now, try again in a moment.".to_owned()
        }
        PlatformRejection::Other => format!("I couldn't {action} that user."),
    }
}

pub fn is_missing_permissions_error(source: &serenity::Error) -> bool {
    classify_platform_error(source) == PlatformRejection::MissingPermissions
}

pub fn moderation_action_embed(
    target: &serenity::User,
    action_past_tense: &str,
    reason: Option<&str>,
    duration: Option<&str>,
    case: u64,
) -> serenity::CreateEmbed {
    let reason = sanitize_mentions(reason.unwrap_or(NO_REASON));

    let mut description = format!(
        "**Target :** <@{}>\n**Reason :** {}",
        target.id.get(),
        reason
    );
    if let Some(duration) = duration {
        description.push_str(&format!("\n**Duration :** {}", duration));
    }

    serenity::CreateEmbed::new()
        .color(DEFAULT_EMBED_COLOR)
        .author(
            serenity::CreateEmbedAuthor::new(format!(
                "{} has been {}",
                display_name(target),
                action_past_tense
            ))
            .icon_url(target.face()),
        )
        .description(description)
        .footer(serenity::CreateEmbedFooter::new(format!(
            "Case #{} | User ID: {}",
            case,
            target.id.get()
        )))
        .timestamp(serenity::Timestamp::now())
}

pub fn moderation_target_dm_embed(
    guild_name: &str,
    action_past_tense: &str,
    reason: Option<&str>,
    duration: Option<&str>,
) -> serenity::CreateEmbed {
    let mut details = vec![format!(
        "**Reason :** {}",
        sanitize_mentions(reason.unwrap_or(NO_REASON))
    )];
    if let Some(duration) = duration {
        details.push(format!("**Duration :** {}", duration));
    }

    serenity::CreateEmbed::new()
        .color(INFO_EMBED_COLOR)
        .title(format!(
            "You have been {} in {}",
            action_past_tense, guild_name
        ))
        .description(details.join("\n"))
}

/// Best-effort DM; the caller decides whether a failure matters.
pub async fn send_moderation_target_dm(
    http: &serenity::Http,
    target: &serenity::User,
    guild_name: &str,
    action_past_tense: &str,
    reason: Option<&str>,
    duration: Option<&str>,
) -> Result<(), serenity::Error> {
    let dm_channel = target.create_dm_channel(http).await?;
    dm_channel
        .send_message(
            http,
            serenity::CreateMessage::new().embed(moderation_target_dm_embed(
                guild_name,
                action_past_tense,
                reason,
                duration,
            )),
        )
        .await?;

    Ok(())
}

pub fn usage_message(usage: &str) -> String {
    format!("Usage: `{usage}`")
}

pub fn guild_only_message() -> &'static str {
    "This command only works in servers."
}

pub fn not_member_message() -> &'static str {
    "That user isn't a member of this server."
}

pub fn moderation_bot_target_message() -> &'static str {
    "You can't use moderation actions on bots or application accounts."
}
