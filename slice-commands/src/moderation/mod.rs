pub mod ban;
pub(crate) mod embeds;
pub mod kick;
pub mod timeout;
pub mod unban;
pub mod untimeout;

use poise::serenity_prelude as serenity;
use tracing::{debug, error, info};

use crate::checks::{TargetCheck, denial_message};
use embeds::{PlatformRejection, classify_platform_error, not_member_message, platform_error_message};
use slice_core::{Context, Error};

/// Reply once for a rejected Discord call. Missing permissions are expected and not logged.
pub(crate) async fn report_platform_failure(
    ctx: &Context<'_>,
    action: &'static str,
    source: serenity::Error,
) -> Result<(), Error> {
    let rejection = classify_platform_error(&source);
    if rejection != PlatformRejection::MissingPermissions {
        error!(?source, action, "moderation request failed");
    }

    ctx.say(platform_error_message(action, rejection)).await?;
    Ok(())
}

/// Reply for anything but an allowed target. Returns whether the action may go ahead.
pub(crate) async fn settle_target_check(
    ctx: &Context<'_>,
    check: TargetCheck,
    action: &'static str,
) -> Result<bool, Error> {
    match check {
        TargetCheck::Allowed => Ok(true),
        TargetCheck::NotMember => {
            ctx.say(not_member_message()).await?;
            Ok(false)
        }
        TargetCheck::Denied(reason) => {
            debug!(
                action,
                reason = reason.code(),
                user_id = ctx.author().id.get(),
                "moderation action denied"
            );
            ctx.say(denial_message(reason, action)).await?;
            Ok(false)
        }
        TargetCheck::Unavailable(source) => {
            report_platform_failure(ctx, action, source).await?;
            Ok(false)
        }
    }
}

pub(crate) fn log_action(
    action: &'static str,
    guild_id: serenity::GuildId,
    moderator_id: serenity::UserId,
    target_id: serenity::UserId,
    reason: &str,
) {
    info!(
        action,
        guild_id = guild_id.get(),
        moderator_id = moderator_id.get(),
        target_id = target_id.get(),
        reason,
        "moderation action applied"
    );
}
