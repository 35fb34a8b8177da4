use std::time::Duration;

use poise::serenity_prelude as serenity;
use tracing::debug;

use crate::moderation::embeds::{PlatformRejection, classify_platform_error};
use slice_core::{Context, Error};
use slice_store::{CooldownKey, RegistryKind};
use slice_utils::formatting::format_retry_after;
use slice_utils::hierarchy::{
    Actor, DenyReason, Target, Verdict, holds_permission, validate, validate_bot,
};
use slice_utils::permissions::{
    MODERATOR_PERMISSIONS, MemberStanding, resolve_member_standing, standing_in_guild,
};

/// Standing of the invoker, with moderator permissions granted through the
/// guild's bot-moderator roles.
pub async fn invoker_standing(
    ctx: &Context<'_>,
    guild: &serenity::PartialGuild,
) -> Result<MemberStanding, Error> {
    let mut standing = resolve_member_standing(ctx.http(), guild, ctx.author().id).await?;
    let mod_roles = ctx
        .data()
        .registry
        .list(RegistryKind::ModRoles, guild.id.get())
        .await?;
    grant_moderator_roles(&mut standing, &mod_roles);
    Ok(standing)
}

/// Grant `MODERATOR_PERMISSIONS` when the member holds one of `mod_roles` (sorted).
pub fn grant_moderator_roles(standing: &mut MemberStanding, mod_roles: &[u64]) {
    let holds_mod_role = standing
        .role_ids
        .iter()
        .any(|role| mod_roles.binary_search(&role.get()).is_ok());
    if holds_mod_role {
        standing.grant(MODERATOR_PERMISSIONS);
    }
}

pub fn missing_permission_message(required: serenity::Permissions) -> String {
    let names = required.get_permission_names().join(", ");
    format!("You need the **{}** permission to use this command.", names)
}

/// Reply and return `false` when the invoker lacks `required`.
pub async fn require_permission(
    ctx: &Context<'_>,
    guild: &serenity::PartialGuild,
    required: serenity::Permissions,
) -> Result<bool, Error> {
    let standing = invoker_standing(ctx, guild).await?;
    if standing.has_permission(required) {
        return Ok(true);
    }

    debug!(
        guild_id = guild.id.get(),
        user_id = ctx.author().id.get(),
        command = %ctx.command().name,
        "permission check failed"
    );
    ctx.send(
        poise::CreateReply::default()
            .content(missing_permission_message(required))
            .ephemeral(true),
    )
    .await?;
    Ok(false)
}

/// Fetch the guild and enforce `required` on the invoker in one step.
pub async fn guild_with_permission(
    ctx: &Context<'_>,
    guild_id: serenity::GuildId,
    required: serenity::Permissions,
) -> Result<Option<serenity::PartialGuild>, Error> {
    let guild = guild_id.to_partial_guild(ctx.http()).await?;
    if !require_permission(ctx, &guild, required).await? {
        return Ok(None);
    }
    Ok(Some(guild))
}

/// Outcome of the invoker and bot hierarchy checks against a target.
#[derive(Debug)]
pub enum TargetCheck {
    Allowed,
    NotMember,
    Denied(DenyReason),
    /// Discord failed for a reason other than an unknown member.
    Unavailable(serenity::Error),
}

impl From<Verdict> for TargetCheck {
    fn from(verdict: Verdict) -> Self {
        match verdict {
            Verdict::Allowed => Self::Allowed,
            Verdict::Denied(reason) => Self::Denied(reason),
        }
    }
}

/// Invoker-side result, before the bot's own rank is checked.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Screening {
    /// The bot must still outrank this target.
    Proceed(Target),
    NotMember,
    Denied(DenyReason),
}

/// Apply the hierarchy rules for the invoker.
///
/// `target` is `None` when the user is not in the guild. Outsiders are only
/// accepted when `outsiders_allowed`, and then only the self and permission
/// rules apply since they hold no roles.
pub fn screen_target(
    actor: &Actor,
    target_id: u64,
    target: Option<Target>,
    required: serenity::Permissions,
    outsiders_allowed: bool,
) -> Screening {
    match target {
        Some(target) => match validate(actor, &target, required) {
            Verdict::Allowed => Screening::Proceed(target),
            Verdict::Denied(reason) => Screening::Denied(reason),
        },
        None if !outsiders_allowed => Screening::NotMember,
        None => {
            let outsider = Target {
                user_id: target_id,
                rank: 0,
                is_owner: false,
            };
            if outsider.user_id == actor.user_id {
                return Screening::Denied(DenyReason::SelfTarget);
            }
            if !(actor.is_owner || holds_permission(actor.permissions, required)) {
                return Screening::Denied(DenyReason::MissingPermission);
            }
            Screening::Proceed(outsider)
        }
    }
}

/// Reply text for a denied action: the sentence followed by the reason code.
pub fn denial_message(reason: DenyReason, action: &str) -> String {
    format!("{} (`{}`)", reason.describe(action), reason.code())
}

/// Run the hierarchy validator for the invoker and then for the bot.
///
/// Only an unknown member counts as "not a member". Any other failure to
/// fetch the target is surfaced as `Unavailable` so no rule is skipped.
pub async fn check_target(
    ctx: &Context<'_>,
    guild: &serenity::PartialGuild,
    actor: &MemberStanding,
    target_id: serenity::UserId,
    required: serenity::Permissions,
    outsiders_allowed: bool,
) -> Result<TargetCheck, Error> {
    let target = match guild.id.member(ctx.http(), target_id).await {
        Ok(member) => Some(standing_in_guild(guild, target_id, &member.roles).as_target()),
        Err(source) if is_absent_member(classify_platform_error(&source)) => None,
        Err(source) => return Ok(TargetCheck::Unavailable(source)),
    };

    let screening = screen_target(
        &actor.as_actor(),
        target_id.get(),
        target,
        required,
        outsiders_allowed,
    );
    match screening {
        Screening::Proceed(target) => bot_check(ctx, guild, &target).await,
        Screening::NotMember => Ok(TargetCheck::NotMember),
        Screening::Denied(reason) => Ok(TargetCheck::Denied(reason)),
    }
}

/// Rate limits and server errors say nothing about membership.
fn is_absent_member(rejection: PlatformRejection) -> bool {
    rejection == PlatformRejection::UnknownTarget
}

/// Bot-side check: Discord refuses actions on members at or above the bot.
async fn bot_check(
    ctx: &Context<'_>,
    guild: &serenity::PartialGuild,
    target: &Target,
) -> Result<TargetCheck, Error> {
    let bot_id = ctx.serenity_context().cache.current_user().id;
    let bot = resolve_member_standing(ctx.http(), guild, bot_id).await?;
    Ok(validate_bot(bot.rank, target).into())
}

/// Reply with the remaining wait and return `false` while the invoker is cooling down.
pub async fn enforce_cooldown(
    ctx: &Context<'_>,
    command: &'static str,
    guild_id: serenity::GuildId,
    interval: Duration,
) -> Result<bool, Error> {
    let key = CooldownKey::new(command, guild_id.get(), ctx.author().id.get());
    match ctx.data().cooldowns.hit(key, interval) {
        Ok(()) => Ok(true),
        Err(remaining) => {
            ctx.send(
                poise::CreateReply::default()
                    .content(format_retry_after(remaining))
                    .ephemeral(true),
            )
            .await?;
            Ok(false)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const KICK: serenity::Permissions = serenity::Permissions::KICK_MEMBERS;
    const BAN: serenity::Permissions = serenity::Permissions::BAN_MEMBERS;

    fn actor(rank: u16, permissions: serenity::Permissions) -> Actor {
        Actor {
            user_id: 1,
            permissions,
            rank,
            is_owner: false,
        }
    }

    fn member(user_id: u64, rank: u16) -> Option<Target> {
        Some(Target {
            user_id,
            rank,
            is_owner: false,
        })
    }

    /// Invoker screening followed by the bot rank check, in handler order.
    fn decide(
        actor: &Actor,
        target_id: u64,
        target: Option<Target>,
        required: serenity::Permissions,
        outsiders_allowed: bool,
        bot_rank: u16,
    ) -> Result<(), DenyReason> {
        match screen_target(actor, target_id, target, required, outsiders_allowed) {
            Screening::Proceed(target) => match validate_bot(bot_rank, &target) {
                Verdict::Allowed => Ok(()),
                Verdict::Denied(reason) => Err(reason),
            },
            Screening::Denied(reason) => Err(reason),
            Screening::NotMember => panic!("target {target_id} is not a member"),
        }
    }

    #[test]
    fn hierarchy_is_reported_before_missing_permission() {
        let weak = actor(2, serenity::Permissions::empty());
        assert_eq!(
            decide(&weak, 2, member(2, 4), KICK, false, 50),
            Err(DenyReason::InsufficientHierarchy)
        );
    }

    #[test]
    fn self_and_owner_rules_come_first_without_permission() {
        let weak = actor(2, serenity::Permissions::empty());
        assert_eq!(
            decide(&weak, 1, member(1, 2), KICK, false, 50),
            Err(DenyReason::SelfTarget)
        );

        let owner = Some(Target {
            user_id: 9,
            rank: 0,
            is_owner: true,
        });
        assert_eq!(
            decide(&weak, 9, owner, KICK, false, 50),
            Err(DenyReason::TargetIsOwner)
        );
    }

    #[test]
    fn missing_permission_is_reached_for_lower_targets() {
        let unprivileged = actor(5, serenity::Permissions::SEND_MESSAGES);
        assert_eq!(
            decide(&unprivileged, 2, member(2, 3), KICK, false, 50),
            Err(DenyReason::MissingPermission)
        );
    }

    #[test]
    fn bot_rank_is_checked_last() {
        let moderator = actor(10, BAN);
        assert_eq!(decide(&moderator, 2, member(2, 3), BAN, false, 50), Ok(()));
        assert_eq!(
            decide(&moderator, 2, member(2, 3), BAN, false, 3),
            Err(DenyReason::BotInsufficientHierarchy)
        );
    }

    #[test]
    fn outsiders_need_opt_in() {
        let moderator = actor(10, BAN);
        assert_eq!(
            screen_target(&moderator, 2, None, BAN, false),
            Screening::NotMember
        );
        assert_eq!(
            screen_target(&moderator, 2, None, BAN, true),
            Screening::Proceed(Target {
                user_id: 2,
                rank: 0,
                is_owner: false,
            })
        );
    }

    #[test]
    fn outsiders_still_require_permission() {
        let roleless = actor(0, serenity::Permissions::empty());
        assert_eq!(
            screen_target(&roleless, 2, None, BAN, true),
            Screening::Denied(DenyReason::MissingPermission)
        );

        let admin = actor(0, serenity::Permissions::ADMINISTRATOR);
        assert!(matches!(
            screen_target(&admin, 2, None, BAN, true),
            Screening::Proceed(_)
        ));
    }

    #[test]
    fn only_unknown_member_means_absent() {
        use crate::moderation::embeds::classify_status;

        assert!(is_absent_member(classify_status(404, 10007)));
        assert!(is_absent_member(classify_status(404, 10013)));
        assert!(!is_absent_member(classify_status(429, 0)));
        assert!(!is_absent_member(classify_status(500, 0)));
        assert!(!is_absent_member(classify_status(503, 0)));
        assert!(!is_absent_member(classify_status(403, 50013)));
        assert!(!is_absent_member(PlatformRejection::Other));
    }

    #[test]
    fn denial_names_reason_code() {
        assert_eq!(
            denial_message(DenyReason::InsufficientHierarchy, "kick"),
            "You can only kick members whose highest role is below yours. (`insufficient-hierarchy`)"
        );
        assert_eq!(
            denial_message(DenyReason::SelfTarget, "ban"),
            "You can't ban yourself. (`self-target`)"
        );
    }

    #[test]
    fn verdicts_convert_into_checks() {
        assert!(matches!(TargetCheck::from(Verdict::Allowed), TargetCheck::Allowed));
        assert!(matches!(
            TargetCheck::from(Verdict::Denied(DenyReason::BotTargetIsOwner)),
            TargetCheck::Denied(DenyReason::BotTargetIsOwner)
        ));
    }

    fn standing_with_roles(role_ids: &[u64]) -> MemberStanding {
        MemberStanding {
            user_id: serenity::UserId::new(1),
            permissions: serenity::Permissions::SEND_MESSAGES,
            rank: 1,
            is_owner: false,
            role_ids: role_ids.iter().copied().map(serenity::RoleId::new).collect(),
        }
    }

    #[test]
    fn mod_role_grants_moderator_permissions() {
        let mut standing = standing_with_roles(&[5, 42]);
        grant_moderator_roles(&mut standing, &[3, 42, 90]);
        assert!(standing.has_permission(KICK));
        assert!(standing.has_permission(BAN));
        assert!(standing.has_permission(serenity::Permissions::MODERATE_MEMBERS));

        let mut plain = standing_with_roles(&[5]);
        grant_moderator_roles(&mut plain, &[3, 42, 90]);
        assert!(!plain.has_permission(KICK));
    }

    #[tokio::test]
    async fn mod_roles_from_registry_feed_the_grant() {
        let registry = slice_store::RegistryStore::memory("test");
        registry.add(RegistryKind::ModRoles, 7, 42).await.unwrap();
        registry.add(RegistryKind::ModRoles, 8, 5).await.unwrap();

        let mod_roles = registry.list(RegistryKind::ModRoles, 7).await.unwrap();
        let mut standing = standing_with_roles(&[5, 42]);
        grant_moderator_roles(&mut standing, &mod_roles);
        assert!(standing.has_permission(BAN));

        let other_guild = registry.list(RegistryKind::ModRoles, 9).await.unwrap();
        let mut unchanged = standing_with_roles(&[5, 42]);
        grant_moderator_roles(&mut unchanged, &other_guild);
        assert!(!unchanged.has_permission(BAN));
    }

    #[test]
    fn missing_permission_names_the_permission() {
        let message = missing_permission_message(serenity::Permissions::BAN_MEMBERS);
        assert!(message.contains("Ban Members"), "{message}");
    }
}
