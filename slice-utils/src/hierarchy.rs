use std::fmt;

use poise::serenity_prelude as serenity;

/// Invoking member as seen by the hierarchy check.
#[derive(Clone, Copy, Debug)]
pub struct Actor {
    pub user_id: u64,
    pub permissions: serenity::Permissions,
    pub rank: u16,
    pub is_owner: bool,
}

/// Member a moderation action is aimed at.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Target {
    pub user_id: u64,
    pub rank: u16,
    pub is_owner: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DenyReason {
    SelfTarget,
    TargetIsOwner,
    InsufficientHierarchy,
    MissingPermission,
    BotTargetIsOwner,
    BotInsufficientHierarchy,
}

impl DenyReason {
    /// Stable machine-readable code.
    pub fn code(self) -> &'static str {
        match self {
            Self::SelfTarget => "self-target",
            Self::TargetIsOwner => "target-is-owner",
            Self::InsufficientHierarchy => "insufficient-hierarchy",
            Self::MissingPermission => "missing-permission",
            Self::BotTargetIsOwner => "bot-target-is-owner",
            Self::BotInsufficientHierarchy => "bot-insufficient-hierarchy",
        }
    }

    /// User-facing sentence for an action verb such as `ban` or `timeout`.
    pub fn describe(self, action: &str) -> String {
        match self {
            Self::SelfTarget => format!("You can't {action} yourself."),
            Self::TargetIsOwner => format!("You can't {action} the server owner."),
            Self::InsufficientHierarchy => {
                format!("You can only {action} members whose highest role is below yours.")
            }
            Self::MissingPermission => {
                format!("You don't have the permission required to {action} members.")
            }
            Self::BotTargetIsOwner => format!("I can't {action} the server owner."),
            Self::BotInsufficientHierarchy => {
                format!("I can't {action} this member due to role hierarchy.")
            }
        }
    }
}

impl fmt::Display for DenyReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Verdict {
    Allowed,
    Denied(DenyReason),
}

impl Verdict {
    pub fn is_allowed(self) -> bool {
        matches!(self, Self::Allowed)
    }
}

/// `ADMINISTRATOR` implies every other permission.
pub fn holds_permission(permissions: serenity::Permissions, required: serenity::Permissions) -> bool {
    permissions.contains(serenity::Permissions::ADMINISTRATOR) || permissions.contains(required)
}

/// Decide whether `actor` may act on `target` with `required` permissions.
///
/// Rules are applied in order and the first match wins: self-target, owner
/// target, role hierarchy (skipped for the owner), then missing permission.
pub fn validate(actor: &Actor, target: &Target, required: serenity::Permissions) -> Verdict {
    if target.user_id == actor.user_id {
        return Verdict::Denied(DenyReason::SelfTarget);
    }

    if target.is_owner && !actor.is_owner {
        return Verdict::Denied(DenyReason::TargetIsOwner);
    }

    if !actor.is_owner && actor.rank <= target.rank {
        return Verdict::Denied(DenyReason::InsufficientHierarchy);
    }

    if !holds_permission(actor.permissions, required) {
        return Verdict::Denied(DenyReason::MissingPermission);
    }

    Verdict::Allowed
}

/// Discord refuses moderation calls against members ranked at or above the bot.
pub fn validate_bot(bot_rank: u16, target: &Target) -> Verdict {
    if target.is_owner {
        return Verdict::Denied(DenyReason::BotTargetIsOwner);
    }

    if bot_rank <= target.rank {
        return Verdict::Denied(DenyReason::BotInsufficientHierarchy);
    }

    Verdict::Allowed
}
