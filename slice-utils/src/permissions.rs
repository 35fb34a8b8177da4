use poise::serenity_prelude as serenity;

use crate::hierarchy::{Actor, Target};

/// Permissions granted to members holding a bot-moderator role.
pub const MODERATOR_PERMISSIONS: serenity::Permissions = serenity::Permissions::KICK_MEMBERS
    .union(serenity::Permissions::BAN_MEMBERS)
    .union(serenity::Permissions::MODERATE_MEMBERS)
    .union(serenity::Permissions::MANAGE_MESSAGES);

const KEY_PERMISSIONS: &[(serenity::Permissions, &str)] = &[
    (serenity::Permissions::ADMINISTRATOR, "Administrator"),
    (serenity::Permissions::MANAGE_GUILD, "Manage Server"),
    (serenity::Permissions::MANAGE_ROLES, "Manage Roles"),
    (serenity::Permissions::MANAGE_CHANNELS, "Manage Channels"),
    (serenity::Permissions::KICK_MEMBERS, "Kick Members"),
    (serenity::Permissions::BAN_MEMBERS, "Ban Members"),
    (serenity::Permissions::MODERATE_MEMBERS, "Moderate Members"),
    (serenity::Permissions::MANAGE_MESSAGES, "Manage Messages"),
    (serenity::Permissions::MENTION_EVERYONE, "Mention Everyone"),
    (serenity::Permissions::VIEW_AUDIT_LOG, "View Audit Log"),
    (serenity::Permissions::MANAGE_WEBHOOKS, "Manage Webhooks"),
    (
        serenity::Permissions::MANAGE_GUILD_EXPRESSIONS,
        "Manage Expressions",
    ),
];

/// Effective standing of one member inside a guild.
#[derive(Clone, Debug)]
pub struct MemberStanding {
    pub user_id: serenity::UserId,
    pub permissions: serenity::Permissions,
    pub rank: u16,
    pub is_owner: bool,
    pub role_ids: Vec<serenity::RoleId>,
}

impl MemberStanding {
    pub fn as_actor(&self) -> Actor {
        Actor {
            user_id: self.user_id.get(),
            permissions: self.permissions,
            rank: self.rank,
            is_owner: self.is_owner,
        }
    }

    pub fn as_target(&self) -> Target {
        Target {
            user_id: self.user_id.get(),
            rank: self.rank,
            is_owner: self.is_owner,
        }
    }

    /// Grant extra permissions, e.g. from a bot-moderator role.
    pub fn grant(&mut self, extra: serenity::Permissions) {
        self.permissions |= extra;
    }

    pub fn has_permission(&self, required: serenity::Permissions) -> bool {
        self.permissions
            .contains(serenity::Permissions::ADMINISTRATOR)
            || self.permissions.contains(required)
    }
}

/// Human-readable names of the permissions moderators usually care about.
pub fn key_permission_names(perms: serenity::Permissions) -> Vec<&'static str> {
    KEY_PERMISSIONS
        .iter()
        .filter(|(flag, _)| perms.contains(*flag))
        .map(|(_, name)| *name)
        .collect()
}

/// Short label for a member's moderation power, if any.
pub fn authority_label(perms: serenity::Permissions) -> Option<&'static str> {
    if perms.contains(serenity::Permissions::ADMINISTRATOR) {
        return Some("Administrator");
    }

    let moderator_bits = serenity::Permissions::KICK_MEMBERS
        | serenity::Permissions::BAN_MEMBERS
        | serenity::Permissions::MANAGE_MESSAGES
        | serenity::Permissions::MANAGE_CHANNELS;
    if perms.intersects(moderator_bits) {
        return Some("Moderator");
    }

    None
}

/// Fold a member's roles into a standing.
///
/// `roles` is every guild role as `(id, position, permissions)`. The owner
/// receives every permission. Everyone else gets the union of the
/// `@everyone` role and their own roles, and is ranked by their highest role.
pub fn fold_standing<I>(
    user_id: serenity::UserId,
    owner_id: serenity::UserId,
    everyone_role_id: serenity::RoleId,
    roles: I,
    member_roles: &[serenity::RoleId],
) -> MemberStanding
where
    I: IntoIterator<Item = (serenity::RoleId, u16, serenity::Permissions)>,
{
    let mut permissions = serenity::Permissions::empty();
    let mut rank = 0_u16;

    for (role_id, position, role_permissions) in roles {
        if role_id == everyone_role_id {
            permissions |= role_permissions;
            continue;
        }

        if member_roles.contains(&role_id) {
            permissions |= role_permissions;
            rank = rank.max(position);
        }
    }

    let is_owner = owner_id == user_id;
    if is_owner {
        permissions = serenity::Permissions::all();
    }

    MemberStanding {
        user_id,
        permissions,
        rank,
        is_owner,
        role_ids: member_roles.to_vec(),
    }
}

/// Standing of `user_id` against an already fetched guild.
pub fn standing_in_guild(
    guild: &serenity::PartialGuild,
    user_id: serenity::UserId,
    member_roles: &[serenity::RoleId],
) -> MemberStanding {
    fold_standing(
        user_id,
        guild.owner_id,
        serenity::RoleId::new(guild.id.get()),
        guild
            .roles
            .values()
            .map(|role| (role.id, role.position, role.permissions)),
        member_roles,
    )
}

/// Fetch a member and resolve their standing in `guild`.
pub async fn resolve_member_standing(
    http: &serenity::Http,
    guild: &serenity::PartialGuild,
    user_id: serenity::UserId,
) -> anyhow::Result<MemberStanding> {
    let member = guild.id.member(http, user_id).await?;
    Ok(standing_in_guild(guild, user_id, &member.roles))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_permissions_keep_display_order() {
        let perms = serenity::Permissions::BAN_MEMBERS
            | serenity::Permissions::MANAGE_GUILD
            | serenity::Permissions::SEND_MESSAGES;

        assert_eq!(key_permission_names(perms), vec!["Manage Server", "Ban Members"]);
    }

    #[test]
    fn authority_labels() {
        assert_eq!(
            authority_label(serenity::Permissions::ADMINISTRATOR),
            Some("Administrator")
        );
        assert_eq!(
            authority_label(serenity::Permissions::MANAGE_MESSAGES),
            Some("Moderator")
        );
        assert_eq!(authority_label(serenity::Permissions::SEND_MESSAGES), None);
    }

    #[test]
    fn moderator_grant_covers_moderation_actions() {
        for flag in [
            serenity::Permissions::KICK_MEMBERS,
            serenity::Permissions::BAN_MEMBERS,
            serenity::Permissions::MODERATE_MEMBERS,
            serenity::Permissions::MANAGE_MESSAGES,
        ] {
            assert!(MODERATOR_PERMISSIONS.contains(flag));
        }
        assert!(!MODERATOR_PERMISSIONS.contains(serenity::Permissions::MANAGE_GUILD));
    }

    const GUILD: u64 = 10;
    const OWNER: u64 = 1;

    fn role(id: u64) -> serenity::RoleId {
        serenity::RoleId::new(id)
    }

    fn guild_roles() -> Vec<(serenity::RoleId, u16, serenity::Permissions)> {
        vec![
            (role(GUILD), 0, serenity::Permissions::SEND_MESSAGES),
            (role(20), 2, serenity::Permissions::MANAGE_MESSAGES),
            (role(30), 7, serenity::Permissions::KICK_MEMBERS),
            (role(40), 9, serenity::Permissions::BAN_MEMBERS),
        ]
    }

    fn standing(user_id: u64, member_roles: &[u64]) -> MemberStanding {
        let member_roles: Vec<serenity::RoleId> = member_roles.iter().copied().map(role).collect();
        fold_standing(
            serenity::UserId::new(user_id),
            serenity::UserId::new(OWNER),
            role(GUILD),
            guild_roles(),
            &member_roles,
        )
    }

    #[test]
    fn rank_is_highest_held_role() {
        let member = standing(5, &[20, 30]);
        assert_eq!(member.rank, 7);
        assert!(!member.is_owner);
        assert_eq!(member.role_ids, vec![role(20), role(30)]);
    }

    #[test]
    fn everyone_permissions_are_folded_in() {
        let member = standing(5, &[30]);
        assert!(member.permissions.contains(serenity::Permissions::SEND_MESSAGES));
        assert!(member.permissions.contains(serenity::Permissions::KICK_MEMBERS));
        assert!(!member.permissions.contains(serenity::Permissions::BAN_MEMBERS));

        let roleless = standing(6, &[]);
        assert_eq!(roleless.rank, 0);
        assert_eq!(roleless.permissions, serenity::Permissions::SEND_MESSAGES);
    }

    #[test]
    fn everyone_role_does_not_raise_rank() {
        let member = standing(5, &[GUILD]);
        assert_eq!(member.rank, 0);
    }

    #[test]
    fn owner_holds_every_permission() {
        let owner = standing(OWNER, &[]);
        assert!(owner.is_owner);
        assert_eq!(owner.permissions, serenity::Permissions::all());
        assert_eq!(owner.rank, 0);
        assert!(owner.as_actor().is_owner);
        assert!(owner.as_target().is_owner);
    }

    #[test]
    fn moderator_grant_extends_standing() {
        let mut member = standing(5, &[20]);
        assert!(!member.has_permission(serenity::Permissions::BAN_MEMBERS));

        member.grant(MODERATOR_PERMISSIONS);
        assert!(member.has_permission(serenity::Permissions::BAN_MEMBERS));
        assert!(member.has_permission(serenity::Permissions::MODERATE_MEMBERS));
        assert!(!member.has_permission(serenity::Permissions::MANAGE_GUILD));
    }
}
