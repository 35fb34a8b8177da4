use poise::serenity_prelude as serenity;

use crate::CommandMeta;
use crate::utility::embeds::yes_no;
use slice_core::{Context, Error};
use slice_utils::embed::{INFO_EMBED_COLOR, colour_or_default, display_name, lookup_embed};
use slice_utils::formatting::{join_mentions_or_count, role_mention};
use slice_utils::permissions::{authority_label, key_permission_names, standing_in_guild};
use slice_utils::time::{discord_timestamp_with_relative, now_unix_secs};

pub const META: CommandMeta = CommandMeta {
    name: "userinfo",
    desc: "Show account and server details for a user.",
    category: "utility",
    usage: "!userinfo [user]",
};

#[poise::command(prefix_command, slash_command, category = "Utility")]
pub async fn userinfo(
    ctx: Context<'_>,
    #[description = "User to look up (defaults to you)"] user: Option<serenity::User>,
) -> Result<(), Error> {
    let user = user.unwrap_or_else(|| ctx.author().clone());

    let mut embed = lookup_embed(
        format!("User info: {}", display_name(&user)),
        INFO_EMBED_COLOR,
        ctx.author(),
    )
    .thumbnail(user.face())
    .field("Username", user.name.clone(), true)
    .field("ID", user.id.get().to_string(), true)
    .field("Bot", yes_no(user.bot), true)
    .field(
        "Account created",
        discord_timestamp_with_relative(user.id.created_at().unix_timestamp()),
        false,
    );

    let member = match ctx.guild_id() {
        Some(guild_id) => guild_id.member(ctx.http(), user.id).await.ok(),
        None => None,
    };

    if let Some(member) = member {
        let guild = member.guild_id.to_partial_guild(ctx.http()).await?;

        if let Some(joined_at) = member.joined_at {
            embed = embed.field(
                "Joined server",
                discord_timestamp_with_relative(joined_at.unix_timestamp()),
                false,
            );
        }

        let mut roles: Vec<&serenity::Role> = member
            .roles
            .iter()
            .filter_map(|role_id| guild.roles.get(role_id))
            .collect();
        roles.sort_unstable_by(|left, right| right.position.cmp(&left.position));

        if let Some(top) = roles.iter().find(|role| role.colour.0 != 0) {
            embed = embed.color(colour_or_default(top.colour));
        }

        let mentions: Vec<String> = roles.iter().map(|role| role_mention(role.id.get())).collect();
        let roles_value = if mentions.is_empty() {
            "None".to_owned()
        } else {
            join_mentions_or_count(&mentions, "roles")
        };
        embed = embed.field(format!("Roles ({})", mentions.len()), roles_value, false);

        let standing = standing_in_guild(&guild, user.id, &member.roles);
        let key_permissions = key_permission_names(standing.permissions);
        if !key_permissions.is_empty() {
            embed = embed.field("Key permissions", key_permissions.join(", "), false);
        }
        if let Some(label) = authority_label(standing.permissions) {
            let label = if standing.is_owner { "Server Owner" } else { label };
            embed = embed.field("Acknowledgements", label, true);
        }

        if let Some(until) = member.communication_disabled_until {
            let until_unix = until.unix_timestamp();
            if until_unix > now_unix_secs() as i64 {
                embed = embed.field(
                    "Timed out until",
                    discord_timestamp_with_relative(until_unix),
                    true,
                );
            }
        }
    }

    ctx.send(poise::CreateReply::default().embed(embed)).await?;
    Ok(())
}
