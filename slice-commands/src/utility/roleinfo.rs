use poise::serenity_prelude as serenity;

use crate::CommandMeta;
use crate::utility::embeds::yes_no;
use slice_core::{Context, Error};
use slice_utils::embed::{colour_or_default, lookup_embed};
use slice_utils::formatting::role_mention;
use slice_utils::permissions::key_permission_names;
use slice_utils::time::discord_timestamp_with_relative;

pub const META: CommandMeta = CommandMeta {
    name: "roleinfo",
    desc: "Show details about a role.",
    category: "utility",
    usage: "!roleinfo <role>",
};

fn colour_hex(colour: serenity::Colour) -> String {
    if colour.0 == 0 {
        "Default".to_owned()
    } else {
        format!("#{:06X}", colour.0)
    }
}

#[poise::command(prefix_command, slash_command, guild_only, category = "Utility")]
pub async fn roleinfo(
    ctx: Context<'_>,
    #[description = "Role to look up"] role: serenity::Role,
) -> Result<(), Error> {
    let key_permissions = key_permission_names(role.permissions);
    let permissions_value = if key_permissions.is_empty() {
        "None".to_owned()
    } else {
        key_permissions.join(", ")
    };

    let embed = lookup_embed(
        format!("Role info: {}", role.name),
        colour_or_default(role.colour),
        ctx.author(),
    )
    .field("Mention", role_mention(role.id.get()), true)
    .field("ID", role.id.get().to_string(), true)
    .field("Colour", colour_hex(role.colour), true)
    .field("Position", role.position.to_string(), true)
    .field("Hoisted", yes_no(role.hoist), true)
    .field("Mentionable", yes_no(role.mentionable), true)
    .field("Managed", yes_no(role.managed), true)
    .field(
        "Created",
        discord_timestamp_with_relative(role.id.created_at().unix_timestamp()),
        false,
    )
    .field("Key permissions", permissions_value, false);

    ctx.send(poise::CreateReply::default().embed(embed)).await?;
    Ok(())
}
