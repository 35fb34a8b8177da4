use poise::serenity_prelude as serenity;

use crate::CommandMeta;
use crate::admin::{RegistryWording, registry_add, registry_list, registry_remove};
use crate::checks::guild_with_permission;
use crate::moderation::embeds::{guild_only_message, usage_message};
use slice_core::{Context, Error};
use slice_store::RegistryKind;
use slice_utils::formatting::role_mention;

pub const ADDMOD_META: CommandMeta = CommandMeta {
    name: "addmod",
    desc: "Give a role moderator access to the bot.",
    category: "admin",
    usage: "!addmod <role>",
};

pub const REMOVEMOD_META: CommandMeta = CommandMeta {
    name: "removemod",
    desc: "Take moderator access away from a role.",
    category: "admin",
    usage: "!removemod <role>",
};

pub const LISTMODS_META: CommandMeta = CommandMeta {
    name: "listmods",
    desc: "List roles with moderator access to the bot.",
    category: "admin",
    usage: "!listmods",
};

const WORDING: RegistryWording = RegistryWording {
    kind: RegistryKind::ModRoles,
    added: "is now a moderator role.",
    already: "is already a moderator role.",
    removed: "is no longer a moderator role.",
    absent: "wasn't a moderator role.",
    empty: "No moderator roles are configured.",
    noun: "roles",
};

#[poise::command(prefix_command, slash_command, category = "Admin")]
pub async fn addmod(
    ctx: Context<'_>,
    #[description = "Role to grant moderator access"] role: Option<serenity::Role>,
) -> Result<(), Error> {
    let Some(guild_id) = ctx.guild_id() else {
        ctx.say(guild_only_message()).await?;
        return Ok(());
    };
    if guild_with_permission(&ctx, guild_id, serenity::Permissions::ADMINISTRATOR)
        .await?
        .is_none()
    {
        return Ok(());
    }
    let Some(role) = role else {
        ctx.say(usage_message(ADDMOD_META.usage)).await?;
        return Ok(());
    };

    registry_add(&ctx, guild_id, &WORDING, role.id.get(), role_mention(role.id.get())).await
}

#[poise::command(prefix_command, slash_command, category = "Admin")]
pub async fn removemod(
    ctx: Context<'_>,
    #[description = "Role to remove moderator access from"] role: Option<serenity::Role>,
) -> Result<(), Error> {
    let Some(guild_id) = ctx.guild_id() else {
        ctx.say(guild_only_message()).await?;
        return Ok(());
    };
    if guild_with_permission(&ctx, guild_id, serenity::Permissions::ADMINISTRATOR)
        .await?
        .is_none()
    {
        return Ok(());
    }
    let Some(role) = role else {
        ctx.say(usage_message(REMOVEMOD_META.usage)).await?;
        return Ok(());
    };

    registry_remove(&ctx, guild_id, &WORDING, role.id.get(), role_mention(role.id.get())).await
}

#[poise::command(prefix_command, slash_command, category = "Admin")]
pub async fn listmods(ctx: Context<'_>) -> Result<(), Error> {
    let Some(guild_id) = ctx.guild_id() else {
        ctx.say(guild_only_message()).await?;
        return Ok(());
    };
    if guild_with_permission(&ctx, guild_id, serenity::Permissions::MANAGE_GUILD)
        .await?
        .is_none()
    {
        return Ok(());
    }

    registry_list(&ctx, guild_id, &WORDING, "Moderator roles", role_mention).await
}
