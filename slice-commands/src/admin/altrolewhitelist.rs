use poise::serenity_prelude as serenity;

use crate::CommandMeta;
use crate::admin::{RegistryWording, registry_add, registry_list, registry_remove};
use crate::checks::guild_with_permission;
use crate::moderation::embeds::{guild_only_message, usage_message};
use slice_core::{Context, Error};
use slice_store::RegistryKind;
use slice_utils::formatting::role_mention;

pub const ALTROLEWHITELIST_META: CommandMeta = CommandMeta {
    name: "altrolewhitelist",
    desc: "Allow every member of a role to run the alt command.",
    category: "admin",
    usage: "!altrolewhitelist <role>",
};

pub const ALTROLEUNWHITELIST_META: CommandMeta = CommandMeta {
    name: "altroleunwhitelist",
    desc: "Remove a role from the alt whitelist.",
    category: "admin",
    usage: "!altroleunwhitelist <role>",
};

pub const ALTROLEWHITELISTED_META: CommandMeta = CommandMeta {
    name: "altrolewhitelisted",
    desc: "List roles on the alt whitelist.",
    category: "admin",
    usage: "!altrolewhitelisted",
};

const WORDING: RegistryWording = RegistryWording {
    kind: RegistryKind::AltRoles,
    added: "has been whitelisted.",
    already: "is already whitelisted.",
    removed: "has been removed from the whitelist.",
    absent: "wasn't whitelisted.",
    empty: "No roles are on the alt whitelist.",
    noun: "roles",
};

const REQUIRED: serenity::Permissions = serenity::Permissions::MANAGE_GUILD;

#[poise::command(prefix_command, slash_command, category = "Admin")]
pub async fn altrolewhitelist(
    ctx: Context<'_>,
    #[description = "Role to whitelist"] role: Option<serenity::Role>,
) -> Result<(), Error> {
    let Some(guild_id) = ctx.guild_id() else {
        ctx.say(guild_only_message()).await?;
        return Ok(());
    };
    if guild_with_permission(&ctx, guild_id, REQUIRED).await?.is_none() {
        return Ok(());
    }
    let Some(role) = role else {
        ctx.say(usage_message(ALTROLEWHITELIST_META.usage)).await?;
        return Ok(());
    };

    registry_add(&ctx, guild_id, &WORDING, role.id.get(), role_mention(role.id.get())).await
}

#[poise::command(prefix_command, slash_command, category = "Admin")]
pub async fn altroleunwhitelist(
    ctx: Context<'_>,
    #[description = "Role to remove"] role: Option<serenity::Role>,
) -> Result<(), Error> {
    let Some(guild_id) = ctx.guild_id() else {
        ctx.say(guild_only_message()).await?;
        return Ok(());
    };
    if guild_with_permission(&ctx, guild_id, REQUIRED).await?.is_none() {
        return Ok(());
    }
    let Some(role) = role else {
        ctx.say(usage_message(ALTROLEUNWHITELIST_META.usage)).await?;
        return Ok(());
    };

    registry_remove(&ctx, guild_id, &WORDING, role.id.get(), role_mention(role.id.get())).await
}

#[poise::command(prefix_command, slash_command, category = "Admin")]
pub async fn altrolewhitelisted(ctx: Context<'_>) -> Result<(), Error> {
    let Some(guild_id) = ctx.guild_id() else {
        ctx.say(guild_only_message()).await?;
        return Ok(());
    };
    if guild_with_permission(&ctx, guild_id, REQUIRED).await?.is_none() {
        return Ok(());
    }

    registry_list(&ctx, guild_id, &WORDING, "Alt role whitelist", role_mention).await
}
