use poise::serenity_prelude as serenity;

use crate::CommandMeta;
use crate::admin::{RegistryWording, registry_add, registry_list, registry_remove};
use crate::checks::guild_with_permission;
use crate::moderation::embeds::{guild_only_message, usage_message};
use slice_core::{Context, Error};
use slice_store::RegistryKind;
use slice_utils::formatting::user_mention;

pub const ALTWHITELIST_META: CommandMeta = CommandMeta {
    name: "altwhitelist",
    desc: "Allow a user to run the alt command.",
    category: "admin",
    usage: "!altwhitelist <user>",
};

pub const ALTUNWHITELIST_META: CommandMeta = CommandMeta {
    name: "altunwhitelist",
    desc: "Remove a user from the alt whitelist.",
    category: "admin",
    usage: "!altunwhitelist <user>",
};

pub const ALTWHITELISTED_META: CommandMeta = CommandMeta {
    name: "altwhitelisted",
    desc: "List users on the alt whitelist.",
    category: "admin",
    usage: "!altwhitelisted",
};

const WORDING: RegistryWording = RegistryWording {
    kind: RegistryKind::AltUsers,
    added: "has been whitelisted.",
    already: "is already whitelisted.",
    removed: "has been removed from the whitelist.",
    absent: "wasn't whitelisted.",
    empty: "Nobody is on the alt whitelist.",
    noun: "users",
};

const REQUIRED: serenity::Permissions = serenity::Permissions::MANAGE_GUILD;

#[poise::command(prefix_command, slash_command, category = "Admin")]
pub async fn altwhitelist(
    ctx: Context<'_>,
    #[description = "User to whitelist"] user: Option<serenity::User>,
) -> Result<(), Error> {
    let Some(guild_id) = ctx.guild_id() else {
        ctx.say(guild_only_message()).await?;
        return Ok(());
    };
    if guild_with_permission(&ctx, guild_id, REQUIRED).await?.is_none() {
        return Ok(());
    }
    let Some(user) = user else {
        ctx.say(usage_message(ALTWHITELIST_META.usage)).await?;
        return Ok(());
    };

    registry_add(&ctx, guild_id, &WORDING, user.id.get(), user_mention(user.id.get())).await
}

#[poise::command(prefix_command, slash_command, category = "Admin")]
pub async fn altunwhitelist(
    ctx: Context<'_>,
    #[description = "User to remove"] user: Option<serenity::User>,
) -> Result<(), Error> {
    let Some(guild_id) = ctx.guild_id() else {
        ctx.say(guild_only_message()).await?;
        return Ok(());
    };
    if guild_with_permission(&ctx, guild_id, REQUIRED).await?.is_none() {
        return Ok(());
    }
    let Some(user) = user else {
        ctx.say(usage_message(ALTUNWHITELIST_META.usage)).await?;
        return Ok(());
    };

    registry_remove(&ctx, guild_id, &WORDING, user.id.get(), user_mention(user.id.get())).await
}

#[poise::command(prefix_command, slash_command, category = "Admin")]
pub async fn altwhitelisted(ctx: Context<'_>) -> Result<(), Error> {
    let Some(guild_id) = ctx.guild_id() else {
        ctx.say(guild_only_message()).await?;
        return Ok(());
    };
    if guild_with_permission(&ctx, guild_id, REQUIRED).await?.is_none() {
        return Ok(());
    }

    registry_list(&ctx, guild_id, &WORDING, "Alt whitelist", user_mention).await
}
