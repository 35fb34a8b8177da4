pub mod alt;
pub mod altrolewhitelist;
pub mod altwhitelist;
pub mod announce;
pub mod clear;
pub mod dm;
pub mod modroles;
pub mod say;
pub mod setprefix;
pub mod snipe;

use poise::serenity_prelude as serenity;
use tracing::info;

use slice_core::{Context, Error};
use slice_store::RegistryKind;
use slice_utils::embed::{INFO_EMBED_COLOR, lookup_embed};
use slice_utils::formatting::join_mentions_or_count;

/// Reply without pinging anyone mentioned in `text`.
pub(crate) async fn quiet_reply(ctx: &Context<'_>, text: impl Into<String>) -> Result<(), Error> {
    ctx.send(
        poise::CreateReply::default()
            .content(text)
            .allowed_mentions(serenity::CreateAllowedMentions::new()),
    )
    .await?;
    Ok(())
}

/// Wording for one registry, e.g. "whitelisted" or "a moderator role".
pub(crate) struct RegistryWording {
    pub kind: RegistryKind,
    pub added: &'static str,
    pub already: &'static str,
    pub removed: &'static str,
    pub absent: &'static str,
    pub empty: &'static str,
    pub noun: &'static str,
}

pub(crate) fn add_reply(wording: &RegistryWording, mention: &str, added: bool) -> String {
    if added {
        format!("{} {}", mention, wording.added)
    } else {
        format!("{} {}", mention, wording.already)
    }
}

pub(crate) fn remove_reply(wording: &RegistryWording, mention: &str, removed: bool) -> String {
    if removed {
        format!("{} {}", mention, wording.removed)
    } else {
        format!("{} {}", mention, wording.absent)
    }
}

pub(crate) async fn registry_add(
    ctx: &Context<'_>,
    guild_id: serenity::GuildId,
    wording: &RegistryWording,
    id: u64,
    mention: String,
) -> Result<(), Error> {
    let added = ctx
        .data()
        .registry
        .add(wording.kind, guild_id.get(), id)
        .await?;

    if added {
        info!(
            kind = %wording.kind,
            guild_id = guild_id.get(),
            id,
            moderator_id = ctx.author().id.get(),
            "registry entry added"
        );
    }
    quiet_reply(ctx, add_reply(wording, &mention, added)).await
}

pub(crate) async fn registry_remove(
    ctx: &Context<'_>,
    guild_id: serenity::GuildId,
    wording: &RegistryWording,
    id: u64,
    mention: String,
) -> Result<(), Error> {
    let removed = ctx
        .data()
        .registry
        .remove(wording.kind, guild_id.get(), id)
        .await?;

    if removed {
        info!(
            kind = %wording.kind,
            guild_id = guild_id.get(),
            id,
            moderator_id = ctx.author().id.get(),
            "registry entry removed"
        );
    }
    quiet_reply(ctx, remove_reply(wording, &mention, removed)).await
}

pub(crate) async fn registry_list(
    ctx: &Context<'_>,
    guild_id: serenity::GuildId,
    wording: &RegistryWording,
    title: &str,
    mention: fn(u64) -> String,
) -> Result<(), Error> {
    let ids = ctx.data().registry.list(wording.kind, guild_id.get()).await?;
    let mentions: Vec<String> = ids.iter().copied().map(mention).collect();

    let description = if mentions.is_empty() {
        wording.empty.to_owned()
    } else {
        join_mentions_or_count(&mentions, wording.noun)
    };

    let embed = lookup_embed(format!("{} ({})", title, ids.len()), INFO_EMBED_COLOR, ctx.author())
        .description(description);
    ctx.send(poise::CreateReply::default().embed(embed)).await?;
    Ok(())
}
