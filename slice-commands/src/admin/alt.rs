use poise::serenity_prelude as serenity;
use tracing::{info, warn};

use crate::CommandMeta;
use crate::checks::{enforce_cooldown, invoker_standing};
use crate::moderation::embeds::guild_only_message;
use slice_alt::{AltError, AltProfile};
use slice_core::{Context, Error};
use slice_store::RegistryKind;
use slice_utils::embed::{ALT_EMBED_COLOR, requested_by_footer};

pub const META: CommandMeta = CommandMeta {
    name: "alt",
    desc: "Fetch a public alt account profile (no credentials).",
    category: "admin",
    usage: "!alt",
};

const NOT_ALLOWED: &str =
    "You need **Manage Server** or a spot on the alt whitelist to use this command.";

fn alt_embed(profile: &AltProfile, requester: &serenity::User) -> serenity::CreateEmbed {
    let mut embed = serenity::CreateEmbed::new()
        .title(profile.title())
        .description(profile.bio.as_deref().unwrap_or("no bio"))
        .color(ALT_EMBED_COLOR)
        .field("Username", format!("`{}`", profile.username), true)
        .footer(requested_by_footer(requester));

    if let Some(user_id) = profile.user_id.as_deref() {
        embed = embed.field("User ID", format!("`{}`", user_id), true);
    }
    if let Some(created_at) = profile.created_at.as_deref() {
        embed = embed.field("Created", created_at, true);
    }
    if let Some(note) = profile.note.as_deref() {
        embed = embed.field("Note", note, false);
    }
    if let Some(expires_at) = profile.expires_at.as_deref() {
        embed = embed.field("Expires", expires_at, true);
    }
    if let Some(avatar_url) = profile.avatar_url.as_deref() {
        embed = embed.thumbnail(avatar_url);
    }

    embed
}

#[poise::command(prefix_command, slash_command, category = "Admin")]
pub async fn alt(ctx: Context<'_>) -> Result<(), Error> {
    let Some(guild_id) = ctx.guild_id() else {
        ctx.say(guild_only_message()).await?;
        return Ok(());
    };

    let data = ctx.data();
    if !data.settings.alt_enabled {
        ctx.send(
            poise::CreateReply::default()
                .content("Alt lookups are disabled.")
                .ephemeral(true),
        )
        .await?;
        return Ok(());
    }

    let Some(service) = data.alt.as_ref() else {
        ctx.send(
            poise::CreateReply::default()
                .content("The alt provider isn't configured.")
                .ephemeral(true),
        )
        .await?;
        return Ok(());
    };

    let guild = guild_id.to_partial_guild(ctx.http()).await?;
    let standing = invoker_standing(&ctx, &guild).await?;
    let role_ids: Vec<u64> = standing.role_ids.iter().map(|role| role.get()).collect();

    let allowed = standing.has_permission(serenity::Permissions::MANAGE_GUILD)
        || data
            .registry
            .contains(RegistryKind::AltUsers, guild_id.get(), ctx.author().id.get())
            .await?
        || data
            .registry
            .contains_any(RegistryKind::AltRoles, guild_id.get(), &role_ids)
            .await?;

    if !allowed {
        ctx.send(
            poise::CreateReply::default()
                .content(NOT_ALLOWED)
                .ephemeral(true),
        )
        .await?;
        return Ok(());
    }

    if !enforce_cooldown(&ctx, "alt", guild_id, data.settings.alt_cooldown).await? {
        return Ok(());
    }

    ctx.defer().await?;

    match service.fetch_profile().await {
        Ok(profile) => {
            info!(
                guild_id = guild_id.get(),
                user_id = ctx.author().id.get(),
                "alt profile fetched"
            );
            ctx.send(poise::CreateReply::default().embed(alt_embed(&profile, ctx.author())))
                .await?;
        }
        Err(source) => {
            if matches!(source, AltError::QuotaExhausted) {
                warn!(guild_id = guild_id.get(), "alt provider quota exhausted");
            } else {
                warn!(?source, guild_id = guild_id.get(), "alt lookup failed");
            }
            ctx.say(source.user_message()).await?;
        }
    }

    Ok(())
}
