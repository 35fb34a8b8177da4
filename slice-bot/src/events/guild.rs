use poise::serenity_prelude as serenity;
use tracing::{error, info, warn};

use slice_core::Data;

/// Leave a guild as soon as it shows up if it is blacklisted.
pub async fn handle_guild_create_blacklist(
    ctx: &serenity::Context,
    data: &Data,
    guild: &serenity::Guild,
) {
    if !data.is_blacklisted(guild.id.get()).await {
        return;
    }

    warn!(guild_id = guild.id.get(), name = %guild.name, "leaving blacklisted guild");
    if let Err(source) = guild.id.leave(&ctx.http).await {
        error!(?source, guild_id = guild.id.get(), "failed to leave blacklisted guild");
    }
}

/// Gateway replays every guild on startup; only fresh joins are logged.
pub fn handle_guild_create_log(guild: &serenity::Guild, is_new: Option<bool>) {
    if is_new == Some(true) {
        info!(guild_id = guild.id.get(), name = %guild.name, members = guild.member_count, "joined guild");
    }
}

fn departure(unavailable: bool) -> &'static str {
    if unavailable { "outage" } else { "removed" }
}

pub fn handle_guild_delete_log(
    incomplete: &serenity::UnavailableGuild,
    full: Option<&serenity::Guild>,
) {
    let name = full.map_or("unknown", |guild| guild.name.as_str());
    let reason = departure(incomplete.unavailable);

    if incomplete.unavailable {
        warn!(guild_id = incomplete.id.get(), name, reason, "guild became unavailable");
    } else {
        info!(guild_id = incomplete.id.get(), name, reason, "left guild");
    }
}
