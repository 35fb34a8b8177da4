use std::collections::HashSet;
use std::env;

use tracing::info;

use crate::CommandMeta;
use slice_core::{Context, Error};
use slice_utils::parse::parse_id_list;

pub const META: CommandMeta = CommandMeta {
    name: "reloadblacklist",
    desc: "Re-read GUILD_BLACKLIST (bot owners only).",
    category: "owner",
    usage: "!reloadblacklist",
};

/// Blacklisted guild ids from the environment, re-reading `.env` when present.
pub fn blacklist_from_env() -> HashSet<u64> {
    dotenvy::dotenv_override().ok();
    env::var("GUILD_BLACKLIST")
        .map(|raw| parse_id_list(&raw))
        .unwrap_or_default()
}

#[poise::command(prefix_command, slash_command, owners_only, hide_in_help, category = "Owner")]
pub async fn reloadblacklist(ctx: Context<'_>) -> Result<(), Error> {
    let ids = blacklist_from_env();
    let count = ctx.data().replace_blacklist(ids).await;

    info!(count, "guild blacklist reloaded");
    ctx.send(
        poise::CreateReply::default()
            .content(format!(
                "Blacklist reloaded. {} guild ID(s) configured.",
                count
            ))
            .ephemeral(true),
    )
    .await?;
    Ok(())
}
