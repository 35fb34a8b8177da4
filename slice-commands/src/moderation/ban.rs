use poise::serenity_prelude as serenity;

use crate::CommandMeta;
use crate::checks::{check_target, invoker_standing};
use crate::moderation::embeds::{
    NO_REASON, guild_only_message, moderation_action_embed, send_moderation_target_dm,
    usage_message,
};
use crate::moderation::{log_action, report_platform_failure, settle_target_check};
use slice_core::{Context, Error};

pub const META: CommandMeta = CommandMeta {
    name: "ban",
    desc: "Ban a user, optionally deleting their recent messages.",
    category: "moderation",
    usage: "!ban <user> [delete_days 0-7] [reason]",
};

pub const MAX_DELETE_DAYS: u8 = 7;

#[poise::command(prefix_command, slash_command, category = "Moderation")]
pub async fn ban(
    ctx: Context<'_>,
    #[description = "The user to ban"] user: Option<serenity::User>,
    #[description = "Days of messages to delete (0-7)"] delete_days: Option<u8>,
    #[description = "Reason for the ban"]
    #[rest]
    reason: Option<String>,
) -> Result<(), Error> {
    let Some(guild_id) = ctx.guild_id() else {
        ctx.say(guild_only_message()).await?;
        return Ok(());
    };

    let Some(user) = user else {
        ctx.say(usage_message(META.usage)).await?;
        return Ok(());
    };

    let delete_days = delete_days.unwrap_or(0);
    if delete_days > MAX_DELETE_DAYS {
        ctx.say(format!(
            "`delete_days` must be between 0 and {}.",
            MAX_DELETE_DAYS
        ))
        .await?;
        return Ok(());
    }

    let required = serenity::Permissions::BAN_MEMBERS;
    let guild = guild_id.to_partial_guild(ctx.http()).await?;
    let actor = invoker_standing(&ctx, &guild).await?;

    // Users who already left can still be banned.
    let check = check_target(&ctx, &guild, &actor, user.id, required, true).await?;
    if !settle_target_check(&ctx, check, "ban").await? {
        return Ok(());
    }

    let reason_text = reason.as_deref().unwrap_or(NO_REASON);

    let _ = send_moderation_target_dm(
        ctx.http(),
        &user,
        &guild.name,
        "banned",
        Some(reason_text),
        None,
    )
    .await;

    if let Err(source) = guild_id
        .ban_with_reason(ctx.http(), user.id, delete_days, reason_text)
        .await
    {
        return report_platform_failure(&ctx, "ban", source).await;
    }

    log_action("ban", guild_id, ctx.author().id, user.id, reason_text);

    let case = ctx.data().next_case();
    let embed = moderation_action_embed(&user, "banned", reason.as_deref(), None, case);
    ctx.send(poise::CreateReply::default().embed(embed)).await?;

    Ok(())
}
