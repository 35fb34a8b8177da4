use poise::serenity_prelude as serenity;

use crate::CommandMeta;
use crate::checks::{check_target, invoker_standing};
use crate::moderation::embeds::{
    NO_REASON, guild_only_message, moderation_action_embed, moderation_bot_target_message,
    send_moderation_target_dm, usage_message,
};
use crate::moderation::{log_action, report_platform_failure, settle_target_check};
use slice_core::{Context, Error};

pub const META: CommandMeta = CommandMeta {
    name: "kick",
    desc: "Kick a user from the server.",
    category: "moderation",
    usage: "!kick <user> [reason]",
};

#[poise::command(prefix_command, slash_command, category = "Moderation")]
pub async fn kick(
    ctx: Context<'_>,
    #[description = "The user to kick"] user: Option<serenity::User>,
    #[description = "Reason for the kick"]
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

    let required = serenity::Permissions::KICK_MEMBERS;
    let guild = guild_id.to_partial_guild(ctx.http()).await?;
    let actor = invoker_standing(&ctx, &guild).await?;

    let check = check_target(&ctx, &guild, &actor, user.id, required, false).await?;
    if !settle_target_check(&ctx, check, "kick").await? {
        return Ok(());
    }

    if user.bot {
        ctx.say(moderation_bot_target_message()).await?;
        return Ok(());
    }

    let reason_text = reason.as_deref().unwrap_or(NO_REASON);

    // After the kick there may be no shared guild left to DM through.
    let _ = send_moderation_target_dm(
        ctx.http(),
        &user,
        &guild.name,
        "kicked",
        Some(reason_text),
        None,
    )
    .await;

    if let Err(source) = guild_id
        .kick_with_reason(ctx.http(), user.id, reason_text)
        .await
    {
        return report_platform_failure(&ctx, "kick", source).await;
    }

    log_action("kick", guild_id, ctx.author().id, user.id, reason_text);

    let case = ctx.data().next_case();
    let embed = moderation_action_embed(&user, "kicked", reason.as_deref(), None, case);
    ctx.send(poise::CreateReply::default().embed(embed)).await?;

    Ok(())
}
