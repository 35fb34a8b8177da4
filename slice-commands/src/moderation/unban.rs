use poise::serenity_prelude as serenity;

use crate::CommandMeta;
use crate::checks::guild_with_permission;
use crate::moderation::embeds::{
    NO_REASON, guild_only_message, moderation_action_embed, usage_message,
};
use crate::moderation::{log_action, report_platform_failure};
use slice_core::{Context, Error};

pub const META: CommandMeta = CommandMeta {
    name: "unban",
    desc: "Unban a user by mention or id.",
    category: "moderation",
    usage: "!unban <user> [reason]",
};

#[poise::command(prefix_command, slash_command, category = "Moderation")]
pub async fn unban(
    ctx: Context<'_>,
    #[description = "The user to unban"] user: Option<serenity::User>,
    #[description = "Reason for the unban"]
    #[rest]
    reason: Option<String>,
) -> Result<(), Error> {
    let Some(guild_id) = ctx.guild_id() else {
        ctx.say(guild_only_message()).await?;
        return Ok(());
    };

    if guild_with_permission(&ctx, guild_id, serenity::Permissions::BAN_MEMBERS)
        .await?
        .is_none()
    {
        return Ok(());
    }

    let Some(user) = user else {
        ctx.say(usage_message(META.usage)).await?;
        return Ok(());
    };

    if guild_id.member(ctx.http(), user.id).await.is_ok() {
        ctx.say("That user is still a member of this server, so they aren't banned.")
            .await?;
        return Ok(());
    }

    if let Err(source) = guild_id.unban(ctx.http(), user.id).await {
        return report_platform_failure(&ctx, "unban", source).await;
    }

    log_action(
        "unban",
        guild_id,
        ctx.author().id,
        user.id,
        reason.as_deref().unwrap_or(NO_REASON),
    );

    let case = ctx.data().next_case();
    let embed = moderation_action_embed(&user, "unbanned", reason.as_deref(), None, case);
    ctx.send(poise::CreateReply::default().embed(embed)).await?;

    Ok(())
}
