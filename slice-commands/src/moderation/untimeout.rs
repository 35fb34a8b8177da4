use poise::serenity_prelude as serenity;

use crate::CommandMeta;
use crate::checks::{check_target, invoker_standing};
use crate::moderation::embeds::{NO_REASON, guild_only_message, moderation_action_embed, usage_message};
use crate::moderation::{log_action, report_platform_failure, settle_target_check};
use slice_core::{Context, Error};

pub const META: CommandMeta = CommandMeta {
    name: "untimeout",
    desc: "Remove a timeout from a user.",
    category: "moderation",
    usage: "!untimeout <user> [reason]",
};

#[poise::command(prefix_command, slash_command, category = "Moderation")]
pub async fn untimeout(
    ctx: Context<'_>,
    #[description = "The user to remove timeout from"] user: Option<serenity::User>,
    #[description = "Reason"]
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

    let required = serenity::Permissions::MODERATE_MEMBERS;
    let guild = guild_id.to_partial_guild(ctx.http()).await?;
    let actor = invoker_standing(&ctx, &guild).await?;

    let check = check_target(&ctx, &guild, &actor, user.id, required, false).await?;
    if !settle_target_check(&ctx, check, "untimeout").await? {
        return Ok(());
    }

    let edit = serenity::EditMember::new().enable_communication();
    if let Err(source) = guild_id.edit_member(ctx.http(), user.id, edit).await {
        return report_platform_failure(&ctx, "untimeout", source).await;
    }

    log_action(
        "untimeout",
        guild_id,
        ctx.author().id,
        user.id,
        reason.as_deref().unwrap_or(NO_REASON),
    );

    let case = ctx.data().next_case();
    let embed = moderation_action_embed(&user, "untimed out", reason.as_deref(), None, case);
    ctx.send(poise::CreateReply::default().embed(embed)).await?;

    Ok(())
}
