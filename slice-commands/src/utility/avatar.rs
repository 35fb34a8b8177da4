use poise::serenity_prelude as serenity;

use crate::CommandMeta;
use slice_core::{Context, Error};
use slice_utils::embed::{INFO_EMBED_COLOR, display_name, lookup_embed};

pub const META: CommandMeta = CommandMeta {
    name: "avatar",
    desc: "Show a user's avatar in full size.",
    category: "utility",
    usage: "!avatar [user]",
};

#[poise::command(prefix_command, slash_command, category = "Utility")]
pub async fn avatar(
    ctx: Context<'_>,
    #[description = "User whose avatar to show (defaults to you)"] user: Option<serenity::User>,
) -> Result<(), Error> {
    let user = user.unwrap_or_else(|| ctx.author().clone());
    let url = user.face();

    let mut embed = lookup_embed(
        format!("{}'s avatar", display_name(&user)),
        INFO_EMBED_COLOR,
        ctx.author(),
    )
    .url(url.clone())
    .image(url);

    if let Some(guild_id) = ctx.guild_id()
        && let Ok(member) = guild_id.member(ctx.http(), user.id).await
        && let Some(server_avatar) = member.avatar_url()
    {
        embed = embed.field(
            "Server avatar",
            format!("[Open]({})", server_avatar),
            true,
        );
    }

    ctx.send(poise::CreateReply::default().embed(embed)).await?;
    Ok(())
}
