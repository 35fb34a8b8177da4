use poise::serenity_prelude as serenity;

use crate::utility::embeds::{display_category, grouped_help_description, unknown_category_message};
use crate::{COMMANDS, CommandMeta};
use slice_core::{Context, Error};
use slice_utils::embed::{INFO_EMBED_COLOR, requested_by_footer};

pub const META: CommandMeta = CommandMeta {
    name: "help",
    desc: "Lists out all available commands.",
    category: "utility",
    usage: "!help [category]",
};

#[poise::command(prefix_command, slash_command, category = "Utility")]
pub async fn help(
    ctx: Context<'_>,
    #[description = "Only show this category"] category: Option<String>,
) -> Result<(), Error> {
    let category = category
        .as_deref()
        .map(|raw| raw.trim().to_ascii_lowercase())
        .filter(|raw| !raw.is_empty());

    let is_owner = ctx.framework().options().owners.contains(&ctx.author().id);
    let categories = categories(is_owner);
    if let Some(wanted) = category.as_deref()
        && !categories.iter().any(|known| *known == wanted)
    {
        ctx.say(unknown_category_message(wanted, &categories)).await?;
        return Ok(());
    }

    let commands = sorted_commands(category.as_deref(), is_owner);
    let title = match category.as_deref() {
        Some(wanted) => format!("{} Commands", display_category(wanted)),
        None => "Available Commands".to_owned(),
    };
    let prefix = ctx.data().current_prefix().await;

    let embed = serenity::CreateEmbed::new()
        .title(title)
        .color(INFO_EMBED_COLOR)
        .description(grouped_help_description(&commands))
        .field(
            "Tip",
            format!(
                "Use `{}usage <command>` for syntax. Every command also works as a slash command.",
                prefix
            ),
            false,
        )
        .footer(requested_by_footer(ctx.author()));

    ctx.send(poise::CreateReply::default().embed(embed)).await?;
    Ok(())
}

/// Category of commands only bot owners may run.
const OWNER_CATEGORY: &str = "owner";

fn visible_to(command: &CommandMeta, is_owner: bool) -> bool {
    is_owner || command.category != OWNER_CATEGORY
}

fn categories(is_owner: bool) -> Vec<&'static str> {
    let mut categories: Vec<&str> = COMMANDS
        .iter()
        .filter(|cmd| visible_to(cmd, is_owner))
        .map(|c| c.category)
        .collect();
    categories.sort_unstable();
    categories.dedup();
    categories
}

fn sorted_commands(category: Option<&str>, is_owner: bool) -> Vec<&'static CommandMeta> {
    let mut filtered: Vec<&'static CommandMeta> = COMMANDS
        .iter()
        .filter(|cmd| visible_to(cmd, is_owner))
        .filter(|cmd| category.is_none_or(|wanted| cmd.category == wanted))
        .collect();

    filtered.sort_unstable_by(|left, right| {
        left.category
            .cmp(right.category)
            .then_with(|| left.name.cmp(right.name))
    });

    filtered
}
