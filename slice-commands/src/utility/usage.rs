use slice_core::{Context, Error};

use crate::{COMMANDS, CommandMeta};

pub const META: CommandMeta = CommandMeta {
    name: "usage",
    desc: "Show usage syntax for a specific command.",
    category: "utility",
    usage: "!usage <command>",
};

fn find_command(raw_name: &str) -> Option<&'static CommandMeta> {
    let lookup = raw_name
        .trim()
        .trim_start_matches(['!', '/'])
        .to_ascii_lowercase();
    COMMANDS.iter().find(|command| command.name == lookup)
}

#[poise::command(prefix_command, slash_command, category = "Utility")]
pub async fn usage(
    ctx: Context<'_>,
    #[description = "Command name"] command: Option<String>,
) -> Result<(), Error> {
    let Some(raw_name) = command.as_deref() else {
        ctx.say(format!("Usage: `{}`", META.usage)).await?;
        return Ok(());
    };

    let Some(command) = find_command(raw_name) else {
        ctx.say(format!("Unknown command: `{}`", raw_name.trim()))
            .await?;
        return Ok(());
    };

    ctx.say(format!("Usage: `{}`\n{}", command.usage, command.desc))
        .await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_ignores_prefix_and_case() {
        assert_eq!(find_command("!BAN").map(|c| c.name), Some("ban"));
        assert_eq!(find_command("/snipe").map(|c| c.name), Some("snipe"));
        assert!(find_command("nope").is_none());
    }
}
