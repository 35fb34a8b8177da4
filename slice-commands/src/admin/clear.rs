use tokio::time::{Duration, sleep};
use tracing::{error, info};

use poise::serenity_prelude as serenity;

use crate::CommandMeta;
use crate::checks::guild_with_permission;
use crate::moderation::embeds::{guild_only_message, is_missing_permissions_error, usage_message};
use slice_core::{Context, Error};
use slice_utils::time::now_unix_secs;

pub const META: CommandMeta = CommandMeta {
    name: "clear",
    desc: "Delete recent messages in this channel, optionally only from one user.",
    category: "admin",
    usage: "!clear <amount 1-100> [user]",
};

pub const MAX_CLEAR: u16 = 100;
/// Discord refuses to bulk delete messages older than two weeks.
const BULK_DELETE_MAX_AGE_SECS: i64 = 14 * 86_400;

fn fetch_limit(amount: u16, filtered: bool) -> u8 {
    let limit = if filtered {
        amount.saturating_mul(2)
    } else {
        amount
    };
    limit.min(MAX_CLEAR) as u8
}

#[derive(Clone, Copy, Debug)]
struct Candidate {
    id: u64,
    author_id: u64,
    created_unix: i64,
}

#[derive(Debug, Default, PartialEq, Eq)]
struct Selection {
    ids: Vec<u64>,
    too_old: usize,
}

/// Pick up to `amount` messages, newest first, keeping only `author` when set.
fn select_for_clear(
    candidates: &[Candidate],
    author: Option<u64>,
    amount: usize,
    now_unix: i64,
) -> Selection {
    let mut selection = Selection::default();

    for candidate in candidates
        .iter()
        .filter(|candidate| author.is_none_or(|wanted| candidate.author_id == wanted))
        .take(amount)
    {
        if now_unix - candidate.created_unix >= BULK_DELETE_MAX_AGE_SECS {
            selection.too_old += 1;
        } else {
            selection.ids.push(candidate.id);
        }
    }

    selection
}

fn summary(deleted: usize, too_old: usize) -> String {
    let mut text = format!("Deleted {} message(s).", deleted);
    if too_old > 0 {
        text.push_str(&format!(
            " Skipped {} older than 14 days, Discord won't bulk delete those.",
            too_old
        ));
    }
    text
}

#[poise::command(prefix_command, slash_command, category = "Admin")]
pub async fn clear(
    ctx: Context<'_>,
    #[description = "How many messages to delete (1-100)"] amount: Option<u16>,
    #[description = "Only delete messages from this user"] user: Option<serenity::User>,
) -> Result<(), Error> {
    let Some(guild_id) = ctx.guild_id() else {
        ctx.say(guild_only_message()).await?;
        return Ok(());
    };

    if guild_with_permission(&ctx, guild_id, serenity::Permissions::MANAGE_MESSAGES)
        .await?
        .is_none()
    {
        return Ok(());
    }

    let Some(amount) = amount else {
        ctx.say(usage_message(META.usage)).await?;
        return Ok(());
    };

    if amount == 0 || amount > MAX_CLEAR {
        ctx.say(format!("Amount must be between 1 and {}.", MAX_CLEAR))
            .await?;
        return Ok(());
    }

    ctx.defer_ephemeral().await?;

    let channel_id = ctx.channel_id();
    let mut request = serenity::GetMessages::new().limit(fetch_limit(amount, user.is_some()));
    if let poise::Context::Prefix(prefix) = ctx {
        request = request.before(prefix.msg.id);
        let _ = prefix.msg.delete(ctx.http()).await;
    }

    let messages = channel_id.messages(ctx.http(), request).await?;
    let candidates: Vec<Candidate> = messages
        .iter()
        .map(|message| Candidate {
            id: message.id.get(),
            author_id: message.author.id.get(),
            created_unix: message.timestamp.unix_timestamp(),
        })
        .collect();

    let selection = select_for_clear(
        &candidates,
        user.as_ref().map(|user| user.id.get()),
        usize::from(amount),
        now_unix_secs() as i64,
    );

    let ids: Vec<serenity::MessageId> = selection
        .ids
        .iter()
        .map(|id| serenity::MessageId::new(*id))
        .collect();

    let delete_result = match ids.as_slice() {
        [] => Ok(()),
        [only] => channel_id.delete_message(ctx.http(), *only).await,
        _ => channel_id.delete_messages(ctx.http(), ids.iter().copied()).await,
    };

    if let Err(source) = delete_result {
        if !is_missing_permissions_error(&source) {
            error!(?source, "clear delete request failed");
        }
        ctx.say("I couldn't delete messages. I likely need the 'Manage Messages' permission.")
            .await?;
        return Ok(());
    }

    info!(
        action = "clear",
        guild_id = guild_id.get(),
        channel_id = channel_id.get(),
        moderator_id = ctx.author().id.get(),
        deleted = ids.len(),
        "messages cleared"
    );

    let reply = ctx
        .send(
            poise::CreateReply::default()
                .content(summary(ids.len(), selection.too_old))
                .ephemeral(true),
        )
        .await?;

    if let poise::Context::Prefix(_) = ctx {
        sleep(Duration::from_secs(3)).await;
        let _ = reply.delete(ctx).await;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const NOW: i64 = 2_000_000_000;

    fn candidate(id: u64, author_id: u64) -> Candidate {
        Candidate {
            id,
            author_id,
            created_unix: NOW - 60,
        }
    }

    #[test]
    fn filtered_fetch_doubles_up_to_cap() {
        assert_eq!(fetch_limit(10, false), 10);
        assert_eq!(fetch_limit(10, true), 20);
        assert_eq!(fetch_limit(80, true), 100);
        assert_eq!(fetch_limit(100, false), 100);
    }

    #[test]
    fn takes_newest_amount() {
        let candidates = [candidate(5, 1), candidate(4, 2), candidate(3, 1)];
        assert_eq!(select_for_clear(&candidates, None, 2, NOW).ids, vec![5, 4]);
    }

    #[test]
    fn author_filter_keeps_only_that_user() {
        let candidates = [
            candidate(6, 1),
            candidate(5, 2),
            candidate(4, 1),
            candidate(3, 1),
        ];
        assert_eq!(select_for_clear(&candidates, Some(1), 2, NOW).ids, vec![6, 4]);
        assert!(select_for_clear(&candidates, Some(9), 2, NOW).ids.is_empty());
    }

    #[test]
    fn old_messages_are_skipped() {
        let mut old = candidate(1, 1);
        old.created_unix = NOW - BULK_DELETE_MAX_AGE_SECS - 1;
        let selection = select_for_clear(&[candidate(2, 1), old], None, 5, NOW);

        assert_eq!(selection.ids, vec![2]);
        assert_eq!(selection.too_old, 1);
        assert!(summary(1, 1).contains("Skipped 1"));
    }
}
