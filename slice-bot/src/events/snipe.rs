use poise::serenity_prelude as serenity;
use tracing::debug;

use slice_core::Data;
use slice_store::RecentMessage;
use slice_utils::embed::display_name;
use slice_utils::time::now_unix_secs;

/// Remember a guild message so it can be sniped once deleted. Bots and webhooks are skipped.
pub fn handle_message_create_snipe(data: &Data, message: &serenity::Message) {
    if !is_snipeable(
        message.author.bot,
        message.webhook_id.is_some(),
        message.guild_id.is_some(),
    ) {
        return;
    }

    data.snipes.record(RecentMessage {
        message_id: message.id.get(),
        channel_id: message.channel_id.get(),
        author_id: message.author.id.get(),
        author_name: display_name(&message.author),
        author_avatar_url: Some(message.author.face()),
        content: message.content.clone(),
        created_at: message.timestamp.unix_timestamp(),
    });
}

fn is_snipeable(from_bot: bool, from_webhook: bool, in_guild: bool) -> bool {
    in_guild && !from_bot && !from_webhook
}

pub fn handle_message_delete_snipe(
    data: &Data,
    channel_id: serenity::ChannelId,
    message_id: serenity::MessageId,
) {
    let recorded =
        data.snipes
            .mark_deleted(channel_id.get(), message_id.get(), now_unix_secs() as i64);

    if recorded {
        debug!(
            channel_id = channel_id.get(),
            message_id = message_id.get(),
            "deleted message stored for snipe"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::is_snipeable;

    #[test]
    fn only_human_guild_messages_are_buffered() {
        assert!(is_snipeable(false, false, true));
        assert!(!is_snipeable(true, false, true));
        assert!(!is_snipeable(false, true, true));
        assert!(!is_snipeable(false, false, false));
    }
}
