use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard};

pub const DEFAULT_RECENT_MESSAGE_CAPACITY: usize = 5_000;

/// A guild message seen on creation, kept until it is deleted or evicted.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RecentMessage {
    pub message_id: u64,
    pub channel_id: u64,
    pub author_id: u64,
    pub author_name: String,
    pub author_avatar_url: Option<String>,
    pub content: String,
    pub created_at: i64,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DeletedMessage {
    pub author_id: u64,
    pub author_name: String,
    pub author_avatar_url: Option<String>,
    pub content: String,
    pub created_at: i64,
    pub deleted_at: i64,
}

#[derive(Debug)]
struct SnipeState {
    capacity: usize,
    recent: HashMap<u64, RecentMessage>,
    order: VecDeque<u64>,
    deleted: HashMap<u64, DeletedMessage>,
}

impl SnipeState {
    fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            recent: HashMap::new(),
            order: VecDeque::new(),
            deleted: HashMap::new(),
        }
    }

    fn record(&mut self, message: RecentMessage) {
        let message_id = message.message_id;
        if self.recent.insert(message_id, message).is_none() {
            self.order.push_back(message_id);
        }

        while self.recent.len() > self.capacity {
            let Some(oldest) = self.order.pop_front() else {
                break;
            };
            self.recent.remove(&oldest);
        }
    }

    fn mark_deleted(&mut self, channel_id: u64, message_id: u64, deleted_at: i64) -> bool {
        let Some(message) = self.recent.remove(&message_id) else {
            return false;
        };
        self.order.retain(|id| *id != message_id);

        // Stale channel ids from the gateway never win over the recorded one.
        if message.channel_id != channel_id {
            return false;
        }

        self.deleted.insert(
            channel_id,
            DeletedMessage {
                author_id: message.author_id,
                author_name: message.author_name,
                author_avatar_url: message.author_avatar_url,
                content: message.content,
                created_at: message.created_at,
                deleted_at,
            },
        );
        true
    }
}

/// Remembers guild messages on creation and the latest deletion per channel.
///
/// Process-lifetime only.
#[derive(Clone, Debug)]
pub struct SnipeCache {
    state: Arc<Mutex<SnipeState>>,
}

impl Default for SnipeCache {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_RECENT_MESSAGE_CAPACITY)
    }
}

impl SnipeCache {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            state: Arc::new(Mutex::new(SnipeState::new(capacity))),
        }
    }

    fn lock(&self) -> MutexGuard<'_, SnipeState> {
        self.state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn record(&self, message: RecentMessage) {
        self.lock().record(message);
    }

    /// Move a recorded message into its channel's slot, replacing the previous one.
    ///
    /// Returns `false` when the message was never seen (bot-authored, evicted,
    /// or sent before startup).
    pub fn mark_deleted(&self, channel_id: u64, message_id: u64, deleted_at: i64) -> bool {
        self.lock().mark_deleted(channel_id, message_id, deleted_at)
    }

    pub fn latest(&self, channel_id: u64) -> Option<DeletedMessage> {
        self.lock().deleted.get(&channel_id).cloned()
    }

    pub fn recent_len(&self) -> usize {
        self.lock().recent.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn message(message_id: u64, channel_id: u64, content: &str) -> RecentMessage {
        RecentMessage {
            message_id,
            channel_id,
            author_id: 7,
            author_name: "someone".to_owned(),
            author_avatar_url: None,
            content: content.to_owned(),
            created_at: 1_000,
        }
    }

    #[test]
    fn empty_channel_has_nothing() {
        let cache = SnipeCache::default();
        assert_eq!(cache.latest(1), None);
    }

    #[test]
    fn deletion_fills_channel_slot() {
        let cache = SnipeCache::default();
        cache.record(message(10, 1, "hello"));

        assert!(cache.mark_deleted(1, 10, 2_000));
        let latest = cache.latest(1).unwrap();
        assert_eq!(latest.content, "hello");
        assert_eq!(latest.created_at, 1_000);
        assert_eq!(latest.deleted_at, 2_000);
        assert_eq!(cache.recent_len(), 0);
    }

    #[test]
    fn newer_deletion_overwrites() {
        let cache = SnipeCache::default();
        cache.record(message(10, 1, "first"));
        cache.record(message(11, 1, "second"));

        cache.mark_deleted(1, 10, 2_000);
        cache.mark_deleted(1, 11, 2_001);

        assert_eq!(cache.latest(1).unwrap().content, "second");
    }

    #[test]
    fn channels_do_not_share_slots() {
        let cache = SnipeCache::default();
        cache.record(message(10, 1, "one"));
        cache.mark_deleted(1, 10, 2_000);

        assert!(cache.latest(2).is_none());
    }

    #[test]
    fn unknown_message_is_ignored() {
        let cache = SnipeCache::default();
        cache.record(message(10, 1, "kept"));
        cache.mark_deleted(1, 10, 2_000);

        assert!(!cache.mark_deleted(1, 99, 3_000));
        assert_eq!(cache.latest(1).unwrap().content, "kept");
    }

    #[test]
    fn oldest_recent_messages_are_evicted() {
        let cache = SnipeCache::with_capacity(2);
        cache.record(message(1, 1, "a"));
        cache.record(message(2, 1, "b"));
        cache.record(message(3, 1, "c"));

        assert_eq!(cache.recent_len(), 2);
        assert!(!cache.mark_deleted(1, 1, 10));
        assert!(cache.mark_deleted(1, 3, 10));
    }

    #[test]
    fn bulk_deletion_keeps_last() {
        let cache = SnipeCache::default();
        for (id, text) in [(1, "a"), (2, "b"), (3, "c")] {
            cache.record(message(id, 5, text));
        }

        for id in [1, 2, 3] {
            cache.mark_deleted(5, id, 50);
        }

        assert_eq!(cache.latest(5).unwrap().content, "c");
    }
}
