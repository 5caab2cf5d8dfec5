//! Per-conversation sliding-window memory.
//!
//! Histories are process-local and append-only. A conversation that sits
//! idle longer than the context window collapses to an empty history the
//! next time a turn arrives — same id, fresh start.

use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;
use tracing::debug;

use warden_core::types::Turn;

/// Injectable, thread-safe store of conversation histories keyed by
/// conversation id. The caller supplies `now` on every append so the
/// window rule is deterministic and testable.
pub struct ConversationStore {
    window: Duration,
    conversations: DashMap<String, Conversation>,
}

#[derive(Debug)]
struct Conversation {
    last_activity: DateTime<Utc>,
    history: Vec<Turn>,
}

impl ConversationStore {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            conversations: DashMap::new(),
        }
    }

    /// Record a turn.
    ///
    /// If the conversation is unknown it is created; if the gap since its
    /// last activity exceeds the context window, the prior history is
    /// discarded before the turn is appended. `last_activity` is set to
    /// `now` either way.
    pub fn append(&self, conversation_id: &str, turn: Turn, now: DateTime<Utc>) {
        let mut conv = self
            .conversations
            .entry(conversation_id.to_string())
            .or_insert_with(|| Conversation {
                last_activity: now,
                history: Vec::new(),
            });

        if now.signed_duration_since(conv.last_activity) > self.window {
            debug!(
                conversation = conversation_id,
                dropped = conv.history.len(),
                "context window elapsed, starting fresh history"
            );
            conv.history.clear();
        }

        conv.last_activity = now;
        conv.history.push(turn);
    }

    /// Owned snapshot of a conversation's current history, oldest first.
    /// Unknown conversations yield an empty vec.
    pub fn history(&self, conversation_id: &str) -> Vec<Turn> {
        self.conversations
            .get(conversation_id)
            .map(|c| c.history.clone())
            .unwrap_or_default()
    }

    /// Drop conversations idle longer than `retention`. Returns how many
    /// were removed. Keeps the id set bounded by active conversations
    /// rather than every id ever addressed.
    pub fn sweep_idle(&self, now: DateTime<Utc>, retention: Duration) -> usize {
        let before = self.conversations.len();
        self.conversations
            .retain(|_, conv| now.signed_duration_since(conv.last_activity) <= retention);
        before - self.conversations.len()
    }

    pub fn len(&self) -> usize {
        self.conversations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.conversations.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use warden_core::types::{Role, Turn};

    fn at(ms: i64) -> DateTime<Utc> {
        DateTime::<Utc>::from_timestamp_millis(ms).unwrap()
    }

    fn store() -> ConversationStore {
        // 2-minute window, matching the default config.
        ConversationStore::new(Duration::seconds(120))
    }

    #[test]
    fn history_of_unknown_conversation_is_empty() {
        assert!(store().history("nope").is_empty());
    }

    #[test]
    fn turns_keep_insertion_order() {
        let s = store();
        s.append("g1", Turn::user("hi"), at(0));
        s.append("g1", Turn::assistant("hello!"), at(0));

        let history = s.history("g1");
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].role, Role::User);
        assert_eq!(history[0].content, "hi");
        assert_eq!(history[1].role, Role::Assistant);
    }

    #[test]
    fn append_inside_window_preserves_history() {
        let s = store();
        s.append("g1", Turn::user("first"), at(0));
        // 1ms before the window elapses.
        s.append("g1", Turn::user("second"), at(120_000 - 1));
        assert_eq!(s.history("g1").len(), 2);
    }

    #[test]
    fn append_past_window_resets_history() {
        let s = store();
        s.append("g1", Turn::user("first"), at(0));
        s.append("g1", Turn::user("second"), at(120_000 + 1));

        let history = s.history("g1");
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].content, "second");
    }

    #[test]
    fn append_at_exact_window_boundary_preserves_history() {
        // Reset triggers strictly past the window, not at it.
        let s = store();
        s.append("g1", Turn::user("first"), at(0));
        s.append("g1", Turn::user("second"), at(120_000));
        assert_eq!(s.history("g1").len(), 2);
    }

    #[test]
    fn conversations_are_independent() {
        let s = store();
        s.append("g1", Turn::user("one"), at(0));
        s.append("g2", Turn::user("two"), at(0));
        assert_eq!(s.history("g1").len(), 1);
        assert_eq!(s.history("g2").len(), 1);
        assert_eq!(s.len(), 2);
    }

    #[test]
    fn history_is_a_snapshot() {
        let s = store();
        s.append("g1", Turn::user("hi"), at(0));
        let mut snapshot = s.history("g1");
        snapshot.push(Turn::assistant("injected"));
        assert_eq!(s.history("g1").len(), 1);
    }

    #[test]
    fn three_step_window_scenario() {
        // t=0: addressed; t=60s: still in window; t=181s: 121s gap, reset.
        let s = store();
        s.append("g1", Turn::user("hi"), at(0));
        s.append("g1", Turn::assistant("hello"), at(0));

        s.append("g1", Turn::user("and you?"), at(60_000));
        s.append("g1", Turn::assistant("doing well"), at(60_000));
        assert_eq!(s.history("g1").len(), 4);

        s.append("g1", Turn::user("still there?"), at(181_000));
        let history = s.history("g1");
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].content, "still there?");
    }

    #[test]
    fn sweep_removes_only_idle_conversations() {
        let s = store();
        s.append("old", Turn::user("x"), at(0));
        s.append("fresh", Turn::user("y"), at(3_500_000));

        let removed = s.sweep_idle(at(3_700_000), Duration::seconds(3600));
        assert_eq!(removed, 1);
        assert_eq!(s.len(), 1);
        assert!(s.history("old").is_empty());
        assert_eq!(s.history("fresh").len(), 1);
    }
}
