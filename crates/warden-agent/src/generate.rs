//! Reply generation with a guaranteed fallback.
//!
//! The triage engine never sees this adapter fail: every failure mode —
//! transport error, bad status, empty payload, timeout — collapses to
//! [`FALLBACK_REPLY`].

use std::sync::Arc;
use std::time::Duration;

use tracing::warn;

use warden_core::types::Turn;

use crate::client::CompletionClient;

/// Sent (and recorded as the assistant turn) whenever the completion
/// service cannot produce a usable reply.
pub const FALLBACK_REPLY: &str = "🤖 Sorry, I couldn’t process that right now.";

pub struct ReplyGenerator {
    client: Arc<dyn CompletionClient>,
    timeout: Duration,
}

impl ReplyGenerator {
    pub fn new(client: Arc<dyn CompletionClient>, timeout: Duration) -> Self {
        Self { client, timeout }
    }

    /// Generate a reply to `utterance` given the conversation `history`.
    ///
    /// The outbound request is `history` plus a trailing user turn for
    /// `utterance`. Always returns a non-empty string; the result is
    /// trimmed.
    pub async fn generate_reply(&self, history: &[Turn], utterance: &str) -> String {
        let mut messages: Vec<Turn> = history.to_vec();
        messages.push(Turn::user(utterance));

        match tokio::time::timeout(self.timeout, self.client.complete(&messages)).await {
            Ok(Ok(text)) => {
                let trimmed = text.trim();
                if trimmed.is_empty() {
                    warn!(client = self.client.name(), "empty completion, using fallback reply");
                    FALLBACK_REPLY.to_string()
                } else {
                    trimmed.to_string()
                }
            }
            Ok(Err(e)) => {
                warn!(client = self.client.name(), error = %e, "completion failed, using fallback reply");
                FALLBACK_REPLY.to_string()
            }
            Err(_) => {
                warn!(
                    client = self.client.name(),
                    timeout_ms = self.timeout.as_millis() as u64,
                    "completion timed out, using fallback reply"
                );
                FALLBACK_REPLY.to_string()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::*;
    use crate::client::CompletionError;
    use warden_core::types::Role;

    struct FakeClient {
        reply: Option<String>,
        seen: Mutex<Vec<Vec<Turn>>>,
    }

    impl FakeClient {
        fn replying(text: &str) -> Self {
            Self {
                reply: Some(text.to_string()),
                seen: Mutex::new(Vec::new()),
            }
        }

        fn failing() -> Self {
            Self {
                reply: None,
                seen: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl CompletionClient for FakeClient {
        fn name(&self) -> &str {
            "fake"
        }

        async fn complete(&self, messages: &[Turn]) -> Result<String, CompletionError> {
            self.seen.lock().unwrap().push(messages.to_vec());
            match &self.reply {
                Some(text) => Ok(text.clone()),
                None => Err(CompletionError::Api {
                    status: 500,
                    message: "boom".to_string(),
                }),
            }
        }
    }

    fn generator(client: Arc<FakeClient>) -> ReplyGenerator {
        ReplyGenerator::new(client, Duration::from_secs(5))
    }

    #[tokio::test]
    async fn reply_is_trimmed() {
        let client = Arc::new(FakeClient::replying("  hello there \n"));
        let reply = generator(client).generate_reply(&[], "hi").await;
        assert_eq!(reply, "hello there");
    }

    #[tokio::test]
    async fn client_failure_yields_fallback() {
        let client = Arc::new(FakeClient::failing());
        let reply = generator(client).generate_reply(&[], "hi").await;
        assert_eq!(reply, FALLBACK_REPLY);
    }

    #[tokio::test]
    async fn blank_completion_yields_fallback() {
        let client = Arc::new(FakeClient::replying("   "));
        let reply = generator(client).generate_reply(&[], "hi").await;
        assert_eq!(reply, FALLBACK_REPLY);
    }

    #[tokio::test]
    async fn outbound_request_appends_the_new_utterance() {
        let client = Arc::new(FakeClient::replying("ok"));
        let history = vec![Turn::user("earlier"), Turn::assistant("noted")];
        generator(Arc::clone(&client))
            .generate_reply(&history, "and now?")
            .await;

        let seen = client.seen.lock().unwrap();
        let sent = &seen[0];
        assert_eq!(sent.len(), 3);
        assert_eq!(sent[2].role, Role::User);
        assert_eq!(sent[2].content, "and now?");
    }
}
