//! Per-message triage: converse, moderate, or ignore.
//!
//! The engine is stateless across messages except through the
//! [`ConversationStore`]. Messages from different conversations are
//! handled concurrently; addressed messages within one conversation are
//! serialized through a per-id lane mutex so two near-simultaneous
//! mentions can't interleave their history appends.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use dashmap::DashMap;
use tracing::{debug, error, info, warn};

use warden_agent::ReplyGenerator;
use warden_core::platform::ChatPlatform;
use warden_core::types::{InboundMessage, Turn};
use warden_core::Result;
use warden_memory::ConversationStore;
use warden_ocr::TextExtractor;

use crate::actions;

/// Terminal outcome of triaging one message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    /// Off-target, unremarkable, or dropped after an internal error.
    Ignored,
    /// Addressed message: reply generated and sent.
    Replied,
    /// Promotional message: forward-then-delete attempted.
    Removed,
}

pub struct TriageEngine {
    platform: Arc<dyn ChatPlatform>,
    store: Arc<ConversationStore>,
    generator: ReplyGenerator,
    extractor: Option<TextExtractor>,
    target_conversation: String,
    forward_conversation: String,
    own_identity: String,
    io_timeout: Duration,
    /// Per-conversation serialization for the converse path.
    lanes: DashMap<String, Arc<tokio::sync::Mutex<()>>>,
}

impl TriageEngine {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        platform: Arc<dyn ChatPlatform>,
        store: Arc<ConversationStore>,
        generator: ReplyGenerator,
        extractor: Option<TextExtractor>,
        target_conversation: String,
        forward_conversation: String,
        own_identity: String,
        io_timeout: Duration,
    ) -> Self {
        Self {
            platform,
            store,
            generator,
            extractor,
            target_conversation,
            forward_conversation,
            own_identity,
            io_timeout,
            lanes: DashMap::new(),
        }
    }

    /// Handle one inbound message to completion.
    ///
    /// Top-level failure boundary: whatever goes wrong while computing
    /// this message's action is logged and collapsed to `Ignored` — it
    /// never escapes to the caller or stalls later messages.
    pub async fn handle(&self, msg: InboundMessage) -> Disposition {
        let conversation = msg.conversation_id.clone();
        match self.triage(msg).await {
            Ok(disposition) => {
                debug!(conversation = %conversation, ?disposition, "message triaged");
                disposition
            }
            Err(e) => {
                error!(conversation = %conversation, error = %e, "triage failed, dropping message");
                Disposition::Ignored
            }
        }
    }

    async fn triage(&self, msg: InboundMessage) -> Result<Disposition> {
        // The only unconditional filter: everything outside the monitored
        // conversation is invisible to the bot.
        if msg.conversation_id != self.target_conversation {
            return Ok(Disposition::Ignored);
        }

        // Direct address wins over everything, including promotional
        // keywords in the same message.
        if msg.mentioned_ids.contains(&self.own_identity) {
            return self.converse(&msg).await;
        }

        if self.is_promotional(&msg).await {
            info!(
                conversation = %msg.conversation_id,
                sender = %msg.sender_id,
                "promotional message detected"
            );
            let outcome = actions::forward_then_delete(
                self.platform.as_ref(),
                &msg.message_ref,
                &self.forward_conversation,
                self.io_timeout,
            )
            .await;
            debug!(?outcome, "removal finished");
            return Ok(Disposition::Removed);
        }

        Ok(Disposition::Ignored)
    }

    /// Converse path: record the user turn, generate a reply from the
    /// updated history, record the assistant turn, send the reply.
    ///
    /// The lane lock is held across both appends and the generation so a
    /// concurrent mention in the same conversation can't observe a
    /// history missing this message's user turn, and the two assistant
    /// turns land in causal order. Sending happens after the lock drops.
    async fn converse(&self, msg: &InboundMessage) -> Result<Disposition> {
        let reply = {
            let lane = self.lane(&msg.conversation_id);
            let _guard = lane.lock().await;

            let now = Utc::now();
            self.store
                .append(&msg.conversation_id, Turn::user(&msg.text), now);
            let history = self.store.history(&msg.conversation_id);

            let reply = self.generator.generate_reply(&history, &msg.text).await;

            self.store
                .append(&msg.conversation_id, Turn::assistant(&reply), now);
            reply
        };

        match tokio::time::timeout(
            self.io_timeout,
            self.platform.send_reply(&msg.conversation_id, &reply),
        )
        .await
        {
            Ok(Ok(())) => {}
            Ok(Err(e)) => {
                warn!(conversation = %msg.conversation_id, error = %e, "reply send failed")
            }
            Err(_) => warn!(conversation = %msg.conversation_id, "reply send timed out"),
        }

        Ok(Disposition::Replied)
    }

    /// Promotional check: message text first (cheap, synchronous); the
    /// image path only runs when the text alone didn't decide and the
    /// message carries image media.
    async fn is_promotional(&self, msg: &InboundMessage) -> bool {
        if warden_classify::is_promotional(&msg.text) {
            return true;
        }

        if !msg.has_media {
            return false;
        }
        let Some(mime) = msg.media_mime_type.as_deref() else {
            return false;
        };
        if !mime.starts_with("image/") {
            return false;
        }
        let Some(extractor) = &self.extractor else {
            debug!("no OCR engine configured, skipping image check");
            return false;
        };

        let media = match tokio::time::timeout(
            self.io_timeout,
            self.platform.download_media(&msg.message_ref),
        )
        .await
        {
            Ok(Ok(bytes)) => bytes,
            Ok(Err(e)) => {
                warn!(message = msg.message_ref.as_str(), error = %e, "media download failed, skipping image check");
                return false;
            }
            Err(_) => {
                warn!(
                    message = msg.message_ref.as_str(),
                    "media download timed out, skipping image check"
                );
                return false;
            }
        };

        let text = extractor.extract_text(&media, mime).await;
        warden_classify::is_promotional(&text)
    }

    fn lane(&self, conversation_id: &str) -> Arc<tokio::sync::Mutex<()>> {
        self.lanes
            .entry(conversation_id.to_string())
            .or_default()
            .clone()
    }
}
