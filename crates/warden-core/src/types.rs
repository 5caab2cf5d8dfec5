use std::collections::HashSet;

use serde::{Deserialize, Serialize};

/// Who produced a recorded conversation turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// Single utterance in a conversation history. Append-only — a turn is
/// never mutated or reordered once recorded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    pub role: Role,
    pub content: String,
}

impl Turn {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// Opaque platform handle for a delivered message. Used to forward,
/// delete, and download media for that message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageRef(pub String);

impl MessageRef {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Inbound message event as delivered by the platform bridge.
#[derive(Debug, Clone)]
pub struct InboundMessage {
    pub message_ref: MessageRef,
    /// Stable id of the conversation (group) the message arrived in.
    pub conversation_id: String,
    pub sender_id: String,
    pub text: String,
    /// Identities explicitly mentioned by the message.
    pub mentioned_ids: HashSet<String>,
    pub has_media: bool,
    pub media_mime_type: Option<String>,
}
