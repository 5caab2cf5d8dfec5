//! Contract the triage core needs from the messaging platform.
//!
//! The session/authentication layer behind this trait is not part of the
//! core; the gateway ships an HTTP bridge implementation and tests use
//! in-process fakes.

use async_trait::async_trait;

use crate::types::MessageRef;

/// Errors produced by a platform client.
///
/// Kept free of transport-library types so the core crates don't pull in
/// an HTTP stack; bridge implementations map their errors into these.
#[derive(Debug, thiserror::Error)]
pub enum PlatformError {
    #[error("transport error: {0}")]
    Transport(String),

    #[error("bridge error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("request timed out after {ms}ms")]
    Timeout { ms: u64 },
}

/// Outbound operations against the messaging platform.
#[async_trait]
pub trait ChatPlatform: Send + Sync {
    /// Send a text reply into a conversation.
    async fn send_reply(&self, conversation_id: &str, text: &str) -> Result<(), PlatformError>;

    /// Forward a message to another conversation.
    async fn forward(&self, message: &MessageRef, destination: &str) -> Result<(), PlatformError>;

    /// Delete a message for all participants, not just locally.
    async fn delete_for_everyone(&self, message: &MessageRef) -> Result<(), PlatformError>;

    /// Download the raw bytes of a message's media attachment.
    async fn download_media(&self, message: &MessageRef) -> Result<Vec<u8>, PlatformError>;
}
