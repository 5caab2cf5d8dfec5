pub mod client;
pub mod generate;

pub use client::{CompletionClient, CompletionError, OpenRouterClient};
pub use generate::{ReplyGenerator, FALLBACK_REPLY};
