pub mod config;
pub mod error;
pub mod platform;
pub mod types;

pub use error::{Result, WardenError};
pub use platform::{ChatPlatform, PlatformError};
pub use types::{InboundMessage, MessageRef, Role, Turn};
