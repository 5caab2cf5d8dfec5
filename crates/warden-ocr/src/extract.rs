//! Absorbing adapter around an [`OcrEngine`].
//!
//! The triage engine must never distinguish "extraction failed" from
//! "no promotional text found" — both come back as an empty string, and
//! the message still goes through the text-only classification path.

use std::sync::Arc;
use std::time::Duration;

use tracing::warn;

use crate::engine::OcrEngine;

pub struct TextExtractor {
    engine: Arc<dyn OcrEngine>,
    language: String,
    timeout: Duration,
}

impl TextExtractor {
    pub fn new(engine: Arc<dyn OcrEngine>, language: String, timeout: Duration) -> Self {
        Self {
            engine,
            language,
            timeout,
        }
    }

    /// Extract text from an attached media payload.
    ///
    /// Non-image MIME types are skipped without touching the engine.
    /// Decode errors, engine failures, and per-call timeouts all collapse
    /// to an empty string.
    pub async fn extract_text(&self, media: &[u8], mime: &str) -> String {
        if !mime.starts_with("image/") {
            return String::new();
        }

        match tokio::time::timeout(self.timeout, self.engine.recognize(media, &self.language)).await
        {
            Ok(Ok(text)) => text.trim().to_string(),
            Ok(Err(e)) => {
                warn!(engine = self.engine.name(), error = %e, "OCR failed, treating image as text-free");
                String::new()
            }
            Err(_) => {
                warn!(
                    engine = self.engine.name(),
                    timeout_ms = self.timeout.as_millis() as u64,
                    "OCR timed out, treating image as text-free"
                );
                String::new()
            }
        }
    }
}
