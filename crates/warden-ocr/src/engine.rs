//! Text-recognition engine contract and the HTTP-backed implementation.

use async_trait::async_trait;
use base64::Engine as _;
use serde::Deserialize;
use tracing::debug;

use crate::error::OcrError;

/// Recognizes text embedded in an image. Implemented over HTTP in
/// production and by in-process fakes in tests.
#[async_trait]
pub trait OcrEngine: Send + Sync {
    /// Engine name for logging.
    fn name(&self) -> &str;

    /// Extract text from `image` bytes. May return an empty string when
    /// the image contains no recognizable text.
    async fn recognize(&self, image: &[u8], language: &str) -> Result<String, OcrError>;
}

/// OCR engine client posting base64 image payloads to a recognition
/// service (`POST {base_url}/recognize`).
pub struct HttpOcrEngine {
    client: reqwest::Client,
    base_url: String,
}

impl HttpOcrEngine {
    pub fn new(base_url: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url,
        }
    }
}

#[async_trait]
impl OcrEngine for HttpOcrEngine {
    fn name(&self) -> &str {
        "http-ocr"
    }

    async fn recognize(&self, image: &[u8], language: &str) -> Result<String, OcrError> {
        let body = serde_json::json!({
            "image": base64::engine::general_purpose::STANDARD.encode(image),
            "language": language,
        });
        let url = format!("{}/recognize", self.base_url);

        debug!(bytes = image.len(), language, "sending image to OCR service");

        let resp = self
            .client
            .post(&url)
            .header("content-type", "application/json")
            .json(&body)
            .send()
            .await?;

        let status = resp.status().as_u16();
        if !resp.status().is_success() {
            let message = resp.text().await.unwrap_or_default();
            return Err(OcrError::Api { status, message });
        }

        let parsed: RecognizeResponse = resp
            .json()
            .await
            .map_err(|e| OcrError::Parse(e.to_string()))?;

        Ok(parsed.text)
    }
}

#[derive(Deserialize)]
struct RecognizeResponse {
    text: String,
}
