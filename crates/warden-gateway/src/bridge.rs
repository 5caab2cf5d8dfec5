//! HTTP client for the messaging-platform bridge.
//!
//! The bridge owns the platform session and exposes a small REST surface:
//!
//! | operation            | request |
//! |----------------------|---------|
//! | send reply           | `POST /conversations/{id}/messages` with `{"text": ...}` |
//! | forward              | `POST /messages/{id}/forward` with `{"destination": ...}` |
//! | delete for everyone  | `DELETE /messages/{id}?scope=everyone` |
//! | download media       | `GET /messages/{id}/media` (raw bytes) |

use async_trait::async_trait;

use warden_core::config::PlatformConfig;
use warden_core::platform::{ChatPlatform, PlatformError};
use warden_core::types::MessageRef;

pub struct BridgeClient {
    client: reqwest::Client,
    base_url: String,
    api_token: Option<String>,
}

impl BridgeClient {
    pub fn new(config: &PlatformConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: config.base_url.clone(),
            api_token: config.api_token.clone(),
        }
    }

    fn request(&self, method: reqwest::Method, path: &str) -> reqwest::RequestBuilder {
        let mut req = self.client.request(method, format!("{}{path}", self.base_url));
        if let Some(token) = &self.api_token {
            req = req.bearer_auth(token);
        }
        req
    }
}

/// Map a response into `Ok` on success or a bridge API error.
async fn check(resp: reqwest::Response) -> Result<reqwest::Response, PlatformError> {
    let status = resp.status().as_u16();
    if resp.status().is_success() {
        return Ok(resp);
    }
    let message = resp.text().await.unwrap_or_default();
    Err(PlatformError::Api { status, message })
}

fn transport(e: reqwest::Error) -> PlatformError {
    PlatformError::Transport(e.to_string())
}

#[async_trait]
impl ChatPlatform for BridgeClient {
    async fn send_reply(&self, conversation_id: &str, text: &str) -> Result<(), PlatformError> {
        let resp = self
            .request(
                reqwest::Method::POST,
                &format!("/conversations/{conversation_id}/messages"),
            )
            .json(&serde_json::json!({ "text": text }))
            .send()
            .await
            .map_err(transport)?;
        check(resp).await?;
        Ok(())
    }

    async fn forward(&self, message: &MessageRef, destination: &str) -> Result<(), PlatformError> {
        let resp = self
            .request(
                reqwest::Method::POST,
                &format!("/messages/{}/forward", message.as_str()),
            )
            .json(&serde_json::json!({ "destination": destination }))
            .send()
            .await
            .map_err(transport)?;
        check(resp).await?;
        Ok(())
    }

    async fn delete_for_everyone(&self, message: &MessageRef) -> Result<(), PlatformError> {
        let resp = self
            .request(
                reqwest::Method::DELETE,
                &format!("/messages/{}", message.as_str()),
            )
            .query(&[("scope", "everyone")])
            .send()
            .await
            .map_err(transport)?;
        check(resp).await?;
        Ok(())
    }

    async fn download_media(&self, message: &MessageRef) -> Result<Vec<u8>, PlatformError> {
        let resp = self
            .request(
                reqwest::Method::GET,
                &format!("/messages/{}/media", message.as_str()),
            )
            .send()
            .await
            .map_err(transport)?;
        let resp = check(resp).await?;
        let bytes = resp.bytes().await.map_err(transport)?;
        Ok(bytes.to_vec())
    }
}
