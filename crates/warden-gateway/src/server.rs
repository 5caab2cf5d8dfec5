//! Inbound-event webhook server.
//!
//! The bridge POSTs one JSON event per delivered message to `/events`;
//! each event is handed to the triage engine on its own task so a slow
//! collaborator never blocks the HTTP response or later events.

use std::collections::HashSet;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use tower_http::trace::TraceLayer;
use tracing::info;

use warden_core::config::PlatformConfig;
use warden_core::types::{InboundMessage, MessageRef};
use warden_triage::TriageEngine;

#[derive(Clone)]
struct AppState {
    engine: Arc<TriageEngine>,
    webhook_token: Option<String>,
}

/// One inbound message event as posted by the bridge.
#[derive(Debug, Deserialize)]
pub struct InboundEvent {
    pub id: String,
    pub conversation_id: String,
    pub sender_id: String,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub mentioned_ids: Vec<String>,
    #[serde(default)]
    pub has_media: bool,
    #[serde(default)]
    pub media_mime_type: Option<String>,
}

impl InboundEvent {
    pub fn into_message(self) -> InboundMessage {
        InboundMessage {
            message_ref: MessageRef(self.id),
            conversation_id: self.conversation_id,
            sender_id: self.sender_id,
            text: self.text,
            mentioned_ids: self.mentioned_ids.into_iter().collect::<HashSet<_>>(),
            has_media: self.has_media,
            media_mime_type: self.media_mime_type,
        }
    }
}

/// Serve the webhook until the process exits.
pub async fn run(engine: Arc<TriageEngine>, config: &PlatformConfig) -> anyhow::Result<()> {
    let state = AppState {
        engine,
        webhook_token: config.webhook_token.clone(),
    };

    let app = Router::new()
        .route("/events", post(receive_event))
        .route("/healthz", get(healthz))
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    let addr: SocketAddr = format!("{}:{}", config.bind, config.port).parse()?;
    info!(%addr, "warden gateway listening");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

async fn receive_event(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(event): Json<InboundEvent>,
) -> StatusCode {
    if let Some(expected) = &state.webhook_token {
        let provided = headers
            .get("x-warden-token")
            .and_then(|v| v.to_str().ok())
            .unwrap_or("");
        if provided != expected {
            return StatusCode::UNAUTHORIZED;
        }
    }

    let engine = Arc::clone(&state.engine);
    tokio::spawn(async move {
        engine.handle(event.into_message()).await;
    });

    StatusCode::ACCEPTED
}

async fn healthz() -> &'static str {
    "ok"
}
