use std::sync::Arc;
use std::time::Duration;

use tracing::info;

use warden_agent::{OpenRouterClient, ReplyGenerator};
use warden_core::config::WardenConfig;
use warden_core::platform::ChatPlatform;
use warden_memory::ConversationStore;
use warden_ocr::{HttpOcrEngine, TextExtractor};
use warden_triage::TriageEngine;

mod bridge;
mod server;

/// How often idle conversations are swept out of the memory store.
const SWEEP_INTERVAL_SECS: u64 = 60;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warden_gateway=info,warden_triage=info,tower_http=warn".into()),
        )
        .init();

    // load config: explicit WARDEN_CONFIG path > ./warden.toml, then env overrides
    let config_path = std::env::var("WARDEN_CONFIG").ok();
    let config = WardenConfig::load(config_path.as_deref())?;

    info!(
        target = %config.platform.target_conversation,
        audit = %config.platform.forward_conversation,
        model = %config.completion.model,
        "warden starting"
    );

    let store = Arc::new(ConversationStore::new(chrono::Duration::seconds(
        config.memory.context_window_secs as i64,
    )));

    let platform: Arc<dyn ChatPlatform> = Arc::new(bridge::BridgeClient::new(&config.platform));

    let completion = OpenRouterClient::new(
        config.completion.api_key.clone(),
        Some(config.completion.base_url.clone()),
        config.completion.model.clone(),
        config.completion.max_tokens,
    );
    let generator = ReplyGenerator::new(
        Arc::new(completion),
        Duration::from_secs(config.completion.timeout_secs),
    );

    let extractor = config.ocr.as_ref().map(|ocr| {
        TextExtractor::new(
            Arc::new(HttpOcrEngine::new(ocr.base_url.clone())),
            ocr.language.clone(),
            Duration::from_secs(ocr.timeout_secs),
        )
    });
    if extractor.is_none() {
        info!("no OCR service configured, image promotion checks disabled");
    }

    let engine = Arc::new(TriageEngine::new(
        platform,
        Arc::clone(&store),
        generator,
        extractor,
        config.platform.target_conversation.clone(),
        config.platform.forward_conversation.clone(),
        config.platform.own_identity.clone(),
        Duration::from_secs(config.platform.request_timeout_secs),
    ));

    // periodic sweep of conversations idle past the retention window
    let sweep_store = Arc::clone(&store);
    let retention = chrono::Duration::seconds(config.memory.sweep_retention_secs as i64);
    tokio::spawn(async move {
        let mut tick = tokio::time::interval(Duration::from_secs(SWEEP_INTERVAL_SECS));
        loop {
            tick.tick().await;
            let removed = sweep_store.sweep_idle(chrono::Utc::now(), retention);
            if removed > 0 {
                info!(removed, "swept idle conversations");
            }
        }
    });

    server::run(engine, &config.platform).await
}
