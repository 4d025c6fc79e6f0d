//! TrendVision demo binary.
//!
//! Discovers the current trend board and, given a product index argument,
//! generates that product's ad and writes the finished video into the
//! working directory under its sanitized download name.

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::{error, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use tvision_engine::{App, KeyHost};
use tvision_models::StatusEvent;

/// Key host backed by the environment: a key counts as selected when
/// `GEMINI_API_KEY` is present.
struct EnvKeyHost;

#[async_trait]
impl KeyHost for EnvKeyHost {
    async fn has_selected_key(&self) -> bool {
        std::env::var("GEMINI_API_KEY").is_ok()
    }

    async fn open_select_key(&self) {
        info!("Set GEMINI_API_KEY to a paid-tier Google Cloud key and restart");
    }
}

#[tokio::main]
async fn main() {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize tracing with colored output for dev, JSON for production
    let use_json = std::env::var("LOG_FORMAT")
        .map(|v| v.to_lowercase() == "json")
        .unwrap_or(false);

    let env_filter = EnvFilter::from_default_env()
        .add_directive("tvision=info".parse().unwrap())
        .add_directive("trendvision=info".parse().unwrap());

    if use_json {
        tracing_subscriber::registry()
            .with(fmt::layer().json())
            .with(env_filter)
            .init();
    } else {
        tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_ansi(true)
                    .with_target(true)
                    .with_file(false)
                    .with_line_number(false),
            )
            .with(env_filter)
            .init();
    }

    info!("Starting trendvision");

    let app = match App::from_env(Arc::new(EnvKeyHost)) {
        Ok(app) => app,
        Err(e) => {
            error!("Failed to initialize: {}", e);
            std::process::exit(1);
        }
    };

    app.check_key().await;
    info!("Credential state: {}", app.keys().state().as_str());

    if !app.discover().await {
        if let Some(message) = app.discovery_error() {
            error!("{}", message);
        }
        std::process::exit(1);
    }

    let products = app.products();
    info!("Trend board: {} products", products.len());
    for product in &products {
        info!("  [{}] {} - {}", product.id, product.name, product.trend_reason);
    }

    // Without an index argument this is a discovery-only run
    let Some(index) = std::env::args().nth(1).and_then(|s| s.parse::<usize>().ok()) else {
        return;
    };
    let Some(product) = products.get(index).cloned() else {
        error!("No product at index {}", index);
        std::process::exit(1);
    };

    let tracker = Arc::clone(app.tracker());

    // Stream status events to the log while the job runs
    let mut events = tracker.subscribe();
    let event_task = tokio::spawn(async move {
        while let Ok(event) = events.recv().await {
            match event {
                StatusEvent::Progress { product_id, value } => {
                    info!("{}: {}%", product_id, value);
                }
                StatusEvent::Completed {
                    product_id,
                    file_name,
                } => {
                    info!("{}: completed -> {}", product_id, file_name);
                    break;
                }
                StatusEvent::Error {
                    product_id,
                    message,
                    ..
                } => {
                    error!("{}: {}", product_id, message);
                    break;
                }
            }
        }
    });

    info!("Generating ad for {}", product.name);
    tracker.generate(&product).await;
    event_task.await.ok();

    match tracker.save_video(&product.id, Path::new(".")).await {
        Ok(path) => info!("Saved {}", path.display()),
        Err(e) => {
            error!("Failed to save video: {}", e);
            std::process::exit(1);
        }
    }
}
