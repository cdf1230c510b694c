//! Desktop client for keeping a set of uploaded documents in sync with a
//! remote document store.

mod app;
mod config;
mod store;
mod sync;
mod upload;
mod utils;

use app::DocumentUploader;
use config::AppConfig;
use eframe::CreationContext;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> anyhow::Result<()> {
    let loaded = AppConfig::load();
    let level = loaded
        .as_ref()
        .map(AppConfig::log_level_filter)
        .unwrap_or(LevelFilter::INFO);

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(level)
        .init();

    let config = loaded.unwrap_or_else(|e| {
        tracing::warn!("{:#}, using defaults", e);
        let mut fallback = AppConfig::default();
        fallback.apply_env_override(std::env::var(config::BASE_URL_ENV).ok());
        fallback
    });

    tracing::info!("Starting document uploader");
    let uploader = DocumentUploader::new(&config)?;

    let options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default()
            .with_inner_size([640.0, 520.0])
            .with_min_inner_size([420.0, 360.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Document Uploader",
        options,
        Box::new(move |_cc: &CreationContext| Box::new(uploader) as Box<dyn eframe::App>),
    )
    .map_err(|e| anyhow::anyhow!("{e}"))
}
