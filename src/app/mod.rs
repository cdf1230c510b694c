mod ui;

use crate::config::AppConfig;
use crate::store::{DocumentStore, HttpDocumentStore};
use crate::sync::DocumentSession;
use eframe::{egui, App};
use std::sync::Arc;
use std::time::Duration;
use tokio::runtime::Runtime;
use tracing::info;

/// How often the UI wakes up to collect completions while calls are running.
const POLL_INTERVAL: Duration = Duration::from_millis(100);

pub struct DocumentUploader {
    session: DocumentSession,
    base_url: String,
    // Keeps the worker threads alive for as long as the window is open.
    _runtime: Runtime,
}

impl DocumentUploader {
    pub fn new(config: &AppConfig) -> anyhow::Result<Self> {
        info!("Initializing document uploader for {}", config.base_url);

        let runtime = Runtime::new()?;
        let store: Arc<dyn DocumentStore> = Arc::new(HttpDocumentStore::from_config(config)?);
        let mut session = DocumentSession::new(store, runtime.handle().clone());
        session.load();

        Ok(Self {
            session,
            base_url: config.base_url.clone(),
            _runtime: runtime,
        })
    }

    pub fn update_state(&mut self, ctx: &egui::Context) {
        if self.session.poll_events() > 0 {
            ctx.request_repaint();
        }
        if self.session.has_in_flight() {
            ctx.request_repaint_after(POLL_INTERVAL);
        }
    }
}

impl App for DocumentUploader {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.update_state(ctx);
        self.render(ctx);
    }
}
