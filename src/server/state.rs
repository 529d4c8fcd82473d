//! Server state and configuration.

use std::path::PathBuf;
use tokio::sync::RwLock;

use crate::export::{CardRasterizer, ExportCoordinator};
use crate::i18n::{Catalog, Locale};
use crate::store::{ConfigStore, FileBackend};

/// Server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Path of the JSON file backing the configuration store.
    pub data_path: PathBuf,
    /// Address to listen on (e.g., "0.0.0.0:8080")
    pub listen_addr: String,
    /// Locale for placeholder text and date formatting.
    pub locale: Locale,
}

/// Application state shared across handlers.
pub struct AppState {
    pub catalog: Catalog,
    /// Named card configurations plus the preference record, persisted to
    /// the configured data file.
    pub store: RwLock<ConfigStore<FileBackend>>,
    /// Export pipeline; write-locked only to preload background images.
    pub exporter: RwLock<ExportCoordinator<CardRasterizer>>,
    pub http_client: reqwest::Client,
}

impl AppState {
    pub fn new(config: ServerConfig) -> Self {
        let store = ConfigStore::open(FileBackend::new(&config.data_path));
        Self {
            catalog: Catalog::new(config.locale),
            store: RwLock::new(store),
            exporter: RwLock::new(ExportCoordinator::with_default_rasterizer()),
            http_client: reqwest::Client::new(),
        }
    }
}
