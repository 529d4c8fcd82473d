//! Named-configuration API handlers.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::Serialize;
use std::sync::Arc;

use super::super::state::AppState;
use super::http_error;
use crate::card::CardConfig;

/// One saved configuration with its name, for listings.
#[derive(Serialize)]
pub struct NamedConfig {
    pub name: String,
    pub config: CardConfig,
}

/// GET /api/configs - List saved configurations in insertion order.
pub async fn list(State(state): State<Arc<AppState>>) -> Json<Vec<NamedConfig>> {
    let store = state.store.read().await;
    let entries = store
        .list()
        .into_iter()
        .filter_map(|name| {
            store
                .load(&name)
                .ok()
                .map(|config| NamedConfig { name, config })
        })
        .collect();
    Json(entries)
}

/// GET /api/configs/:name - Fetch one saved configuration.
pub async fn load(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
) -> Result<Json<CardConfig>, (StatusCode, String)> {
    let store = state.store.read().await;
    store.load(&name).map(Json).map_err(http_error)
}

/// PUT /api/configs/:name - Save (insert or overwrite) a configuration.
pub async fn save(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
    Json(config): Json<CardConfig>,
) -> Result<Json<CardConfig>, (StatusCode, String)> {
    if name.trim().is_empty() {
        return Err((
            StatusCode::BAD_REQUEST,
            "Configuration name cannot be empty".to_string(),
        ));
    }
    config.validate().map_err(http_error)?;

    let mut store = state.store.write().await;
    store.save(&name, &config).map_err(http_error)?;
    println!("[configs] Saved configuration {name:?}");
    Ok(Json(config))
}

/// DELETE /api/configs/:name - Remove a configuration. Deleting an absent
/// name succeeds.
pub async fn delete(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
) -> Result<StatusCode, (StatusCode, String)> {
    let mut store = state.store.write().await;
    store.delete(&name).map_err(http_error)?;
    Ok(StatusCode::NO_CONTENT)
}
