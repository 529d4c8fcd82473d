//! Preference API handlers.

use axum::{Json, extract::State, http::StatusCode};
use std::sync::Arc;

use super::super::state::AppState;
use super::http_error;
use crate::store::prefs::{self, Preferences};

/// GET /api/preferences - The sticky preference record.
pub async fn get(State(state): State<Arc<AppState>>) -> Json<Preferences> {
    let store = state.store.read().await;
    Json(prefs::load(store.backend()))
}

/// PUT /api/preferences - Update the date-format preference.
///
/// Only the fields this server knows about are written; anything else in
/// the persisted record survives untouched.
pub async fn set(
    State(state): State<Arc<AppState>>,
    Json(preferences): Json<Preferences>,
) -> Result<Json<Preferences>, (StatusCode, String)> {
    let mut store = state.store.write().await;
    prefs::store_date_format(store.backend_mut(), preferences.date_format)
        .map_err(http_error)?;
    Ok(Json(preferences))
}
