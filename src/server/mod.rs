//! # HTTP Server for Card Rendering and Configuration Storage
//!
//! Exposes the card pipeline over a JSON API: named configuration CRUD,
//! sticky preferences, and PNG preview/export endpoints.
//!
//! ## Usage
//!
//! ```bash
//! quotesnap serve --listen 0.0.0.0:8080 --data quotesnap.json
//! ```

mod handlers;
mod state;

pub use state::ServerConfig;

use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, post, put},
};
use std::sync::Arc;

use crate::error::QuoteSnapError;
use state::AppState;

/// Start the HTTP server.
///
/// ## Example
///
/// ```no_run
/// use quotesnap::i18n::Locale;
/// use quotesnap::server::{serve, ServerConfig};
///
/// # async fn example() -> Result<(), quotesnap::error::QuoteSnapError> {
/// let config = ServerConfig {
///     data_path: "quotesnap.json".into(),
///     listen_addr: "0.0.0.0:8080".to_string(),
///     locale: Locale::En,
/// };
///
/// serve(config).await?;
/// # Ok(())
/// # }
/// ```
pub async fn serve(config: ServerConfig) -> Result<(), QuoteSnapError> {
    let app_state = Arc::new(AppState::new(config.clone()));

    let app = Router::new()
        // Configuration API
        .route("/api/configs", get(handlers::configs::list))
        .route(
            "/api/configs/:name",
            get(handlers::configs::load)
                .put(handlers::configs::save)
                .delete(handlers::configs::delete),
        )
        // Preference API
        .route(
            "/api/preferences",
            get(handlers::preferences::get).put(handlers::preferences::set),
        )
        // Card API
        .route("/api/card/preview", post(handlers::card::preview))
        .route("/api/card/export", post(handlers::card::export))
        // Background upload (20MB limit)
        .route(
            "/api/card/background",
            put(handlers::card::upload_background)
                .layer(DefaultBodyLimit::max(20 * 1024 * 1024)),
        )
        .with_state(app_state);

    println!("QuoteSnap HTTP server starting...");
    println!("Listening on: {}", config.listen_addr);
    println!("Data file: {}", config.data_path.display());
    println!();

    let listener = tokio::net::TcpListener::bind(&config.listen_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
