//! HTTP handlers for the server.

pub mod card;
pub mod configs;
pub mod preferences;

use axum::http::StatusCode;

use crate::error::QuoteSnapError;

/// Map a pipeline error onto the HTTP status it deserves.
pub(crate) fn error_status(e: &QuoteSnapError) -> StatusCode {
    match e {
        QuoteSnapError::Validation(_) => StatusCode::BAD_REQUEST,
        QuoteSnapError::NotFound(_) => StatusCode::NOT_FOUND,
        QuoteSnapError::Persistence(_)
        | QuoteSnapError::Export(_)
        | QuoteSnapError::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

pub(crate) fn http_error(e: QuoteSnapError) -> (StatusCode, String) {
    (error_status(&e), e.to_string())
}
