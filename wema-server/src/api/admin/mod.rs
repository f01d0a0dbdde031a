//! Admin API handlers.
//!
//! Everything except login requires `Authorization: Bearer <token>` with a
//! token issued by the login endpoint.
//!
//! # Endpoints
//!
//! - `POST /login`     – exchange admin credentials for a bearer token
//! - `GET  /donations` – recent payment intents
//! - `GET  /stats`     – count and total of recent succeeded payments

use axum::{
    Json, Router,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use wema_core::provider::ProviderError;
use wema_sdk::objects::ErrorResponse;

use crate::state::AppState;

mod login;
mod payments;
mod stats;

/// Build the Admin API router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/login", post(login::login))
        .route("/donations", get(payments::list_payments))
        .route("/stats", get(stats::get_stats))
}

/// Errors that can occur in Admin API handlers.
#[derive(Debug)]
pub(crate) enum AdminApiError {
    Payments(ProviderError),
    Stats(ProviderError),
}

impl IntoResponse for AdminApiError {
    fn into_response(self) -> axum::response::Response {
        let (e, message) = match self {
            AdminApiError::Payments(e) => (e, "Failed to fetch donations"),
            AdminApiError::Stats(e) => (e, "Failed to fetch stats"),
        };
        tracing::error!(error = %e, message, "Admin API provider error");
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse::new(message)),
        )
            .into_response()
    }
}
