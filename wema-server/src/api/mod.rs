//! HTTP API, mounted under `/api`.
//!
//! # Endpoints
//!
//! - `POST /donations` – start a hosted checkout session (extra per-client limit)
//! - `GET  /donations` – recent completed donations
//! - `POST /contact`   – contact form
//! - `GET  /health`    – liveness
//! - `/admin/*`        – see [`admin`]

use axum::{
    Json, Router,
    middleware::from_fn_with_state,
    response::IntoResponse,
    routing::{get, post},
};
use time::OffsetDateTime;
use wema_sdk::objects::HealthResponse;

use crate::state::AppState;

mod admin;
mod contact;
mod donations;
pub mod extractors;
pub mod rate_limit;
pub mod token;

#[cfg(test)]
mod tests;

/// Build the `/api` router. `state` is needed up front by the rate limit layers.
pub fn router(state: AppState) -> Router<AppState> {
    Router::new()
        .route(
            "/donations",
            post(donations::create_donation)
                .layer(from_fn_with_state(state.clone(), rate_limit::limit_checkout))
                .get(donations::list_donations),
        )
        .route("/contact", post(contact::submit_contact))
        .route("/health", get(health_check))
        .nest("/admin", admin::router())
        .layer(from_fn_with_state(state, rate_limit::limit_api))
}

/// `GET /health`: returns OK if the server is running.
async fn health_check() -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok".to_string(),
        timestamp: OffsetDateTime::now_utc(),
    })
}
