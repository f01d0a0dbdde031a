use axum::{Json, extract::State, response::IntoResponse};
use kanau::processor::Processor;
use wema_core::processors::{ComputeDonationStats, ReportingProcessor};

use crate::api::extractors::AdminAuth;
use crate::state::AppState;

use super::AdminApiError;

/// `GET /stats`: totals over the most recent succeeded payments.
pub async fn get_stats(
    State(state): State<AppState>,
    _auth: AdminAuth,
) -> Result<impl IntoResponse, AdminApiError> {
    let processor = ReportingProcessor {
        provider: state.provider.clone(),
    };

    let stats = processor
        .process(ComputeDonationStats::default())
        .await
        .map_err(AdminApiError::Stats)?;

    Ok(Json(stats))
}
