use axum::{Json, extract::State, response::IntoResponse};
use kanau::processor::Processor;
use wema_core::processors::{ListAdminPayments, ReportingProcessor};

use crate::api::extractors::AdminAuth;
use crate::state::AppState;

use super::AdminApiError;

/// `GET /donations`: the most recent payment intents, any status.
pub async fn list_payments(
    State(state): State<AppState>,
    auth: AdminAuth,
) -> Result<impl IntoResponse, AdminApiError> {
    tracing::debug!(admin = %auth.email, "Listing payments");
    let processor = ReportingProcessor {
        provider: state.provider.clone(),
    };

    let payments = processor
        .process(ListAdminPayments::default())
        .await
        .map_err(AdminApiError::Payments)?;

    Ok(Json(payments))
}
