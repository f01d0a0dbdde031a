//! Donation endpoints.
//!
//! - `POST /donations` – start a hosted checkout session
//! - `GET  /donations` – recent completed donations

use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use kanau::processor::Processor;
use wema_core::processors::{
    CreateDonation, DonationError, DonationProcessor, ListDonations, ReportingProcessor,
};
use wema_core::provider::ProviderError;
use wema_sdk::objects::{CheckoutSessionResponse, CreateDonationRequest, ErrorResponse};

use crate::api::extractors::{ApiJson, IdempotencyKey};
use crate::state::AppState;

/// `POST /donations`: start a hosted checkout session.
///
/// Validates the amount, asks the provider for a session and returns its id
/// and the URL the browser should be redirected to.
pub(super) async fn create_donation(
    State(state): State<AppState>,
    IdempotencyKey(idempotency_key): IdempotencyKey,
    ApiJson(request): ApiJson<CreateDonationRequest>,
) -> Result<impl IntoResponse, DonationApiError> {
    let frontend = state.config.frontend.read().await.clone();
    let processor = DonationProcessor {
        provider: state.provider.clone(),
        frontend,
    };

    let session = processor
        .process(CreateDonation {
            request,
            idempotency_key,
        })
        .await
        .map_err(DonationApiError::Create)?;

    Ok((
        StatusCode::CREATED,
        Json(CheckoutSessionResponse {
            session_id: session.session_id,
            checkout_url: session.checkout_url,
        }),
    ))
}

/// `GET /donations`: paid checkout sessions, newest first.
pub(super) async fn list_donations(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, DonationApiError> {
    let processor = ReportingProcessor {
        provider: state.provider.clone(),
    };
    let donations = processor
        .process(ListDonations::default())
        .await
        .map_err(DonationApiError::List)?;
    Ok(Json(donations))
}

#[derive(Debug)]
pub(super) enum DonationApiError {
    Create(DonationError),
    List(ProviderError),
}

impl IntoResponse for DonationApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            DonationApiError::Create(DonationError::Invalid(_)) => {
                (StatusCode::BAD_REQUEST, "Invalid amount")
            }
            DonationApiError::Create(DonationError::Provider(e)) => {
                tracing::error!(error = %e, "Failed to create checkout session");
                (StatusCode::INTERNAL_SERVER_ERROR, "Failed to create donation")
            }
            DonationApiError::List(e) => {
                tracing::error!(error = %e, "Failed to list checkout sessions");
                (StatusCode::INTERNAL_SERVER_ERROR, "Failed to fetch donations")
            }
        };
        (status, Json(ErrorResponse::new(message))).into_response()
    }
}
