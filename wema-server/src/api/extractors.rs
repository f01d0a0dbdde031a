//! Custom Axum extractors.
//!
//! Provides:
//! - `ApiJson<T>`: JSON body whose rejection is a JSON `ErrorResponse`.
//! - `IdempotencyKey`: optional `Idempotency-Key` header forwarded to the provider.
//! - `AdminAuth`: verifies the `Authorization: Bearer <jwt>` header (admin API).

use axum::{
    Json,
    extract::{FromRequest, FromRequestParts, Request},
    http::{StatusCode, header::AUTHORIZATION, request::Parts},
    response::{IntoResponse, Response},
};
use serde::de::DeserializeOwned;
use wema_sdk::IDEMPOTENCY_KEY_HEADER;
use wema_sdk::objects::ErrorResponse;
use wema_sdk::objects::admin::AdminAuthFailure;

use crate::api::token::verify_admin_token;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// ApiJson: JSON bodies with JSON rejections
// ---------------------------------------------------------------------------

pub struct ApiJson<T>(pub T);

/// The body was not valid JSON for the expected shape.
#[derive(Debug)]
pub struct InvalidBody(String);

impl IntoResponse for InvalidBody {
    fn into_response(self) -> Response {
        tracing::debug!(reason = %self.0, "Rejected request body");
        (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::new("Invalid request body")),
        )
            .into_response()
    }
}

impl<S, T> FromRequest<S> for ApiJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
{
    type Rejection = InvalidBody;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(ApiJson(value)),
            Err(rejection) => Err(InvalidBody(rejection.body_text())),
        }
    }
}

// ---------------------------------------------------------------------------
// IdempotencyKey
// ---------------------------------------------------------------------------

/// Longest key the provider accepts.
const MAX_IDEMPOTENCY_KEY_LEN: usize = 255;

/// Client-chosen key making a retried donation reuse the same session.
pub struct IdempotencyKey(pub Option<String>);

#[derive(Debug)]
pub struct InvalidIdempotencyKey;

impl IntoResponse for InvalidIdempotencyKey {
    fn into_response(self) -> Response {
        (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::new("Invalid Idempotency-Key header")),
        )
            .into_response()
    }
}

impl<S: Send + Sync> FromRequestParts<S> for IdempotencyKey {
    type Rejection = InvalidIdempotencyKey;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let Some(value) = parts.headers.get(IDEMPOTENCY_KEY_HEADER) else {
            return Ok(IdempotencyKey(None));
        };
        let key = value
            .to_str()
            .map_err(|_| InvalidIdempotencyKey)?
            .trim();
        if key.is_empty() {
            return Ok(IdempotencyKey(None));
        }
        if key.len() > MAX_IDEMPOTENCY_KEY_LEN {
            return Err(InvalidIdempotencyKey);
        }
        Ok(IdempotencyKey(Some(key.to_string())))
    }
}

// ---------------------------------------------------------------------------
// AdminAuth: bearer token authentication
// ---------------------------------------------------------------------------

/// An authenticated admin.
#[derive(Debug)]
pub struct AdminAuth {
    pub email: String,
}

/// Errors returned by the [`AdminAuth`] extractor. All map to 401.
#[derive(Debug)]
pub enum AdminAuthError {
    MissingToken,
    InvalidToken,
    AdminDisabled,
}

impl IntoResponse for AdminAuthError {
    fn into_response(self) -> Response {
        let message = match self {
            AdminAuthError::MissingToken => "Missing bearer token",
            AdminAuthError::InvalidToken => "Invalid or expired token",
            AdminAuthError::AdminDisabled => "Admin access is not configured",
        };
        (
            StatusCode::UNAUTHORIZED,
            Json(AdminAuthFailure {
                message: message.to_string(),
            }),
        )
            .into_response()
    }
}

impl FromRequestParts<AppState> for AdminAuth {
    type Rejection = AdminAuthError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix("Bearer "))
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or(AdminAuthError::MissingToken)?;

        let admin = state.config.admin.read().await;
        let admin = admin.as_ref().ok_or(AdminAuthError::AdminDisabled)?;

        let claims = verify_admin_token(token, admin.token_secret()).map_err(|e| {
            tracing::debug!(error = %e, "Admin token rejected");
            AdminAuthError::InvalidToken
        })?;

        Ok(AdminAuth {
            email: claims.email,
        })
    }
}
