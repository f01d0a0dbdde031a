use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use time::OffsetDateTime;
use wema_sdk::objects::admin::AdminAuthFailure;
use wema_sdk::objects::{AdminLoginRequest, AdminLoginResponse, ErrorResponse};

use crate::api::extractors::ApiJson;
use crate::api::token::{TokenError, issue_admin_token};
use crate::state::AppState;

/// `POST /login`: exchange the admin email and password for a token.
///
/// The email must match exactly; the password is checked against the
/// configured argon2 hash.
pub async fn login(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<AdminLoginRequest>,
) -> Result<impl IntoResponse, LoginError> {
    let admin = state.config.admin.read().await;
    let Some(admin) = admin.as_ref() else {
        tracing::warn!("Admin login attempted but admin access is not configured");
        return Err(LoginError::InvalidCredentials);
    };

    if !admin.verify_credentials(&body.email, &body.password) {
        tracing::warn!(email = %body.email, "Admin login failed");
        return Err(LoginError::InvalidCredentials);
    }

    let token = issue_admin_token(&admin.email, admin.token_secret(), OffsetDateTime::now_utc())
        .map_err(LoginError::Token)?;
    tracing::info!(email = %admin.email, "Admin logged in");

    Ok(Json(AdminLoginResponse { token }))
}

#[derive(Debug)]
pub enum LoginError {
    InvalidCredentials,
    Token(TokenError),
}

impl IntoResponse for LoginError {
    fn into_response(self) -> Response {
        match self {
            LoginError::InvalidCredentials => (
                StatusCode::UNAUTHORIZED,
                Json(AdminAuthFailure {
                    message: "Invalid credentials".to_string(),
                }),
            )
                .into_response(),
            LoginError::Token(e) => {
                tracing::error!(error = %e, "Failed to issue admin token");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(ErrorResponse::new("Login failed")),
                )
                    .into_response()
            }
        }
    }
}
