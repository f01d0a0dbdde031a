use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use kanau::processor::Processor;
use wema_core::processors::{ContactError, ContactProcessor};
use wema_sdk::objects::{ContactMessage, ErrorResponse};

use crate::api::extractors::ApiJson;

/// `POST /contact`: acknowledge a contact form message.
pub(super) async fn submit_contact(
    ApiJson(message): ApiJson<ContactMessage>,
) -> Result<impl IntoResponse, ContactApiError> {
    let ack = ContactProcessor
        .process(message)
        .await
        .map_err(ContactApiError)?;
    Ok(Json(ack))
}

#[derive(Debug)]
pub(super) struct ContactApiError(ContactError);

impl IntoResponse for ContactApiError {
    fn into_response(self) -> Response {
        let body = match self.0 {
            ContactError::MissingFields(fields) => ErrorResponse::with_fields(
                "Missing required fields",
                fields.into_iter().map(str::to_owned).collect(),
            ),
            ContactError::InvalidEmail => ErrorResponse::new("Invalid email address"),
        };
        (StatusCode::BAD_REQUEST, Json(body)).into_response()
    }
}
