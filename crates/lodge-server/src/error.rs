//! Request failure taxonomy.
//!
//! Every handler failure flows through [`ServerError`] and renders as the
//! `{success: false, message}` envelope.  Credential failures keep their
//! internal distinction (`UnknownUser` vs `WrongPassword`) but render the
//! same generic message so the response does not reveal which of the two
//! happened.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

use lodge_shared::Envelope;
use lodge_store::StoreError;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("User already exists with the same email")]
    EmailTaken,

    #[error("no account matches this email")]
    UnknownUser,

    #[error("password does not match")]
    WrongPassword,

    #[error("Unauthorised user")]
    Unauthorized,

    #[error("Admin access required")]
    Forbidden,

    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    #[error("Invalid request: {0}")]
    BadRequest(String),

    #[error("Image upload failed: {0}")]
    Upload(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            ServerError::EmailTaken => (StatusCode::CONFLICT, self.to_string()),
            ServerError::UnknownUser | ServerError::WrongPassword => (
                StatusCode::UNAUTHORIZED,
                "Invalid email or password".to_string(),
            ),
            ServerError::Unauthorized => (StatusCode::UNAUTHORIZED, self.to_string()),
            ServerError::Forbidden => (StatusCode::FORBIDDEN, self.to_string()),
            ServerError::NotFound(_) => (StatusCode::NOT_FOUND, self.to_string()),
            ServerError::MissingField(_) => (StatusCode::BAD_REQUEST, self.to_string()),
            ServerError::BadRequest(_) => (StatusCode::BAD_REQUEST, self.to_string()),
            ServerError::Upload(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Error occurred during image upload".to_string(),
            ),
            ServerError::Internal(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Some error occurred".to_string(),
            ),
        };

        (status, axum::Json(Envelope::<()>::err(message))).into_response()
    }
}

impl From<StoreError> for ServerError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::EmailTaken => ServerError::EmailTaken,
            StoreError::NotFound => ServerError::NotFound("Record"),
            other => ServerError::Internal(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn body_message(err: ServerError) -> (StatusCode, String) {
        let response = err.into_response();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let envelope: Envelope<()> = serde_json::from_slice(&bytes).unwrap();
        assert!(!envelope.success);
        (status, envelope.message.unwrap())
    }

    #[tokio::test]
    async fn credential_failures_are_indistinguishable_on_the_wire() {
        let (status_a, message_a) = body_message(ServerError::UnknownUser).await;
        let (status_b, message_b) = body_message(ServerError::WrongPassword).await;

        assert_eq!(status_a, StatusCode::UNAUTHORIZED);
        assert_eq!(status_a, status_b);
        assert_eq!(message_a, message_b);
    }

    #[tokio::test]
    async fn internal_detail_is_suppressed() {
        let (status, message) =
            body_message(ServerError::Internal("db path /secret/lodge.db".into())).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!message.contains("/secret"));
    }

    #[tokio::test]
    async fn status_mapping() {
        assert_eq!(
            body_message(ServerError::EmailTaken).await.0,
            StatusCode::CONFLICT
        );
        assert_eq!(
            body_message(ServerError::NotFound("Event")).await.0,
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            body_message(ServerError::MissingField("title")).await.0,
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            body_message(ServerError::Forbidden).await.0,
            StatusCode::FORBIDDEN
        );
    }
}
