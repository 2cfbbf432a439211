//! Error-to-response mapping.
//!
//! Existing clients only distinguish "200/201" from "404", so every failure
//! renders as 404 Not Found. Rule violations carry the message list as a
//! JSON array, a few failures carry a single message string, and everything
//! else has an empty body.

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;

use personnel_core::DomainError;
use personnel_employees::ValidationError;
use personnel_infra::RepositoryError;

#[derive(Debug)]
pub enum ApiError {
    /// Validation rules failed.
    Rejected(Vec<String>),
    /// The requested employee does not exist.
    NotFound,
    /// A request-level problem explained to the client in one message.
    Message(String),
    /// The request could not be parsed (body, path or query).
    Malformed(String),
    /// Store or transport failure.
    Unexpected(String),
}

impl ApiError {
    pub fn message(msg: impl Into<String>) -> Self {
        Self::Message(msg.into())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Rejected(messages) => {
                for message in &messages {
                    tracing::info!("Error: {message}");
                }
                (StatusCode::NOT_FOUND, Json(messages)).into_response()
            }
            ApiError::Message(message) => (StatusCode::NOT_FOUND, Json(message)).into_response(),
            ApiError::NotFound => StatusCode::NOT_FOUND.into_response(),
            ApiError::Malformed(reason) => {
                tracing::info!(%reason, "malformed request");
                StatusCode::NOT_FOUND.into_response()
            }
            ApiError::Unexpected(reason) => {
                tracing::warn!(%reason, "there is a problem with the transaction");
                StatusCode::NOT_FOUND.into_response()
            }
        }
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        match err {
            ValidationError::Rejected(messages) => ApiError::Rejected(messages),
            ValidationError::Lookup(e) => ApiError::Unexpected(e.to_string()),
        }
    }
}

impl From<RepositoryError> for ApiError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound => ApiError::NotFound,
            other => ApiError::Unexpected(other.to_string()),
        }
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        ApiError::Malformed(err.to_string())
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::Malformed(rejection.body_text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_error_is_a_404() {
        let errors = [
            ApiError::Rejected(vec!["Role is required".to_string()]),
            ApiError::NotFound,
            ApiError::message("nope"),
            ApiError::Malformed("bad json".to_string()),
            ApiError::Unexpected("store offline".to_string()),
        ];
        for err in errors {
            assert_eq!(err.into_response().status(), StatusCode::NOT_FOUND);
        }
    }

    #[test]
    fn repository_not_found_stays_not_found() {
        assert!(matches!(ApiError::from(RepositoryError::NotFound), ApiError::NotFound));
        assert!(matches!(
            ApiError::from(RepositoryError::Storage("down".to_string())),
            ApiError::Unexpected(_)
        ));
    }
}
