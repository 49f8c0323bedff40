//! HTTP error mapping

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use quote_document::ValidationError;
use quote_session::SessionError;
use serde::Serialize;
use std::collections::BTreeMap;

/// Error returned by every handler
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Missing or empty `x-user-id`
    #[error("missing caller identity")]
    Unauthenticated,

    /// Caller asked for another user's data
    #[error("forbidden")]
    Forbidden,

    #[error(transparent)]
    Session(#[from] SessionError),
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: ErrorBody,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
    /// Field name to message key, for validation failures
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub fields: BTreeMap<String, String>,
}

impl ErrorResponse {
    pub fn new(code: &str, message: &str) -> Self {
        Self {
            error: ErrorBody {
                code: code.to_string(),
                message: message.to_string(),
                fields: BTreeMap::new(),
            },
        }
    }

    fn validation(err: &ValidationError) -> Self {
        let mut response = Self::new("QUOTE_VALIDATION", "company info is invalid");
        response.error.fields = err
            .fields
            .iter()
            .map(|(field, issue)| (field.to_string(), issue.message_key().to_string()))
            .collect();
        response
    }
}

impl ApiError {
    /// Status code and body for this error
    fn parts(&self) -> (StatusCode, ErrorResponse) {
        match self {
            Self::Unauthenticated => (
                StatusCode::UNAUTHORIZED,
                ErrorResponse::new("QUOTE_UNAUTHENTICATED", "x-user-id header is required"),
            ),
            Self::Forbidden => (
                StatusCode::FORBIDDEN,
                ErrorResponse::new("QUOTE_FORBIDDEN", "not authorized"),
            ),
            Self::Session(err) => match err {
                SessionError::Validation(v) => {
                    (StatusCode::BAD_REQUEST, ErrorResponse::validation(v))
                }
                SessionError::NotFound(_) => (
                    StatusCode::NOT_FOUND,
                    ErrorResponse::new("QUOTE_NOT_FOUND", &err.to_string()),
                ),
                SessionError::SaveInFlight => (
                    StatusCode::CONFLICT,
                    ErrorResponse::new("QUOTE_SAVE_IN_FLIGHT", &err.to_string()),
                ),
                SessionError::InvalidTransition { .. } | SessionError::NoDocument => (
                    StatusCode::CONFLICT,
                    ErrorResponse::new("QUOTE_INVALID_STATE", &err.to_string()),
                ),
                SessionError::Persistence(_) => (
                    StatusCode::SERVICE_UNAVAILABLE,
                    ErrorResponse::new("QUOTE_PERSISTENCE", &err.to_string()),
                ),
                SessionError::NotSignedIn => (
                    StatusCode::UNAUTHORIZED,
                    ErrorResponse::new("QUOTE_UNAUTHENTICATED", &err.to_string()),
                ),
                SessionError::Unauthorized => (
                    StatusCode::FORBIDDEN,
                    ErrorResponse::new("QUOTE_FORBIDDEN", "not authorized"),
                ),
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = self.parts();
        if status.is_server_error() {
            tracing::error!("Request failed: {}", self);
        }
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quote_document::{CompanyField, DocumentId, FieldIssue, StoreError};

    #[test]
    fn status_mapping() {
        let cases = [
            (ApiError::Unauthenticated, StatusCode::UNAUTHORIZED),
            (ApiError::Forbidden, StatusCode::FORBIDDEN),
            (SessionError::Unauthorized.into(), StatusCode::FORBIDDEN),
            (
                SessionError::NotFound(DocumentId::new("q")).into(),
                StatusCode::NOT_FOUND,
            ),
            (SessionError::SaveInFlight.into(), StatusCode::CONFLICT),
            (
                SessionError::Persistence(StoreError::Unavailable("x".into())).into(),
                StatusCode::SERVICE_UNAVAILABLE,
            ),
        ];
        for (err, status) in cases {
            assert_eq!(err.parts().0, status, "{err}");
        }
    }

    #[test]
    fn validation_body_lists_fields() {
        let mut v = ValidationError::default();
        v.insert(CompanyField::CompanyPhone, FieldIssue::PhoneFormat);
        let (status, body) = ApiError::from(SessionError::Validation(v)).parts();
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            body.error.fields.get("companyPhone").map(String::as_str),
            Some("phoneFormat")
        );
    }
}
