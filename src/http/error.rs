//! Pipeline errors and the JSON error body shared by every dispatch failure.

use axum::http::{Method, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::http::handler::BoxError;
use crate::routing::{Accepts, MethodSet};

/// `{ "success": false, "code": <int>, "error": <string> }`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub success: bool,
    pub code: u16,
    pub error: String,
}

impl ErrorBody {
    pub fn new(status: StatusCode, error: impl Into<String>) -> Self {
        Self {
            success: false,
            code: status.as_u16(),
            error: error.into(),
        }
    }
}

/// Everything that can stop a request inside the pipeline.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// No route matched the path.
    #[error("Not Found")]
    NotFound,

    #[error("Method {received} Not Allowed, expected {expected}")]
    MethodNotAllowed { received: Method, expected: MethodSet },

    #[error("Content-Type {received} Not Acceptable, expected {expected}")]
    NotAcceptable { received: String, expected: Accepts },

    /// The handler returned an error.
    #[error("handler failed: {0}")]
    Handler(#[source] BoxError),

    /// The handler panicked.
    #[error("handler panicked: {0}")]
    Panicked(String),

    /// The declared response content type could not be applied.
    #[error("invalid response content type `{0}`")]
    InvalidContentType(String),
}

impl DispatchError {
    pub fn status(&self) -> StatusCode {
        match self {
            DispatchError::NotFound => StatusCode::NOT_FOUND,
            DispatchError::MethodNotAllowed { .. } => StatusCode::METHOD_NOT_ALLOWED,
            DispatchError::NotAcceptable { .. } => StatusCode::NOT_ACCEPTABLE,
            DispatchError::Handler(_)
            | DispatchError::Panicked(_)
            | DispatchError::InvalidContentType(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message safe to show the client. Internal details stay in the logs.
    pub fn client_message(&self) -> String {
        match self.status() {
            StatusCode::INTERNAL_SERVER_ERROR => "Internal Server Error".to_string(),
            _ => self.to_string(),
        }
    }
}

impl IntoResponse for DispatchError {
    fn into_response(self) -> Response {
        let status = self.status();
        (status, Json(ErrorBody::new(status, self.client_message()))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_not_found_body() {
        let response = DispatchError::NotFound.into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let bytes = axum::body::to_bytes(response.into_body(), 1024).await.unwrap();
        assert_eq!(&bytes[..], br#"{"success":false,"code":404,"error":"Not Found"}"#);
    }

    #[test]
    fn test_messages_name_both_sides() {
        let err = DispatchError::MethodNotAllowed {
            received: Method::POST,
            expected: MethodSet::one(Method::GET),
        };
        assert_eq!(err.client_message(), "Method POST Not Allowed, expected GET");

        let err = DispatchError::NotAcceptable {
            received: "text/plain".into(),
            expected: Accepts::only(["application/json"]),
        };
        assert_eq!(
            err.client_message(),
            "Content-Type text/plain Not Acceptable, expected application/json"
        );
    }

    #[test]
    fn test_internal_detail_hidden() {
        let err = DispatchError::Handler("database password is hunter2".into());
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.client_message(), "Internal Server Error");
    }
}
