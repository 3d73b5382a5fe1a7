use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

use crate::store::StoreError;

/// Body of every structured error response
#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
pub struct MessageResponse {
    #[serde(rename = "Message")]
    pub message: String,
}

/// Body returned for paths and methods outside the routing table
pub const ROUTE_NOT_FOUND_BODY: &str = "Not Found";

/// Custom error type for API endpoints
///
/// Every variant renders as a JSON body; the fixed response headers are added
/// by the router, not here.
#[derive(Debug)]
pub enum ApiError {
    /// No record with this studentId
    StudentNotFound(String),
    /// A required query parameter or body field is missing or mistyped
    BadRequest(String),
    /// Request body is not valid JSON
    JsonError(serde_json::Error),
    /// Store failure; never echoed to the caller
    Store(anyhow::Error),
    /// (method, path) is not in the routing table
    RouteNotFound,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::StudentNotFound(id) => (
                StatusCode::NOT_FOUND,
                format!("StudentId: {} Not Found", id),
            ),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::JsonError(err) => {
                (StatusCode::BAD_REQUEST, format!("Invalid JSON body: {}", err))
            }
            ApiError::Store(err) => {
                tracing::error!("Error handling request: {:#}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal Error".to_string(),
                )
            }
            ApiError::RouteNotFound => {
                return (StatusCode::NOT_FOUND, Json(ROUTE_NOT_FOUND_BODY)).into_response();
            }
        };

        if status == StatusCode::BAD_REQUEST {
            tracing::warn!("Rejecting request: {}", message);
        }

        (status, Json(MessageResponse { message })).into_response()
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(id) => ApiError::StudentNotFound(id),
            StoreError::Backend(err) => ApiError::Store(err),
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::JsonError(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn render(err: ApiError) -> (StatusCode, serde_json::Value) {
        let response = err.into_response();
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&body).unwrap())
    }

    #[tokio::test]
    async fn test_store_failure_is_generic_500() {
        let (status, body) = render(ApiError::Store(anyhow::anyhow!("connection reset"))).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, serde_json::json!({"Message": "Internal Error"}));
    }

    #[tokio::test]
    async fn test_not_found_names_the_student() {
        let (status, body) = render(ApiError::StudentNotFound("42".to_string())).await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, serde_json::json!({"Message": "StudentId: 42 Not Found"}));
    }

    #[tokio::test]
    async fn test_route_not_found_is_bare_string() {
        let (status, body) = render(ApiError::RouteNotFound).await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, serde_json::json!("Not Found"));
    }

    #[test]
    fn test_store_not_found_maps_to_student_not_found() {
        let err: ApiError = StoreError::NotFound("7".to_string()).into();
        assert!(matches!(err, ApiError::StudentNotFound(id) if id == "7"));
    }
}
