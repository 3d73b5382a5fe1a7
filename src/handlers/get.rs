use std::collections::HashMap;

use crate::error::{ApiError, MessageResponse};
use crate::routes;
use crate::state::AppState;
use crate::store::{KEY_ATTRIBUTE, Record};
use axum::{Json, extract::Query, extract::State, http::StatusCode};

/// GET /student?studentId=... handler - Retrieve one student record
#[utoipa::path(
    get,
    path = routes::STUDENT,
    params(
        ("studentId" = String, Query, description = "Key of the student record")
    ),
    responses(
        (status = 200, description = "Student found", body = serde_json::Value),
        (status = 400, description = "Missing studentId", body = MessageResponse),
        (status = 404, description = "Student not found", body = MessageResponse),
        (status = 500, description = "Store error", body = MessageResponse)
    ),
    tag = "student"
)]
pub async fn get_handler(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<(StatusCode, Json<Record>), ApiError> {
    let id = params.get(KEY_ATTRIBUTE).ok_or_else(|| {
        ApiError::BadRequest(format!("Missing required query parameter: {}", KEY_ATTRIBUTE))
    })?;
    if id.is_empty() {
        return Err(ApiError::BadRequest(format!(
            "Query parameter {} must not be empty",
            KEY_ATTRIBUTE
        )));
    }

    match state.store.fetch_one(id).await? {
        Some(record) => {
            tracing::info!("Successfully retrieved student with id: {}", id);
            Ok((StatusCode::OK, Json(record)))
        }
        None => {
            tracing::info!("Student not found with id: {}", id);
            Err(ApiError::StudentNotFound(id.clone()))
        }
    }
}
