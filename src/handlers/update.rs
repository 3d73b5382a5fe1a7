use crate::error::{ApiError, MessageResponse};
use crate::models::{Operation, SUCCESS, UpdateRequest, UpdateResponse};
use crate::routes;
use crate::state::AppState;
use crate::store::StoreError;
use axum::{Json, body::Bytes, extract::State, http::StatusCode};

/// PATCH /student handler - Set one attribute on an existing student
///
/// Body: `{"studentId": ..., "updateKey": ..., "updateValue": ...}`. The
/// record must already exist; a missing one is a 404, never an implicit
/// create.
#[utoipa::path(
    patch,
    path = routes::STUDENT,
    request_body = serde_json::Value,
    responses(
        (status = 200, description = "Attribute updated", body = UpdateResponse),
        (status = 400, description = "Invalid JSON or missing field", body = MessageResponse),
        (status = 404, description = "Student not found", body = MessageResponse),
        (status = 500, description = "Store error", body = MessageResponse)
    ),
    tag = "student"
)]
pub async fn update_handler(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<(StatusCode, Json<UpdateResponse>), ApiError> {
    let request = UpdateRequest::from_body(&body)?;

    let updated_attributes = state
        .store
        .update_field(&request.student_id, &request.update_key, request.update_value)
        .await
        .inspect_err(|err| {
            if let StoreError::NotFound(id) = err {
                tracing::info!("Cannot update missing student with id: {}", id);
            }
        })?;

    tracing::info!(
        "Updated {} on student with id: {}",
        request.update_key,
        request.student_id
    );
    Ok((
        StatusCode::OK,
        Json(UpdateResponse {
            operation: Operation::Update,
            message: SUCCESS.to_string(),
            updated_attributes,
        }),
    ))
}
