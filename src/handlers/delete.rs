use crate::error::{ApiError, MessageResponse};
use crate::models::{DeleteRequest, DeleteResponse, Operation, SUCCESS};
use crate::routes;
use crate::state::AppState;
use axum::{Json, body::Bytes, extract::State, http::StatusCode};

/// DELETE /student handler - Remove a student record
///
/// Idempotent: deleting an unknown studentId succeeds with `deletedItem: null`.
#[utoipa::path(
    delete,
    path = routes::STUDENT,
    request_body = serde_json::Value,
    responses(
        (status = 200, description = "Student removed (or never existed)", body = DeleteResponse),
        (status = 400, description = "Invalid JSON or missing studentId", body = MessageResponse),
        (status = 500, description = "Store error", body = MessageResponse)
    ),
    tag = "student"
)]
pub async fn delete_handler(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<(StatusCode, Json<DeleteResponse>), ApiError> {
    let request = DeleteRequest::from_body(&body)?;

    let deleted_item = state.store.delete_one(&request.student_id).await?;

    tracing::info!(
        "Deleted student with id: {} (existed: {})",
        request.student_id,
        deleted_item.is_some()
    );
    Ok((
        StatusCode::OK,
        Json(DeleteResponse {
            operation: Operation::Delete,
            message: SUCCESS.to_string(),
            deleted_item,
        }),
    ))
}
