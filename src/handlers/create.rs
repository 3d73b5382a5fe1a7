use crate::error::{ApiError, MessageResponse};
use crate::models::{CreateResponse, SUCCESS, record_from_body};
use crate::routes;
use crate::state::AppState;
use crate::store::KEY_ATTRIBUTE;
use axum::{Json, body::Bytes, extract::State, http::StatusCode};

/// POST /student handler - Store a full student record
///
/// Upsert: an existing record with the same studentId is overwritten and the
/// response reports `SAVE` instead of `CREATE`.
#[utoipa::path(
    post,
    path = routes::STUDENT,
    request_body = serde_json::Value,
    responses(
        (status = 200, description = "Student stored", body = CreateResponse),
        (status = 400, description = "Invalid JSON or missing studentId", body = MessageResponse),
        (status = 500, description = "Store error", body = MessageResponse)
    ),
    tag = "student"
)]
pub async fn create_handler(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<(StatusCode, Json<CreateResponse>), ApiError> {
    let item = record_from_body(&body)?;

    let outcome = state.store.put(item.clone()).await?;

    tracing::info!(
        "Stored student with id: {} ({:?})",
        item[KEY_ATTRIBUTE],
        outcome
    );
    Ok((
        StatusCode::OK,
        Json(CreateResponse {
            operation: outcome.into(),
            message: SUCCESS.to_string(),
            item,
        }),
    ))
}
