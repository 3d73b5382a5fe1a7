use crate::routes;
use axum::http::StatusCode;

/// GET /health handler - Liveness check
///
/// Always 200 with no body; the store is not consulted.
#[utoipa::path(
    get,
    path = routes::HEALTH,
    responses(
        (status = 200, description = "Service is up")
    ),
    tag = "health"
)]
pub async fn health_handler() -> StatusCode {
    tracing::debug!("Health check passed");
    StatusCode::OK
}
