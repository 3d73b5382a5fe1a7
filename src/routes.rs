use axum::{
    Router,
    http::{
        HeaderValue,
        header::{ACCESS_CONTROL_ALLOW_ORIGIN, CONTENT_TYPE},
    },
    routing::get,
};
use tower_http::{
    set_header::SetResponseHeaderLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

use crate::error::ApiError;
use crate::handlers::{
    create_handler, delete_handler, get_handler, health_handler, list_handler, update_handler,
};
use crate::state::AppState;

// Route path constants - single source of truth for all API paths
pub const HEALTH: &str = "/health";
pub const STUDENT: &str = "/student";
pub const STUDENTS: &str = "/students";

/// Build the full application router
///
/// Any method not listed for a path, and any unknown path, falls through to
/// a 404. HEAD is routed there explicitly, since `get` would otherwise
/// answer it. Every response, including errors and the fallback, carries the JSON
/// content type and a permissive CORS origin.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route(
            HEALTH,
            get(health_handler)
                .head(route_not_found)
                .fallback(route_not_found),
        )
        .route(
            STUDENT,
            get(get_handler)
                .head(route_not_found)
                .post(create_handler)
                .patch(update_handler)
                .delete(delete_handler)
                .fallback(route_not_found),
        )
        .route(
            STUDENTS,
            get(list_handler)
                .head(route_not_found)
                .fallback(route_not_found),
        )
        .fallback(route_not_found)
        .with_state(state)
        .layer(SetResponseHeaderLayer::overriding(
            CONTENT_TYPE,
            HeaderValue::from_static("application/json"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            ACCESS_CONTROL_ALLOW_ORIGIN,
            HeaderValue::from_static("*"),
        ))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
}

async fn route_not_found() -> ApiError {
    ApiError::RouteNotFound
}
