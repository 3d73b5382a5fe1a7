use crate::error::{ApiError, MessageResponse};
use crate::models::StudentListResponse;
use crate::routes;
use crate::state::AppState;
use axum::{Json, extract::State, http::StatusCode};

/// GET /students handler - List every student record
///
/// The whole table is scanned, page by page, before anything is returned. A
/// failure on any page turns the request into a 500 rather than a truncated
/// list. Order is whatever the store yields.
#[utoipa::path(
    get,
    path = routes::STUDENTS,
    responses(
        (status = 200, description = "All student records", body = StudentListResponse),
        (status = 500, description = "Store error", body = MessageResponse)
    ),
    tag = "student"
)]
pub async fn list_handler(
    State(state): State<AppState>,
) -> Result<(StatusCode, Json<StudentListResponse>), ApiError> {
    let student = state.store.fetch_all().await?;

    tracing::info!(
        "Listed {} students from table {}",
        student.len(),
        state.config.table_name
    );

    Ok((StatusCode::OK, Json(StudentListResponse { student })))
}

#[cfg(test)]
mod tests {
    use crate::models::StudentListResponse;
    use crate::store::{InMemoryStore, StudentStore};
    use crate::test_support::{record, send, test_app};
    use axum::http::StatusCode;
    use serde_json::json;
    use std::collections::HashSet;

    #[tokio::test]
    async fn test_list_endpoint_empty() {
        let app = test_app(InMemoryStore::new());

        let response = send(&app, "GET", "/students", None).await;

        assert_eq!(response.status, StatusCode::OK);
        assert_eq!(response.json(), json!({"student": []}));
    }

    #[tokio::test]
    async fn test_list_endpoint_spans_pages() {
        // 25 records over pages of 4: seven round trips
        let store = InMemoryStore::with_page_size(4);
        for i in 0..25 {
            store
                .put(record(json!({"studentId": format!("s-{}", i), "rank": i})))
                .await
                .unwrap();
        }
        let app = test_app(store);

        let response = send(&app, "GET", "/students", None).await;

        assert_eq!(response.status, StatusCode::OK);
        let listed: StudentListResponse = serde_json::from_slice(&response.body).unwrap();
        assert_eq!(listed.student.len(), 25);
        let ids: HashSet<String> = listed
            .student
            .iter()
            .map(|r| r["studentId"].as_str().unwrap().to_string())
            .collect();
        let expected: HashSet<String> = (0..25).map(|i| format!("s-{}", i)).collect();
        assert_eq!(ids, expected);
    }

    #[tokio::test]
    async fn test_list_endpoint_page_failure_is_500() {
        let store = InMemoryStore::with_page_size(2);
        for i in 0..5 {
            store
                .put(record(json!({"studentId": i.to_string()})))
                .await
                .unwrap();
        }
        let app = test_app(store.failing_scan_at(2));

        let response = send(&app, "GET", "/students", None).await;

        assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(response.json(), json!({"Message": "Internal Error"}));
        response.assert_fixed_headers();
    }
}
