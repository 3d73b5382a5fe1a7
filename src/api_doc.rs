use utoipa::OpenApi;

use crate::error::MessageResponse;
use crate::handlers;
use crate::models::{CreateResponse, DeleteResponse, Operation, StudentListResponse, UpdateResponse};

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    info(
        title = "student-records API",
        version = "1.0.0",
        description = "CRUD API over a DynamoDB table of student records"
    ),
    paths(
        handlers::health::health_handler,
        handlers::get::get_handler,
        handlers::list::list_handler,
        handlers::create::create_handler,
        handlers::update::update_handler,
        handlers::delete::delete_handler
    ),
    components(
        schemas(
            StudentListResponse,
            CreateResponse,
            UpdateResponse,
            DeleteResponse,
            Operation,
            MessageResponse
        )
    ),
    tags(
        (name = "health", description = "Health check operations"),
        (name = "student", description = "Student record operations")
    )
)]
pub struct ApiDoc;

impl ApiDoc {
    /// Render the document as pretty-printed JSON
    pub fn to_pretty_json() -> serde_json::Result<String> {
        serde_json::to_string_pretty(&Self::openapi())
    }
}
