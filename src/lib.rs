//! Student records API: a small CRUD service over a single DynamoDB table,
//! run on AWS Lambda behind API Gateway or as a local HTTP server.

pub mod api_doc;
pub mod config;
pub mod error;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod state;
pub mod store;

#[cfg(test)]
pub(crate) mod test_support;
