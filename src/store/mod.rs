//! Record store adapter.
//!
//! A student record is an open attribute map keyed by [`KEY_ATTRIBUTE`]. The
//! [`StudentStore`] trait exposes the handful of primitive operations the
//! router needs; [`dynamo::DynamoStore`] talks to a DynamoDB table and
//! [`memory::InMemoryStore`] keeps everything in process.

pub mod convert;
pub mod dynamo;
pub mod memory;

use async_trait::async_trait;
use serde_json::{Map, Value as JsonValue};

pub use dynamo::DynamoStore;
pub use memory::InMemoryStore;

/// Partition key attribute of the student table
pub const KEY_ATTRIBUTE: &str = "studentId";

/// A stored record: attribute name to JSON value
pub type Record = Map<String, JsonValue>;

/// Opaque continuation key returned by a scan page
pub type ScanKey = Record;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The record addressed by an update does not exist
    #[error("record not found: {0}")]
    NotFound(String),
    /// Transport, service or conversion failure
    #[error(transparent)]
    Backend(#[from] anyhow::Error),
}

/// Whether a put created a new record or replaced an existing one
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PutOutcome {
    Created,
    Replaced,
}

/// One page of a table scan
#[derive(Debug, Clone, Default)]
pub struct ScanPage {
    pub items: Vec<Record>,
    /// Present when the store has more records to yield
    pub last_key: Option<ScanKey>,
}

#[async_trait]
pub trait StudentStore: Send + Sync {
    /// Point read by key. `Ok(None)` when the record is absent.
    async fn fetch_one(&self, id: &str) -> Result<Option<Record>, StoreError>;

    /// Read a single scan page starting after `start_key`.
    async fn scan_page(&self, start_key: Option<ScanKey>) -> Result<ScanPage, StoreError>;

    /// Unconditional upsert of a full record.
    async fn put(&self, record: Record) -> Result<PutOutcome, StoreError>;

    /// Set one attribute on an existing record and return the updated
    /// attributes. Fails with [`StoreError::NotFound`] instead of creating
    /// the record.
    async fn update_field(
        &self,
        id: &str,
        field: &str,
        value: JsonValue,
    ) -> Result<Record, StoreError>;

    /// Remove a record, returning its prior value if there was one.
    async fn delete_one(&self, id: &str) -> Result<Option<Record>, StoreError>;

    /// Read every record, following continuation keys until the store
    /// reports no more pages. A failed page aborts the whole scan.
    async fn fetch_all(&self) -> Result<Vec<Record>, StoreError> {
        let mut records = Vec::new();
        let mut start_key = None;
        let mut pages = 0usize;

        loop {
            let page = self.scan_page(start_key.take()).await?;
            pages += 1;
            records.extend(page.items);

            match page.last_key {
                Some(key) if !key.is_empty() => start_key = Some(key),
                _ => break,
            }
        }

        tracing::debug!("Scanned {} records in {} page(s)", records.len(), pages);
        Ok(records)
    }
}
