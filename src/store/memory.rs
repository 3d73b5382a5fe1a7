use std::collections::BTreeMap;
use std::ops::Bound;
use std::sync::Arc;
#[cfg(test)]
use std::sync::atomic::{AtomicUsize, Ordering};

use anyhow::anyhow;
use async_trait::async_trait;
use serde_json::Value as JsonValue;
use tokio::sync::RwLock;

use super::{KEY_ATTRIBUTE, PutOutcome, Record, ScanKey, ScanPage, StoreError, StudentStore};

const DEFAULT_PAGE_SIZE: usize = 100;

/// In-process student store
///
/// Scans are paged like a real table so callers see continuation keys.
/// Records come back in key order.
#[derive(Clone)]
pub struct InMemoryStore {
    records: Arc<RwLock<BTreeMap<String, Record>>>,
    page_size: usize,
    #[cfg(test)]
    scan_failure: Option<Arc<ScanFailure>>,
}

#[cfg(test)]
struct ScanFailure {
    calls: AtomicUsize,
    fail_on_call: usize,
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::with_page_size(DEFAULT_PAGE_SIZE)
    }

    pub fn with_page_size(page_size: usize) -> Self {
        Self {
            records: Arc::new(RwLock::new(BTreeMap::new())),
            page_size: page_size.max(1),
            #[cfg(test)]
            scan_failure: None,
        }
    }

    /// Make the n-th scan page request (zero based) fail
    #[cfg(test)]
    pub(crate) fn failing_scan_at(mut self, call: usize) -> Self {
        self.scan_failure = Some(Arc::new(ScanFailure {
            calls: AtomicUsize::new(0),
            fail_on_call: call,
        }));
        self
    }

    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }

    #[cfg(test)]
    fn check_scan_failure(&self) -> Result<(), StoreError> {
        if let Some(failure) = &self.scan_failure {
            let call = failure.calls.fetch_add(1, Ordering::SeqCst);
            if call == failure.fail_on_call {
                return Err(anyhow!("Injected scan failure on page request {}", call).into());
            }
        }
        Ok(())
    }

    #[cfg(not(test))]
    fn check_scan_failure(&self) -> Result<(), StoreError> {
        Ok(())
    }
}

fn key_of(record: &Record) -> Result<&str, StoreError> {
    record
        .get(KEY_ATTRIBUTE)
        .and_then(JsonValue::as_str)
        .ok_or_else(|| anyhow!("Record is missing string attribute {}", KEY_ATTRIBUTE).into())
}

#[async_trait]
impl StudentStore for InMemoryStore {
    async fn fetch_one(&self, id: &str) -> Result<Option<Record>, StoreError> {
        Ok(self.records.read().await.get(id).cloned())
    }

    async fn scan_page(&self, start_key: Option<ScanKey>) -> Result<ScanPage, StoreError> {
        self.check_scan_failure()?;

        let records = self.records.read().await;
        let lower = match &start_key {
            Some(key) => Bound::Excluded(key_of(key)?.to_string()),
            None => Bound::Unbounded,
        };

        let mut remaining = records.range((lower, Bound::Unbounded));
        let items: Vec<Record> = remaining
            .by_ref()
            .take(self.page_size)
            .map(|(_, record)| record.clone())
            .collect();

        let last_key = match (remaining.next(), items.last()) {
            (Some(_), Some(last)) => {
                let mut key = Record::new();
                key.insert(KEY_ATTRIBUTE.to_string(), last[KEY_ATTRIBUTE].clone());
                Some(key)
            }
            _ => None,
        };

        Ok(ScanPage { items, last_key })
    }

    async fn put(&self, record: Record) -> Result<PutOutcome, StoreError> {
        let id = key_of(&record)?.to_string();
        let previous = self.records.write().await.insert(id, record);
        Ok(match previous {
            Some(_) => PutOutcome::Replaced,
            None => PutOutcome::Created,
        })
    }

    async fn update_field(
        &self,
        id: &str,
        field: &str,
        value: JsonValue,
    ) -> Result<Record, StoreError> {
        let mut records = self.records.write().await;
        let record = records
            .get_mut(id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        record.insert(field.to_string(), value.clone());

        let mut updated = Record::new();
        updated.insert(field.to_string(), value);
        Ok(updated)
    }

    async fn delete_one(&self, id: &str) -> Result<Option<Record>, StoreError> {
        Ok(self.records.write().await.remove(id))
    }
}
