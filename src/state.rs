use crate::config::Config;
use crate::store::StudentStore;
use std::sync::Arc;

/// Shared application state
///
/// Built once per process; the store handle is reused by every invocation.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn StudentStore>,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(store: Arc<dyn StudentStore>, config: Config) -> Self {
        Self {
            store,
            config: Arc::new(config),
        }
    }
}
