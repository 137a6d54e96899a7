use std::sync::Arc;

use crate::config::StorageType;
use crate::domain::repositories::UrlRepository;

/// Shared state injected into every handler.
#[derive(Clone)]
pub struct AppState {
    pub repository: Arc<dyn UrlRepository>,
    pub storage: StorageType,
}

impl AppState {
    pub fn new(repository: Arc<dyn UrlRepository>, storage: StorageType) -> Self {
        Self {
            repository,
            storage,
        }
    }
}
