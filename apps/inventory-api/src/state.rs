//! Application state management

use domain_inventory::InMemoryInventoryRepository;

use crate::config::Config;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Process-lifetime store; clones share the same records
    pub repository: InMemoryInventoryRepository,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            repository: InMemoryInventoryRepository::new(),
        }
    }
}
