pub mod api;
pub mod config;
pub mod db;
pub mod domain;
pub mod errors;
pub mod priority;
pub mod reports;
pub mod rescore;
pub mod store;
pub mod system;

use std::sync::Arc;

use crate::config::AppConfig;
use crate::store::DocumentStore;

#[derive(Clone)]
pub struct InnerState {
    pub store: Arc<dyn DocumentStore>,
    pub config: Arc<AppConfig>,
}

impl InnerState {
    pub fn new(store: Arc<dyn DocumentStore>, config: AppConfig) -> Self {
        Self {
            store,
            config: Arc::new(config),
        }
    }
}
