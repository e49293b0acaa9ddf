use crate::config::Config;
use crate::store::ResultStore;
use std::sync::Arc;

pub mod config;
pub mod logging;
pub mod store;

// Service-level state containing only infrastructure concerns
// Needs to implement Clone to be able to be passed into Router as State
#[derive(Clone)]
pub struct AppState {
    pub results: Arc<ResultStore>,
    pub config: Config,
}

impl AppState {
    pub fn new(app_config: Config, results: &Arc<ResultStore>) -> Self {
        Self {
            results: Arc::clone(results),
            config: app_config,
        }
    }

    pub fn results_ref(&self) -> &ResultStore {
        self.results.as_ref()
    }
}
