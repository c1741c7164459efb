use std::sync::Arc;

use crate::cache::ReportCache;
use crate::grid::DataSource;

#[derive(Clone)]
pub struct AppState {
    pub source: Arc<dyn DataSource>,
    pub cache: Arc<ReportCache>,
    pub cors_origin: String,
}

impl AppState {
    pub fn new(source: Arc<dyn DataSource>, cache: ReportCache) -> Self {
        Self {
            source,
            cache: Arc::new(cache),
            cors_origin: "*".to_string(),
        }
    }

    pub fn with_cors_origin(mut self, origin: impl Into<String>) -> Self {
        self.cors_origin = origin.into();
        self
    }
}
