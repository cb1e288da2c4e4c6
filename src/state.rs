use std::sync::Arc;

use crate::extractor::ExtractionClient;

/// Shared by every request; holds nothing mutable.
#[derive(Clone)]
pub struct AppState {
    pub extractor: Arc<dyn ExtractionClient>,
}

impl AppState {
    pub fn new(extractor: Arc<dyn ExtractionClient>) -> Self {
        Self { extractor }
    }
}
