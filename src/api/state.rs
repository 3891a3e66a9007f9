use std::sync::Arc;

use crate::services::RecommendationPipeline;

/// Shared application state
///
/// Everything behind it is immutable after startup, so handlers read it
/// without locking.
#[derive(Clone)]
pub struct AppState {
    pub pipeline: Arc<RecommendationPipeline>,
}

impl AppState {
    pub fn new(pipeline: RecommendationPipeline) -> Self {
        Self {
            pipeline: Arc::new(pipeline),
        }
    }
}
