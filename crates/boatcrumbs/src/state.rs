use std::sync::Arc;

use boatcrumbs_core::TrackPipeline;

use crate::source::FixSource;

/// Collaborators built once at start-up and shared by every request.
#[derive(Clone)]
pub struct AppState {
    pub source: Arc<dyn FixSource>,
    pub pipeline: Arc<TrackPipeline>,
}

impl AppState {
    pub fn new(source: Arc<dyn FixSource>, pipeline: TrackPipeline) -> Self {
        Self {
            source,
            pipeline: Arc::new(pipeline),
        }
    }
}
