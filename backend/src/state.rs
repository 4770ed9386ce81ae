use polling_services::WeekSync;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub pipeline: Arc<WeekSync>,
}

impl AppState {
    pub fn new(pipeline: Arc<WeekSync>) -> Self {
        Self { pipeline }
    }
}
