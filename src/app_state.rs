use crate::pipeline::EcoPipeline;

#[derive(Clone)]
pub struct AppState {
    pub pipeline: EcoPipeline,
}

impl AppState {
    pub fn new(pipeline: EcoPipeline) -> Self {
        Self { pipeline }
    }
}
