use std::sync::Arc;

use crate::core::config::AppConfig;
use crate::pipeline::DocumentPipeline;

/// Shared per-worker state: configuration plus the collaborator clients
/// behind the pipeline.
#[derive(Clone)]
pub struct ApiState {
    pub pipeline: DocumentPipeline,
    pub config: Arc<AppConfig>,
}

impl ApiState {
    pub fn new(config: AppConfig) -> anyhow::Result<Self> {
        let pipeline = DocumentPipeline::new(&config)?;

        Ok(ApiState {
            pipeline,
            config: Arc::new(config),
        })
    }
}
