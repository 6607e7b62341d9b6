pub mod api;
pub mod clients;
pub mod core;
pub mod models;
pub mod pipeline;

// Re-export commonly used types
pub use crate::core::config::{AppConfig, StorageDefaults};
pub use crate::core::error::{DocumentError, DocumentResult};
pub use crate::models::{
    ContentControl, ControlKind, DocumentModel, DocumentRequest, DownloadableFile,
    ExternalFilesValidationRequest, OutputFormat, UploadProperties,
};
pub use crate::pipeline::DocumentPipeline;
