use std::env;
use std::time::Duration;

use anyhow::Result;

/// Process-level storage credentials used to fill gaps in request upload
/// properties. Explicit request values always win over these.
#[derive(Debug, Clone, Default)]
pub struct StorageDefaults {
    pub access_key_id: Option<String>,
    pub secret_access_key: Option<String>,
    pub region: Option<String>,
    pub service_url: Option<String>,
}

impl StorageDefaults {
    pub fn from_env() -> Self {
        StorageDefaults {
            access_key_id: env::var("MINIO_ROOT_USER").ok(),
            secret_access_key: env::var("MINIO_ROOT_PASSWORD").ok(),
            region: env::var("MINIO_REGION").ok(),
            service_url: env::var("MINIOSERVER").ok(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub content_control_url: String,
    pub render_service_url: String,
    pub attachments_bucket_name: String,
    pub storage_defaults: StorageDefaults,
    pub request_timeout: Duration,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        let config = AppConfig {
            content_control_url: env::var("CONTENT_CONTROL_URL")
                .unwrap_or_else(|_| "http://localhost:3000".to_string()),
            render_service_url: env::var("RENDER_SERVICE_URL")
                .unwrap_or_else(|_| "http://localhost:3001".to_string()),
            attachments_bucket_name: env::var("ATTACHMENTS_BUCKET_NAME")
                .unwrap_or_else(|_| "attachments".to_string()),
            storage_defaults: StorageDefaults::from_env(),
            request_timeout: Duration::from_secs(
                env::var("REQUEST_TIMEOUT_SECS")
                    .unwrap_or_else(|_| "120".to_string())
                    .parse()?,
            ),
        };

        Ok(config)
    }
}
