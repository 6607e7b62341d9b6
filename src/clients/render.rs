use serde::Serialize;
use serde_json::Value;

use crate::core::error::{expect_success, DocumentResult};
use crate::models::{DocumentModel, DownloadableFile, UploadProperties};

/// Client for the render service that turns an assembled document model into
/// Word or Excel bytes, or bundles rendered files into a zip.
#[derive(Debug, Clone)]
pub struct RenderClient {
    http: reqwest::Client,
    base_url: String,
}

/// Zip-creation payload: every file inline, plus upload instructions for
/// the bundle itself.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ZipRequest {
    pub upload_properties: UploadProperties,
    pub files: Vec<DownloadableFile>,
}

impl RenderClient {
    pub fn new(http: reqwest::Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        RenderClient { http, base_url }
    }

    async fn post<T: Serialize + ?Sized>(&self, path: &str, payload: &T) -> DocumentResult<Value> {
        let response = self
            .http
            .post(format!("{}/api/{path}", self.base_url))
            .json(payload)
            .send()
            .await?;
        Ok(expect_success(response).await?.json().await?)
    }

    /// `POST /api/word/create`: artifact or storage reference, verbatim.
    pub async fn create_word(&self, model: &DocumentModel) -> DocumentResult<Value> {
        self.post("word/create", model).await
    }

    /// `POST /api/excel/create`: artifact or storage reference, verbatim.
    pub async fn create_excel(&self, model: &DocumentModel) -> DocumentResult<Value> {
        self.post("excel/create", model).await
    }

    /// `POST /api/excel/create-zip`: bundle rendered files under a derived
    /// zip name.
    pub async fn create_zip(&self, request: &ZipRequest) -> DocumentResult<Value> {
        self.post("excel/create-zip", request).await
    }
}
