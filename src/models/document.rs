use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::core::error::{DocumentError, DocumentResult};
use crate::models::request::{FormattingSettings, UploadProperties};

/// Shared call context forwarded with every content-control service request.
/// Field names match that service's wire contract.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationContext {
    pub org_url: String,
    pub token: String,
    pub project_name: String,
    pub output_type: String,
    pub template_url: String,
    pub minio_end_point: String,
    pub minio_access_key: String,
    pub minio_secret_key: String,
    pub attachments_bucket_name: String,
    pub formatting_settings: FormattingSettings,
}

/// One fanout result from `generate-content-control`. The rendered block
/// itself is opaque; only the spreadsheet flag and the attachment list are
/// inspected here.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedControl {
    #[serde(default)]
    pub is_excel_spreadsheet: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minio_attachment_data: Option<Vec<Value>>,
    #[serde(flatten)]
    pub body: Map<String, Value>,
}

/// The assembled, renderable document: template descriptor fields plus the
/// ordered fanout output and upload instructions.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentModel {
    #[serde(flatten)]
    pub template: Map<String, Value>,
    pub upload_properties: UploadProperties,
    #[serde(rename = "JsonDataList")]
    pub json_data_list: Vec<GeneratedControl>,
    pub minio_attachment_data: Vec<Value>,
    pub formatting_settings: FormattingSettings,
}

/// Render target for the whole document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Word,
    Excel,
}

/// Canonical inline-file payload. The render service answers in either
/// PascalCase or camelCase; both are accepted here, and only camelCase ever
/// leaves this type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DownloadableFile {
    #[serde(default, alias = "FileName")]
    pub file_name: String,
    #[serde(default, alias = "Base64")]
    pub base64: String,
    #[serde(default, alias = "ApplicationType")]
    pub application_type: String,
}

impl DownloadableFile {
    /// Normalize a raw render-service payload into the canonical shape.
    /// A payload with no file name or no content fails the operation.
    pub fn from_render_payload(payload: Value) -> DocumentResult<Self> {
        let file: DownloadableFile = serde_json::from_value(payload).map_err(|err| {
            DocumentError::GenericUpstream(format!(
                "render service returned an unreadable file payload: {err}"
            ))
        })?;
        if file.file_name.is_empty() || file.base64.is_empty() {
            return Err(DocumentError::GenericUpstream(
                "render service returned a file payload with no name or content".into(),
            ));
        }
        Ok(file)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn downloadable_file_accepts_pascal_case() {
        let file = DownloadableFile::from_render_payload(json!({
            "FileName": "mewp.xlsx",
            "Base64": "bWFpbg==",
            "ApplicationType": "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
        }))
        .unwrap();
        assert_eq!(file.file_name, "mewp.xlsx");
        assert_eq!(file.base64, "bWFpbg==");
    }

    #[test]
    fn downloadable_file_accepts_camel_case() {
        let file = DownloadableFile::from_render_payload(json!({
            "fileName": "mewp.xlsx",
            "base64": "bWFpbg==",
            "applicationType": "application/zip"
        }))
        .unwrap();
        assert_eq!(file.application_type, "application/zip");
    }

    #[test]
    fn downloadable_file_serializes_camel_case_only() {
        let file = DownloadableFile {
            file_name: "mewp.xlsx".into(),
            base64: "bWFpbg==".into(),
            application_type: "application/zip".into(),
        };
        let value = serde_json::to_value(&file).unwrap();
        assert_eq!(value["fileName"], "mewp.xlsx");
        assert!(value.get("FileName").is_none());
    }

    #[test]
    fn missing_name_or_content_is_rejected() {
        let err = DownloadableFile::from_render_payload(json!({ "fileName": "mewp.xlsx" }));
        assert!(err.is_err());

        let err = DownloadableFile::from_render_payload(json!({ "base64": "bWFpbg==" }));
        assert!(err.is_err());
    }

    #[test]
    fn url_reference_payload_is_rejected() {
        let err = DownloadableFile::from_render_payload(json!("http://minio/bucket/mewp.xlsx"));
        assert!(err.is_err());
    }

    #[test]
    fn generated_control_keeps_opaque_body() {
        let control: GeneratedControl = serde_json::from_value(json!({
            "isExcelSpreadsheet": true,
            "wordObjects": [{ "type": "MewpCoverageReporter" }]
        }))
        .unwrap();
        assert!(control.is_excel_spreadsheet);
        assert_eq!(control.body["wordObjects"][0]["type"], "MewpCoverageReporter");
    }
}
