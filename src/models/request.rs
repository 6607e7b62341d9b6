use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::core::error::{DocumentError, DocumentResult};

/// Inbound request for one composite document build.
///
/// Wire names are camelCase except `PAT`, kept verbatim from the project
/// management system's vocabulary.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub document_id: Option<Uuid>,
    #[serde(default)]
    pub template_file: String,
    pub upload_properties: UploadProperties,
    pub team_project_name: String,
    pub tfs_collection_uri: String,
    #[serde(rename = "PAT")]
    pub pat: String,
    #[serde(default)]
    pub content_controls: Vec<ContentControl>,
    #[serde(default)]
    pub formatting_settings: FormattingSettings,
}

impl DocumentRequest {
    /// Reject requests with missing mandatory fields before any outbound call.
    pub fn validate(&self) -> DocumentResult<()> {
        if self.tfs_collection_uri.is_empty() {
            return Err(DocumentError::Validation("tfsCollectionUri is required".into()));
        }
        if self.pat.is_empty() {
            return Err(DocumentError::Validation("PAT is required".into()));
        }
        if self.team_project_name.is_empty() {
            return Err(DocumentError::Validation("teamProjectName is required".into()));
        }
        if self.upload_properties.bucket_name.is_empty() {
            return Err(DocumentError::Validation(
                "uploadProperties.bucketName is required".into(),
            ));
        }
        if self.content_controls.is_empty() {
            return Err(DocumentError::Validation("contentControls must not be empty".into()));
        }
        Ok(())
    }
}

/// Where and how the rendered artifact is delivered. Credential fields are
/// optional on the wire; the assembler fills gaps from process-level storage
/// configuration. The PascalCase aliases cover the legacy spelling still
/// used by some callers.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadProperties {
    #[serde(default)]
    pub bucket_name: String,
    #[serde(default)]
    pub file_name: String,
    #[serde(default, alias = "AwsAccessKeyId", skip_serializing_if = "Option::is_none")]
    pub access_key_id: Option<String>,
    #[serde(default, alias = "AwsSecretAccessKey", skip_serializing_if = "Option::is_none")]
    pub secret_access_key: Option<String>,
    #[serde(default, alias = "Region", skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    #[serde(default, alias = "ServiceUrl", skip_serializing_if = "Option::is_none")]
    pub service_url: Option<String>,
    #[serde(default, alias = "EnableDirectDownload")]
    pub enable_direct_download: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub_directory_in_bucket: Option<String>,
}

/// Content-control type tag. The known variants drive packaging decisions;
/// anything else is forwarded to the content-control service untouched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ControlKind {
    TestReporter,
    MewpStandaloneReporter,
    TestReporterFlat,
    InternalValidationReporter,
    #[serde(untagged)]
    Other(String),
}

impl ControlKind {
    pub fn as_str(&self) -> &str {
        match self {
            ControlKind::TestReporter => "testReporter",
            ControlKind::MewpStandaloneReporter => "mewpStandaloneReporter",
            ControlKind::TestReporterFlat => "testReporterFlat",
            ControlKind::InternalValidationReporter => "internalValidationReporter",
            ControlKind::Other(tag) => tag,
        }
    }
}

impl fmt::Display for ControlKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One named, typed block of the composite document.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentControl {
    pub title: String,
    #[serde(rename = "type")]
    pub kind: ControlKind,
    #[serde(default)]
    pub heading_level: u32,
    #[serde(default)]
    pub data: DataDescriptor,
    #[serde(default)]
    pub is_excel_spreadsheet: bool,
}

/// Control payload descriptor. Opaque to the pipeline except for the two
/// flags that drive zip packaging; everything else rides along verbatim.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataDescriptor {
    #[serde(default)]
    pub include_internal_validation_report: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub use_rel_fallback: Option<bool>,
    #[serde(flatten)]
    pub rest: Map<String, Value>,
}

/// Whitespace-trimming switches forwarded to the content-control service.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormattingSettings {
    #[serde(default)]
    pub trim_additional_spacing_in_descriptions: bool,
    #[serde(default)]
    pub trim_additional_spacing_in_tables: bool,
}

/// Reference to a caller-staged object in a storage bucket.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExternalFileRef {
    pub bucket_name: String,
    pub object_name: String,
}

/// Entry shape for external-file validation: the shared call context plus
/// the two staged files to check.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExternalFilesValidationRequest {
    pub tfs_collection_uri: String,
    #[serde(rename = "PAT")]
    pub pat: String,
    pub team_project_name: String,
    #[serde(default)]
    pub template_file: String,
    #[serde(default)]
    pub upload_properties: UploadProperties,
    #[serde(default)]
    pub formatting_settings: FormattingSettings,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_bugs_file: Option<ExternalFileRef>,
    #[serde(
        default,
        rename = "externalL3L4File",
        skip_serializing_if = "Option::is_none"
    )]
    pub external_l3_l4_file: Option<ExternalFileRef>,
}

impl ExternalFilesValidationRequest {
    pub fn validate(&self) -> DocumentResult<()> {
        if self.tfs_collection_uri.is_empty() {
            return Err(DocumentError::Validation("tfsCollectionUri is required".into()));
        }
        if self.pat.is_empty() {
            return Err(DocumentError::Validation("PAT is required".into()));
        }
        if self.team_project_name.is_empty() {
            return Err(DocumentError::Validation("teamProjectName is required".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn control_kind_known_tags_round_trip() {
        let kind: ControlKind = serde_json::from_value(json!("mewpStandaloneReporter")).unwrap();
        assert_eq!(kind, ControlKind::MewpStandaloneReporter);
        assert_eq!(serde_json::to_value(&kind).unwrap(), json!("mewpStandaloneReporter"));
    }

    #[test]
    fn control_kind_unknown_tags_pass_through() {
        let kind: ControlKind = serde_json::from_value(json!("paragraph")).unwrap();
        assert_eq!(kind, ControlKind::Other("paragraph".into()));
        assert_eq!(serde_json::to_value(&kind).unwrap(), json!("paragraph"));
    }

    #[test]
    fn data_descriptor_keeps_unknown_fields() {
        let data: DataDescriptor = serde_json::from_value(json!({
            "testPlanId": 34,
            "testSuiteArray": [101],
            "includeInternalValidationReport": true
        }))
        .unwrap();
        assert!(data.include_internal_validation_report);
        assert!(data.use_rel_fallback.is_none());
        assert_eq!(data.rest["testPlanId"], json!(34));

        let round_tripped = serde_json::to_value(&data).unwrap();
        assert_eq!(round_tripped["testSuiteArray"], json!([101]));
    }

    #[test]
    fn upload_properties_accept_legacy_pascal_case() {
        let upload: UploadProperties = serde_json::from_value(json!({
            "bucketName": "attachments",
            "AwsAccessKeyId": "key",
            "AwsSecretAccessKey": "secret",
            "Region": "eu",
            "ServiceUrl": "http://minio",
            "EnableDirectDownload": true
        }))
        .unwrap();
        assert_eq!(upload.access_key_id.as_deref(), Some("key"));
        assert_eq!(upload.service_url.as_deref(), Some("http://minio"));
        assert!(upload.enable_direct_download);
    }

    #[test]
    fn document_request_reads_pat_field() {
        let request: DocumentRequest = serde_json::from_value(json!({
            "templateFile": "http://template.dotx",
            "uploadProperties": { "bucketName": "attachments" },
            "teamProjectName": "project",
            "tfsCollectionUri": "https://org",
            "PAT": "pat",
            "contentControls": [{
                "title": "CC1",
                "type": "testReporter",
                "headingLevel": 1,
                "data": { "testPlanId": 12 }
            }]
        }))
        .unwrap();
        assert_eq!(request.pat, "pat");
        assert_eq!(request.content_controls[0].kind, ControlKind::TestReporter);
        assert!(request.validate().is_ok());
    }

    #[test]
    fn validation_rejects_empty_content_controls() {
        let request: DocumentRequest = serde_json::from_value(json!({
            "templateFile": "http://template.dotx",
            "uploadProperties": { "bucketName": "attachments" },
            "teamProjectName": "project",
            "tfsCollectionUri": "https://org",
            "PAT": "pat"
        }))
        .unwrap();
        assert!(matches!(
            request.validate(),
            Err(crate::core::error::DocumentError::Validation(_))
        ));
    }

    #[test]
    fn external_l3_l4_file_uses_expected_wire_name() {
        let request = ExternalFilesValidationRequest {
            tfs_collection_uri: "https://org".into(),
            pat: "pat".into(),
            team_project_name: "MEWP".into(),
            template_file: String::new(),
            upload_properties: UploadProperties::default(),
            formatting_settings: FormattingSettings::default(),
            external_bugs_file: None,
            external_l3_l4_file: Some(ExternalFileRef {
                bucket_name: "mewp-external-ingestion".into(),
                object_name: "MEWP/x/l3l4.csv".into(),
            }),
        };
        let value = serde_json::to_value(&request).unwrap();
        assert!(value.get("externalL3L4File").is_some());
    }
}
