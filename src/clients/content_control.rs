use serde::Serialize;
use serde_json::Value;

use crate::core::error::{expect_success, DocumentResult};
use crate::models::{
    ContentControl, ControlKind, DataDescriptor, ExternalFileRef, GeneratedControl,
    GenerationContext,
};

/// Client for the content-control computation service: template descriptors,
/// individual content blocks, the single-shot flat reporter, and external
/// file validation.
#[derive(Debug, Clone)]
pub struct ContentControlClient {
    http: reqwest::Client,
    base_url: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ControlPayload<'a> {
    #[serde(flatten)]
    context: &'a GenerationContext,
    content_control_options: ControlOptions<'a>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ControlOptions<'a> {
    title: &'a str,
    #[serde(rename = "type")]
    kind: &'a ControlKind,
    heading_level: u32,
    data: &'a DataDescriptor,
    is_excel_spreadsheet: bool,
}

impl<'a> ControlOptions<'a> {
    fn from_control(control: &'a ContentControl) -> Self {
        ControlOptions {
            title: &control.title,
            kind: &control.kind,
            heading_level: control.heading_level,
            data: &control.data,
            is_excel_spreadsheet: control.is_excel_spreadsheet,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ValidationPayload<'a> {
    #[serde(flatten)]
    context: &'a GenerationContext,
    content_control_options: ValidationOptions<'a>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ValidationOptions<'a> {
    data: ValidationData<'a>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ValidationData<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    external_bugs_file: Option<&'a ExternalFileRef>,
    #[serde(rename = "externalL3L4File", skip_serializing_if = "Option::is_none")]
    external_l3_l4_file: Option<&'a ExternalFileRef>,
}

impl ContentControlClient {
    pub fn new(http: reqwest::Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        ContentControlClient { http, base_url }
    }

    async fn post<T: Serialize + ?Sized>(
        &self,
        path: &str,
        payload: &T,
    ) -> DocumentResult<reqwest::Response> {
        let response = self
            .http
            .post(format!("{}/{path}", self.base_url))
            .json(payload)
            .send()
            .await?;
        expect_success(response).await
    }

    /// `POST /generate-doc-template`: fetch the template descriptor, once
    /// per request.
    pub async fn generate_doc_template(
        &self,
        context: &GenerationContext,
    ) -> DocumentResult<Value> {
        Ok(self.post("generate-doc-template", context).await?.json().await?)
    }

    /// `POST /generate-content-control`: compute one content block.
    pub async fn generate_content_control(
        &self,
        context: &GenerationContext,
        control: &ContentControl,
    ) -> DocumentResult<GeneratedControl> {
        let payload = ControlPayload {
            context,
            content_control_options: ControlOptions::from_control(control),
        };
        Ok(self
            .post("generate-content-control", &payload)
            .await?
            .json()
            .await?)
    }

    /// `POST /generate-test-reporter-flat`: single-shot descriptor for the
    /// flat test reporter.
    pub async fn generate_test_reporter_flat(
        &self,
        context: &GenerationContext,
        control: &ContentControl,
    ) -> DocumentResult<Value> {
        let payload = ControlPayload {
            context,
            content_control_options: ControlOptions::from_control(control),
        };
        Ok(self
            .post("generate-test-reporter-flat", &payload)
            .await?
            .json()
            .await?)
    }

    /// `POST /validate-mewp-external-files`: check caller-staged bug and
    /// requirement files; the verdict passes through verbatim.
    pub async fn validate_external_files(
        &self,
        context: &GenerationContext,
        external_bugs_file: Option<&ExternalFileRef>,
        external_l3_l4_file: Option<&ExternalFileRef>,
    ) -> DocumentResult<Value> {
        let payload = ValidationPayload {
            context,
            content_control_options: ValidationOptions {
                data: ValidationData {
                    external_bugs_file,
                    external_l3_l4_file,
                },
            },
        };
        Ok(self
            .post("validate-mewp-external-files", &payload)
            .await?
            .json()
            .await?)
    }
}
