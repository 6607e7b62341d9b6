pub mod assembler;
pub mod fanout;
pub mod format;
pub mod naming;
pub mod packaging;

use serde_json::Value;

use crate::clients::{ContentControlClient, RenderClient};
use crate::core::config::{AppConfig, StorageDefaults};
use crate::core::error::{DocumentError, DocumentResult};
use crate::models::{
    DocumentRequest, ExternalFilesValidationRequest, FormattingSettings, GenerationContext,
    OutputFormat, UploadProperties,
};
use packaging::PackagingEngine;

const CONTEXT_OUTPUT_TYPE: &str = "json";

/// End-to-end assembly pipeline: validate, normalize, fetch the template
/// descriptor, fan out content-control generation, assemble, pick the
/// render target, package.
#[derive(Debug, Clone)]
pub struct DocumentPipeline {
    content_control: ContentControlClient,
    render: RenderClient,
    storage_defaults: StorageDefaults,
    attachments_bucket_name: String,
}

impl DocumentPipeline {
    pub fn new(config: &AppConfig) -> DocumentResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()?;

        Ok(DocumentPipeline {
            content_control: ContentControlClient::new(http.clone(), &config.content_control_url),
            render: RenderClient::new(http, &config.render_service_url),
            storage_defaults: config.storage_defaults.clone(),
            attachments_bucket_name: config.attachments_bucket_name.clone(),
        })
    }

    /// Build one composite document and return the artifact (inline file or
    /// storage reference) exactly as the render service produced it.
    pub async fn create_document(&self, mut request: DocumentRequest) -> DocumentResult<Value> {
        request.validate()?;
        self.prepare_upload_properties(&mut request.upload_properties);
        let context = self.generation_context(
            &request.tfs_collection_uri,
            &request.pat,
            &request.team_project_name,
            &request.template_file,
            &request.upload_properties,
            &request.formatting_settings,
        );

        let template = self.content_control.generate_doc_template(&context).await?;
        tracing::debug!("generated template descriptor");

        let controls = fanout::generate_content_controls(
            &self.content_control,
            &context,
            &request.content_controls,
        )
        .await?;

        let model = assembler::assemble_document(
            template,
            request.upload_properties.clone(),
            request.formatting_settings.clone(),
            controls,
        );
        let format = format::select_output_format(&model.json_data_list);

        PackagingEngine::new(&self.content_control, &self.render)
            .package(&context, &request.content_controls, model, format)
            .await
    }

    /// Flat test-reporter variant: one descriptor call instead of the
    /// template-plus-fanout pair, always rendered as excel.
    pub async fn create_flat_test_reporter_document(
        &self,
        mut request: DocumentRequest,
    ) -> DocumentResult<Value> {
        request.validate()?;
        self.prepare_upload_properties(&mut request.upload_properties);
        let context = self.generation_context(
            &request.tfs_collection_uri,
            &request.pat,
            &request.team_project_name,
            &request.template_file,
            &request.upload_properties,
            &request.formatting_settings,
        );

        let control = request
            .content_controls
            .first()
            .ok_or_else(|| DocumentError::Validation("contentControls must not be empty".into()))?;
        let descriptor = self
            .content_control
            .generate_test_reporter_flat(&context, control)
            .await?;

        let model = assembler::assemble_document(
            descriptor,
            request.upload_properties.clone(),
            request.formatting_settings.clone(),
            Vec::new(),
        );

        PackagingEngine::new(&self.content_control, &self.render)
            .package(&context, &request.content_controls, model, OutputFormat::Excel)
            .await
    }

    /// Forward an external-file validation request. The verdict, or the
    /// structured failure, passes through untouched.
    pub async fn validate_external_files(
        &self,
        mut request: ExternalFilesValidationRequest,
    ) -> DocumentResult<Value> {
        request.validate()?;
        self.prepare_upload_properties(&mut request.upload_properties);
        let context = self.generation_context(
            &request.tfs_collection_uri,
            &request.pat,
            &request.team_project_name,
            &request.template_file,
            &request.upload_properties,
            &request.formatting_settings,
        );

        self.content_control
            .validate_external_files(
                &context,
                request.external_bugs_file.as_ref(),
                request.external_l3_l4_file.as_ref(),
            )
            .await
    }

    fn prepare_upload_properties(&self, upload: &mut UploadProperties) {
        assembler::fill_storage_defaults(upload, &self.storage_defaults);
        upload.bucket_name = assembler::normalize_bucket_name(&upload.bucket_name);
    }

    fn generation_context(
        &self,
        tfs_collection_uri: &str,
        pat: &str,
        team_project_name: &str,
        template_file: &str,
        upload: &UploadProperties,
        formatting_settings: &FormattingSettings,
    ) -> GenerationContext {
        GenerationContext {
            org_url: tfs_collection_uri.to_string(),
            token: pat.to_string(),
            project_name: team_project_name.to_string(),
            output_type: CONTEXT_OUTPUT_TYPE.to_string(),
            template_url: template_file.to_string(),
            minio_end_point: upload.service_url.clone().unwrap_or_default(),
            minio_access_key: upload.access_key_id.clone().unwrap_or_default(),
            minio_secret_key: upload.secret_access_key.clone().unwrap_or_default(),
            attachments_bucket_name: self.attachments_bucket_name.clone(),
            formatting_settings: formatting_settings.clone(),
        }
    }
}
