use serde_json::Value;

use crate::clients::{ContentControlClient, RenderClient, ZipRequest};
use crate::core::error::DocumentResult;
use crate::models::{
    ContentControl, ControlKind, DocumentModel, DownloadableFile, GenerationContext, OutputFormat,
};
use crate::pipeline::{assembler, naming};

/// Final delivery decision for one assembled document.
///
/// Three mutually exclusive outcomes: a plain render, a render under the
/// canonical MEWP coverage name, or a zip bundling the main workbook with
/// one internal-validation workbook per qualifying source control. Whether
/// the result itself comes back inline or as a storage reference is the
/// caller's `enableDirectDownload` choice and independent of the mode.
pub struct PackagingEngine<'a> {
    content_control: &'a ContentControlClient,
    render: &'a RenderClient,
}

impl<'a> PackagingEngine<'a> {
    pub fn new(content_control: &'a ContentControlClient, render: &'a RenderClient) -> Self {
        PackagingEngine {
            content_control,
            render,
        }
    }

    pub async fn package(
        &self,
        context: &GenerationContext,
        controls: &[ContentControl],
        mut model: DocumentModel,
        format: OutputFormat,
    ) -> DocumentResult<Value> {
        let requested_file_name = model.upload_properties.file_name.clone();
        let mewp = controls
            .iter()
            .any(|control| control.kind == ControlKind::MewpStandaloneReporter);

        if format == OutputFormat::Excel && mewp {
            // The coverage workbook always ships under its canonical name,
            // whatever the caller asked for.
            model.upload_properties.file_name = naming::MEWP_COVERAGE_REPORT_FILE.to_string();
        }

        let sources: Vec<&ContentControl> = controls
            .iter()
            .filter(|control| is_validation_source(control))
            .collect();

        if format == OutputFormat::Excel && !sources.is_empty() {
            return self
                .package_zip(context, &sources, model, mewp, &requested_file_name)
                .await;
        }

        match format {
            OutputFormat::Word => self.render.create_word(&model).await,
            OutputFormat::Excel => self.render.create_excel(&model).await,
        }
    }

    /// Render the main workbook and one internal-validation workbook per
    /// source control, all inline, then hand the set to the zip operation.
    async fn package_zip(
        &self,
        context: &GenerationContext,
        sources: &[&ContentControl],
        model: DocumentModel,
        mewp: bool,
        requested_file_name: &str,
    ) -> DocumentResult<Value> {
        let zip_upload_properties = model.upload_properties.clone();

        let mut main_model = model;
        main_model.upload_properties.enable_direct_download = true;
        let main_payload = self.render.create_excel(&main_model).await?;
        let mut files = vec![DownloadableFile::from_render_payload(main_payload)?];

        for source in sources {
            let control = internal_validation_control(source);
            tracing::info!(
                "generating {} content for: {}",
                control.kind,
                control.title
            );
            let generated = self
                .content_control
                .generate_content_control(context, &control)
                .await?;

            let mut upload_properties = main_model.upload_properties.clone();
            upload_properties.file_name = naming::INTERNAL_VALIDATION_REPORT_FILE.to_string();
            let validation_model = assembler::assemble_document(
                Value::Object(main_model.template.clone()),
                upload_properties,
                main_model.formatting_settings.clone(),
                vec![generated],
            );

            let payload = self.render.create_excel(&validation_model).await?;
            files.push(DownloadableFile::from_render_payload(payload)?);
        }

        let mut upload_properties = zip_upload_properties;
        upload_properties.file_name = naming::zip_file_name(requested_file_name, mewp);
        self.render
            .create_zip(&ZipRequest {
                upload_properties,
                files,
            })
            .await
    }
}

/// A control qualifies for a secondary internal-validation workbook only if
/// it is a test or MEWP standalone reporter that asked for one.
fn is_validation_source(control: &ContentControl) -> bool {
    let eligible = match control.kind {
        ControlKind::TestReporter | ControlKind::MewpStandaloneReporter => true,
        ControlKind::TestReporterFlat
        | ControlKind::InternalValidationReporter
        | ControlKind::Other(_) => false,
    };
    eligible && control.data.include_internal_validation_report
}

/// Build the follow-up generation request for one source control. MEWP
/// standalone sources keep their `useRelFallback` choice (defaulting to
/// true); every other source has it forced off.
fn internal_validation_control(source: &ContentControl) -> ContentControl {
    let use_rel_fallback = match source.kind {
        ControlKind::MewpStandaloneReporter => source.data.use_rel_fallback.unwrap_or(true),
        ControlKind::TestReporter
        | ControlKind::TestReporterFlat
        | ControlKind::InternalValidationReporter
        | ControlKind::Other(_) => false,
    };

    let mut data = source.data.clone();
    data.use_rel_fallback = Some(use_rel_fallback);

    ContentControl {
        title: naming::INTERNAL_VALIDATION_CONTROL_TITLE.to_string(),
        kind: ControlKind::InternalValidationReporter,
        heading_level: source.heading_level,
        data,
        is_excel_spreadsheet: true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::DataDescriptor;
    use serde_json::json;

    fn control(kind: ControlKind, data: Value) -> ContentControl {
        ContentControl {
            title: "cc".into(),
            kind,
            heading_level: 2,
            data: serde_json::from_value(data).unwrap(),
            is_excel_spreadsheet: true,
        }
    }

    #[test]
    fn only_reporter_controls_with_the_flag_are_sources() {
        assert!(is_validation_source(&control(
            ControlKind::TestReporter,
            json!({ "includeInternalValidationReport": true })
        )));
        assert!(is_validation_source(&control(
            ControlKind::MewpStandaloneReporter,
            json!({ "includeInternalValidationReport": true })
        )));
        assert!(!is_validation_source(&control(
            ControlKind::TestReporter,
            json!({ "includeInternalValidationReport": false })
        )));
        assert!(!is_validation_source(&control(
            ControlKind::TestReporterFlat,
            json!({ "includeInternalValidationReport": true })
        )));
        assert!(!is_validation_source(&control(
            ControlKind::Other("paragraph".into()),
            json!({ "includeInternalValidationReport": true })
        )));
    }

    #[test]
    fn mewp_sources_keep_use_rel_fallback_defaulting_to_true() {
        let follow_up = internal_validation_control(&control(
            ControlKind::MewpStandaloneReporter,
            json!({ "includeInternalValidationReport": true }),
        ));
        assert_eq!(follow_up.data.use_rel_fallback, Some(true));

        let follow_up = internal_validation_control(&control(
            ControlKind::MewpStandaloneReporter,
            json!({ "includeInternalValidationReport": true, "useRelFallback": false }),
        ));
        assert_eq!(follow_up.data.use_rel_fallback, Some(false));
    }

    #[test]
    fn non_mewp_sources_have_use_rel_fallback_forced_off() {
        let follow_up = internal_validation_control(&control(
            ControlKind::TestReporter,
            json!({ "includeInternalValidationReport": true, "useRelFallback": true }),
        ));
        assert_eq!(follow_up.data.use_rel_fallback, Some(false));
    }

    #[test]
    fn follow_up_control_carries_source_data_and_canonical_title() {
        let source = control(
            ControlKind::MewpStandaloneReporter,
            json!({ "includeInternalValidationReport": true, "testPlanId": 34 }),
        );
        let follow_up = internal_validation_control(&source);

        assert_eq!(follow_up.kind, ControlKind::InternalValidationReporter);
        assert_eq!(follow_up.title, naming::INTERNAL_VALIDATION_CONTROL_TITLE);
        assert_eq!(follow_up.heading_level, source.heading_level);
        assert!(follow_up.data.include_internal_validation_report);
        assert_eq!(follow_up.data.rest["testPlanId"], json!(34));
        assert!(follow_up.is_excel_spreadsheet);
    }

    #[test]
    fn data_descriptor_clone_keeps_opaque_fields_independent() {
        let source = control(
            ControlKind::TestReporter,
            json!({ "includeInternalValidationReport": true, "testPlanId": 12 }),
        );
        let follow_up = internal_validation_control(&source);
        let original: &DataDescriptor = &source.data;
        assert_eq!(original.use_rel_fallback, None);
        assert_eq!(follow_up.data.use_rel_fallback, Some(false));
    }
}
