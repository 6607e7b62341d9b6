use serde_json::{Map, Value};

use crate::core::config::StorageDefaults;
use crate::models::{DocumentModel, FormattingSettings, GeneratedControl, UploadProperties};

/// Fill unset storage credentials from process-level defaults. Explicitly
/// supplied request values are never overridden.
pub fn fill_storage_defaults(upload: &mut UploadProperties, defaults: &StorageDefaults) {
    if upload.access_key_id.is_none() {
        upload.access_key_id = defaults.access_key_id.clone();
    }
    if upload.secret_access_key.is_none() {
        upload.secret_access_key = defaults.secret_access_key.clone();
    }
    if upload.region.is_none() {
        upload.region = defaults.region.clone();
    }
    if upload.service_url.is_none() {
        upload.service_url = defaults.service_url.clone();
    }
}

/// Lower-case the bucket name, then rewrite the first `_` to `-` and drop
/// the first space. Only the first occurrence of each is touched; any
/// further underscores or spaces survive.
pub fn normalize_bucket_name(name: &str) -> String {
    name.to_lowercase().replacen('_', "-", 1).replacen(' ', "", 1)
}

/// Merge the template descriptor with the fanout output into the final
/// renderable model. `json_data_list[i]` stays aligned with input control
/// `i`; attachment lists are concatenated in that same order.
pub fn assemble_document(
    template: Value,
    upload_properties: UploadProperties,
    formatting_settings: FormattingSettings,
    controls: Vec<GeneratedControl>,
) -> DocumentModel {
    let template = match template {
        Value::Object(map) => map,
        _ => Map::new(),
    };

    let mut attachments = Vec::new();
    for control in &controls {
        if let Some(data) = &control.minio_attachment_data {
            attachments.extend(data.iter().cloned());
        }
    }

    DocumentModel {
        template,
        upload_properties,
        json_data_list: controls,
        minio_attachment_data: attachments,
        formatting_settings,
    }
}
