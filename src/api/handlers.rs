use actix_web::{web, HttpResponse};
use serde_json::json;

use super::error::ApiResult;
use super::state::ApiState;
use crate::models::{DocumentRequest, ExternalFilesValidationRequest};

/// Build a composite document and hand back the artifact or its storage URL.
pub async fn create_document(
    data: web::Json<DocumentRequest>,
    state: web::Data<ApiState>,
) -> ApiResult<HttpResponse> {
    let document_url = state
        .pipeline
        .create_document(data.into_inner())
        .await
        .map_err(|err| {
            tracing::error!("failed to create document: {:?}", err);
            err
        })?;

    Ok(HttpResponse::Ok().json(json!({ "documentUrl": document_url })))
}

/// Single-shot flat test-reporter document.
pub async fn create_flat_test_reporter_document(
    data: web::Json<DocumentRequest>,
    state: web::Data<ApiState>,
) -> ApiResult<HttpResponse> {
    let document_url = state
        .pipeline
        .create_flat_test_reporter_document(data.into_inner())
        .await
        .map_err(|err| {
            tracing::error!("failed to create flat test reporter document: {:?}", err);
            err
        })?;

    Ok(HttpResponse::Ok().json(json!({ "documentUrl": document_url })))
}

/// Validate caller-staged external files; the upstream verdict is returned
/// as-is, success or failure.
pub async fn validate_external_files(
    data: web::Json<ExternalFilesValidationRequest>,
    state: web::Data<ApiState>,
) -> ApiResult<HttpResponse> {
    let verdict = state
        .pipeline
        .validate_external_files(data.into_inner())
        .await
        .map_err(|err| {
            tracing::error!("external file validation failed: {:?}", err);
            err
        })?;

    Ok(HttpResponse::Ok().json(verdict))
}
