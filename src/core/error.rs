use serde_json::Value;

/// Errors surfaced by the document pipeline.
///
/// Upstream failures are classified once, at the collaborator boundary:
/// responses carrying a machine-readable `code` (and every 422) keep their
/// status and body end-to-end, anything else collapses to a plain message,
/// and transport failures pass through untouched.
#[derive(Debug, thiserror::Error)]
pub enum DocumentError {
    /// Mandatory request fields are missing; rejected before any outbound call.
    #[error("{0}")]
    Validation(String),

    /// Upstream rejected the call with a structured body.
    #[error("{message}")]
    StructuredUpstream {
        status_code: u16,
        code: Option<String>,
        message: String,
        details: Value,
    },

    /// Upstream failure with nothing but a message to go on.
    #[error("{0}")]
    GenericUpstream(String),

    /// Network-level failure, no upstream response involved.
    #[error(transparent)]
    Transport(#[from] reqwest::Error),
}

pub type DocumentResult<T> = Result<T, DocumentError>;

const DEFAULT_UPSTREAM_MESSAGE: &str = "upstream service call failed";

/// Pass 2xx responses through; everything else becomes a classified error.
pub(crate) async fn expect_success(response: reqwest::Response) -> DocumentResult<reqwest::Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let text = response.text().await?;
    let body = serde_json::from_str::<Value>(&text).unwrap_or(Value::String(text));
    Err(classify_upstream(status.as_u16(), body))
}

/// Classify a non-2xx collaborator response into the error taxonomy.
///
/// A `code` field in the body, or a 422 status, marks the failure as
/// structured; the full body travels along as `details`.
pub(crate) fn classify_upstream(status: u16, body: Value) -> DocumentError {
    let code = body.get("code").and_then(Value::as_str).map(str::to_owned);
    let message = body
        .get("message")
        .and_then(Value::as_str)
        .or_else(|| body.as_str())
        .filter(|message| !message.is_empty())
        .map(str::to_owned)
        .unwrap_or_else(|| DEFAULT_UPSTREAM_MESSAGE.to_string());

    if code.is_some() || status == 422 {
        DocumentError::StructuredUpstream {
            status_code: status,
            code,
            message,
            details: body,
        }
    } else {
        DocumentError::GenericUpstream(message)
    }
}
