use futures::future::try_join_all;

use crate::clients::ContentControlClient;
use crate::core::error::DocumentResult;
use crate::models::{ContentControl, GeneratedControl, GenerationContext};

/// Generate every content control concurrently.
///
/// Results come back in input order regardless of completion order. The
/// first failure aborts the join and propagates as-is; siblings still in
/// flight are dropped rather than awaited.
pub async fn generate_content_controls(
    client: &ContentControlClient,
    context: &GenerationContext,
    controls: &[ContentControl],
) -> DocumentResult<Vec<GeneratedControl>> {
    try_join_all(controls.iter().map(|control| {
        tracing::info!("generating {} content for: {}", control.kind, control.title);
        client.generate_content_control(context, control)
    }))
    .await
}
