use graft_core::PageId;
use serde_json::json;

use crate::bridge::{BridgeError, ExecuteRequest, PageBridge};

/// Harness run inside the page: wraps the script in a blob URL and appends it
/// as a `<script>` element, so it runs in the page's own top-level scope with
/// normal document-append semantics.
const INJECT_HARNESS: &str = "(code) => {
  const blob = new Blob([code], { type: 'application/javascript' });
  const url = URL.createObjectURL(blob);
  const script = document.createElement('script');
  script.src = url;
  document.documentElement.appendChild(script);
}";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InjectOutcome {
    /// The script was handed to the page.
    Delivered,
    /// Blank content; nothing to deliver.
    SkippedEmpty,
}

/// Deliver a rule's script into the page's top-level script context, exactly
/// once.
///
/// Blank or whitespace-only content succeeds trivially without touching the
/// bridge. Delivery failures are returned to the caller and never retried
/// here; retry policy lives entirely in the scheduler.
pub async fn inject_script(
    bridge: &dyn PageBridge,
    page_id: PageId,
    script: &str,
) -> Result<InjectOutcome, BridgeError> {
    if script.trim().is_empty() {
        return Ok(InjectOutcome::SkippedEmpty);
    }

    let request = ExecuteRequest::new(page_id, INJECT_HARNESS, vec![json!(script)]);
    // Fire and forget: the harness produces nothing worth reading.
    bridge.execute(request).await?;
    Ok(InjectOutcome::Delivered)
}
