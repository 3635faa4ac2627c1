use graft_core::PageId;
use graft_logging::graft_debug;
use serde_json::json;

use crate::bridge::{ExecuteRequest, PageBridge};

/// Harness run inside the page: evaluates the stored snippet and coerces the
/// outcome to a boolean, swallowing anything it throws.
const CONDITION_HARNESS: &str = "(code) => {
  try {
    return !!eval(code);
  } catch (_) {
    return false;
  }
}";

/// Evaluate a rule's condition snippet inside the page.
///
/// A blank snippet is trivially true and never touches the bridge. A failed
/// probe (snippet threw, page unreachable, host rejected the request) means
/// "not ready yet", never an error to the caller.
pub async fn evaluate_condition(bridge: &dyn PageBridge, page_id: PageId, snippet: &str) -> bool {
    if snippet.trim().is_empty() {
        return true;
    }

    let request = ExecuteRequest::new(page_id, CONDITION_HARNESS, vec![json!(snippet)]);
    match bridge.execute(request).await {
        // Ready only on an explicit boolean true from the page.
        Ok(value) => value.as_bool() == Some(true),
        Err(err) => {
            graft_debug!(
                "condition probe failed for page {}: {} ({})",
                page_id,
                err.kind,
                err.message
            );
            false
        }
    }
}
