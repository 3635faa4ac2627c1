use graft_core::{NavigationStatus, PageId};

use crate::bridge::BridgeError;

/// One page-load signal from the host event source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationSignal {
    pub page_id: PageId,
    pub status: NavigationStatus,
    pub address: Option<String>,
}

/// Observable outcome of a scheduled injection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    /// The rule's script was handed to the page (or was blank and trivially
    /// succeeded).
    Injected { page_id: PageId, rule_id: String },
    /// Delivery to the page failed; the task is not retried.
    InjectionFailed {
        page_id: PageId,
        rule_id: String,
        error: BridgeError,
    },
}
