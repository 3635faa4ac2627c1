//! Graft engine: rule storage, the page execution bridge, and the scheduler
//! runtime driving the core state machine.
mod bridge;
mod condition;
mod inject;
mod manifest;
mod runtime;
mod store;
mod types;

pub use bridge::{
    BridgeError, BridgeFailureKind, BridgeSettings, ExecuteRequest, HttpBridge, PageBridge,
};
pub use condition::evaluate_condition;
pub use inject::{inject_script, InjectOutcome};
pub use manifest::{ImportSettings, ManifestError, ManifestImporter};
pub use runtime::SchedulerHandle;
pub use store::{generate_rule_id, JsonFileStore, RuleStore, StoreError, STORAGE_KEY};
pub use types::{EngineEvent, NavigationSignal};
