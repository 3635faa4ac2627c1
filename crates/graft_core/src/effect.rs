use std::time::Duration;

use crate::{PageId, TaskKey};

#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Fetch the current rule snapshot for a completed navigation.
    LoadRules { page_id: PageId, address: String },
    /// Arm (or re-arm) a task's delay timer.
    StartDelay { key: TaskKey, delay: Duration },
    /// Run a task's condition snippet inside the page.
    EvaluateCondition { key: TaskKey, snippet: String },
    /// Deliver a script into the page, exactly once for this task.
    Inject { key: TaskKey, script: String },
    /// Abort any timers still pending for a torn-down page.
    CancelPage { page_id: PageId },
}
