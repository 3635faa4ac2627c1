use std::collections::BTreeMap;
use std::time::Duration;

/// Identifier the host assigns to one page instance.
pub type PageId = u64;

/// Registry key for one (page instance, matched rule) pairing.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TaskKey {
    pub page_id: PageId,
    pub rule_id: String,
}

/// Where a live injection task currently sits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskPhase {
    /// Sleeping out a delay or poll interval.
    Waiting,
    /// A condition probe is in flight.
    Probing,
}

/// One scheduled application of a matched rule to a page load.
///
/// Tasks are ephemeral: created when a navigation-complete event matches a
/// rule, removed once injection is handed off or the page is torn down.
#[derive(Debug, Clone, PartialEq)]
pub struct InjectionTask {
    pub script: String,
    pub condition: Option<String>,
    pub delay: Option<Duration>,
    pub phase: TaskPhase,
}

/// Scheduler state: the explicit registry of in-flight injection tasks.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SchedulerState {
    tasks: BTreeMap<TaskKey, InjectionTask>,
}

impl SchedulerState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn task_count(&self) -> usize {
        self.tasks.len()
    }

    pub fn page_task_count(&self, page_id: PageId) -> usize {
        self.tasks.keys().filter(|key| key.page_id == page_id).count()
    }

    pub fn phase(&self, key: &TaskKey) -> Option<TaskPhase> {
        self.tasks.get(key).map(|task| task.phase)
    }

    pub(crate) fn insert(&mut self, key: TaskKey, task: InjectionTask) {
        self.tasks.insert(key, task);
    }

    pub(crate) fn take(&mut self, key: &TaskKey) -> Option<InjectionTask> {
        self.tasks.remove(key)
    }

    /// Drop every task for a page. Returns how many were removed.
    pub(crate) fn remove_page(&mut self, page_id: PageId) -> usize {
        let before = self.tasks.len();
        self.tasks.retain(|key, _| key.page_id != page_id);
        before - self.tasks.len()
    }
}
