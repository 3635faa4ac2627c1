use crate::{PageId, Rule, TaskKey};

/// Load progress carried by a navigation signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationStatus {
    Loading,
    Complete,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Msg {
    /// Host navigation signal for a page.
    PageLoaded {
        page_id: PageId,
        status: NavigationStatus,
        address: Option<String>,
    },
    /// Rule snapshot fetched for a completed navigation.
    RulesLoaded {
        page_id: PageId,
        address: String,
        rules: Vec<Rule>,
    },
    /// A task's delay or poll interval ran out.
    DelayElapsed { key: TaskKey },
    /// Outcome of an in-page condition probe.
    ConditionEvaluated { key: TaskKey, ready: bool },
    /// The host lost the page (closed or navigated elsewhere).
    PageClosed { page_id: PageId },
}
