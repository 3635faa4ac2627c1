//! Graft core: pure rule-matching and injection-scheduling state machine.
mod editor;
mod effect;
mod matcher;
mod msg;
mod rule;
mod state;
mod update;

pub use editor::{build_rule, delete_rule, new_rule_id, placeholder_name, upsert_rule, RuleDraft};
pub use effect::Effect;
pub use matcher::Matcher;
pub use msg::{Msg, NavigationStatus};
pub use rule::{MatcherMode, Rule};
pub use state::{InjectionTask, PageId, SchedulerState, TaskKey, TaskPhase};
pub use update::update;
