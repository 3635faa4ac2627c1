use url::Url;

use crate::{
    Effect, InjectionTask, Msg, NavigationStatus, PageId, Rule, SchedulerState, TaskKey, TaskPhase,
};

/// Address schemes belonging to the browser's own privileged surfaces.
/// Their addresses are never matched against rules.
const INTERNAL_SCHEMES: &[&str] = &["chrome", "chrome-extension"];

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: SchedulerState, msg: Msg) -> (SchedulerState, Vec<Effect>) {
    let effects = match msg {
        Msg::PageLoaded {
            page_id,
            status,
            address,
        } => {
            if status != NavigationStatus::Complete {
                return (state, Vec::new());
            }
            let Some(address) = address else {
                return (state, Vec::new());
            };
            if is_internal_address(&address) {
                return (state, Vec::new());
            }
            // A fresh load means the previous document, and any tasks still
            // polling it, is gone.
            let mut effects = teardown_page(&mut state, page_id);
            effects.push(Effect::LoadRules { page_id, address });
            effects
        }
        Msg::RulesLoaded {
            page_id,
            address,
            rules,
        } => {
            // Every matching rule starts an independent task, in rule list
            // order. No dedupe, no priority.
            let mut effects = Vec::new();
            for rule in &rules {
                if rule.compiled_matcher().test(&address) {
                    schedule(&mut state, page_id, rule, &mut effects);
                }
            }
            effects
        }
        Msg::DelayElapsed { key } => {
            let Some(mut task) = state.take(&key) else {
                // Stale timer for a torn-down task.
                return (state, Vec::new());
            };
            if task.phase != TaskPhase::Waiting {
                state.insert(key, task);
                return (state, Vec::new());
            }
            match task.condition.clone() {
                Some(snippet) => {
                    task.phase = TaskPhase::Probing;
                    state.insert(key.clone(), task);
                    vec![Effect::EvaluateCondition { key, snippet }]
                }
                None => vec![Effect::Inject {
                    key,
                    script: task.script,
                }],
            }
        }
        Msg::ConditionEvaluated { key, ready } => {
            let Some(mut task) = state.take(&key) else {
                return (state, Vec::new());
            };
            if task.phase != TaskPhase::Probing {
                state.insert(key, task);
                return (state, Vec::new());
            }
            if ready {
                vec![Effect::Inject {
                    key,
                    script: task.script,
                }]
            } else if let Some(delay) = task.delay {
                // Not ready: the delay doubles as the poll interval.
                task.phase = TaskPhase::Waiting;
                state.insert(key.clone(), task);
                vec![Effect::StartDelay { key, delay }]
            } else {
                // No poll interval to retry on; the task ends without
                // injecting.
                Vec::new()
            }
        }
        Msg::PageClosed { page_id } => teardown_page(&mut state, page_id),
    };

    (state, effects)
}

/// Register one injection task for a matched rule and emit its first effect.
fn schedule(state: &mut SchedulerState, page_id: PageId, rule: &Rule, effects: &mut Vec<Effect>) {
    let key = TaskKey {
        page_id,
        rule_id: rule.id.clone(),
    };
    let delay = rule.effective_delay();
    let condition = rule.effective_condition().map(str::to_owned);

    match (condition, delay) {
        (None, None) => {
            // Inject in the same scheduling step; nothing to register.
            effects.push(Effect::Inject {
                key,
                script: rule.script_content.clone(),
            });
        }
        (None, Some(delay)) => {
            state.insert(
                key.clone(),
                InjectionTask {
                    script: rule.script_content.clone(),
                    condition: None,
                    delay: Some(delay),
                    phase: TaskPhase::Waiting,
                },
            );
            effects.push(Effect::StartDelay { key, delay });
        }
        (Some(condition), None) => {
            let snippet = condition.clone();
            state.insert(
                key.clone(),
                InjectionTask {
                    script: rule.script_content.clone(),
                    condition: Some(condition),
                    delay: None,
                    phase: TaskPhase::Probing,
                },
            );
            effects.push(Effect::EvaluateCondition { key, snippet });
        }
        (Some(condition), Some(delay)) => {
            // The condition is first probed after the delay, not at once.
            state.insert(
                key.clone(),
                InjectionTask {
                    script: rule.script_content.clone(),
                    condition: Some(condition),
                    delay: Some(delay),
                    phase: TaskPhase::Waiting,
                },
            );
            effects.push(Effect::StartDelay { key, delay });
        }
    }
}

fn teardown_page(state: &mut SchedulerState, page_id: PageId) -> Vec<Effect> {
    if state.remove_page(page_id) == 0 {
        Vec::new()
    } else {
        vec![Effect::CancelPage { page_id }]
    }
}

fn is_internal_address(address: &str) -> bool {
    Url::parse(address)
        .map(|url| INTERNAL_SCHEMES.contains(&url.scheme()))
        .unwrap_or(false)
}
