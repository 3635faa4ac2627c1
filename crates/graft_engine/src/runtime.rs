use std::collections::{HashMap, VecDeque};
use std::sync::{mpsc, Arc};
use std::thread;

use graft_core::{update, Effect, Msg, PageId, SchedulerState, TaskKey};
use graft_logging::{graft_debug, graft_info, graft_warn};
use tokio::task::JoinHandle;

use crate::bridge::PageBridge;
use crate::condition::evaluate_condition;
use crate::inject::inject_script;
use crate::store::RuleStore;
use crate::types::{EngineEvent, NavigationSignal};

enum SchedulerCommand {
    Navigation(NavigationSignal),
    PageClosed { page_id: PageId },
}

enum LoopEvent {
    Msg(Msg),
    HostDisconnected,
}

/// Handle to the scheduler loop: navigation signals in, injection events out.
///
/// The loop runs on its own thread with a dedicated runtime; dropping the
/// handle shuts it down and aborts any still-pending timers.
pub struct SchedulerHandle {
    cmd_tx: mpsc::Sender<SchedulerCommand>,
    event_rx: mpsc::Receiver<EngineEvent>,
}

impl SchedulerHandle {
    pub fn new(store: Arc<dyn RuleStore>, bridge: Arc<dyn PageBridge>) -> Self {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();

        thread::spawn(move || {
            let runtime = tokio::runtime::Runtime::new().expect("tokio runtime");
            runtime.block_on(run_scheduler(store, bridge, cmd_rx, event_tx));
        });

        Self { cmd_tx, event_rx }
    }

    /// Feed one navigation signal from the host event source.
    pub fn notify_navigation(&self, signal: NavigationSignal) {
        let _ = self.cmd_tx.send(SchedulerCommand::Navigation(signal));
    }

    /// Tell the scheduler a page is gone so its tasks stop polling.
    pub fn notify_page_closed(&self, page_id: PageId) {
        let _ = self.cmd_tx.send(SchedulerCommand::PageClosed { page_id });
    }

    /// Drain one pending engine event, if any.
    pub fn try_recv(&self) -> Option<EngineEvent> {
        self.event_rx.try_recv().ok()
    }
}

async fn run_scheduler(
    store: Arc<dyn RuleStore>,
    bridge: Arc<dyn PageBridge>,
    cmd_rx: mpsc::Receiver<SchedulerCommand>,
    event_tx: mpsc::Sender<EngineEvent>,
) {
    let (msg_tx, mut msg_rx) = tokio::sync::mpsc::unbounded_channel::<LoopEvent>();

    // Blocking bridge from the host-facing channel into the async loop.
    {
        let msg_tx = msg_tx.clone();
        thread::spawn(move || {
            while let Ok(command) = cmd_rx.recv() {
                let msg = match command {
                    SchedulerCommand::Navigation(signal) => Msg::PageLoaded {
                        page_id: signal.page_id,
                        status: signal.status,
                        address: signal.address,
                    },
                    SchedulerCommand::PageClosed { page_id } => Msg::PageClosed { page_id },
                };
                if msg_tx.send(LoopEvent::Msg(msg)).is_err() {
                    break;
                }
            }
            // Handle dropped: tell the loop to wind down.
            let _ = msg_tx.send(LoopEvent::HostDisconnected);
        });
    }

    let mut state = SchedulerState::new();
    let mut timers: HashMap<TaskKey, JoinHandle<()>> = HashMap::new();

    while let Some(event) = msg_rx.recv().await {
        let msg = match event {
            LoopEvent::Msg(msg) => msg,
            LoopEvent::HostDisconnected => break,
        };
        // Drain this message and any synchronously-resolved follow-ups before
        // touching the channel again, so a navigation's rule snapshot is
        // applied atomically with respect to later signals.
        let mut queue = VecDeque::from([msg]);
        while let Some(msg) = queue.pop_front() {
            if let Msg::DelayElapsed { key } = &msg {
                timers.remove(key);
            }

            let (next, effects) = update(std::mem::take(&mut state), msg);
            state = next;

            for effect in effects {
                match effect {
                    Effect::LoadRules { page_id, address } => {
                        let rules = store.get();
                        graft_debug!(
                            "page {} finished loading {}; {} rules in snapshot",
                            page_id,
                            address,
                            rules.len()
                        );
                        queue.push_back(Msg::RulesLoaded {
                            page_id,
                            address,
                            rules,
                        });
                    }
                    Effect::StartDelay { key, delay } => {
                        let msg_tx = msg_tx.clone();
                        let timer_key = key.clone();
                        let handle = tokio::spawn(async move {
                            tokio::time::sleep(delay).await;
                            let _ = msg_tx.send(LoopEvent::Msg(Msg::DelayElapsed { key: timer_key }));
                        });
                        if let Some(stale) = timers.insert(key, handle) {
                            stale.abort();
                        }
                    }
                    Effect::EvaluateCondition { key, snippet } => {
                        let bridge = bridge.clone();
                        let msg_tx = msg_tx.clone();
                        tokio::spawn(async move {
                            let ready =
                                evaluate_condition(bridge.as_ref(), key.page_id, &snippet).await;
                            let _ =
                                msg_tx.send(LoopEvent::Msg(Msg::ConditionEvaluated { key, ready }));
                        });
                    }
                    Effect::Inject { key, script } => {
                        let bridge = bridge.clone();
                        let event_tx = event_tx.clone();
                        tokio::spawn(async move {
                            match inject_script(bridge.as_ref(), key.page_id, &script).await {
                                Ok(_outcome) => {
                                    graft_info!(
                                        "injected rule {} into page {}",
                                        key.rule_id,
                                        key.page_id
                                    );
                                    let _ = event_tx.send(EngineEvent::Injected {
                                        page_id: key.page_id,
                                        rule_id: key.rule_id,
                                    });
                                }
                                Err(error) => {
                                    graft_warn!(
                                        "injection of rule {} into page {} failed: {} ({})",
                                        key.rule_id,
                                        key.page_id,
                                        error.kind,
                                        error.message
                                    );
                                    let _ = event_tx.send(EngineEvent::InjectionFailed {
                                        page_id: key.page_id,
                                        rule_id: key.rule_id,
                                        error,
                                    });
                                }
                            }
                        });
                    }
                    Effect::CancelPage { page_id } => {
                        timers.retain(|key, handle| {
                            if key.page_id == page_id {
                                handle.abort();
                                false
                            } else {
                                true
                            }
                        });
                    }
                }
            }
        }
    }

    for handle in timers.into_values() {
        handle.abort();
    }
}
