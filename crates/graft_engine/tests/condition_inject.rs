use std::collections::VecDeque;
use std::sync::Mutex;

use graft_engine::{
    evaluate_condition, inject_script, BridgeError, BridgeFailureKind, ExecuteRequest,
    InjectOutcome, PageBridge,
};
use serde_json::{json, Value};

/// Bridge double that records every request and answers from a scripted
/// queue (empty queue answers `null`).
#[derive(Default)]
struct ScriptedBridge {
    calls: Mutex<Vec<ExecuteRequest>>,
    results: Mutex<VecDeque<Result<Value, BridgeError>>>,
}

impl ScriptedBridge {
    fn answering(results: Vec<Result<Value, BridgeError>>) -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            results: Mutex::new(results.into()),
        }
    }

    fn calls(&self) -> Vec<ExecuteRequest> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl PageBridge for ScriptedBridge {
    async fn execute(&self, request: ExecuteRequest) -> Result<Value, BridgeError> {
        self.calls.lock().unwrap().push(request);
        self.results
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Ok(Value::Null))
    }
}

fn rejected() -> BridgeError {
    BridgeError {
        kind: BridgeFailureKind::Rejected,
        message: "no page with id 1".to_string(),
    }
}

#[tokio::test]
async fn blank_condition_is_true_without_a_probe() {
    let bridge = ScriptedBridge::default();

    assert!(evaluate_condition(&bridge, 1, "").await);
    assert!(evaluate_condition(&bridge, 1, "   \n\t").await);
    assert!(bridge.calls().is_empty());
}

#[tokio::test]
async fn only_an_explicit_true_counts_as_ready() {
    let bridge = ScriptedBridge::answering(vec![
        Ok(json!(true)),
        Ok(json!(false)),
        Ok(json!("yes")),
        Ok(json!(1)),
        Ok(Value::Null),
    ]);

    assert!(evaluate_condition(&bridge, 1, "window.ready").await);
    assert!(!evaluate_condition(&bridge, 1, "window.ready").await);
    assert!(!evaluate_condition(&bridge, 1, "window.ready").await);
    assert!(!evaluate_condition(&bridge, 1, "window.ready").await);
    assert!(!evaluate_condition(&bridge, 1, "window.ready").await);
}

#[tokio::test]
async fn probe_failure_means_not_ready() {
    let bridge = ScriptedBridge::answering(vec![Err(rejected())]);

    assert!(!evaluate_condition(&bridge, 1, "window.ready").await);
}

#[tokio::test]
async fn probe_ships_the_snippet_through_the_eval_harness() {
    let bridge = ScriptedBridge::answering(vec![Ok(json!(true))]);

    evaluate_condition(&bridge, 42, "window.ready === true").await;

    let calls = bridge.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].target_page, 42);
    assert_eq!(calls[0].execution_world, "page");
    assert!(calls[0].code.contains("eval(code)"));
    assert_eq!(calls[0].args, vec![json!("window.ready === true")]);
}

#[tokio::test]
async fn blank_script_is_a_silent_noop() {
    let bridge = ScriptedBridge::default();

    let outcome = inject_script(&bridge, 1, "   \n ").await.expect("noop ok");
    assert_eq!(outcome, InjectOutcome::SkippedEmpty);
    assert!(bridge.calls().is_empty());
}

#[tokio::test]
async fn script_is_delivered_through_the_document_append_harness() {
    let bridge = ScriptedBridge::default();

    let outcome = inject_script(&bridge, 7, "console.log('hi');")
        .await
        .expect("delivery ok");
    assert_eq!(outcome, InjectOutcome::Delivered);

    let calls = bridge.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].target_page, 7);
    assert!(calls[0].code.contains("createElement('script')"));
    assert!(calls[0].code.contains("appendChild"));
    assert_eq!(calls[0].args, vec![json!("console.log('hi');")]);
}

#[tokio::test]
async fn delivery_failure_is_returned_to_the_caller() {
    let bridge = ScriptedBridge::answering(vec![Err(rejected())]);

    let err = inject_script(&bridge, 1, "console.log('hi');")
        .await
        .unwrap_err();
    assert_eq!(err.kind, BridgeFailureKind::Rejected);
}
