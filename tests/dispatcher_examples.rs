//! Dispatcher end to end: raw request text in, response text out.

use json_rpc_correlate::prelude::*;
use json_rpc_correlate_integration_tests::{
    MIXED_BATCH, NOTIFICATION_BATCH, SUBTRACT_NAMED, SUBTRACT_POSITIONAL, calculator_dispatcher,
    init_tracing, mixed_batch_output,
};
use serde_json::{Value, json};

async fn exchange(text: &str) -> Option<Value> {
    calculator_dispatcher()
        .handle_message(text)
        .await
        .expect("dispatch succeeds")
        .map(|output| serde_json::from_str(&output).expect("response output is JSON"))
}

#[tokio::test]
async fn test_subtract_examples() {
    init_tracing();

    assert_eq!(
        exchange(SUBTRACT_POSITIONAL).await,
        Some(json!({"jsonrpc": "2.0", "result": 19, "id": 1}))
    );
    assert_eq!(
        exchange(SUBTRACT_NAMED).await,
        Some(json!({"jsonrpc": "2.0", "result": 19, "id": 3}))
    );
}

#[tokio::test]
async fn test_mixed_batch() {
    init_tracing();

    assert_eq!(exchange(MIXED_BATCH).await, Some(mixed_batch_output()));
}

#[tokio::test]
async fn test_notification_batch_sends_nothing() {
    assert_eq!(exchange(NOTIFICATION_BATCH).await, None);
    assert_eq!(
        exchange(r#"{"jsonrpc": "2.0", "method": "update", "params": [1,2,3,4,5]}"#).await,
        None
    );
}

#[tokio::test]
async fn test_protocol_faults() {
    assert_eq!(
        exchange(r#"{"jsonrpc": "2.0", "method": "foobar, "params": "bar", "baz]"#).await,
        Some(json!({"jsonrpc": "2.0", "error": {"code": -32700, "message": "Parse error"}, "id": null}))
    );
    assert_eq!(
        exchange("[1,2,3]").await.and_then(|output| output.as_array().map(Vec::len)),
        Some(3)
    );
    assert_eq!(
        exchange(r#"{"jsonrpc": "2.0", "method": "subtract", "params": [42], "id": 4}"#).await,
        Some(json!({"jsonrpc": "2.0", "error": {"code": -32602, "message": "Invalid params"}, "id": 4}))
    );
}

#[tokio::test]
async fn test_handle_response_keeps_request() {
    let dispatcher = calculator_dispatcher();
    let response = Response::new(SUBTRACT_POSITIONAL);

    let answered = dispatcher.handle_response(&response).await.unwrap();
    assert_eq!(answered.request(), response.request());
    assert_eq!(answered.result(), Some(&ResponseResult::success(19)));
    assert!(response.result().is_none());
}
