//! Batch correlation
//!
//! Batches from the JSON-RPC 2.0 specification, resolved through a result
//! collection, the slot cursor and raw-text lookup.

use json_rpc_correlate::prelude::*;
use json_rpc_correlate_integration_tests::{
    MIXED_BATCH, NOTIFICATION_BATCH, init_tracing, mixed_batch_output, mixed_batch_results,
};
use serde_json::{Value, json};

fn wire(response: &Response) -> Option<Value> {
    response
        .to_json_string()
        .map(|text| serde_json::from_str(&text).expect("response output is JSON"))
}

fn invalid_request() -> Value {
    json!({"jsonrpc": "2.0", "error": {"code": -32600, "message": "Invalid Request"}, "id": null})
}

#[test]
fn test_batch_keeps_array_order() {
    init_tracing();

    let response = Response::new(MIXED_BATCH);
    assert!(response.is_batch());
    assert_eq!(response.count(), 6);

    let methods: Vec<Option<String>> = response
        .members()
        .map(|slot| slot.request().map(|r| r.method().name().to_string()))
        .collect();
    assert_eq!(
        methods,
        vec![
            Some("sum".to_string()),
            Some("notify_hello".to_string()),
            Some("subtract".to_string()),
            None,
            Some("foo.get".to_string()),
            Some("get_data".to_string()),
        ]
    );
}

#[test]
fn test_mixed_batch_resolved_by_collection() {
    init_tracing();

    let response = Response::new(MIXED_BATCH);
    let results: ResultCollection = mixed_batch_results().into_iter().collect();

    let answered = response.handle_result(results).unwrap();
    assert_eq!(wire(&answered), Some(mixed_batch_output()));
}

#[test]
fn test_mixed_batch_resolved_one_call_at_a_time() {
    init_tracing();

    let mut response = Response::new(MIXED_BATCH);
    for result in mixed_batch_results() {
        response = response.handle_result(result).unwrap();
    }
    assert_eq!(wire(&response), Some(mixed_batch_output()));

    let exhausted = response.handle_result(ResponseResult::success("extra")).unwrap();
    assert_eq!(exhausted, response);
}

#[test]
fn test_request_and_notification_pair() {
    let response = Response::new(
        r#"[{"jsonrpc":"2.0","method":"sum","params":[1,2,4],"id":"1"},{"jsonrpc":"2.0","method":"notify_hello","params":[7]}]"#,
    );

    let mut results = ResultCollection::new();
    results.push(ResponseResult::success(7));
    results.push(JsonRpcErrorObject::internal_error(None));

    let answered = response.handle_result(results).unwrap();
    assert_eq!(
        wire(&answered),
        Some(json!([{"jsonrpc": "2.0", "result": 7, "id": "1"}]))
    );
}

#[test]
fn test_resolve_by_raw_text() {
    let response = Response::new(MIXED_BATCH);
    let target = response
        .members()
        .find(|slot| slot.id() == Some(&RequestId::try_from("9").unwrap()))
        .cloned()
        .expect("get_data slot");

    let resolved = response
        .resolve_response(ResponseResult::success(json!(["hello", 5])), &target)
        .unwrap();
    let output = wire(&resolved).unwrap();
    assert_eq!(output[4], json!({"jsonrpc": "2.0", "result": ["hello", 5], "id": "9"}));
    assert_eq!(output[0], json!({"jsonrpc": "2.0", "result": null, "id": "1"}));

    let unrelated = Response::new(r#"{"jsonrpc":"2.0","method":"other","id":99}"#);
    assert!(matches!(
        response.resolve_response(ResponseResult::success(1), &unrelated),
        Err(JsonRpcError::InvalidArgument(_))
    ));
}

#[test]
fn test_empty_array() {
    let response = Response::new("[]");
    assert!(!response.is_batch());
    assert_eq!(response.count(), 1);
    assert_eq!(wire(&response), Some(invalid_request()));
}

#[test]
fn test_invalid_batch_of_one() {
    let response = Response::new("[1]");
    assert_eq!(response.count(), 1);
    assert_eq!(wire(&response), Some(json!([invalid_request()])));
}

#[test]
fn test_invalid_batch() {
    let response = Response::new("[1,2,3]");
    assert_eq!(response.count(), 3);
    for slot in &response {
        assert_eq!(slot.recorded_fault(), Some(&JsonRpcError::InvalidRequest));
        assert_eq!(slot.id(), None);
    }
    assert_eq!(
        wire(&response),
        Some(json!([invalid_request(), invalid_request(), invalid_request()]))
    );
}

#[test]
fn test_batch_with_invalid_json() {
    let response = Response::new(
        r#"[
            {"jsonrpc": "2.0", "method": "sum", "params": [1,2,4], "id": "1"},
            {"jsonrpc": "2.0", "method"
        ]"#,
    );
    assert!(!response.is_batch());
    assert_eq!(
        wire(&response),
        Some(json!({"jsonrpc": "2.0", "error": {"code": -32700, "message": "Parse error"}, "id": null}))
    );
}

#[test]
fn test_all_notification_batch() {
    let response = Response::new(NOTIFICATION_BATCH);
    assert_eq!(response.count(), 2);

    let answered = response
        .handle_result(
            [ResponseResult::success(Value::Null), ResponseResult::success(Value::Null)]
                .into_iter()
                .collect::<ResultCollection>(),
        )
        .unwrap();
    assert_eq!(answered.to_value(), Some(json!([])));
    assert_eq!(answered.to_json_string(), None);
}

#[test]
fn test_received_batch_response() {
    let text = r#"[{"jsonrpc":"2.0","result":7,"id":"1"},{"jsonrpc":"2.0","result":19,"id":"2"},{"jsonrpc":"2.0","error":{"code":-32600,"message":"Invalid Request"},"id":null}]"#;
    let received: Response = text.parse().unwrap();

    assert_eq!(received.count(), 3);
    let ids: Vec<_> = received.members().map(|slot| slot.id().cloned()).collect();
    assert_eq!(
        ids,
        vec![
            Some(RequestId::try_from("1").unwrap()),
            Some(RequestId::try_from("2").unwrap()),
            None,
        ]
    );
    assert_eq!(received.to_json_string().as_deref(), Some(text));
}
