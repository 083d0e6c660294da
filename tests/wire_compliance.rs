//! JSON-RPC 2.0 wire compliance
//!
//! Replays the single-call examples of the JSON-RPC 2.0 specification
//! through `Response` and checks what would be written back.

use json_rpc_correlate::prelude::*;
use json_rpc_correlate_integration_tests::{SUBTRACT_NAMED, SUBTRACT_POSITIONAL, init_tracing};
use serde_json::{Value, json};

fn wire(response: &Response) -> Option<Value> {
    response
        .to_json_string()
        .map(|text| serde_json::from_str(&text).expect("response output is JSON"))
}

#[test]
fn test_positional_parameters() {
    init_tracing();

    let response = Response::new(SUBTRACT_POSITIONAL);
    let request = response.request().expect("request parsed");
    assert!(request.params().is_index_by_position());
    assert_eq!(request.params().get_index(0), Some(&json!(42)));

    let answered = response.handle_result(ResponseResult::success(19)).unwrap();
    assert_eq!(wire(&answered), Some(json!({"jsonrpc": "2.0", "result": 19, "id": 1})));
}

#[test]
fn test_named_parameters() {
    init_tracing();

    let response = Response::new(SUBTRACT_NAMED);
    let request = response.request().expect("request parsed");
    assert!(request.params().is_index_by_name());
    assert_eq!(request.params().get_named("minuend"), Some(&json!(42)));

    let answered = response.handle_result(ResponseResult::success(19)).unwrap();
    assert_eq!(wire(&answered), Some(json!({"jsonrpc": "2.0", "result": 19, "id": 3})));
}

#[test]
fn test_notifications_write_nothing() {
    init_tracing();

    for text in [
        r#"{"jsonrpc": "2.0", "method": "update", "params": [1,2,3,4,5]}"#,
        r#"{"jsonrpc": "2.0", "method": "foobar"}"#,
    ] {
        let response = Response::new(text);
        assert!(response.is_notification(), "{}", text);

        let answered = response.handle_result(ResponseResult::success("ignored")).unwrap();
        assert_eq!(answered.to_json_string(), None, "{}", text);
    }
}

#[test]
fn test_non_existent_method() {
    let response = Response::new(r#"{"jsonrpc": "2.0", "method": "foobar", "id": "1"}"#);
    let answered = response
        .handle_result(JsonRpcErrorObject::method_not_found())
        .unwrap();
    assert_eq!(
        wire(&answered),
        Some(json!({
            "jsonrpc": "2.0",
            "error": {"code": -32601, "message": "Method not found"},
            "id": "1"
        }))
    );
}

#[test]
fn test_invalid_json() {
    let response = Response::new(r#"{"jsonrpc": "2.0", "method": "foobar, "params": "bar", "baz]"#);
    assert_eq!(response.recorded_fault(), Some(&JsonRpcError::ParseError));
    assert_eq!(
        wire(&response),
        Some(json!({
            "jsonrpc": "2.0",
            "error": {"code": -32700, "message": "Parse error"},
            "id": null
        }))
    );
}

#[test]
fn test_invalid_request_object() {
    let response = Response::new(r#"{"jsonrpc": "2.0", "method": 1, "params": "bar"}"#);
    assert_eq!(response.recorded_fault(), Some(&JsonRpcError::InvalidRequest));
    assert_eq!(
        wire(&response),
        Some(json!({
            "jsonrpc": "2.0",
            "error": {"code": -32600, "message": "Invalid Request"},
            "id": null
        }))
    );
}

#[test]
fn test_wrong_protocol_version_is_invalid() {
    let response = Response::new(r#"{"jsonrpc": "1.0", "method": "subtract", "id": 1}"#);
    assert_eq!(response.recorded_fault(), Some(&JsonRpcError::InvalidRequest));
}

#[test]
fn test_recorded_fault_outlives_late_success() {
    let response = Response::new(r#"{"method": missing comma"#);
    let before = response.to_json_string();

    let late = response.handle_result(ResponseResult::success(19)).unwrap();
    assert_eq!(late.to_json_string(), before);

    let replaced = response
        .handle_result(JsonRpcErrorObject::internal_error(Some(json!("boom"))))
        .unwrap();
    assert_eq!(
        wire(&replaced),
        Some(json!({
            "jsonrpc": "2.0",
            "error": {"code": -32603, "message": "Internal error", "data": "boom"},
            "id": null
        }))
    );
}

#[test]
fn test_handle_result_never_mutates() {
    let response = Response::new(SUBTRACT_POSITIONAL);
    let before = serde_json::to_string(&response).unwrap();

    let _ = response.handle_result(ResponseResult::success(19)).unwrap();
    let _ = response.handle_result(JsonRpcErrorObject::internal_error(None)).unwrap();

    assert_eq!(serde_json::to_string(&response).unwrap(), before);
}

#[test]
fn test_procedures_round_trip() {
    for text in [
        r#"{"jsonrpc":"2.0","method":"subtract","params":[42,23],"id":1}"#,
        r#"{"jsonrpc":"2.0","method":"subtract","params":{"subtrahend":23,"minuend":42},"id":3}"#,
        r#"{"jsonrpc":"2.0","method":"update","params":[1,2,3,4,5]}"#,
        r#"{"jsonrpc":"2.0","method":"foobar"}"#,
        r#"[{"jsonrpc":"2.0","method":"sum","params":[1,2,4],"id":"1"},{"jsonrpc":"2.0","method":"notify_hello","params":[7]}]"#,
    ] {
        let procedure: Procedure = text.parse().unwrap();
        assert_eq!(serde_json::to_string(&procedure).unwrap(), text);

        let reparsed: Procedure = serde_json::to_string(&procedure).unwrap().parse().unwrap();
        assert_eq!(reparsed, procedure);
    }
}

#[test]
fn test_code_ids_compare_loosely() {
    let integer = CodeId::new(&json!(-32601)).unwrap();
    let float = CodeId::new(&json!(-32601.0)).unwrap();
    assert_eq!(integer, float);
    assert_eq!(integer, CodeId::from(JsonRpcErrorCode::MethodNotFound));
    assert!(CodeId::new(&json!("not a code")).is_err());
}

#[test]
fn test_reserved_method_names() {
    let procedure: Procedure = r#"{"jsonrpc":"2.0","method":"rpc.discover","id":1}"#
        .parse()
        .unwrap();
    assert!(procedure.method().is_system_extension());

    let plain: Procedure = r#"{"jsonrpc":"2.0","method":"discover","id":1}"#.parse().unwrap();
    assert!(!plain.method().is_system_extension());
}
