//! Calculator Batch Example
//!
//! Feeds the batch from the JSON-RPC 2.0 specification through a dispatcher
//! and prints what a transport would write back. Run with
//! `RUST_LOG=debug` to see how each slot is classified and resolved.

use async_trait::async_trait;
use json_rpc_correlate::prelude::*;
use serde_json::{Value, json};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(thiserror::Error, Debug)]
enum CalculatorError {
    #[error("Missing parameter: {0}")]
    MissingParam(&'static str),
    #[error("Unknown method: {0}")]
    UnknownMethod(String),
}

impl ToJsonRpcError for CalculatorError {
    fn to_error_object(&self) -> JsonRpcErrorObject {
        match self {
            CalculatorError::MissingParam(name) => {
                JsonRpcErrorObject::invalid_params(Some(json!({ "missing": name })))
            }
            CalculatorError::UnknownMethod(_) => JsonRpcErrorObject::method_not_found(),
        }
    }
}

/// Calculator handler that implements basic arithmetic operations
struct CalculatorHandler;

impl CalculatorHandler {
    fn number(params: &Param, position: i64, name: &'static str) -> Result<i64, CalculatorError> {
        let value = if params.is_index_by_name() {
            params.get_named(name)
        } else {
            params.get_index(position)
        };
        value
            .and_then(Value::as_i64)
            .ok_or(CalculatorError::MissingParam(name))
    }
}

#[async_trait]
impl JsonRpcHandler for CalculatorHandler {
    type Error = CalculatorError;

    async fn handle(&self, method: &Method, params: &Param) -> Result<Value, Self::Error> {
        match method.name() {
            "sum" => Ok(json!(
                params
                    .entries()
                    .iter()
                    .filter_map(|(_, value)| value.as_i64())
                    .sum::<i64>()
            )),
            "subtract" => {
                let minuend = Self::number(params, 0, "minuend")?;
                let subtrahend = Self::number(params, 1, "subtrahend")?;
                Ok(json!(minuend - subtrahend))
            }
            "get_data" => Ok(json!(["hello", 5])),
            other => Err(CalculatorError::UnknownMethod(other.to_string())),
        }
    }

    async fn handle_notification(
        &self,
        method: &Method,
        params: &Param,
    ) -> Result<(), Self::Error> {
        info!("Notification {} with {} params", method, params.len());
        Ok(())
    }

    fn supported_methods(&self) -> Vec<String> {
        vec!["sum".to_string(), "subtract".to_string(), "get_data".to_string()]
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let mut dispatcher = JsonRpcDispatcher::new();
    dispatcher.register_methods(CalculatorHandler.supported_methods(), CalculatorHandler);
    dispatcher.register_method("notify_hello", CalculatorHandler);

    let batch = r#"[
        {"jsonrpc": "2.0", "method": "sum", "params": [1,2,4], "id": "1"},
        {"jsonrpc": "2.0", "method": "notify_hello", "params": [7]},
        {"jsonrpc": "2.0", "method": "subtract", "params": [42,23], "id": "2"},
        {"foo": "boo"},
        {"jsonrpc": "2.0", "method": "foo.get", "params": {"name": "myself"}, "id": "5"},
        {"jsonrpc": "2.0", "method": "get_data", "id": "9"}
    ]"#;

    let response = Response::new(batch);
    info!("Received batch of {} calls", response.count());

    let answered = dispatcher.handle_response(&response).await?;
    match answered.to_json_string() {
        Some(output) => println!("{}", output),
        None => println!("(nothing to send)"),
    }

    let notifications = r#"[
        {"jsonrpc": "2.0", "method": "notify_sum", "params": [1,2,4]},
        {"jsonrpc": "2.0", "method": "notify_hello", "params": [7]}
    ]"#;
    match dispatcher.handle_message(notifications).await? {
        Some(output) => println!("{}", output),
        None => println!("(nothing to send)"),
    }

    Ok(())
}
