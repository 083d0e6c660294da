//! Outcomes attached to responses: a success value or an error object, and
//! the FIFO collection used to answer a batch in one call.

use std::collections::VecDeque;

use serde::{Serialize, Serializer};
use serde_json::{Map, Value};

use crate::error::{JsonRpcError, JsonRpcErrorCode};
use crate::recovery::is_truthy;
use crate::types::CodeId;

/// Error object carried by an error result.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JsonRpcErrorObject {
    pub code: CodeId,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl JsonRpcErrorObject {
    /// Predefined code; `message` falls back to the code's standard text.
    pub fn new(code: JsonRpcErrorCode, message: Option<String>, data: Option<Value>) -> Self {
        Self {
            code: CodeId::from(code),
            message: message.unwrap_or_else(|| code.message().to_string()),
            data,
        }
    }

    pub fn parse_error() -> Self {
        Self::new(JsonRpcErrorCode::ParseError, None, None)
    }

    pub fn invalid_request() -> Self {
        Self::new(JsonRpcErrorCode::InvalidRequest, None, None)
    }

    pub fn method_not_found() -> Self {
        Self::new(JsonRpcErrorCode::MethodNotFound, None, None)
    }

    pub fn invalid_params(data: Option<Value>) -> Self {
        Self::new(JsonRpcErrorCode::InvalidParams, None, data)
    }

    pub fn internal_error(data: Option<Value>) -> Self {
        Self::new(JsonRpcErrorCode::InternalError, None, data)
    }

    /// Application-defined error in the reserved server range.
    pub fn server_error(
        code: i64,
        message: impl Into<String>,
        data: Option<Value>,
    ) -> Result<Self, JsonRpcError> {
        let fault = JsonRpcError::server_error(code, message)?;
        Ok(Self::from_fault(&fault, data))
    }

    /// Wire form of a fault. Argument errors have no code of their own and
    /// surface as internal errors.
    pub fn from_fault(fault: &JsonRpcError, data: Option<Value>) -> Self {
        let code = fault.error_code().unwrap_or(JsonRpcErrorCode::InternalError);
        Self {
            code: CodeId::from(code),
            message: fault.to_string(),
            data,
        }
    }

    /// Decode the `error` member of a received response. A missing message is
    /// empty and falsy `data` is dropped.
    pub fn from_value(value: &Value) -> Result<Self, JsonRpcError> {
        let object = value.as_object().ok_or(JsonRpcError::InvalidRequest)?;
        let code = CodeId::new(object.get("code").unwrap_or(&Value::Null))?;
        let message = match object.get("message") {
            Some(Value::String(message)) => message.clone(),
            Some(Value::Null) | None => String::new(),
            Some(other) => other.to_string(),
        };
        let data = object.get("data").filter(|data| is_truthy(data)).cloned();

        Ok(Self {
            code,
            message,
            data,
        })
    }

    pub fn to_value(&self) -> Value {
        let mut object = Map::new();
        object.insert("code".to_string(), self.code.to_value());
        object.insert("message".to_string(), Value::from(self.message.as_str()));
        if let Some(data) = &self.data {
            object.insert("data".to_string(), data.clone());
        }
        Value::Object(object)
    }
}

/// Outcome of one procedure.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ResponseResult {
    Success(Value),
    Error(JsonRpcErrorObject),
}

impl ResponseResult {
    pub fn success(value: impl Into<Value>) -> Self {
        ResponseResult::Success(value.into())
    }

    pub fn from_fault(fault: &JsonRpcError, data: Option<Value>) -> Self {
        ResponseResult::Error(JsonRpcErrorObject::from_fault(fault, data))
    }

    pub fn is_success(&self) -> bool {
        matches!(self, ResponseResult::Success(_))
    }

    pub fn is_error(&self) -> bool {
        matches!(self, ResponseResult::Error(_))
    }

    pub fn as_value(&self) -> Option<&Value> {
        match self {
            ResponseResult::Success(value) => Some(value),
            ResponseResult::Error(_) => None,
        }
    }

    pub fn as_error(&self) -> Option<&JsonRpcErrorObject> {
        match self {
            ResponseResult::Error(error) => Some(error),
            ResponseResult::Success(_) => None,
        }
    }
}

impl From<Value> for ResponseResult {
    fn from(value: Value) -> Self {
        ResponseResult::Success(value)
    }
}

impl From<JsonRpcErrorObject> for ResponseResult {
    fn from(error: JsonRpcErrorObject) -> Self {
        ResponseResult::Error(error)
    }
}

/// Results queued for a batch, consumed front to back.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResultCollection {
    results: VecDeque<ResponseResult>,
}

impl ResultCollection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, result: impl Into<ResponseResult>) {
        self.results.push_back(result.into());
    }

    /// Take the oldest queued result.
    pub fn pop(&mut self) -> Option<ResponseResult> {
        self.results.pop_front()
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ResponseResult> {
        self.results.iter()
    }
}

impl<R: Into<ResponseResult>> FromIterator<R> for ResultCollection {
    fn from_iter<I: IntoIterator<Item = R>>(iter: I) -> Self {
        Self {
            results: iter.into_iter().map(Into::into).collect(),
        }
    }
}

impl Serialize for ResultCollection {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_seq(self.results.iter())
    }
}

/// What can be handed to [`Response::handle_result`](crate::Response::handle_result).
#[derive(Debug, Clone, PartialEq)]
pub enum ResultPayload {
    Single(ResponseResult),
    Collection(ResultCollection),
}

impl From<ResponseResult> for ResultPayload {
    fn from(result: ResponseResult) -> Self {
        ResultPayload::Single(result)
    }
}

impl From<Value> for ResultPayload {
    fn from(value: Value) -> Self {
        ResultPayload::Single(ResponseResult::Success(value))
    }
}

impl From<JsonRpcErrorObject> for ResultPayload {
    fn from(error: JsonRpcErrorObject) -> Self {
        ResultPayload::Single(ResponseResult::Error(error))
    }
}

impl From<ResultCollection> for ResultPayload {
    fn from(collection: ResultCollection) -> Self {
        ResultPayload::Collection(collection)
    }
}
