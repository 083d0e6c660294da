//! The response engine.
//!
//! A [`Response`] is built from the raw text a client sent. Construction
//! classifies that text once (parse error, invalid shape, notification,
//! request or batch) and every later operation returns a new `Response`,
//! leaving the receiver untouched.
//!
//! Results are correlated to batch slots either all at once through a
//! [`ResultCollection`], or one call at a time through a forward cursor that
//! starts at the first slot.

use std::str::FromStr;
use std::sync::Arc;

use serde::{Serialize, Serializer};
use serde_json::{Map, Value};
use tracing::debug;

use crate::batch::{Batch, Batched, Members};
use crate::error::JsonRpcError;
use crate::recovery::{Recover, is_truthy};
use crate::request::Procedure;
use crate::result::{JsonRpcErrorObject, ResponseResult, ResultPayload};
use crate::types::{JsonRpcVersion, RequestId};

#[derive(Debug, Clone, Default)]
pub struct Response {
    raw_request: Option<Arc<str>>,
    request: Option<Procedure>,
    request_id: Option<RequestId>,
    result: Option<ResponseResult>,
    recorded_fault: Option<JsonRpcError>,
    elements: Batch<Response>,
    cursor: usize,
}

impl Response {
    /// Classify `raw` and prepare a response for it.
    ///
    /// This never fails: text that is not a valid call records a
    /// `ParseError` or `InvalidRequest` fault whose error becomes the result.
    /// A non-empty array becomes a batch with one child per element.
    pub fn new(raw: &str) -> Self {
        let raw: Arc<str> = Arc::from(raw);

        let value = match serde_json::from_str::<Value>(&raw) {
            Ok(value) => value,
            Err(_) => return Self::faulted(raw, JsonRpcError::ParseError),
        };

        match value {
            Value::Array(items) if !items.is_empty() => Self {
                raw_request: Some(raw),
                elements: items.iter().map(Self::member).collect(),
                ..Self::default()
            },
            value => Self::classified(raw, &value),
        }
    }

    /// One batch slot. Slots are not batches themselves, so a nested array
    /// is an invalid request.
    fn member(item: &Value) -> Self {
        let raw: Arc<str> = Arc::from(item.to_string());
        if item.is_array() {
            return Self::faulted(raw, JsonRpcError::InvalidRequest);
        }
        Self::classified(raw, item)
    }

    fn classified(raw: Arc<str>, value: &Value) -> Self {
        match classify(value) {
            Ok(procedure) => Self {
                raw_request: Some(raw),
                request_id: procedure.id().cloned(),
                request: Some(procedure),
                ..Self::default()
            },
            Err(fault) => Self::faulted(raw, fault),
        }
    }

    fn faulted(raw: Arc<str>, fault: JsonRpcError) -> Self {
        debug!("Recorded {} for request {}", fault, raw);
        Self {
            raw_request: Some(raw),
            result: Some(ResponseResult::from_fault(&fault, None)),
            recorded_fault: Some(fault),
            ..Self::default()
        }
    }

    /// The parsed call; `None` for batches and faulted text.
    pub fn request(&self) -> Option<&Procedure> {
        self.request.as_ref()
    }

    /// The text this response answers.
    pub fn original_request(&self) -> Option<&str> {
        self.raw_request.as_deref()
    }

    /// Identity echoed back on the wire.
    pub fn id(&self) -> Option<&RequestId> {
        self.request_id.as_ref()
    }

    /// Attached result, `None` until one is handled.
    pub fn result(&self) -> Option<&ResponseResult> {
        self.result.as_ref()
    }

    /// The protocol fault found while classifying the text, if any.
    pub fn recorded_fault(&self) -> Option<&JsonRpcError> {
        self.recorded_fault.as_ref()
    }

    /// True when the parsed request is a notification.
    pub fn is_notification(&self) -> bool {
        self.request.as_ref().is_some_and(Procedure::is_notification)
    }

    /// Attach a result and return the new response.
    ///
    /// - batch with a non-empty collection: one result is popped per slot,
    ///   in slot order
    /// - single response with a collection: the first result is used
    /// - batch with a single result: the slot under the cursor takes it and
    ///   the cursor moves forward
    /// - single response: the result is attached, unless a recorded fault
    ///   stands and the result is not an error
    ///
    /// Fails with `InvalidArgument` when there is no raw request to
    /// correlate against.
    pub fn handle_result(
        &self,
        result: impl Into<ResultPayload>,
    ) -> Result<Response, JsonRpcError> {
        if self.raw_request.is_none() {
            return Err(JsonRpcError::invalid_argument(
                "no raw request to correlate the result against",
            ));
        }

        match result.into() {
            ResultPayload::Collection(mut collection) => {
                if !self.is_batch() {
                    return Ok(match collection.pop() {
                        Some(result) => self.apply(result),
                        None => self.clone(),
                    });
                }
                if collection.is_empty() {
                    return Ok(self.clone());
                }

                let mut elements = Vec::with_capacity(self.elements.len());
                for element in self.elements.iter() {
                    elements.push(match collection.pop() {
                        Some(result) => element.handle_result(result)?,
                        None => element.clone(),
                    });
                }
                Ok(Self {
                    elements: elements.into_iter().collect(),
                    ..self.clone()
                })
            }
            ResultPayload::Single(result) if self.is_batch() => self.apply_at_cursor(result),
            ResultPayload::Single(result) => Ok(self.apply(result)),
        }
    }

    fn apply(&self, result: ResponseResult) -> Response {
        let mut next = self.clone();
        match &self.recorded_fault {
            Some(fault) if !result.is_error() => {
                debug!("Ignoring result for request with recorded fault: {}", fault);
                next.result = Some(ResponseResult::from_fault(fault, None));
            }
            _ => next.result = Some(result),
        }
        next
    }

    fn apply_at_cursor(&self, result: ResponseResult) -> Result<Response, JsonRpcError> {
        let Some(element) = self.elements.get(self.cursor) else {
            debug!(
                "Batch cursor exhausted after {} slots; result ignored",
                self.elements.len()
            );
            return Ok(self.clone());
        };

        let resolved = element.handle_result(result)?;
        let elements = self
            .elements
            .with_replaced(self.cursor, resolved)
            .ok_or_else(|| JsonRpcError::invalid_argument("batch cursor out of bounds"))?;

        Ok(Self {
            elements,
            cursor: self.cursor + 1,
            ..self.clone()
        })
    }

    /// Attach `result` to the slot whose raw text equals the target's.
    ///
    /// A single response whose own raw text matches is resolved directly.
    /// Fails with `InvalidArgument` when no slot matches.
    pub fn resolve_response(
        &self,
        result: impl Into<ResultPayload>,
        target: &Response,
    ) -> Result<Response, JsonRpcError> {
        if self.raw_request.is_none() {
            return Err(JsonRpcError::invalid_argument(
                "no raw request to correlate the result against",
            ));
        }

        if !self.is_batch() && self.raw_request == target.raw_request {
            return self.handle_result(result);
        }

        let index = self
            .elements
            .position(|element| {
                element.raw_request.is_some() && element.raw_request == target.raw_request
            })
            .ok_or_else(|| JsonRpcError::invalid_argument("Response not found"))?;

        let resolved = match self.elements.get(index) {
            Some(element) => element.handle_result(result)?,
            None => return Err(JsonRpcError::invalid_argument("Response not found")),
        };
        let elements = self
            .elements
            .with_replaced(index, resolved)
            .ok_or_else(|| JsonRpcError::invalid_argument("Response not found"))?;

        Ok(Self {
            elements,
            ..self.clone()
        })
    }

    /// A copy whose result is the error derived from `fault`.
    pub fn fail_with(&self, fault: &JsonRpcError, data: Option<Value>) -> Response {
        Self {
            result: Some(ResponseResult::from_fault(fault, data)),
            ..self.clone()
        }
    }

    /// Wire form, or `None` when nothing is answered (a notification).
    ///
    /// A batch is always an array; notification slots are left out of it.
    pub fn to_value(&self) -> Option<Value> {
        if self.is_batch() {
            return Some(Value::Array(
                self.members().filter_map(Response::single_value).collect(),
            ));
        }
        self.single_value()
    }

    fn single_value(&self) -> Option<Value> {
        if self.is_notification() {
            return None;
        }

        let mut object = Map::new();
        object.insert(
            "jsonrpc".to_string(),
            Value::from(JsonRpcVersion::V2_0.as_str()),
        );
        match &self.result {
            Some(ResponseResult::Error(error)) => {
                object.insert("error".to_string(), error.to_value());
            }
            Some(ResponseResult::Success(value)) => {
                object.insert("result".to_string(), value.clone());
            }
            None => {
                object.insert("result".to_string(), Value::Null);
            }
        }
        object.insert(
            "id".to_string(),
            self.request_id.as_ref().map_or(Value::Null, RequestId::to_value),
        );
        Some(Value::Object(object))
    }

    /// Text to write back to the client; `None` when nothing must be sent.
    pub fn to_json_string(&self) -> Option<String> {
        match self.to_value()? {
            Value::Array(items) if items.is_empty() => None,
            value => Some(value.to_string()),
        }
    }
}

fn classify(value: &Value) -> Result<Procedure, JsonRpcError> {
    if !is_truthy(value) || !value.is_object() {
        return Err(JsonRpcError::InvalidRequest);
    }
    Procedure::from_value(value).map_err(JsonRpcError::into_client_fault)
}

impl Batched for Response {
    fn elements(&self) -> &Batch<Self> {
        &self.elements
    }
}

/// Recovers a response document received by a client.
impl Recover for Response {
    fn from_object(value: &Value) -> Result<Self, JsonRpcError> {
        let object = value.as_object().ok_or(JsonRpcError::InvalidRequest)?;

        let result = match (object.get("result"), object.get("error")) {
            (Some(result), _) if is_truthy(result) => ResponseResult::Success(result.clone()),
            (_, Some(error)) => ResponseResult::Error(JsonRpcErrorObject::from_value(error)?),
            (Some(result), None) => ResponseResult::Success(result.clone()),
            (None, None) => return Err(JsonRpcError::InvalidRequest),
        };

        let request_id = match object.get("id") {
            Some(id) if is_truthy(id) => Some(RequestId::try_from(id.clone())?),
            _ => None,
        };

        Ok(Self {
            request_id,
            result: Some(result),
            ..Self::default()
        })
    }

    fn compose(elements: Vec<Self>) -> Result<Self, JsonRpcError> {
        if elements.is_empty() {
            return Err(JsonRpcError::InvalidRequest);
        }
        Ok(Self {
            elements: elements.into_iter().collect(),
            ..Self::default()
        })
    }
}

impl FromStr for Response {
    type Err = JsonRpcError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::recover(s)
    }
}

/// Compares the parsed call, the result, the raw text and the slots. The
/// cursor and recorded fault are bookkeeping and do not take part.
impl PartialEq for Response {
    fn eq(&self, other: &Self) -> bool {
        self.request == other.request
            && self.request_id == other.request_id
            && self.result == other.result
            && self.raw_request == other.raw_request
            && self.elements == other.elements
    }
}

impl Serialize for Response {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self.to_value() {
            Some(value) => value.serialize(serializer),
            None => serializer.serialize_none(),
        }
    }
}

impl<'a> IntoIterator for &'a Response {
    type Item = &'a Response;
    type IntoIter = Members<'a, Response>;

    fn into_iter(self) -> Self::IntoIter {
        self.members()
    }
}
