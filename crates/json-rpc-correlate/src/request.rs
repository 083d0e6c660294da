use std::str::FromStr;

use serde::{Serialize, Serializer};
use serde_json::{Map, Value};

use crate::batch::{Batch, Batched};
use crate::error::JsonRpcError;
use crate::method::Method;
use crate::params::{Param, ParamMode};
use crate::recovery::{Recover, is_truthy};
use crate::types::{JsonRpcVersion, RequestId};

/// A JSON-RPC call: a request when it carries an id, a notification when it
/// does not.
///
/// A procedure recovered from a JSON array is a batch. Its own method,
/// params and id are those of the first element; everything else goes
/// through [`Batched::members`].
#[derive(Debug, Clone)]
pub struct Procedure {
    method: Method,
    params: Param,
    id: Option<RequestId>,
    elements: Batch<Procedure>,
}

impl Procedure {
    /// A call that expects no response.
    pub fn notification(
        method: impl Into<Method>,
        params: Option<Param>,
    ) -> Result<Self, JsonRpcError> {
        Self::build(method.into(), params, None)
    }

    /// A call that must be answered with a response carrying `id`.
    pub fn request(
        method: impl Into<Method>,
        params: Option<Param>,
        id: RequestId,
    ) -> Result<Self, JsonRpcError> {
        Self::build(method.into(), params, Some(id))
    }

    /// Group procedures into one batch, keeping their order.
    pub fn batch<I>(procedures: I) -> Result<Self, JsonRpcError>
    where
        I: IntoIterator<Item = Procedure>,
    {
        Self::compose(procedures.into_iter().collect())
            .map_err(|_| JsonRpcError::invalid_argument("a batch needs at least one procedure"))
    }

    fn build(
        method: Method,
        params: Option<Param>,
        id: Option<RequestId>,
    ) -> Result<Self, JsonRpcError> {
        let params = params.unwrap_or_default();
        if params.mode() == Some(ParamMode::POSITION & ParamMode::NAME) {
            return Err(JsonRpcError::invalid_argument(
                "positional and named parameters cannot be mixed",
            ));
        }

        Ok(Self {
            method,
            params,
            id,
            elements: Batch::new(),
        })
    }

    /// Name of the procedure to invoke.
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// Parameters; empty when none were sent.
    pub fn params(&self) -> &Param {
        &self.params
    }

    /// Request identity, `None` for a notification.
    pub fn id(&self) -> Option<&RequestId> {
        self.id.as_ref()
    }

    /// True when the call expects an answer.
    pub fn is_request(&self) -> bool {
        self.id.is_some()
    }

    /// True when the call carries no identity and gets no answer.
    pub fn is_notification(&self) -> bool {
        self.id.is_none()
    }

    /// Parse one member as a request. A missing id is generated.
    pub fn request_from_value(value: &Value) -> Result<Self, JsonRpcError> {
        let (method, params) = parse_call(value)?;
        let id = RequestId::new(value.get("id").cloned())?;
        Self::request(method, Some(params), id)
    }

    /// Parse one member as a notification; any id is ignored.
    pub fn notification_from_value(value: &Value) -> Result<Self, JsonRpcError> {
        let (method, params) = parse_call(value)?;
        Self::notification(method, Some(params))
    }

    /// Parse one member, choosing the request path when it carries a
    /// truthy id.
    pub fn from_value(value: &Value) -> Result<Self, JsonRpcError> {
        if has_identity(value) {
            Self::request_from_value(value)
        } else {
            Self::notification_from_value(value)
        }
    }

    /// Wire form. `params` is omitted when empty and `id` for notifications;
    /// a batch becomes an array.
    pub fn to_value(&self) -> Value {
        if self.is_batch() {
            return Value::Array(self.members().map(Procedure::call_value).collect());
        }
        self.call_value()
    }

    fn call_value(&self) -> Value {
        let mut object = Map::new();
        object.insert(
            "jsonrpc".to_string(),
            Value::from(JsonRpcVersion::V2_0.as_str()),
        );
        object.insert("method".to_string(), Value::from(self.method.name()));
        if !self.params.is_empty() {
            object.insert("params".to_string(), self.params.to_value());
        }
        if let Some(id) = &self.id {
            object.insert("id".to_string(), id.to_value());
        }
        Value::Object(object)
    }
}

/// A member carrying a truthy `id` is answered; anything else is a
/// notification.
fn has_identity(value: &Value) -> bool {
    value.get("id").is_some_and(is_truthy)
}

fn parse_call(value: &Value) -> Result<(Method, Param), JsonRpcError> {
    let object = value.as_object().ok_or(JsonRpcError::InvalidRequest)?;

    if let Some(version) = object.get("jsonrpc")
        && serde_json::from_value::<JsonRpcVersion>(version.clone()).is_err()
    {
        return Err(JsonRpcError::InvalidRequest);
    }

    let method = match object.get("method") {
        Some(Value::String(name)) if !(name.is_empty() || name == "0") => {
            Method::new(name.as_str())
        }
        _ => return Err(JsonRpcError::InvalidRequest),
    };

    let params = match object.get("params") {
        None | Some(Value::Null) => Param::new(),
        Some(params @ (Value::Array(_) | Value::Object(_))) => Param::from_value(params)?,
        Some(_) => return Err(JsonRpcError::InvalidRequest),
    };

    Ok((method, params))
}

impl Batched for Procedure {
    fn elements(&self) -> &Batch<Self> {
        &self.elements
    }
}

impl Recover for Procedure {
    fn from_object(value: &Value) -> Result<Self, JsonRpcError> {
        Procedure::from_value(value)
    }

    fn compose(elements: Vec<Self>) -> Result<Self, JsonRpcError> {
        let mut head = elements.first().cloned().ok_or(JsonRpcError::InvalidRequest)?;
        head.elements = elements.into_iter().collect();
        Ok(head)
    }
}

/// Single calls compare method, params and id; batches compare their
/// elements index by index.
impl PartialEq for Procedure {
    fn eq(&self, other: &Self) -> bool {
        if self.is_batch() || other.is_batch() {
            return self.elements == other.elements;
        }
        self.method == other.method && self.params == other.params && self.id == other.id
    }
}

impl FromStr for Procedure {
    type Err = JsonRpcError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::recover(s)
    }
}

impl Serialize for Procedure {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.to_value().serialize(serializer)
    }
}

impl<'a> IntoIterator for &'a Procedure {
    type Item = &'a Procedure;
    type IntoIter = crate::batch::Members<'a, Procedure>;

    fn into_iter(self) -> Self::IntoIter {
        self.members()
    }
}
