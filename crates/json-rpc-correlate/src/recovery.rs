//! Recovery of messages from raw wire text.

use serde_json::Value;

use crate::batch::Batched;
use crate::error::JsonRpcError;

/// Parse wire text into `Self`, classifying malformed input.
///
/// - text that is not JSON fails with `ParseError`
/// - an empty or scalar document fails with `InvalidRequest`
/// - an array is folded element by element, in array order, into one batch
/// - an object is handed to [`Recover::from_object`]
pub trait Recover: Batched {
    /// Build a single value from one decoded JSON member.
    fn from_object(value: &Value) -> Result<Self, JsonRpcError>;

    /// Wrap already recovered elements into a batch value. An empty list
    /// is an `InvalidRequest`.
    fn compose(elements: Vec<Self>) -> Result<Self, JsonRpcError>;

    fn recover(text: &str) -> Result<Self, JsonRpcError> {
        let value: Value = serde_json::from_str(text).map_err(|_| JsonRpcError::ParseError)?;

        if !is_truthy(&value) || is_scalar(&value) {
            return Err(JsonRpcError::InvalidRequest);
        }

        match value {
            Value::Array(items) => {
                let elements = items
                    .iter()
                    .map(Self::from_object)
                    .collect::<Result<Vec<_>, _>>()?;
                Self::compose(elements)
            }
            other => Self::from_object(&other),
        }
    }
}

/// Loose JSON truthiness: `null`, `false`, zero, `""`, `"0"` and `[]` are
/// falsy; every object is truthy.
pub(crate) fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0),
        Value::String(s) => !(s.is_empty() || s == "0"),
        Value::Array(items) => !items.is_empty(),
        Value::Object(_) => true,
    }
}

fn is_scalar(value: &Value) -> bool {
    !matches!(value, Value::Array(_) | Value::Object(_))
}
