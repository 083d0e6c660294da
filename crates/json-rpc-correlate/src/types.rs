use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};
use uuid::Uuid;

use crate::error::{JsonRpcError, JsonRpcErrorCode};

/// A uniquely identifying ID for a JSON-RPC request.
///
/// Strings and positive integers are accepted. Booleans, fractional numbers,
/// structured values and numeric values below 1 (including numeric strings
/// such as `"0"`) are rejected. Equality is strict: `1` and `"1"` differ.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(untagged)]
pub enum RequestId {
    String(String),
    Number(i64),
}

impl RequestId {
    /// Validate `value`, or generate a fresh id when it is omitted.
    pub fn new(value: Option<Value>) -> Result<Self, JsonRpcError> {
        match value {
            None | Some(Value::Null) => Ok(Self::generate()),
            Some(value) => Self::try_from(value),
        }
    }

    /// A random v4 UUID rendered as a 36-character string id.
    pub fn generate() -> Self {
        RequestId::String(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            RequestId::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            RequestId::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn to_value(&self) -> Value {
        match self {
            RequestId::String(s) => Value::from(s.as_str()),
            RequestId::Number(n) => Value::from(*n),
        }
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RequestId::String(s) => write!(f, "{}", s),
            RequestId::Number(n) => write!(f, "{}", n),
        }
    }
}

impl TryFrom<i64> for RequestId {
    type Error = JsonRpcError;

    fn try_from(n: i64) -> Result<Self, Self::Error> {
        if n < 1 {
            return Err(JsonRpcError::invalid_argument(format!(
                "request id must be at least 1, got {}",
                n
            )));
        }
        Ok(RequestId::Number(n))
    }
}

impl TryFrom<String> for RequestId {
    type Error = JsonRpcError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        if let Some(number) = parse_numeric(&s)
            && number.as_f64().is_some_and(|n| n.trunc() < 1.0)
        {
            return Err(JsonRpcError::invalid_argument(format!(
                "numeric request id must be at least 1, got {:?}",
                s
            )));
        }
        Ok(RequestId::String(s))
    }
}

impl TryFrom<&str> for RequestId {
    type Error = JsonRpcError;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        Self::try_from(s.to_string())
    }
}

impl TryFrom<Value> for RequestId {
    type Error = JsonRpcError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::String(s) => Self::try_from(s),
            Value::Number(n) => match n.as_i64() {
                Some(n) => Self::try_from(n),
                None if n.is_f64() => Err(JsonRpcError::invalid_argument(format!(
                    "request id must not be fractional, got {}",
                    n
                ))),
                None => Err(JsonRpcError::invalid_argument(format!(
                    "request id out of range: {}",
                    n
                ))),
            },
            other => Err(JsonRpcError::invalid_argument(format!(
                "request id must be a string or number, got {}",
                other
            ))),
        }
    }
}

impl<'de> Deserialize<'de> for RequestId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        RequestId::try_from(value).map_err(serde::de::Error::custom)
    }
}

/// Numeric error code carried by an error result.
///
/// Equality is by numeric value only, so `-32601` and `-32601.0` are equal.
#[derive(Debug, Clone, Serialize)]
#[serde(transparent)]
pub struct CodeId(Number);

impl CodeId {
    /// Accepts JSON numbers and numeric strings.
    pub fn new(value: &Value) -> Result<Self, JsonRpcError> {
        match value {
            Value::Number(n) => Ok(CodeId(n.clone())),
            Value::String(s) => parse_numeric(s).map(CodeId).ok_or_else(|| {
                JsonRpcError::invalid_argument(format!("error code must be numeric, got {:?}", s))
            }),
            other => Err(JsonRpcError::invalid_argument(format!(
                "error code must be numeric, got {}",
                other
            ))),
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        self.0.as_i64()
    }

    pub fn as_f64(&self) -> f64 {
        self.0.as_f64().unwrap_or(f64::NAN)
    }

    pub fn to_value(&self) -> Value {
        Value::Number(self.0.clone())
    }
}

impl PartialEq for CodeId {
    fn eq(&self, other: &Self) -> bool {
        match (self.as_i64(), other.as_i64()) {
            (Some(a), Some(b)) => a == b,
            _ => self.as_f64() == other.as_f64(),
        }
    }
}

impl From<i64> for CodeId {
    fn from(code: i64) -> Self {
        CodeId(Number::from(code))
    }
}

impl From<JsonRpcErrorCode> for CodeId {
    fn from(code: JsonRpcErrorCode) -> Self {
        CodeId::from(code.code())
    }
}

impl fmt::Display for CodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

fn parse_numeric(s: &str) -> Option<Number> {
    let trimmed = s.trim();
    if let Ok(n) = trimmed.parse::<i64>() {
        return Some(Number::from(n));
    }
    trimmed
        .parse::<f64>()
        .ok()
        .filter(|n| n.is_finite())
        .and_then(Number::from_f64)
}

/// JSON-RPC version
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum JsonRpcVersion {
    #[default]
    V2_0,
}

impl JsonRpcVersion {
    pub fn as_str(&self) -> &'static str {
        match self {
            JsonRpcVersion::V2_0 => "2.0",
        }
    }
}

impl fmt::Display for JsonRpcVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl Serialize for JsonRpcVersion {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for JsonRpcVersion {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        match s.as_str() {
            "2.0" => Ok(JsonRpcVersion::V2_0),
            _ => Err(serde::de::Error::custom(format!(
                "Invalid JSON-RPC version: {}",
                s
            ))),
        }
    }
}
