//! Request parameters.
//!
//! If present, parameters for the rpc call must be a structured value: by
//! position through an array, or by name through an object. Names are case
//! sensitive. While a [`Param`] is built every key records its indexing mode;
//! a set that mixes both kinds ends up with the mixed signal
//! `ParamMode::POSITION & ParamMode::NAME`, which a procedure refuses.

use std::fmt;
use std::ops::BitAnd;
use std::str::FromStr;

use serde::{Serialize, Serializer};
use serde_json::{Map, Value};

use crate::error::JsonRpcError;

/// Key of a single parameter.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ParamKey {
    Position(i64),
    Name(String),
}

impl ParamKey {
    /// Object member names that are integer literals index by position.
    fn from_member_name(name: &str) -> Self {
        match integer_literal(name) {
            Some(position) => ParamKey::Position(position),
            None => ParamKey::Name(name.to_string()),
        }
    }
}

impl fmt::Display for ParamKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamKey::Position(position) => write!(f, "{}", position),
            ParamKey::Name(name) => f.write_str(name),
        }
    }
}

impl From<i64> for ParamKey {
    fn from(position: i64) -> Self {
        ParamKey::Position(position)
    }
}

impl From<&str> for ParamKey {
    fn from(name: &str) -> Self {
        ParamKey::Name(name.to_string())
    }
}

impl From<String> for ParamKey {
    fn from(name: String) -> Self {
        ParamKey::Name(name)
    }
}

fn integer_literal(name: &str) -> Option<i64> {
    let digits = name.strip_prefix('-').unwrap_or(name);
    let canonical = match digits.as_bytes() {
        [b'0'] => digits.len() == name.len(),
        [first, rest @ ..] => {
            (b'1'..=b'9').contains(first) && rest.iter().all(u8::is_ascii_digit)
        }
        [] => false,
    };
    if canonical { name.parse().ok() } else { None }
}

/// Indexing mode bitmask.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParamMode(u8);

impl ParamMode {
    pub const POSITION: ParamMode = ParamMode(1);
    pub const NAME: ParamMode = ParamMode(2);

    pub fn bits(self) -> u8 {
        self.0
    }

    fn of(key: &ParamKey) -> Self {
        match key {
            ParamKey::Position(_) => ParamMode::POSITION,
            ParamKey::Name(_) => ParamMode::NAME,
        }
    }
}

impl BitAnd for ParamMode {
    type Output = ParamMode;

    fn bitand(self, rhs: Self) -> Self::Output {
        ParamMode(self.0 & rhs.0)
    }
}

/// Ordered parameter set of a procedure. Absent and empty are the same
/// thing; both count as zero.
#[derive(Debug, Clone, Default)]
pub struct Param {
    entries: Vec<(ParamKey, Value)>,
    mode: Option<ParamMode>,
}

impl Param {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from key/value pairs in the given order. A repeated key keeps
    /// its first position and takes the last value.
    pub fn from_entries<K, I>(entries: I) -> Self
    where
        K: Into<ParamKey>,
        I: IntoIterator<Item = (K, Value)>,
    {
        let mut param = Self::new();
        for (key, value) in entries {
            param.insert(key.into(), value);
        }
        param
    }

    /// Build from a decoded JSON value: an array indexes by position, an
    /// object by name, `null` means no parameters.
    pub fn from_value(value: &Value) -> Result<Self, JsonRpcError> {
        match value {
            Value::Null => Ok(Self::new()),
            Value::Array(items) => Ok(Self::from_entries(
                items
                    .iter()
                    .enumerate()
                    .map(|(position, item)| (ParamKey::Position(position as i64), item.clone())),
            )),
            Value::Object(members) => Ok(Self::from_entries(
                members
                    .iter()
                    .map(|(name, item)| (ParamKey::from_member_name(name), item.clone())),
            )),
            other => Err(JsonRpcError::invalid_argument(format!(
                "params must be an array or an object, got {}",
                other
            ))),
        }
    }

    fn insert(&mut self, key: ParamKey, value: Value) {
        let mode = ParamMode::of(&key);
        self.mode = Some(match self.mode {
            Some(current) => current & mode,
            None => mode,
        });

        match self.entries.iter_mut().find(|(existing, _)| *existing == key) {
            Some((_, slot)) => *slot = value,
            None => self.entries.push((key, value)),
        }
    }

    /// `None` until the first key is seen.
    pub fn mode(&self) -> Option<ParamMode> {
        self.mode
    }

    pub fn is_index_by_name(&self) -> bool {
        self.mode == Some(ParamMode::NAME)
    }

    pub fn is_index_by_position(&self) -> bool {
        self.mode == Some(ParamMode::POSITION)
    }

    /// Positional and named keys were both seen.
    pub fn is_index_by_both(&self) -> bool {
        self.mode == Some(ParamMode::POSITION & ParamMode::NAME)
    }

    pub fn entries(&self) -> &[(ParamKey, Value)] {
        &self.entries
    }

    pub fn get(&self, key: &ParamKey) -> Option<&Value> {
        self.entries
            .iter()
            .find(|(existing, _)| existing == key)
            .map(|(_, value)| value)
    }

    /// Get a parameter by name
    pub fn get_named(&self, name: &str) -> Option<&Value> {
        self.get(&ParamKey::Name(name.to_string()))
    }

    /// Get a parameter by position
    pub fn get_index(&self, position: i64) -> Option<&Value> {
        self.get(&ParamKey::Position(position))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Wire form: an array when the keys are exactly `0..n`, otherwise an
    /// object. No parameters serialize as `{}`.
    pub fn to_value(&self) -> Value {
        let sequential = !self.entries.is_empty()
            && self
                .entries
                .iter()
                .enumerate()
                .all(|(index, (key, _))| *key == ParamKey::Position(index as i64));

        if sequential {
            return Value::Array(self.entries.iter().map(|(_, value)| value.clone()).collect());
        }

        Value::Object(
            self.entries
                .iter()
                .map(|(key, value)| (key.to_string(), value.clone()))
                .collect::<Map<String, Value>>(),
        )
    }
}

impl PartialEq for Param {
    fn eq(&self, other: &Self) -> bool {
        self.entries == other.entries
    }
}

impl From<Vec<Value>> for Param {
    fn from(items: Vec<Value>) -> Self {
        Param::from_value(&Value::Array(items)).unwrap_or_default()
    }
}

impl FromStr for Param {
    type Err = JsonRpcError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value: Value = serde_json::from_str(s).map_err(|_| JsonRpcError::ParseError)?;
        Param::from_value(&value)
    }
}

impl Serialize for Param {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.to_value().serialize(serializer)
    }
}
