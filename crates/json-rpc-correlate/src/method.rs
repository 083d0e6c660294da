use std::borrow::Cow;
use std::fmt;
use std::hash::{Hash, Hasher};

use serde::{Serialize, Serializer};

/// Method names beginning with this prefix are reserved for rpc-internal
/// methods and extensions.
pub const RESERVED_PREFIX: &str = "rpc.";

/// The name of the method to be invoked.
///
/// Construction never fails. Whether the name is a reserved system extension
/// is decided once, against the normalized form of the name, so an escaped
/// spelling such as `"rpc.foo"` is still recognised.
#[derive(Debug, Clone)]
pub struct Method {
    name: String,
    system_extension: bool,
}

impl Method {
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        let system_extension = normalize_method_name(&name).starts_with(RESERVED_PREFIX);
        Self {
            name,
            system_extension,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_system_extension(&self) -> bool {
        self.system_extension
    }
}

/// Reduce a method name to the form checked for the reserved prefix.
///
/// A name that is itself a quoted JSON string literal is decoded first; the
/// result is then folded to Latin-1, with anything outside it replaced by `?`.
pub fn normalize_method_name(name: &str) -> Cow<'_, str> {
    let decoded = match serde_json::from_str::<String>(name) {
        Ok(decoded) => Cow::Owned(decoded),
        Err(_) => Cow::Borrowed(name),
    };

    if decoded.chars().all(|c| (c as u32) <= 0xFF) {
        return decoded;
    }

    Cow::Owned(
        decoded
            .chars()
            .map(|c| if (c as u32) <= 0xFF { c } else { '?' })
            .collect(),
    )
}

impl PartialEq for Method {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for Method {}

impl Hash for Method {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

impl Serialize for Method {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.name)
    }
}

impl From<&str> for Method {
    fn from(name: &str) -> Self {
        Method::new(name)
    }
}

impl From<String> for Method {
    fn from(name: String) -> Self {
        Method::new(name)
    }
}
