// SPDX-License-Identifier: MIT OR Apache-2.0

//! Opaque configuration values.
//!
//! This module provides the `ConfigValue` type. Values are byte strings with no
//! interpretation; they are reference counted so that a value inherited by many
//! scopes is stored once.

use std::fmt;
use std::sync::Arc;

/// An immutable, cheaply cloneable byte string.
///
/// An empty value is a real value: resolving a name declared with `""` yields
/// `Some` of an empty `ConfigValue`, never "not found".
///
/// # Examples
///
/// ```
/// use scopecfg::domain::config_value::ConfigValue;
///
/// let value = ConfigValue::from("on");
/// assert_eq!(value.as_bytes(), b"on");
/// assert_eq!(value.as_str(), Some("on"));
/// ```
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct ConfigValue(Arc<[u8]>);

impl ConfigValue {
    /// Creates a new `ConfigValue` from raw bytes.
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        ConfigValue(Arc::from(bytes.into()))
    }

    /// Returns the raw bytes of the value.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Returns the value as UTF-8, if it is valid UTF-8.
    pub fn as_str(&self) -> Option<&str> {
        std::str::from_utf8(&self.0).ok()
    }

    /// Returns the value as a string, replacing invalid UTF-8 sequences.
    pub fn to_string_lossy(&self) -> String {
        String::from_utf8_lossy(&self.0).into_owned()
    }

    /// Returns the length of the value in bytes.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if the value is the empty byte string.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns true if both values share the same storage.
    pub fn ptr_eq(&self, other: &ConfigValue) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl From<&str> for ConfigValue {
    fn from(s: &str) -> Self {
        ConfigValue::new(s.as_bytes())
    }
}

impl From<String> for ConfigValue {
    fn from(s: String) -> Self {
        ConfigValue::new(s.into_bytes())
    }
}

impl From<&[u8]> for ConfigValue {
    fn from(b: &[u8]) -> Self {
        ConfigValue::new(b)
    }
}

impl From<Vec<u8>> for ConfigValue {
    fn from(b: Vec<u8>) -> Self {
        ConfigValue::new(b)
    }
}

impl AsRef<[u8]> for ConfigValue {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl PartialEq<[u8]> for ConfigValue {
    fn eq(&self, other: &[u8]) -> bool {
        *self.0 == *other
    }
}

impl PartialEq<str> for ConfigValue {
    fn eq(&self, other: &str) -> bool {
        *self.0 == *other.as_bytes()
    }
}

impl PartialEq<&str> for ConfigValue {
    fn eq(&self, other: &&str) -> bool {
        *self.0 == *other.as_bytes()
    }
}

impl fmt::Debug for ConfigValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.as_str() {
            Some(s) => f.debug_tuple("ConfigValue").field(&s).finish(),
            None => f.debug_tuple("ConfigValue").field(&&*self.0).finish(),
        }
    }
}

impl fmt::Display for ConfigValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", String::from_utf8_lossy(&self.0))
    }
}
