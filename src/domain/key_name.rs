// SPDX-License-Identifier: MIT OR Apache-2.0

//! Validated, case-normalized configuration names.
//!
//! This module provides the `KeyName` type, a newtype around `String` that can
//! only hold a non-empty name made of ASCII letters, digits and underscores,
//! always stored in lowercase. It also provides the lookup hash used to select
//! a bucket in a compiled scope table.

use crate::domain::errors::NameError;
use std::borrow::Borrow;
use std::fmt;

/// A validated configuration name.
///
/// Names are case-insensitive: `Foo`, `FOO` and `foo` all produce the same
/// `KeyName`, whose stored form is lowercase.
///
/// # Examples
///
/// ```
/// use scopecfg::domain::key_name::KeyName;
///
/// let name = KeyName::parse("Upstream_Timeout").unwrap();
/// assert_eq!(name.as_str(), "upstream_timeout");
///
/// assert!(KeyName::parse("bad key!").is_err());
/// assert!(KeyName::parse("").is_err());
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct KeyName(String);

impl KeyName {
    /// Validates `name` and returns its lowercased form.
    ///
    /// # Errors
    ///
    /// Returns `NameError::Empty` for the empty string and
    /// `NameError::InvalidCharacter` for the first character outside
    /// `[A-Za-z0-9_]`.
    pub fn parse(name: &str) -> std::result::Result<Self, NameError> {
        validate(name)?;
        Ok(KeyName(name.to_ascii_lowercase()))
    }

    /// Returns the lowercased name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Converts the `KeyName` into its inner `String`.
    pub fn into_string(self) -> String {
        self.0
    }

    /// Returns the lookup hash of this name.
    pub fn hash_key(&self) -> u64 {
        hash_key_lc(&self.0)
    }
}

/// Checks that `name` is non-empty and made only of `[A-Za-z0-9_]`.
pub fn validate(name: &str) -> std::result::Result<(), NameError> {
    if name.is_empty() {
        return Err(NameError::Empty);
    }

    match name
        .char_indices()
        .find(|(_, c)| !(c.is_ascii_alphanumeric() || *c == '_'))
    {
        Some((position, character)) => Err(NameError::InvalidCharacter {
            character,
            position,
        }),
        None => Ok(()),
    }
}

/// Hashes `name` as if it were lowercased, without allocating.
///
/// `h = h * 31 + lowercase(byte)` over every byte, with wrapping arithmetic.
pub fn hash_key_lc(name: &str) -> u64 {
    name.bytes().fold(0u64, |h, b| {
        h.wrapping_mul(31)
            .wrapping_add(u64::from(b.to_ascii_lowercase()))
    })
}

impl AsRef<str> for KeyName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for KeyName {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<KeyName> for String {
    fn from(name: KeyName) -> Self {
        name.0
    }
}

impl TryFrom<&str> for KeyName {
    type Error = NameError;

    fn try_from(s: &str) -> std::result::Result<Self, Self::Error> {
        KeyName::parse(s)
    }
}

impl fmt::Display for KeyName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
