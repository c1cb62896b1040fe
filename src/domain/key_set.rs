// SPDX-License-Identifier: MIT OR Apache-2.0

//! Per-scope declaration sets.
//!
//! A `ScopeKeySet` collects the name/value pairs declared directly inside one
//! scope while configuration is being loaded. It is append-only and rejects a
//! second declaration of a name it already holds.

use crate::domain::config_value::ConfigValue;
use crate::domain::errors::{ConfigError, Result};
use crate::domain::key_name::KeyName;
use std::collections::HashSet;

/// A single declared name/value pair with its precomputed lookup hash.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KeyRecord {
    name: KeyName,
    value: ConfigValue,
    hash: u64,
}

impl KeyRecord {
    /// Creates a record, computing the hash of `name`.
    pub fn new(name: KeyName, value: ConfigValue) -> Self {
        let hash = name.hash_key();
        Self { name, value, hash }
    }

    /// The lowercased name.
    pub fn name(&self) -> &KeyName {
        &self.name
    }

    /// The declared value.
    pub fn value(&self) -> &ConfigValue {
        &self.value
    }

    /// The lookup hash of the name.
    pub fn hash(&self) -> u64 {
        self.hash
    }
}

/// The ordered declarations of one scope.
///
/// Insertion order is declaration order. No two records share a name.
///
/// # Examples
///
/// ```
/// use scopecfg::domain::key_set::ScopeKeySet;
///
/// let mut keys = ScopeKeySet::new("global");
/// keys.add("Region", "eu-west").unwrap();
/// assert!(keys.add("REGION", "us-east").is_err());
/// assert_eq!(keys.len(), 1);
/// ```
#[derive(Clone, Debug, Default)]
pub struct ScopeKeySet {
    scope: String,
    records: Vec<KeyRecord>,
    /// Names in `records`, for constant-time duplicate checks
    names: HashSet<KeyName>,
}

impl ScopeKeySet {
    /// Creates an empty set for the scope at `scope` (used in error reports).
    pub fn new(scope: impl Into<String>) -> Self {
        Self {
            scope: scope.into(),
            records: Vec::new(),
            names: HashSet::new(),
        }
    }

    /// Declares `name = value` in this scope.
    ///
    /// # Errors
    ///
    /// * `ConfigError::InvalidName` - `name` is empty or has characters
    ///   outside `[A-Za-z0-9_]`
    /// * `ConfigError::DuplicateKey` - `name` is already declared here,
    ///   compared case-insensitively
    pub fn add(&mut self, name: &str, value: impl Into<ConfigValue>) -> Result<()> {
        let key = KeyName::parse(name).map_err(|source| ConfigError::InvalidName {
            scope: self.scope.clone(),
            name: name.to_string(),
            source,
        })?;

        if !self.names.insert(key.clone()) {
            return Err(ConfigError::DuplicateKey {
                scope: self.scope.clone(),
                name: key.into_string(),
            });
        }

        self.records.push(KeyRecord::new(key, value.into()));
        Ok(())
    }

    /// Returns true if `name` is declared in this set.
    pub fn contains(&self, name: &KeyName) -> bool {
        self.names.contains(name)
    }

    /// Path of the owning scope.
    pub fn scope(&self) -> &str {
        &self.scope
    }

    /// The records in declaration order.
    pub fn records(&self) -> &[KeyRecord] {
        &self.records
    }

    /// Number of declarations.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns true if nothing was declared in this scope.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Produces the effective record set of this scope under `parent`.
    ///
    /// The result holds this scope's own records in declaration order,
    /// followed by each parent record whose name is not declared here.
    pub fn merged_with(&self, parent: &[KeyRecord]) -> Vec<KeyRecord> {
        let mut merged = Vec::with_capacity(self.records.len() + parent.len());
        merged.extend(self.records.iter().cloned());
        merged.extend(
            parent
                .iter()
                .filter(|r| !self.contains(&r.name))
                .cloned(),
        );
        merged
    }
}
