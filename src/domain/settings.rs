// SPDX-License-Identifier: MIT OR Apache-2.0

//! Table sizing knobs.
//!
//! `hash_max_size` bounds the number of buckets a scope table may use and
//! `hash_bucket_size` bounds the footprint of a single bucket. They only affect
//! density and speed, never which value a lookup returns.

use serde::Deserialize;

/// Default upper bound on the number of buckets.
pub const DEFAULT_HASH_MAX_SIZE: usize = 512;

/// Default bucket footprint in bytes, one cache line.
pub const DEFAULT_HASH_BUCKET_SIZE: usize = 64;

/// Sizing knobs as set on one scope.
///
/// Unset knobs are inherited from the parent scope; at the root they fall back
/// to the defaults.
///
/// # Examples
///
/// ```
/// use scopecfg::domain::settings::TableSettings;
///
/// let root = TableSettings { hash_max_size: Some(1024), hash_bucket_size: None };
/// let child = TableSettings::default().inherit(&root.resolved());
/// assert_eq!(child.max_size, 1024);
/// assert_eq!(child.bucket_size, 64);
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct TableSettings {
    /// Maximum number of buckets
    #[serde(default)]
    pub hash_max_size: Option<usize>,
    /// Bucket footprint in bytes
    #[serde(default)]
    pub hash_bucket_size: Option<usize>,
}

/// Fully resolved sizing knobs used to compile one table.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TableLimits {
    /// Maximum number of buckets
    pub max_size: usize,
    /// Bucket footprint in bytes
    pub bucket_size: usize,
}

impl Default for TableLimits {
    fn default() -> Self {
        Self {
            max_size: DEFAULT_HASH_MAX_SIZE,
            bucket_size: align_up(DEFAULT_HASH_BUCKET_SIZE, cache_line_size()),
        }
    }
}

impl TableSettings {
    /// Resolves these settings against the parent's resolved limits.
    pub fn inherit(&self, parent: &TableLimits) -> TableLimits {
        TableLimits {
            max_size: self.hash_max_size.unwrap_or(parent.max_size),
            bucket_size: self.hash_bucket_size.unwrap_or(parent.bucket_size),
        }
    }

    /// Resolves these settings against the defaults.
    pub fn resolved(&self) -> TableLimits {
        self.inherit(&TableLimits::default())
    }

    /// Returns true if neither knob is set.
    pub fn is_unset(&self) -> bool {
        self.hash_max_size.is_none() && self.hash_bucket_size.is_none()
    }
}

pub(crate) fn cache_line_size() -> usize {
    64
}

pub(crate) fn align_up(n: usize, align: usize) -> usize {
    (n + align - 1) & !(align - 1)
}
