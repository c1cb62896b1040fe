// SPDX-License-Identifier: MIT OR Apache-2.0

//! Compiled exact-match lookup tables.
//!
//! A `ScopeTable` is built once from a scope's effective records and never
//! changes afterwards. It is a separate-chaining hash table stored flat: every
//! bucket is a contiguous run of entries, and a directory of offsets marks
//! where each run starts.
//!
//! The number of buckets is the smallest size, starting from an estimate
//! derived from the record count, for which no bucket's footprint exceeds the
//! configured bucket size. The footprint of an entry is a pointer-sized word,
//! a two byte length and the name, rounded up to a word.

use crate::domain::config_value::ConfigValue;
use crate::domain::errors::{ConfigError, Result};
use crate::domain::key_name::hash_key_lc;
use crate::domain::key_set::KeyRecord;
use crate::domain::settings::{align_up, TableLimits};
use std::collections::TryReserveError;

const WORD: usize = std::mem::size_of::<usize>();

/// An immutable name -> value table for one scope.
///
/// # Examples
///
/// ```
/// use scopecfg::domain::key_set::ScopeKeySet;
/// use scopecfg::domain::scope_table::ScopeTable;
/// use scopecfg::domain::settings::TableLimits;
///
/// let mut keys = ScopeKeySet::new("global");
/// keys.add("Backend", "10.0.0.1").unwrap();
///
/// let table = ScopeTable::compile("global", keys.records(), &TableLimits::default()).unwrap();
/// assert_eq!(table.lookup("BACKEND").unwrap().as_bytes(), b"10.0.0.1");
/// assert!(table.lookup("missing").is_none());
/// ```
#[derive(Debug, Clone, Default)]
pub struct ScopeTable {
    /// `offsets[b]..offsets[b + 1]` is the entry range of bucket `b`
    offsets: Box<[usize]>,
    entries: Box<[KeyRecord]>,
}

impl ScopeTable {
    /// Returns a table in which every lookup misses.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Compiles `records` into a table for the scope at path `scope`.
    ///
    /// `records` must not contain two records with the same name.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::TableBuild` if a name does not fit in a bucket,
    /// if no directory size up to `limits.max_size` keeps every bucket within
    /// `limits.bucket_size`, or if storage cannot be allocated.
    pub fn compile(scope: &str, records: &[KeyRecord], limits: &TableLimits) -> Result<Self> {
        if records.is_empty() {
            return Ok(Self::empty());
        }

        let build_error = |message: String| ConfigError::TableBuild {
            scope: scope.to_string(),
            message,
            source: None,
        };
        let alloc_error = |e: TryReserveError| ConfigError::TableBuild {
            scope: scope.to_string(),
            message: "out of memory".to_string(),
            source: Some(Box::new(e)),
        };

        if limits.max_size == 0 {
            return Err(build_error("hash_max_size must be positive".to_string()));
        }

        // One word per bucket is reserved for the terminator.
        let capacity = limits.bucket_size.saturating_sub(WORD);
        for record in records {
            let needed = element_size(record.name().as_str().len());
            if needed > capacity {
                return Err(build_error(format!(
                    "config name \"{}\" needs {} bytes, increase hash_bucket_size: {}",
                    record.name(),
                    needed,
                    limits.bucket_size
                )));
            }
        }

        let size = directory_size_for(records, limits, capacity)
            .map_err(alloc_error)?
            .ok_or_else(|| {
                build_error(format!(
                    "{} names do not fit, increase hash_max_size: {} or hash_bucket_size: {}",
                    records.len(),
                    limits.max_size,
                    limits.bucket_size
                ))
            })?;

        let bucket_of = |r: &KeyRecord| (r.hash() % size as u64) as usize;

        let mut order: Vec<usize> = Vec::new();
        order.try_reserve_exact(records.len()).map_err(alloc_error)?;
        order.extend(0..records.len());
        // Stable, so each bucket keeps declaration order.
        order.sort_by_key(|&i| bucket_of(&records[i]));

        let mut entries: Vec<KeyRecord> = Vec::new();
        entries.try_reserve_exact(records.len()).map_err(alloc_error)?;
        entries.extend(order.iter().map(|&i| records[i].clone()));

        let mut offsets: Vec<usize> = Vec::new();
        offsets.try_reserve_exact(size + 1).map_err(alloc_error)?;
        offsets.resize(size + 1, 0);
        for record in &entries {
            offsets[bucket_of(record) + 1] += 1;
        }
        for b in 0..size {
            offsets[b + 1] += offsets[b];
        }

        tracing::debug!(
            scope,
            entries = entries.len(),
            buckets = size,
            "compiled config table"
        );

        Ok(Self {
            offsets: offsets.into_boxed_slice(),
            entries: entries.into_boxed_slice(),
        })
    }

    /// Looks up `name`, ignoring ASCII case.
    ///
    /// Returns `None` if the name is not in the table.
    pub fn lookup(&self, name: &str) -> Option<&ConfigValue> {
        let size = self.directory_size();
        if size == 0 {
            return None;
        }

        let hash = hash_key_lc(name);
        let bucket = (hash % size as u64) as usize;
        self.entries[self.offsets[bucket]..self.offsets[bucket + 1]]
            .iter()
            .find(|r| r.hash() == hash && r.name().as_str().eq_ignore_ascii_case(name))
            .map(KeyRecord::value)
    }

    /// Number of names in the table.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the table holds no names.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of buckets in the directory.
    pub fn directory_size(&self) -> usize {
        self.offsets.len().saturating_sub(1)
    }

    /// Iterates over all records, bucket by bucket.
    pub fn iter(&self) -> impl Iterator<Item = &KeyRecord> {
        self.entries.iter()
    }
}

fn element_size(name_len: usize) -> usize {
    align_up(WORD + 2 + name_len, WORD)
}

/// Finds the smallest directory size in range whose buckets all fit.
fn directory_size_for(
    records: &[KeyRecord],
    limits: &TableLimits,
    capacity: usize,
) -> std::result::Result<Option<usize>, TryReserveError> {
    let n = records.len();
    let per_bucket_estimate = (limits.bucket_size / (2 * WORD)).max(1);
    let mut start = (n / per_bucket_estimate).max(1);
    if limits.max_size > 10_000 && limits.max_size / n < 100 {
        start = limits.max_size - 1000;
    }

    let mut load: Vec<usize> = Vec::new();
    load.try_reserve_exact(limits.max_size)?;

    'sizes: for size in start..=limits.max_size {
        load.clear();
        load.resize(size, 0);
        for record in records {
            let b = (record.hash() % size as u64) as usize;
            load[b] += element_size(record.name().as_str().len());
            if load[b] > capacity {
                continue 'sizes;
            }
        }
        return Ok(Some(size));
    }

    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::key_set::ScopeKeySet;

    fn keys(pairs: &[(&str, &str)]) -> ScopeKeySet {
        let mut set = ScopeKeySet::new("global");
        for (name, value) in pairs {
            set.add(name, *value).unwrap();
        }
        set
    }

    #[test]
    fn test_empty_table_misses_everything() {
        let table = ScopeTable::compile("global", &[], &TableLimits::default()).unwrap();
        assert!(table.is_empty());
        assert_eq!(table.directory_size(), 0);
        assert!(table.lookup("anything").is_none());
        assert!(ScopeTable::empty().lookup("").is_none());
    }

    #[test]
    fn test_lookup_is_case_insensitive() {
        let set = keys(&[("Foo", "bar")]);
        let table = ScopeTable::compile("global", set.records(), &TableLimits::default()).unwrap();
        for name in ["foo", "FOO", "fOo", "Foo"] {
            assert_eq!(table.lookup(name).unwrap().as_bytes(), b"bar");
        }
    }

    #[test]
    fn test_many_keys_all_resolvable() {
        let mut set = ScopeKeySet::new("global");
        for i in 0..300 {
            set.add(&format!("key_{i}"), format!("value_{i}")).unwrap();
        }
        let limits = TableLimits {
            max_size: 4096,
            bucket_size: 128,
        };
        let table = ScopeTable::compile("global", set.records(), &limits).unwrap();
        assert_eq!(table.len(), 300);
        assert!(table.directory_size() <= 4096);
        for i in 0..300 {
            let value = table.lookup(&format!("KEY_{i}")).unwrap();
            assert_eq!(value.to_string_lossy(), format!("value_{i}"));
        }
        assert!(table.lookup("key_300").is_none());
    }

    #[test]
    fn test_compile_is_deterministic() {
        let set = keys(&[("a", "1"), ("b", "2"), ("c", "3"), ("dd", "4")]);
        let limits = TableLimits::default();
        let t1 = ScopeTable::compile("global", set.records(), &limits).unwrap();
        let t2 = ScopeTable::compile("global", set.records(), &limits).unwrap();
        assert_eq!(t1.directory_size(), t2.directory_size());
        let n1: Vec<&str> = t1.iter().map(|r| r.name().as_str()).collect();
        let n2: Vec<&str> = t2.iter().map(|r| r.name().as_str()).collect();
        assert_eq!(n1, n2);
    }

    #[test]
    fn test_name_too_long_for_bucket() {
        let long = "n".repeat(100);
        let set = keys(&[(long.as_str(), "v")]);
        let err = ScopeTable::compile("global/api", set.records(), &TableLimits::default())
            .unwrap_err();
        match err {
            ConfigError::TableBuild { scope, message, .. } => {
                assert_eq!(scope, "global/api");
                assert!(message.contains("hash_bucket_size"));
            }
            other => panic!("unexpected error: {other:?}"),
        }

        let roomy = TableLimits {
            max_size: 512,
            bucket_size: 256,
        };
        let table = ScopeTable::compile("global/api", set.records(), &roomy).unwrap();
        assert!(table.lookup(&long).is_some());
    }

    #[test]
    fn test_max_size_too_small() {
        let mut set = ScopeKeySet::new("global");
        for i in 0..100 {
            set.add(&format!("k{i}"), "v").unwrap();
        }
        let limits = TableLimits {
            max_size: 2,
            bucket_size: 64,
        };
        let err = ScopeTable::compile("global", set.records(), &limits).unwrap_err();
        assert!(err.to_string().contains("hash_max_size"));
    }

    #[test]
    fn test_zero_max_size() {
        let set = keys(&[("a", "1")]);
        let limits = TableLimits {
            max_size: 0,
            bucket_size: 64,
        };
        assert!(matches!(
            ScopeTable::compile("global", set.records(), &limits),
            Err(ConfigError::TableBuild { .. })
        ));
    }

    #[test]
    fn test_single_bucket_is_resolved_by_name() {
        let set = keys(&[("ab", "first"), ("ac", "second")]);
        let limits = TableLimits {
            max_size: 1,
            bucket_size: 64,
        };
        let table = ScopeTable::compile("global", set.records(), &limits).unwrap();
        assert_eq!(table.directory_size(), 1);
        assert_eq!(table.lookup("ab").unwrap(), "first");
        assert_eq!(table.lookup("ac").unwrap(), "second");
        assert!(table.lookup("ad").is_none());
    }

    #[test]
    fn test_empty_value_is_found() {
        let set = keys(&[("flag", "")]);
        let table = ScopeTable::compile("global", set.records(), &TableLimits::default()).unwrap();
        let value = table.lookup("flag").unwrap();
        assert!(value.is_empty());
    }
}
