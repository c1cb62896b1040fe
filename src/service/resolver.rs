// SPDX-License-Identifier: MIT OR Apache-2.0

//! Scope tree assembly, inheritance merge and compilation.
//!
//! The load phase creates scopes and declarations on a `ScopeTreeBuilder`.
//! [`ScopeTreeBuilder::build`] then walks the tree parent-first and gives every
//! scope one flat table holding its full effective view: its own declarations
//! plus every ancestor declaration it does not override. A scope that declares
//! nothing reuses its parent's table as is.

use crate::domain::key_set::{KeyRecord, ScopeKeySet};
use crate::domain::scope::{ScopeId, ScopeLevel};
use crate::domain::settings::TableSettings;
use crate::domain::{ConfigError, ConfigValue, Result, ScopeTable};
use crate::ports::DeclarationSource;
use crate::service::generation::{CompiledScope, Generation};
use std::sync::Arc;

const ROOT_LABEL: &str = "global";

#[derive(Debug)]
struct PendingScope {
    label: String,
    level: ScopeLevel,
    parent: Option<ScopeId>,
    keys: ScopeKeySet,
    settings: TableSettings,
}

impl PendingScope {
    fn path(&self) -> &str {
        self.keys.scope()
    }
}

/// Collects scopes and declarations during the load phase.
///
/// # Examples
///
/// ```rust
/// use scopecfg::domain::ScopeLevel;
/// use scopecfg::service::ScopeTreeBuilder;
///
/// # fn main() -> scopecfg::domain::Result<()> {
/// let mut builder = ScopeTreeBuilder::new();
/// let root = builder.root();
/// builder.declare(root, "x", "1")?;
///
/// let api = builder.add_scope(root, ScopeLevel::Group, "api")?;
/// builder.declare(api, "x", "2")?;
///
/// let generation = builder.build()?;
/// let api = generation.handle(api).unwrap();
/// assert_eq!(generation.resolve(Some(api), "x")?.unwrap(), "2");
/// assert_eq!(generation.resolve(None, "x")?.unwrap(), "1");
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct ScopeTreeBuilder {
    scopes: Vec<PendingScope>,
}

impl ScopeTreeBuilder {
    /// Creates a tree holding only the global root scope.
    pub fn new() -> Self {
        Self {
            scopes: vec![PendingScope {
                label: ROOT_LABEL.to_string(),
                level: ScopeLevel::Global,
                parent: None,
                keys: ScopeKeySet::new(ROOT_LABEL),
                settings: TableSettings::default(),
            }],
        }
    }

    /// Builds a generation from everything `source` declares.
    pub fn load<S: DeclarationSource + ?Sized>(source: &S) -> Result<Generation> {
        let mut builder = Self::new();
        source.load(&mut builder)?;
        tracing::debug!(
            source = source.name(),
            scopes = builder.len(),
            "loaded declarations"
        );
        builder.build()
    }

    /// The global root scope.
    pub fn root(&self) -> ScopeId {
        ScopeId::ROOT
    }

    /// Number of scopes, including the root.
    pub fn len(&self) -> usize {
        self.scopes.len()
    }

    /// Always false; the root scope exists from the start.
    pub fn is_empty(&self) -> bool {
        self.scopes.is_empty()
    }

    /// Path of `scope`, e.g. `global/api//v1`.
    pub fn path(&self, scope: ScopeId) -> Result<&str> {
        Ok(self.scope(scope)?.path())
    }

    /// Creates a scope of `level` named `label` under `parent`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidScope` if `parent` is unknown, if `level`
    /// may not be nested in the parent's level, if `label` is empty or is a
    /// group label containing `/`, or if the parent already has a child named
    /// `label`.
    pub fn add_scope(
        &mut self,
        parent: ScopeId,
        level: ScopeLevel,
        label: impl Into<String>,
    ) -> Result<ScopeId> {
        let label = label.into();
        let parent_scope = self.scope(parent)?;

        if !parent_scope.level.accepts(level) {
            return Err(ConfigError::invalid_scope(format!(
                "a {} scope cannot be nested in {} scope '{}'",
                level,
                parent_scope.level,
                parent_scope.path()
            )));
        }
        if label.is_empty() {
            return Err(ConfigError::invalid_scope(format!(
                "empty label for {} scope in '{}'",
                level,
                parent_scope.path()
            )));
        }
        // Group labels may not contain the path separator, so a group path
        // never reads like a group followed by a route.
        if level == ScopeLevel::Group && label.contains('/') {
            return Err(ConfigError::invalid_scope(format!(
                "group label '{}' in '{}' must not contain '/'",
                label,
                parent_scope.path()
            )));
        }
        if self
            .scopes
            .iter()
            .any(|s| s.parent == Some(parent) && s.label == label)
        {
            return Err(ConfigError::invalid_scope(format!(
                "duplicate {} scope '{}' in '{}'",
                level,
                label,
                parent_scope.path()
            )));
        }

        let path = format!("{}/{}", parent_scope.path(), label);
        let id = ScopeId(self.scopes.len());
        tracing::debug!(scope = %path, %level, "declared scope");
        self.scopes.push(PendingScope {
            label,
            level,
            parent: Some(parent),
            keys: ScopeKeySet::new(path),
            settings: TableSettings::default(),
        });
        Ok(id)
    }

    /// Declares `name = value` in `scope`.
    ///
    /// # Errors
    ///
    /// * `ConfigError::InvalidScope` - `scope` is unknown
    /// * `ConfigError::InvalidName` - `name` is empty or malformed
    /// * `ConfigError::DuplicateKey` - `name` is already declared in `scope`
    pub fn declare(
        &mut self,
        scope: ScopeId,
        name: &str,
        value: impl Into<ConfigValue>,
    ) -> Result<()> {
        let pending = self.scope_mut(scope)?;
        pending.keys.add(name, value)?;
        tracing::debug!(scope = pending.path(), name, "declared config");
        Ok(())
    }

    /// Sets the maximum directory size for `scope` and its descendants.
    pub fn set_hash_max_size(&mut self, scope: ScopeId, size: usize) -> Result<()> {
        self.apply_settings(
            scope,
            TableSettings {
                hash_max_size: Some(size),
                hash_bucket_size: None,
            },
        )
    }

    /// Sets the bucket footprint for `scope` and its descendants.
    pub fn set_hash_bucket_size(&mut self, scope: ScopeId, size: usize) -> Result<()> {
        self.apply_settings(
            scope,
            TableSettings {
                hash_max_size: None,
                hash_bucket_size: Some(size),
            },
        )
    }

    /// Applies every knob that is set in `settings` to `scope`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidSetting` for a zero knob.
    pub fn apply_settings(&mut self, scope: ScopeId, settings: TableSettings) -> Result<()> {
        let pending = self.scope_mut(scope)?;
        let knobs = [
            ("hash_max_size", settings.hash_max_size),
            ("hash_bucket_size", settings.hash_bucket_size),
        ];
        for (setting, value) in knobs {
            if value == Some(0) {
                return Err(ConfigError::InvalidSetting {
                    scope: pending.path().to_string(),
                    setting,
                    value: 0,
                });
            }
        }

        if let Some(size) = settings.hash_max_size {
            pending.settings.hash_max_size = Some(size);
        }
        if let Some(size) = settings.hash_bucket_size {
            pending.settings.hash_bucket_size = Some(size);
        }
        Ok(())
    }

    /// Merges and compiles every scope into a new generation.
    ///
    /// # Errors
    ///
    /// Returns the first `ConfigError::TableBuild` encountered; no generation
    /// is produced in that case.
    pub fn build(self) -> Result<Generation> {
        let mut compiled: Vec<CompiledScope> = Vec::with_capacity(self.scopes.len());
        // Effective record sets, indexed like `compiled`.
        let mut effective: Vec<Arc<[KeyRecord]>> = Vec::with_capacity(self.scopes.len());

        for pending in self.scopes {
            let parent = pending.parent.map(|p| p.index());
            let parent_limits = parent
                .map(|p| compiled[p].limits)
                .unwrap_or_default();
            let limits = pending.settings.inherit(&parent_limits);

            let (records, table) = match parent {
                Some(p) if pending.keys.is_empty() => {
                    (Arc::clone(&effective[p]), Arc::clone(&compiled[p].table))
                }
                _ => {
                    let parent_records: &[KeyRecord] = match parent {
                        Some(p) => effective[p].as_ref(),
                        None => &[],
                    };
                    let merged = pending.keys.merged_with(parent_records);
                    let table = ScopeTable::compile(pending.path(), &merged, &limits)?;
                    (Arc::from(merged), Arc::new(table))
                }
            };

            effective.push(records);
            compiled.push(CompiledScope {
                path: pending.path().to_string(),
                label: pending.label,
                level: pending.level,
                parent: pending.parent,
                declared: pending.keys.len(),
                limits,
                table,
            });
        }

        let generation = Generation::new(compiled);
        tracing::info!(
            generation = %generation.id(),
            scopes = generation.scope_count(),
            "built config generation"
        );
        Ok(generation)
    }

    fn scope(&self, id: ScopeId) -> Result<&PendingScope> {
        self.scopes
            .get(id.index())
            .ok_or_else(|| ConfigError::invalid_scope(format!("unknown scope id {}", id.index())))
    }

    fn scope_mut(&mut self, id: ScopeId) -> Result<&mut PendingScope> {
        self.scopes
            .get_mut(id.index())
            .ok_or_else(|| ConfigError::invalid_scope(format!("unknown scope id {}", id.index())))
    }
}

impl Default for ScopeTreeBuilder {
    fn default() -> Self {
        Self::new()
    }
}
