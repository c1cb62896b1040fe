// SPDX-License-Identifier: MIT OR Apache-2.0

//! Compiled scope trees and the query entry point.
//!
//! A `Generation` is the immutable result of one load: one compiled table per
//! scope. It is `Send + Sync` and is read without any locking. Queries start
//! either at a scope handle held by a request, or at the global root when no
//! request is active.

use crate::domain::key_name;
use crate::domain::scope::{GenerationId, ScopeHandle, ScopeId, ScopeLevel};
use crate::domain::settings::TableLimits;
use crate::domain::{ConfigError, ConfigLookup, ConfigValue, Result, ScopeTable};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

static NEXT_GENERATION: AtomicU64 = AtomicU64::new(1);

#[derive(Debug)]
pub(crate) struct CompiledScope {
    pub(crate) path: String,
    pub(crate) label: String,
    pub(crate) level: ScopeLevel,
    pub(crate) parent: Option<ScopeId>,
    pub(crate) declared: usize,
    pub(crate) limits: TableLimits,
    pub(crate) table: Arc<ScopeTable>,
}

impl CompiledScope {
    fn resolve(&self, name: &str) -> Result<Option<&ConfigValue>> {
        if name.is_empty() {
            return Err(ConfigError::invalid_argument(
                "config name must be a non-empty string",
            ));
        }
        key_name::validate(name).map_err(|source| ConfigError::InvalidName {
            scope: self.path.clone(),
            name: name.to_string(),
            source,
        })?;
        Ok(self.table.lookup(name))
    }
}

/// One immutable, fully compiled scope tree.
///
/// # Examples
///
/// ```
/// use scopecfg::domain::ScopeSpec;
///
/// let generation = ScopeSpec::global()
///     .declare("a", "1")
///     .child(ScopeSpec::group("api").declare("b", "2"))
///     .build()
///     .unwrap();
///
/// let api = generation.find(&["api"]).unwrap();
/// assert_eq!(generation.resolve(Some(api), "a").unwrap().unwrap(), "1");
/// assert!(generation.resolve(None, "b").unwrap().is_none());
/// ```
#[derive(Debug)]
pub struct Generation {
    id: GenerationId,
    scopes: Box<[CompiledScope]>,
}

impl Generation {
    /// `scopes[0]` must be the root and parents must precede children.
    pub(crate) fn new(scopes: Vec<CompiledScope>) -> Self {
        Self {
            id: GenerationId(NEXT_GENERATION.fetch_add(1, Ordering::Relaxed)),
            scopes: scopes.into_boxed_slice(),
        }
    }

    /// The unique id of this generation.
    pub fn id(&self) -> GenerationId {
        self.id
    }

    /// Number of scopes, including the root.
    pub fn scope_count(&self) -> usize {
        self.scopes.len()
    }

    /// Handle of the global root scope.
    pub fn root(&self) -> ScopeHandle {
        self.handle_unchecked(ScopeId::ROOT)
    }

    /// Handle for the scope the builder returned as `id`.
    pub fn handle(&self, id: ScopeId) -> Option<ScopeHandle> {
        (id.index() < self.scopes.len()).then(|| self.handle_unchecked(id))
    }

    /// Finds a scope by the labels on the way down from the root.
    ///
    /// An empty path is the root.
    pub fn find(&self, path: &[&str]) -> Option<ScopeHandle> {
        let mut current = ScopeId::ROOT;
        for label in path {
            let index = self
                .scopes
                .iter()
                .position(|s| s.parent == Some(current) && s.label == *label)?;
            current = ScopeId(index);
        }
        Some(self.handle_unchecked(current))
    }

    /// Path of the scope, e.g. `global/api`.
    pub fn path(&self, scope: ScopeHandle) -> Result<&str> {
        Ok(&self.scope(scope)?.path)
    }

    /// Level of the scope.
    pub fn level(&self, scope: ScopeHandle) -> Result<ScopeLevel> {
        Ok(self.scope(scope)?.level)
    }

    /// Parent of the scope, `None` for the root.
    pub fn parent(&self, scope: ScopeHandle) -> Result<Option<ScopeHandle>> {
        Ok(self
            .scope(scope)?
            .parent
            .map(|p| self.handle_unchecked(p)))
    }

    /// Number of names declared directly in the scope.
    pub fn declared_count(&self, scope: ScopeHandle) -> Result<usize> {
        Ok(self.scope(scope)?.declared)
    }

    /// The sizing knobs the scope's table was compiled with.
    pub fn limits(&self, scope: ScopeHandle) -> Result<TableLimits> {
        Ok(self.scope(scope)?.limits)
    }

    /// The compiled table of the scope, holding its full effective view.
    pub fn table(&self, scope: ScopeHandle) -> Result<&ScopeTable> {
        Ok(&self.scope(scope)?.table)
    }

    /// Resolves `name` starting at `scope`, or at the root if `scope` is `None`.
    ///
    /// # Returns
    ///
    /// * `Ok(Some(value))` - The value from the nearest scope declaring `name`
    /// * `Ok(None)` - No scope on the way to the root declares `name`
    ///
    /// # Errors
    ///
    /// * `ConfigError::InvalidArgument` - `name` is empty, or `scope` belongs
    ///   to another generation
    /// * `ConfigError::InvalidName` - `name` has characters outside
    ///   `[A-Za-z0-9_]`
    pub fn resolve(&self, scope: Option<ScopeHandle>, name: &str) -> Result<Option<&ConfigValue>> {
        self.start(scope)?.resolve(name)
    }

    /// A lookup bound to `scope`, or to the root if `scope` is `None`.
    pub fn view(&self, scope: Option<ScopeHandle>) -> Result<ScopeView<'_>> {
        Ok(ScopeView {
            scope: self.start(scope)?,
        })
    }

    /// Iterates over the handles of all scopes, parents before children.
    pub fn scopes(&self) -> impl Iterator<Item = ScopeHandle> + '_ {
        (0..self.scopes.len()).map(|i| self.handle_unchecked(ScopeId(i)))
    }

    fn start(&self, scope: Option<ScopeHandle>) -> Result<&CompiledScope> {
        match scope {
            Some(handle) => self.scope(handle),
            None => Ok(&self.scopes[ScopeId::ROOT.index()]),
        }
    }

    fn scope(&self, handle: ScopeHandle) -> Result<&CompiledScope> {
        if handle.generation != self.id {
            return Err(ConfigError::invalid_argument(format!(
                "scope handle from generation {} used with generation {}",
                handle.generation, self.id
            )));
        }
        self.scopes.get(handle.scope.index()).ok_or_else(|| {
            ConfigError::invalid_argument(format!("unknown scope id {}", handle.scope.index()))
        })
    }

    fn handle_unchecked(&self, scope: ScopeId) -> ScopeHandle {
        ScopeHandle {
            generation: self.id,
            scope,
        }
    }
}

/// A [`ConfigLookup`] bound to one scope of a generation.
#[derive(Debug, Clone, Copy)]
pub struct ScopeView<'g> {
    scope: &'g CompiledScope,
}

impl<'g> ScopeView<'g> {
    /// Path of the scope this view starts at.
    pub fn path(&self) -> &'g str {
        &self.scope.path
    }
}

impl ConfigLookup for ScopeView<'_> {
    fn get(&self, name: &str) -> Result<Option<&ConfigValue>> {
        self.scope.resolve(name)
    }
}
