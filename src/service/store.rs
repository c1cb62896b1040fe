// SPDX-License-Identifier: MIT OR Apache-2.0

//! The published configuration generation.
//!
//! `ConfigStore` is the handle a host threads through its workers. It holds
//! the generation currently in service behind an [`ArcSwap`]: readers pin a
//! generation with [`ConfigStore::snapshot`] and resolve against it for the
//! whole request, while a reload builds a complete new generation off to the
//! side and swaps it in with a single atomic store.

use crate::domain::scope::{GenerationId, ScopeHandle};
use crate::domain::{ConfigValue, Result};
use crate::ports::DeclarationSource;
use crate::service::generation::Generation;
use crate::service::resolver::ScopeTreeBuilder;
use arc_swap::ArcSwap;
use std::sync::Arc;

/// Owner of the generation currently in service.
///
/// # Examples
///
/// ```rust
/// use scopecfg::domain::ScopeSpec;
/// use scopecfg::service::ConfigStore;
///
/// # fn main() -> scopecfg::domain::Result<()> {
/// let store = ConfigStore::from_source(&ScopeSpec::global().declare("mode", "blue"))?;
///
/// // A request pins the generation it started with.
/// let pinned = store.snapshot();
///
/// store.reload(&ScopeSpec::global().declare("mode", "green"))?;
///
/// assert_eq!(pinned.resolve(None, "mode")?.unwrap(), "blue");
/// assert_eq!(store.resolve(None, "mode")?.unwrap(), "green");
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct ConfigStore {
    current: ArcSwap<Generation>,
}

impl ConfigStore {
    /// Puts `generation` in service.
    pub fn new(generation: Generation) -> Self {
        tracing::info!(generation = %generation.id(), "config generation in service");
        Self {
            current: ArcSwap::from_pointee(generation),
        }
    }

    /// Builds the first generation from `source` and puts it in service.
    pub fn from_source<S: DeclarationSource + ?Sized>(source: &S) -> Result<Self> {
        Ok(Self::new(ScopeTreeBuilder::load(source)?))
    }

    /// Pins the generation currently in service.
    ///
    /// The returned generation stays valid and unchanged for as long as it is
    /// held, whatever is published in the meantime.
    pub fn snapshot(&self) -> Arc<Generation> {
        self.current.load_full()
    }

    /// Id of the generation currently in service.
    pub fn current_id(&self) -> GenerationId {
        self.current.load().id()
    }

    /// Puts `generation` in service and returns the one it replaces.
    pub fn publish(&self, generation: Generation) -> Arc<Generation> {
        let id = generation.id();
        let previous = self.current.swap(Arc::new(generation));
        tracing::info!(
            generation = %id,
            previous = %previous.id(),
            "published config generation"
        );
        previous
    }

    /// Rebuilds from `source` and publishes the result.
    ///
    /// # Errors
    ///
    /// Any load error is returned and the current generation stays in
    /// service untouched.
    pub fn reload<S: DeclarationSource + ?Sized>(&self, source: &S) -> Result<GenerationId> {
        match ScopeTreeBuilder::load(source) {
            Ok(generation) => {
                let id = generation.id();
                self.publish(generation);
                Ok(id)
            }
            Err(e) => {
                tracing::warn!(
                    source = source.name(),
                    current = %self.current_id(),
                    "config reload rejected: {}",
                    e
                );
                Err(e)
            }
        }
    }

    /// Resolves `name` against the generation currently in service.
    ///
    /// A handle is only accepted if it was issued by that same generation;
    /// requests that span a reload should resolve against their own
    /// [`snapshot`](Self::snapshot) instead.
    pub fn resolve(&self, scope: Option<ScopeHandle>, name: &str) -> Result<Option<ConfigValue>> {
        let generation = self.current.load();
        Ok(generation.resolve(scope, name)?.cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ConfigError, ScopeSpec};

    #[test]
    fn test_publish_returns_previous() {
        let first = ScopeSpec::global().declare("v", "1").build().unwrap();
        let first_id = first.id();
        let store = ConfigStore::new(first);

        let second = ScopeSpec::global().declare("v", "2").build().unwrap();
        let second_id = second.id();
        let previous = store.publish(second);

        assert_eq!(previous.id(), first_id);
        assert_eq!(store.current_id(), second_id);
        assert_eq!(store.resolve(None, "v").unwrap().unwrap(), "2");
    }

    #[test]
    fn test_failed_reload_keeps_current() {
        let store = ConfigStore::from_source(&ScopeSpec::global().declare("v", "1")).unwrap();
        let before = store.current_id();

        let broken = ScopeSpec::global().declare("v", "1").declare("V", "2");
        let err = store.reload(&broken).unwrap_err();

        assert!(matches!(err, ConfigError::DuplicateKey { .. }));
        assert_eq!(store.current_id(), before);
        assert_eq!(store.resolve(None, "v").unwrap().unwrap(), "1");
    }

    #[test]
    fn test_stale_handle_after_reload() {
        let spec = ScopeSpec::global().child(ScopeSpec::group("g").declare("k", "v"));
        let store = ConfigStore::from_source(&spec).unwrap();
        let pinned = store.snapshot();
        let handle = pinned.find(&["g"]);

        store.reload(&spec).unwrap();

        assert!(matches!(
            store.resolve(handle, "k"),
            Err(ConfigError::InvalidArgument { .. })
        ));
        assert_eq!(pinned.resolve(handle, "k").unwrap().unwrap(), "v");
    }
}
