// SPDX-License-Identifier: MIT OR Apache-2.0

//! Format-neutral description of a scope tree.
//!
//! Parsers turn their input into a `ScopeSpec`; the spec then feeds its
//! declarations, in order, into a [`ScopeTreeBuilder`]. A spec can also be
//! assembled by hand, which is convenient for hosts that parse their own
//! configuration language and for tests.

use crate::domain::scope::{ScopeId, ScopeLevel};
use crate::domain::settings::TableSettings;
use crate::domain::{ConfigError, ConfigValue, Result};
use crate::ports::DeclarationSource;
use crate::service::{Generation, ScopeTreeBuilder};

/// One scope and everything nested in it.
///
/// # Examples
///
/// ```
/// use scopecfg::domain::ScopeSpec;
/// use scopecfg::domain::ConfigLookup;
///
/// let generation = ScopeSpec::global()
///     .declare("region", "eu-west")
///     .child(ScopeSpec::group("api").declare("timeout", "30"))
///     .build()
///     .unwrap();
///
/// let api = generation.find(&["api"]).unwrap();
/// let view = generation.view(Some(api)).unwrap();
/// assert_eq!(view.get("REGION").unwrap().unwrap(), "eu-west");
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScopeSpec {
    /// Label of the scope, unique among its siblings
    pub label: String,
    /// Level of the scope
    pub level: ScopeLevel,
    /// Sizing knobs set on this scope
    pub settings: TableSettings,
    /// Declarations in declaration order
    pub declarations: Vec<(String, ConfigValue)>,
    /// Nested scopes
    pub children: Vec<ScopeSpec>,
}

impl ScopeSpec {
    fn new(label: impl Into<String>, level: ScopeLevel) -> Self {
        Self {
            label: label.into(),
            level,
            settings: TableSettings::default(),
            declarations: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Creates an empty root scope.
    pub fn global() -> Self {
        Self::new("global", ScopeLevel::Global)
    }

    /// Creates an empty group scope.
    pub fn group(label: impl Into<String>) -> Self {
        Self::new(label, ScopeLevel::Group)
    }

    /// Creates an empty route scope.
    pub fn route(label: impl Into<String>) -> Self {
        Self::new(label, ScopeLevel::Route)
    }

    /// Adds a declaration.
    pub fn declare(mut self, name: impl Into<String>, value: impl Into<ConfigValue>) -> Self {
        self.declarations.push((name.into(), value.into()));
        self
    }

    /// Adds a nested scope.
    pub fn child(mut self, child: ScopeSpec) -> Self {
        self.children.push(child);
        self
    }

    /// Sets the sizing knobs of this scope.
    pub fn with_settings(mut self, settings: TableSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Compiles this spec into a generation.
    pub fn build(&self) -> Result<Generation> {
        ScopeTreeBuilder::load(self)
    }

    fn apply(&self, builder: &mut ScopeTreeBuilder, scope: ScopeId) -> Result<()> {
        builder.apply_settings(scope, self.settings)?;
        for (name, value) in &self.declarations {
            builder.declare(scope, name, value.clone())?;
        }
        for child in &self.children {
            let id = builder.add_scope(scope, child.level, child.label.clone())?;
            child.apply(builder, id)?;
        }
        Ok(())
    }
}

impl DeclarationSource for ScopeSpec {
    fn name(&self) -> &str {
        "scope-spec"
    }

    fn load(&self, builder: &mut ScopeTreeBuilder) -> Result<()> {
        if self.level != ScopeLevel::Global {
            return Err(ConfigError::invalid_scope(format!(
                "top-level scope '{}' must be global, not {}",
                self.label, self.level
            )));
        }
        let root = builder.root();
        self.apply(builder, root)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_methods() {
        let spec = ScopeSpec::global()
            .declare("a", "1")
            .child(ScopeSpec::group("g").child(ScopeSpec::route("/r")));

        assert_eq!(spec.label, "global");
        assert_eq!(spec.declarations.len(), 1);
        assert_eq!(spec.children[0].level, ScopeLevel::Group);
        assert_eq!(spec.children[0].children[0].label, "/r");
    }

    #[test]
    fn test_non_global_top_level_is_rejected() {
        let err = ScopeSpec::group("api").build().unwrap_err();
        assert!(matches!(err, ConfigError::InvalidScope { .. }));
    }

    #[test]
    fn test_invalid_nesting_is_rejected() {
        let err = ScopeSpec::global()
            .child(ScopeSpec::route("/direct"))
            .build()
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidScope { .. }));
    }

    #[test]
    fn test_settings_are_applied() {
        let spec = ScopeSpec::global()
            .with_settings(TableSettings {
                hash_max_size: Some(0),
                hash_bucket_size: None,
            })
            .declare("a", "1");
        assert!(matches!(
            spec.build(),
            Err(ConfigError::InvalidSetting { .. })
        ));
    }
}
