// SPDX-License-Identifier: MIT OR Apache-2.0

//! Scope identifiers.

use std::fmt;

/// The level of a scope in the configuration hierarchy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ScopeLevel {
    /// The single root scope
    Global,
    /// A group of routes, directly under the root
    Group,
    /// A route, under a group or another route
    Route,
}

impl ScopeLevel {
    /// Returns true if a scope of level `child` may be nested in `self`.
    pub fn accepts(self, child: ScopeLevel) -> bool {
        matches!(
            (self, child),
            (ScopeLevel::Global, ScopeLevel::Group)
                | (ScopeLevel::Group, ScopeLevel::Route)
                | (ScopeLevel::Route, ScopeLevel::Route)
        )
    }
}

impl fmt::Display for ScopeLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ScopeLevel::Global => "global",
            ScopeLevel::Group => "group",
            ScopeLevel::Route => "route",
        };
        f.write_str(name)
    }
}

/// Index of a scope within one scope tree.
///
/// Ids are assigned in creation order, so a parent's id is always lower than
/// its children's. The same id addresses the same scope in the generation
/// built from the tree.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ScopeId(pub(crate) usize);

impl ScopeId {
    /// The root scope of every tree.
    pub const ROOT: ScopeId = ScopeId(0);

    /// Returns the raw index.
    pub fn index(self) -> usize {
        self.0
    }
}

/// Unique identifier of one compiled generation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GenerationId(pub(crate) u64);

impl fmt::Display for GenerationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A scope of a specific generation, as held by a request in flight.
///
/// A handle is only valid against the generation that issued it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ScopeHandle {
    pub(crate) generation: GenerationId,
    pub(crate) scope: ScopeId,
}

impl ScopeHandle {
    /// The generation this handle belongs to.
    pub fn generation(&self) -> GenerationId {
        self.generation
    }

    /// The scope this handle addresses.
    pub fn scope(&self) -> ScopeId {
        self.scope
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_nesting() {
        assert!(ScopeLevel::Global.accepts(ScopeLevel::Group));
        assert!(ScopeLevel::Group.accepts(ScopeLevel::Route));
        assert!(ScopeLevel::Route.accepts(ScopeLevel::Route));

        assert!(!ScopeLevel::Global.accepts(ScopeLevel::Route));
        assert!(!ScopeLevel::Global.accepts(ScopeLevel::Global));
        assert!(!ScopeLevel::Group.accepts(ScopeLevel::Group));
        assert!(!ScopeLevel::Route.accepts(ScopeLevel::Group));
    }

    #[test]
    fn test_level_display() {
        assert_eq!(ScopeLevel::Route.to_string(), "route");
    }

    #[test]
    fn test_root_id() {
        assert_eq!(ScopeId::ROOT.index(), 0);
    }
}
