// SPDX-License-Identifier: MIT OR Apache-2.0

//! A hierarchical, read-mostly scoped key-value configuration store.
//!
//! Administrators declare named values at several nested scope levels: the
//! global root, groups beneath it, and routes beneath groups (routes may nest).
//! Once loading finishes every scope is compiled into an immutable lookup
//! table holding its full effective view, and lookups from any number of
//! threads need no synchronization.
//!
//! # Architecture
//!
//! The crate follows hexagonal architecture principles:
//!
//! - **Domain Layer**: names, values, per-scope key sets and compiled tables
//!   (`KeyName`, `ConfigValue`, `ScopeKeySet`, `ScopeTable`, errors)
//! - **Ports**: traits through which declarations enter (`DeclarationSource`,
//!   `DeclarationParser`)
//! - **Adapters**: implementations for specific input formats (YAML)
//! - **Service**: the load phase (`ScopeTreeBuilder`), the compiled result
//!   (`Generation`) and the published generation (`ConfigStore`)
//!
//! # Resolution
//!
//! - Names are case-insensitive and limited to `[A-Za-z0-9_]`.
//! - A name declared twice in one scope is a load error; declaring it again in
//!   a nested scope overrides the outer value for that subtree.
//! - A lookup starts at a request's scope, or at the root when there is no
//!   request, and returns the value from the nearest scope declaring the name.
//! - A name declared nowhere on that path resolves to `None`, not an error.
//!
//! # Feature Flags
//!
//! - `yaml`: Enable YAML file support (default)
//!
//! # Quick Start
//!
//! ```rust
//! use scopecfg::prelude::*;
//!
//! # fn main() -> Result<()> {
//! let spec = ScopeSpec::global()
//!     .declare("backend", "10.0.0.1")
//!     .child(
//!         ScopeSpec::group("api")
//!             .declare("timeout", "30")
//!             .child(ScopeSpec::route("/upload").declare("Timeout", "300")),
//!     );
//!
//! let store = ConfigStore::from_source(&spec)?;
//!
//! // Per request: pin the generation, find the scope, resolve.
//! let generation = store.snapshot();
//! let upload = generation.find(&["api", "/upload"]);
//! let view = generation.view(upload)?;
//! assert_eq!(view.get("TIMEOUT")?.unwrap(), "300");
//! assert_eq!(view.get("backend")?.unwrap(), "10.0.0.1");
//! assert!(view.get("missing")?.is_none());
//!
//! // Outside a request: resolve from the root.
//! assert!(store.resolve(None, "timeout")?.is_none());
//! # Ok(())
//! # }
//! ```

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![warn(clippy::all)]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod service;

/// Commonly used types and traits.
///
/// This module re-exports the most commonly used types and traits for convenient access.
pub mod prelude {
    pub use crate::domain::{
        ConfigError, ConfigLookup, ConfigValue, Result, ScopeHandle, ScopeId, ScopeLevel,
        ScopeSpec, TableSettings,
    };
    pub use crate::ports::{DeclarationParser, DeclarationSource};
    pub use crate::service::{ConfigStore, Generation, ScopeTreeBuilder, ScopeView};

    // Re-export adapters based on feature flags
    #[cfg(feature = "yaml")]
    pub use crate::adapters::{YamlFileAdapter, YamlParser};
}
