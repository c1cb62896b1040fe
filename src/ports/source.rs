// SPDX-License-Identifier: MIT OR Apache-2.0

//! Declaration source trait definition.
//!
//! This module defines the `DeclarationSource` trait, the port through which
//! the load phase receives declarations. A source walks its input and issues
//! scope and declaration calls on a [`ScopeTreeBuilder`]; it never sees the
//! compiled result.

use crate::domain::Result;
use crate::service::ScopeTreeBuilder;

/// A producer of scope trees and declarations.
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync` so that a source can be kept next to
/// the store and used for reloads from any thread.
///
/// # Examples
///
/// ```rust
/// use scopecfg::ports::DeclarationSource;
/// use scopecfg::service::ScopeTreeBuilder;
/// use scopecfg::domain::Result;
///
/// struct Defaults;
///
/// impl DeclarationSource for Defaults {
///     fn name(&self) -> &str {
///         "defaults"
///     }
///
///     fn load(&self, builder: &mut ScopeTreeBuilder) -> Result<()> {
///         let root = builder.root();
///         builder.declare(root, "log_level", "info")
///     }
/// }
///
/// let generation = ScopeTreeBuilder::load(&Defaults).unwrap();
/// assert_eq!(generation.resolve(None, "log_level").unwrap().unwrap(), "info");
/// ```
pub trait DeclarationSource: Send + Sync {
    /// Returns the name of this source.
    ///
    /// This name is used for logging and error messages. It should be a short,
    /// descriptive identifier like "yaml-file".
    fn name(&self) -> &str;

    /// Feeds every scope and declaration of this source into `builder`.
    ///
    /// # Errors
    ///
    /// Any error aborts the load; the builder is discarded.
    fn load(&self, builder: &mut ScopeTreeBuilder) -> Result<()>;
}
