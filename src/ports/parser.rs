// SPDX-License-Identifier: MIT OR Apache-2.0

//! Declaration parser trait definition.
//!
//! This module defines the `DeclarationParser` trait, which turns the text of a
//! configuration document into a [`ScopeSpec`].

use crate::domain::{Result, ScopeSpec};

/// A trait for parsing declaration documents.
///
/// # Examples
///
/// ```rust
/// use scopecfg::ports::DeclarationParser;
/// use scopecfg::domain::{Result, ScopeSpec};
///
/// /// One `name=value` pair per line, all in the global scope.
/// struct LineParser;
///
/// impl DeclarationParser for LineParser {
///     fn parse(&self, content: &str) -> Result<ScopeSpec> {
///         Ok(content
///             .lines()
///             .filter_map(|line| line.split_once('='))
///             .fold(ScopeSpec::global(), |spec, (k, v)| spec.declare(k.trim(), v.trim())))
///     }
///
///     fn supported_extensions(&self) -> &[&str] {
///         &["conf"]
///     }
/// }
///
/// let spec = LineParser.parse("a = 1\nb = 2").unwrap();
/// assert_eq!(spec.declarations.len(), 2);
/// ```
pub trait DeclarationParser {
    /// Parses `content` into a scope tree.
    ///
    /// # Returns
    ///
    /// * `Ok(ScopeSpec)` - The root scope and everything nested in it
    /// * `Err(ConfigError)` - The content is malformed
    fn parse(&self, content: &str) -> Result<ScopeSpec>;

    /// Returns the file extensions this parser handles, without the dot.
    fn supported_extensions(&self) -> &[&str];
}
