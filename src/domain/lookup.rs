// SPDX-License-Identifier: MIT OR Apache-2.0

//! Read-side lookup trait.
//!
//! This module defines the `ConfigLookup` trait, the interface through which
//! callers read resolved values. A lookup is bound to a starting scope; a
//! missing name is `Ok(None)`, never an error.

use crate::domain::{ConfigError, ConfigValue, Result};

/// Resolves names to values from a fixed starting scope.
///
/// # Examples
///
/// ```rust
/// use scopecfg::domain::{ConfigLookup, ConfigValue, Result};
///
/// struct Fixed(ConfigValue);
///
/// impl ConfigLookup for Fixed {
///     fn get(&self, name: &str) -> Result<Option<&ConfigValue>> {
///         Ok((name == "answer").then_some(&self.0))
///     }
/// }
///
/// let lookup = Fixed(ConfigValue::from("42"));
/// assert_eq!(lookup.get("answer").unwrap().unwrap(), "42");
/// assert!(!lookup.has("question").unwrap());
/// ```
pub trait ConfigLookup {
    /// Retrieves the value of `name`.
    ///
    /// # Returns
    ///
    /// * `Ok(Some(value))` - The name resolves to `value`
    /// * `Ok(None)` - The name is not declared anywhere in the scope chain
    /// * `Err(ConfigError)` - `name` violates the call contract
    fn get(&self, name: &str) -> Result<Option<&ConfigValue>>;

    /// Retrieves the value of `name`, or `default` if it is not declared.
    fn get_or_default(&self, name: &str, default: &[u8]) -> Result<ConfigValue> {
        Ok(self
            .get(name)?
            .cloned()
            .unwrap_or_else(|| ConfigValue::from(default)))
    }

    /// Checks whether `name` resolves to a value.
    fn has(&self, name: &str) -> Result<bool> {
        Ok(self.get(name)?.is_some())
    }

    /// Calls [`ConfigLookup::get`] with a script-style argument list.
    ///
    /// Exactly one argument, the name, must be supplied.
    fn get_args<S: AsRef<str>>(&self, args: &[S]) -> Result<Option<&ConfigValue>>
    where
        Self: Sized,
    {
        match args {
            [name] => self.get(name.as_ref()),
            _ => Err(ConfigError::invalid_argument(format!(
                "exactly one argument expected, got {}",
                args.len()
            ))),
        }
    }
}
