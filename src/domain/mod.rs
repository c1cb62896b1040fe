// SPDX-License-Identifier: MIT OR Apache-2.0

//! Domain layer containing core types and logic.
//!
//! This module contains the building blocks of the store: validated names,
//! opaque values, per-scope declaration sets and the compiled lookup tables.
//! It is independent of any input format.

pub mod config_value;
pub mod errors;
pub mod key_name;
pub mod key_set;
pub mod lookup;
pub mod scope;
pub mod scope_spec;
pub mod scope_table;
pub mod settings;

// Re-export commonly used types
pub use config_value::ConfigValue;
pub use errors::{ConfigError, NameError, Result};
pub use key_name::KeyName;
pub use key_set::{KeyRecord, ScopeKeySet};
pub use lookup::ConfigLookup;
pub use scope::{GenerationId, ScopeHandle, ScopeId, ScopeLevel};
pub use scope_spec::ScopeSpec;
pub use scope_table::ScopeTable;
pub use settings::{TableLimits, TableSettings};
