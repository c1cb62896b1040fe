// SPDX-License-Identifier: MIT OR Apache-2.0

//! Adapters layer containing declaration source implementations.
//!
//! This module contains concrete implementations of the traits defined in the
//! ports layer. Each adapter reads a scope tree from a specific input format.

#[cfg(feature = "yaml")]
pub mod yaml_file;

// Re-export adapters based on feature flags
#[cfg(feature = "yaml")]
pub use yaml_file::{YamlFileAdapter, YamlParser};
