// SPDX-License-Identifier: MIT OR Apache-2.0

//! Service layer: building, holding and querying compiled scope trees.
//!
//! [`ScopeTreeBuilder`] runs the load phase and produces a [`Generation`];
//! [`ConfigStore`] keeps the generation in service and swaps in new ones on
//! reload.

pub mod generation;
pub mod resolver;
pub mod store;

// Re-export commonly used types
pub use generation::{Generation, ScopeView};
pub use resolver::ScopeTreeBuilder;
pub use store::ConfigStore;
