// SPDX-License-Identifier: MIT OR Apache-2.0

//! Shared fixtures for integration tests.

use scopecfg::domain::{ConfigError, Result};
use scopecfg::prelude::*;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Builds the tree used by most tests:
///
/// ```text
/// global      a=1 x=root
/// └ api       b=2 x=api
///   ├ /v1     (nothing)
///   └ /v2     x=v2 empty=""
/// └ static    (nothing)
/// ```
#[allow(dead_code)]
pub fn sample_spec() -> ScopeSpec {
    ScopeSpec::global()
        .declare("a", "1")
        .declare("x", "root")
        .child(
            ScopeSpec::group("api")
                .declare("b", "2")
                .declare("x", "api")
                .child(ScopeSpec::route("/v1"))
                .child(ScopeSpec::route("/v2").declare("X", "v2").declare("empty", "")),
        )
        .child(ScopeSpec::group("static"))
}

/// A declaration source that counts loads and can be told to fail.
#[allow(dead_code)]
pub struct MockSource {
    spec: ScopeSpec,
    fail: bool,
    loads: AtomicUsize,
}

#[allow(dead_code)]
impl MockSource {
    /// Creates a source serving `spec`.
    pub fn new(spec: ScopeSpec) -> Self {
        Self {
            spec,
            fail: false,
            loads: AtomicUsize::new(0),
        }
    }

    /// Makes every load fail.
    pub fn failing(mut self) -> Self {
        self.fail = true;
        self
    }

    /// Number of times `load` was called.
    pub fn loads(&self) -> usize {
        self.loads.load(Ordering::SeqCst)
    }
}

impl DeclarationSource for MockSource {
    fn name(&self) -> &str {
        "mock"
    }

    fn load(&self, builder: &mut ScopeTreeBuilder) -> Result<()> {
        self.loads.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(ConfigError::SourceError {
                source_name: "mock".to_string(),
                message: "simulated failure".to_string(),
                source: None,
            });
        }
        self.spec.load(builder)
    }
}
