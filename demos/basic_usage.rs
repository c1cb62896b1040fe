// SPDX-License-Identifier: MIT OR Apache-2.0

//! Basic usage example for the scoped configuration store.
//!
//! This example demonstrates:
//! - Loading a scope tree from a YAML file
//! - Resolving values from the root, a group and a route
//! - Using default values for missing names
//! - Reloading while a request keeps its pinned generation
//!
//! To run this example:
//! ```bash
//! cargo run --example basic_usage
//! ```

use scopecfg::prelude::*;
use std::fs;

const INITIAL: &str = r#"
config:
  app_name: MyApplication
  timeout: 60
groups:
  - name: api
    config:
      timeout: 30
    routes:
      - name: /upload
        config:
          timeout: 300
  - name: static
    config:
      cache: "on"
"#;

const UPDATED: &str = r#"
config:
  app_name: MyApplication
  timeout: 45
groups:
  - name: api
    config:
      timeout: 20
"#;

fn main() -> Result<()> {
    // Initialize tracing subscriber for logging
    tracing_subscriber::fmt::init();

    println!("=== Scoped Configuration: Basic Usage ===\n");

    let dir = std::env::temp_dir().join("scopecfg-demo");
    fs::create_dir_all(&dir)?;
    let path = dir.join("scopes.yaml");
    fs::write(&path, INITIAL)?;

    let adapter = YamlFileAdapter::from_file(&path)?;
    let store = ConfigStore::from_source(&adapter)?;
    println!("Loaded generation {} from {}\n", store.current_id(), path.display());

    // Example 1: resolution walks up to the nearest declaring scope
    println!("--- Example 1: Resolution by Scope ---");
    let generation = store.snapshot();
    for labels in [&[][..], &["api"][..], &["api", "/upload"][..], &["static"][..]] {
        let scope = generation.find(labels);
        let view = generation.view(scope)?;
        let timeout = view.get("TIMEOUT")?;
        println!(
            "{:<24} timeout = {}",
            view.path(),
            timeout.map(|v| v.to_string()).unwrap_or_else(|| "<unset>".into())
        );
    }

    // Example 2: names that are declared nowhere
    println!("\n--- Example 2: Defaults for Missing Names ---");
    let view = generation.view(generation.find(&["api"]))?;
    let log_level = view.get_or_default("log_level", b"info")?;
    println!("log_level = {} (default)", log_level);
    println!("has cache in api? {}", view.has("cache")?);

    // Example 3: invalid names are reported, not ignored
    println!("\n--- Example 3: Invalid Names ---");
    match view.get("log.level") {
        Ok(_) => println!("unexpected success"),
        Err(e) => println!("error: {}", e),
    }

    // Example 4: reload while the pinned generation stays intact
    println!("\n--- Example 4: Reload ---");
    fs::write(&path, UPDATED)?;
    let id = store.reload(&adapter)?;
    println!("Published generation {}", id);
    println!(
        "pinned  timeout = {}",
        generation.resolve(None, "timeout")?.map(|v| v.to_string()).unwrap_or_default()
    );
    println!(
        "current timeout = {}",
        store.resolve(None, "timeout")?.map(|v| v.to_string()).unwrap_or_default()
    );

    println!("\n=== Example Complete ===");
    Ok(())
}
