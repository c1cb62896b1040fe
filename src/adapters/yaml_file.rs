// SPDX-License-Identifier: MIT OR Apache-2.0

//! YAML declaration source adapter.
//!
//! This module provides an adapter that reads a scope tree from a YAML file:
//!
//! ```yaml
//! hash_max_size: 1024
//! config:
//!   region: eu-west
//! groups:
//!   - name: api
//!     hash_bucket_size: 128
//!     config:
//!       timeout: 30
//!     routes:
//!       - name: /v1
//!         config:
//!           timeout: 10
//!         routes:
//!           - name: /v1/upload
//!             config:
//!               timeout: 300
//! ```
//!
//! Scalar values (strings, numbers, booleans and null) become values; null is
//! the empty value. Nested mappings or sequences as values are rejected.

use crate::domain::settings::TableSettings;
use crate::domain::{ConfigError, ConfigValue, Result, ScopeSpec};
use crate::ports::{DeclarationParser, DeclarationSource};
use crate::service::ScopeTreeBuilder;
use directories::ProjectDirs;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Maximum allowed file size for YAML configuration files (10MB)
/// This prevents denial of service attacks via extremely large files
const MAX_YAML_FILE_SIZE: u64 = 10 * 1024 * 1024;

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct GlobalDoc {
    #[serde(default)]
    hash_max_size: Option<usize>,
    #[serde(default)]
    hash_bucket_size: Option<usize>,
    #[serde(default)]
    config: serde_yaml::Mapping,
    #[serde(default)]
    groups: Vec<NodeDoc>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct NodeDoc {
    name: String,
    #[serde(default)]
    hash_max_size: Option<usize>,
    #[serde(default)]
    hash_bucket_size: Option<usize>,
    #[serde(default)]
    config: serde_yaml::Mapping,
    #[serde(default)]
    routes: Vec<NodeDoc>,
}

/// YAML parser implementation.
///
/// # Examples
///
/// ```rust
/// use scopecfg::adapters::YamlParser;
/// use scopecfg::ports::DeclarationParser;
///
/// let parser = YamlParser::new();
/// let spec = parser
///     .parse("config:\n  a: 1\ngroups:\n  - name: api\n    config:\n      b: two\n")
///     .unwrap();
/// assert_eq!(spec.declarations.len(), 1);
/// assert_eq!(spec.children[0].label, "api");
/// ```
#[derive(Debug, Clone)]
pub struct YamlParser;

impl YamlParser {
    /// Creates a new YAML parser.
    pub fn new() -> Self {
        YamlParser
    }

    fn scalar(value: &serde_yaml::Value) -> Option<String> {
        match value {
            serde_yaml::Value::String(s) => Some(s.clone()),
            serde_yaml::Value::Number(n) => Some(n.to_string()),
            serde_yaml::Value::Bool(b) => Some(b.to_string()),
            serde_yaml::Value::Null => Some(String::new()),
            _ => None,
        }
    }

    fn declarations(
        scope: &str,
        config: &serde_yaml::Mapping,
    ) -> Result<Vec<(String, ConfigValue)>> {
        config
            .iter()
            .map(|(key, value)| -> Result<(String, ConfigValue)> {
                let name = Self::scalar(key)
                    .filter(|_| !key.is_null())
                    .ok_or_else(|| ConfigError::ParseError {
                        message: format!("config names in scope '{}' must be scalars", scope),
                        source: None,
                    })?;
                let value = Self::scalar(value).ok_or_else(|| ConfigError::ParseError {
                    message: format!(
                        "value of config \"{}\" in scope '{}' must be a scalar",
                        name, scope
                    ),
                    source: None,
                })?;
                Ok((name, ConfigValue::from(value)))
            })
            .collect()
    }

    fn node(parent: &str, doc: &NodeDoc, spec: ScopeSpec) -> Result<ScopeSpec> {
        let path = format!("{}/{}", parent, doc.name);
        let mut spec = spec.with_settings(TableSettings {
            hash_max_size: doc.hash_max_size,
            hash_bucket_size: doc.hash_bucket_size,
        });
        spec.declarations = Self::declarations(&path, &doc.config)?;
        for route in &doc.routes {
            spec = spec.child(Self::node(&path, route, ScopeSpec::route(route.name.clone()))?);
        }
        Ok(spec)
    }
}

impl Default for YamlParser {
    fn default() -> Self {
        Self::new()
    }
}

impl DeclarationParser for YamlParser {
    fn parse(&self, content: &str) -> Result<ScopeSpec> {
        let doc: GlobalDoc = if content.trim().is_empty() {
            GlobalDoc::default()
        } else {
            serde_yaml::from_str(content).map_err(|e| ConfigError::ParseError {
                message: format!("Failed to parse YAML: {}", e),
                source: Some(Box::new(e)),
            })?
        };

        let mut spec = ScopeSpec::global().with_settings(TableSettings {
            hash_max_size: doc.hash_max_size,
            hash_bucket_size: doc.hash_bucket_size,
        });
        spec.declarations = Self::declarations(&spec.label, &doc.config)?;
        for group in &doc.groups {
            let child = Self::node(&spec.label, group, ScopeSpec::group(group.name.clone()))?;
            spec = spec.child(child);
        }
        Ok(spec)
    }

    fn supported_extensions(&self) -> &[&str] {
        &["yaml", "yml"]
    }
}

/// Declaration source adapter for YAML files.
///
/// The file is parsed once when the adapter is created, so that a broken file
/// is reported immediately, and read again on every [`DeclarationSource::load`]
/// so that a reload picks up edits.
///
/// # Examples
///
/// ```rust,no_run
/// use scopecfg::adapters::YamlFileAdapter;
/// use scopecfg::service::ConfigStore;
///
/// let adapter = YamlFileAdapter::from_file("/etc/myapp/scopes.yaml").unwrap();
/// let store = ConfigStore::from_source(&adapter).unwrap();
///
/// // Later, after the file changed:
/// store.reload(&adapter).unwrap();
/// ```
#[derive(Debug, Clone)]
pub struct YamlFileAdapter {
    /// Path to the YAML file
    file_path: PathBuf,
    /// YAML parser
    parser: YamlParser,
}

impl YamlFileAdapter {
    /// Creates a new YAML file adapter from a specific file path.
    ///
    /// # Errors
    ///
    /// Fails if the file cannot be read, is larger than 10MB, or does not
    /// parse.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file_path = path.as_ref().to_path_buf();

        // Canonicalize path to prevent directory traversal attacks
        let canonical_path = file_path.canonicalize().map_err(|e| ConfigError::SourceError {
            source_name: "yaml-file".to_string(),
            message: format!(
                "Invalid or inaccessible path: {}",
                file_path
                    .file_name()
                    .and_then(|n| n.to_str())
                    .unwrap_or("<unknown>")
            ),
            source: Some(Box::new(e)),
        })?;

        let adapter = Self {
            file_path: canonical_path,
            parser: YamlParser::new(),
        };
        adapter.read_spec()?;
        Ok(adapter)
    }

    /// Creates a new YAML file adapter from the default OS-appropriate location.
    ///
    /// This method uses the `directories` crate to determine the appropriate
    /// configuration directory for the current operating system, and reads
    /// `scopes.yaml` from it.
    ///
    /// # Arguments
    ///
    /// * `app_name` - The application name (e.g., "myapp")
    /// * `qualifier` - The organization/qualifier (e.g., "com.example")
    pub fn from_default_location(app_name: &str, qualifier: &str) -> Result<Self> {
        let proj_dirs =
            ProjectDirs::from(qualifier, "", app_name).ok_or_else(|| ConfigError::SourceError {
                source_name: "yaml-file".to_string(),
                message: "Failed to determine project directories".to_string(),
                source: None,
            })?;

        Self::from_file(proj_dirs.config_dir().join("scopes.yaml"))
    }

    /// Returns the path to the configuration file.
    pub fn file_path(&self) -> &Path {
        &self.file_path
    }

    /// Reads and parses the file as it is now.
    pub fn read_spec(&self) -> Result<ScopeSpec> {
        let file_name = self
            .file_path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("<unknown>");

        // Check file size before reading to prevent DoS via large files
        let metadata = fs::metadata(&self.file_path).map_err(|e| ConfigError::SourceError {
            source_name: "yaml-file".to_string(),
            message: format!("Failed to read file metadata: {}", file_name),
            source: Some(Box::new(e)),
        })?;

        if metadata.len() > MAX_YAML_FILE_SIZE {
            return Err(ConfigError::SourceError {
                source_name: "yaml-file".to_string(),
                message: format!(
                    "Configuration file too large: {} bytes (max {} bytes)",
                    metadata.len(),
                    MAX_YAML_FILE_SIZE
                ),
                source: None,
            });
        }

        let content =
            fs::read_to_string(&self.file_path).map_err(|e| ConfigError::SourceError {
                source_name: "yaml-file".to_string(),
                message: format!("Failed to read configuration file: {}", file_name),
                source: Some(Box::new(e)),
            })?;

        self.parser.parse(&content)
    }
}

impl DeclarationSource for YamlFileAdapter {
    fn name(&self) -> &str {
        "yaml-file"
    }

    fn load(&self, builder: &mut ScopeTreeBuilder) -> Result<()> {
        self.read_spec()?.load(builder)
    }
}
