//! Documentation configuration, loaded from `docs.toml`.
//!
//! Relative paths resolve against the directory holding the config file.

use crate::assemble::snake_case;
use crate::error::{DocsError, Result};
use serde::Deserialize;
use serde_json::{Map, Value};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DocsConfig {
    /// Source patterns: files, directories, or globs.
    #[serde(default = "default_sources")]
    pub sources: Vec<String>,
    /// Canonical category order.
    pub groups: Vec<String>,
    #[serde(default)]
    pub package: PackageConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub engine: EngineConfig,
    #[serde(default)]
    pub static_docs: Vec<StaticDocConfig>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PackageConfig {
    /// Module path prefix used in `require`/`import` snippets.
    pub name: String,
    /// Global object exposed by the UMD build.
    pub global: String,
}

impl Default for PackageConfig {
    fn default() -> Self {
        PackageConfig {
            name: "date-fns".to_string(),
            global: "dateFns".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub dir: PathBuf,
    /// Artifact file stem; derived from the package name when unset.
    pub name: Option<String>,
    pub pretty: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        OutputConfig {
            dir: PathBuf::from("dist"),
            name: None,
            pretty: false,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum EngineConfig {
    #[default]
    Native,
    Command {
        program: String,
        #[serde(default)]
        args: Vec<String>,
    },
}

/// A free-form document appended to a category after the generated entries.
#[derive(Debug, Clone, Deserialize)]
pub struct StaticDocConfig {
    #[serde(rename = "type", default = "default_static_type")]
    pub kind: String,
    pub category: String,
    pub path: PathBuf,
    /// Display metadata (`urlId`, `title`, `description`, ...), passed through.
    #[serde(flatten)]
    pub meta: Map<String, Value>,
}

fn default_sources() -> Vec<String> {
    vec!["src/**/index.js".to_string()]
}

fn default_static_type() -> String {
    "markdown".to_string()
}

impl DocsConfig {
    /// Read, parse and validate a config file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|source| DocsError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        let config: DocsConfig = toml::from_str(&text).map_err(|source| DocsError::Config {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.groups.is_empty() {
            return Err(DocsError::InvalidConfig("`groups` must not be empty".into()));
        }
        let mut seen = HashSet::new();
        for group in &self.groups {
            if !seen.insert(group.as_str()) {
                return Err(DocsError::InvalidConfig(format!(
                    "duplicate group `{}`",
                    group
                )));
            }
        }
        for doc in &self.static_docs {
            if !seen.contains(doc.category.as_str()) {
                return Err(DocsError::InvalidConfig(format!(
                    "static doc {} targets unconfigured category `{}`",
                    doc.path.display(),
                    doc.category
                )));
            }
        }
        if let EngineConfig::Command { program, .. } = &self.engine {
            if program.trim().is_empty() {
                return Err(DocsError::InvalidConfig(
                    "command engine needs a `program`".into(),
                ));
            }
        }
        Ok(())
    }

    /// Artifact path relative to `root`: `<dir>/<name>.json`.
    pub fn output_path(&self, root: &Path) -> PathBuf {
        let name = self
            .output
            .name
            .clone()
            .unwrap_or_else(|| format!("{}_docs", snake_case(&self.package.name)));
        root.join(&self.output.dir).join(format!("{}.json", name))
    }
}

/// Directory that relative config paths resolve against.
pub fn project_root(config_path: &Path) -> PathBuf {
    match config_path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir.to_path_buf(),
        _ => PathBuf::from("."),
    }
}
