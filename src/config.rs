//! Configuration: JSON file plus command-line overrides.
//!
//! ```json
//! {
//!   "component": "Bogus",
//!   "test_path": "../tests",
//!   "spec_path": "../spec",
//!   "group_name_mappings": { "compile": "Compiler" }
//! }
//! ```
//!
//! Relative paths in the file resolve against the file's directory; paths
//! given on the command line resolve against the working directory.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Config file picked up from the working directory when `--config` is absent.
pub const DEFAULT_CONFIG_FILE: &str = "tscdoc.json";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {0}")]
    NotFound(PathBuf),
    #[error("invalid or missing '{0}' in configuration")]
    Missing(&'static str),
    #[error("'group_name_mappings' must map non-empty strings to strings")]
    EmptyMappingKey,
    #[error("'{field}' does not exist or is not a directory: {}", .path.display())]
    NotADirectory { field: &'static str, path: PathBuf },
}

/// Raw file contents; every field may be overridden on the command line.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileConfig {
    component: Option<String>,
    test_path: Option<PathBuf>,
    spec_path: Option<PathBuf>,
    #[serde(default)]
    group_name_mappings: HashMap<String, String>,
}

/// Command-line values that take precedence over the file.
#[derive(Debug, Default)]
pub struct Overrides {
    pub config: Option<PathBuf>,
    pub component: Option<String>,
    pub test_path: Option<PathBuf>,
    pub spec_path: Option<PathBuf>,
}

/// Fully resolved configuration with absolute, existing directories.
#[derive(Debug, Clone)]
pub struct Config {
    pub component: String,
    pub test_path: PathBuf,
    pub spec_path: PathBuf,
    /// Lowercase group token → display name.
    pub group_name_mappings: HashMap<String, String>,
}

impl Config {
    /// Load the config file (if any), apply overrides, and validate paths.
    pub fn load(overrides: Overrides, cwd: &Path) -> Result<Config> {
        let (file, base_dir) = match resolve_config_path(overrides.config.as_deref(), cwd)? {
            Some(path) => {
                let file = read_file_config(&path)?;
                let base = path.parent().map(Path::to_path_buf).unwrap_or_default();
                (file, base)
            }
            None => (FileConfig::default(), cwd.to_path_buf()),
        };

        let component = overrides
            .component
            .or(file.component)
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty())
            .ok_or(ConfigError::Missing("component"))?;

        let test_path = pick_path(overrides.test_path, file.test_path.as_deref(), cwd, &base_dir)
            .ok_or(ConfigError::Missing("test_path"))?;
        let spec_path = pick_path(overrides.spec_path, file.spec_path.as_deref(), cwd, &base_dir)
            .ok_or(ConfigError::Missing("spec_path"))?;

        ensure_dir("test_path", &test_path)?;
        ensure_dir("spec_path", &spec_path)?;

        Ok(Config {
            component,
            test_path,
            spec_path,
            group_name_mappings: normalize_mappings(file.group_name_mappings)?,
        })
    }
}

fn resolve_config_path(explicit: Option<&Path>, cwd: &Path) -> Result<Option<PathBuf>> {
    match explicit {
        Some(path) => {
            let path = absolutize(path, cwd);
            if !path.is_file() {
                return Err(ConfigError::NotFound(path).into());
            }
            Ok(Some(path))
        }
        None => {
            let candidate = cwd.join(DEFAULT_CONFIG_FILE);
            Ok(candidate.is_file().then_some(candidate))
        }
    }
}

fn read_file_config(path: &Path) -> Result<FileConfig> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read config file: {}", path.display()))?;
    serde_json::from_str(&raw)
        .with_context(|| format!("failed to parse config file: {}", path.display()))
}

/// CLI paths resolve against `cwd`, file paths against the file's directory.
fn pick_path(
    cli: Option<PathBuf>,
    file: Option<&Path>,
    cwd: &Path,
    base_dir: &Path,
) -> Option<PathBuf> {
    match (cli, file) {
        (Some(p), _) => Some(absolutize(&p, cwd)),
        (None, Some(p)) => Some(absolutize(p, base_dir)),
        (None, None) => None,
    }
}

fn absolutize(path: &Path, base: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    }
}

fn ensure_dir(field: &'static str, path: &Path) -> Result<()> {
    if !path.is_dir() {
        return Err(ConfigError::NotADirectory {
            field,
            path: path.to_path_buf(),
        }
        .into());
    }
    Ok(())
}

fn normalize_mappings(raw: HashMap<String, String>) -> Result<HashMap<String, String>> {
    let mut mappings = HashMap::with_capacity(raw.len());
    for (key, value) in raw {
        let key = key.trim();
        if key.is_empty() {
            return Err(ConfigError::EmptyMappingKey.into());
        }
        mappings.insert(key.to_lowercase(), value.trim().to_string());
    }
    Ok(mappings)
}
