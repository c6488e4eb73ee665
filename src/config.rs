//! Settings for component-cli
//!
//! Read from ~/.component-cli/config.yaml when present. The
//! `COMPONENT_CLI_FORCE_LEGACY` environment variable overrides `force_legacy`.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use directories::BaseDirs;
use serde::{Deserialize, Serialize};

const CONFIG_DIR: &str = ".component-cli";
const CONFIG_FILE: &str = "config.yaml";

/// Environment variable forcing delegation to the legacy program.
pub const FORCE_LEGACY_ENV: &str = "COMPONENT_CLI_FORCE_LEGACY";

/// Name of the legacy program every unhandled command is forwarded to.
pub const LEGACY_PROGRAM: &str = "component-cli";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// Forward every invocation to the legacy program
    #[serde(default)]
    pub force_legacy: bool,

    /// Program looked up on PATH for delegation (default: component-cli)
    #[serde(default = "default_legacy_program")]
    pub legacy_program: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            force_legacy: false,
            legacy_program: default_legacy_program(),
        }
    }
}

fn default_legacy_program() -> String {
    LEGACY_PROGRAM.to_string()
}

impl Settings {
    /// Load the config file (if any) and apply environment overrides.
    pub fn load() -> Result<Self> {
        let mut settings = match config_file_path() {
            Some(path) => Self::from_file(&path)?,
            None => Self::default(),
        };
        settings.apply_env(std::env::var(FORCE_LEGACY_ENV).ok().as_deref());
        Ok(settings)
    }

    /// Read settings from `path`; a missing file yields the defaults.
    pub fn from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        if contents.trim().is_empty() {
            return Ok(Self::default());
        }

        serde_yaml::from_str(&contents)
            .with_context(|| format!("failed to parse {}", path.display()))
    }

    /// Apply the value of the force-legacy environment variable, if set.
    pub fn apply_env(&mut self, force_legacy: Option<&str>) {
        if let Some(value) = force_legacy {
            self.force_legacy = is_truthy(value);
        }
    }
}

fn is_truthy(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

/// Path of the config file (~/.component-cli/config.yaml)
pub fn config_file_path() -> Option<PathBuf> {
    BaseDirs::new().map(|dirs| dirs.home_dir().join(CONFIG_DIR).join(CONFIG_FILE))
}
