// Passsssword Configuration Module
//
// This module handles loading and validating settings from passsssword.yaml

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Name of the project-level configuration file
pub const CONFIG_FILE_NAME: &str = "passsssword.yaml";

/// Settings driving the locate/render/load lifecycle
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Secrets CLI program (name on PATH or explicit path)
    pub tool: String,

    /// File name of the template holding secret references
    pub template: String,

    /// File name the rendered secrets are written to
    pub rendered: String,

    /// Number of directories examined, the working directory included
    pub search_depth: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            tool: "op".to_string(),
            template: ".env.op".to_string(),
            rendered: ".env".to_string(),
            search_depth: 4,
        }
    }
}

impl Settings {
    /// Load settings from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {:?}", path.as_ref()))?;

        let settings: Settings = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {:?}", path.as_ref()))?;

        Ok(settings)
    }

    /// Find the settings that apply to `start`.
    ///
    /// Priority:
    /// 1. `passsssword.yaml` in `start`
    /// 2. `~/.config/passsssword.yaml`
    /// 3. Built-in defaults
    pub fn discover(start: &Path) -> Result<Self> {
        let local = start.join(CONFIG_FILE_NAME);
        if local.is_file() {
            return Self::from_file(local);
        }

        if let Some(global) = global_config_path() {
            if global.is_file() {
                return Self::from_file(global);
            }
        }

        Ok(Self::default())
    }

    /// Validate the settings
    pub fn validate(&self) -> Result<()> {
        if self.tool.trim().is_empty() {
            anyhow::bail!("Tool cannot be empty");
        }

        for (field, name) in [("template", &self.template), ("rendered", &self.rendered)] {
            if name.is_empty() {
                anyhow::bail!("The {} file name cannot be empty", field);
            }
            if name.contains('/') || name.contains(std::path::MAIN_SEPARATOR) {
                anyhow::bail!("The {} file name must not contain a path separator: '{}'", field, name);
            }
            if name == "." || name == ".." {
                anyhow::bail!("The {} file name is not a file: '{}'", field, name);
            }
        }

        if self.template == self.rendered {
            anyhow::bail!("Template and rendered file names must differ (both are '{}')", self.template);
        }

        if self.search_depth == 0 {
            anyhow::bail!("Search depth must be at least 1");
        }

        Ok(())
    }
}

/// `~/.config/passsssword.yaml`, when a home directory is known
pub fn global_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".config").join(CONFIG_FILE_NAME))
}
