use std::{fs, path::Path};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

pub const CONFIG_FILE_NAME: &str = "chunkpot.config.json";

/// Directories never descended into while scanning for project configs.
pub const SKIPPED_SCAN_DIRS: &[&str] = &["node_modules", "vendor", ".pnpm-store"];

/// Declarative per-project configuration, loaded from `chunkpot.config.json`
/// at each discovered project root.
#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectConfig {
    /// Custom vite config location, relative to the project root. When absent
    /// the conventional `vite.config.*` filenames are searched instead.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vite_config_path: Option<String>,
    #[serde(default)]
    pub i18n: Option<I18nConfig>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct I18nConfig {
    /// Entry points for the application. The extractor starts with these
    /// files and resolves the dependency graph.
    #[serde(default)]
    pub inputs: Vec<String>,
}

impl ProjectConfig {
    /// Declared entry-point inputs, empty when the `i18n` section is absent.
    pub fn inputs(&self) -> &[String] {
        self.i18n.as_ref().map(|i| i.inputs.as_slice()).unwrap_or(&[])
    }
}

pub fn load_project_config(path: &Path) -> Result<ProjectConfig> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;
    let config: ProjectConfig = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
    Ok(config)
}

pub fn default_config_json() -> Result<String> {
    let config = ProjectConfig {
        vite_config_path: None,
        i18n: Some(I18nConfig { inputs: Vec::new() }),
    };
    serde_json::to_string_pretty(&config).context("Failed to generate default config.")
}
