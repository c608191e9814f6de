//! icon-sync.toml handling
//!
//! Every value is optional in the file. Flags and environment variables
//! (resolved by clap) override what the file says; built-in defaults fill
//! the rest.

use anyhow::{Context, Result};
use icon_sync::{ExportConfig, NamingConfig, DEFAULT_API_BASE, DEFAULT_OUTPUT};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Config file name looked up in the working directory
pub const CONFIG_FILE: &str = "icon-sync.toml";

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct IconSyncFile {
    #[serde(default)]
    pub figma: FigmaSection,
    #[serde(default)]
    pub output: OutputSection,
    #[serde(default)]
    pub naming: NamingSection,
}

/// Remote file and credentials
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct FigmaSection {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub node_id: Option<String>,
    /// Prefer FIGMA_TOKEN over storing the token here
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_base: Option<String>,
    /// Per-request timeout; unset waits forever
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct OutputSection {
    #[serde(default = "default_output")]
    pub path: String,
}

fn default_output() -> String {
    DEFAULT_OUTPUT.to_string()
}

impl Default for OutputSection {
    fn default() -> Self {
        Self {
            path: default_output(),
        }
    }
}

/// Overrides for the document naming conventions
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct NamingSection {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_frame: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon_prefix: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weather_label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variant_prefix: Option<String>,
}

impl NamingSection {
    fn into_naming(self) -> NamingConfig {
        let defaults = NamingConfig::default();
        NamingConfig {
            content_frame: self.content_frame.unwrap_or(defaults.content_frame),
            icon_prefix: self.icon_prefix.unwrap_or(defaults.icon_prefix),
            weather_label: self.weather_label.unwrap_or(defaults.weather_label),
            variant_prefix: self.variant_prefix.unwrap_or(defaults.variant_prefix),
        }
    }
}

/// Values given on the command line or through the environment
#[derive(Debug, Default)]
pub struct Overrides {
    pub file_key: Option<String>,
    pub node_id: Option<String>,
    pub token: Option<String>,
    pub api_base: Option<String>,
    pub output: Option<PathBuf>,
}

impl IconSyncFile {
    /// Load an explicit config file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;

        let config: IconSyncFile = toml::from_str(&content)
            .with_context(|| format!("Failed to parse {}", path.display()))?;

        Ok(config)
    }

    /// Load `icon-sync.toml` from a directory, or defaults if there is none
    pub fn load_from_dir(path: &Path) -> Result<Self> {
        let config_path = path.join(CONFIG_FILE);
        if !config_path.exists() {
            return Ok(Self::default());
        }
        Self::load(&config_path)
    }

    /// Starter file written by `icon-sync init`
    pub fn starter() -> Self {
        Self {
            figma: FigmaSection {
                file_key: Some("YOUR_FILE_KEY".to_string()),
                node_id: Some("0:1".to_string()),
                token: None,
                api_base: Some(DEFAULT_API_BASE.to_string()),
                timeout_secs: None,
            },
            output: OutputSection::default(),
            naming: NamingSection::default(),
        }
    }

    /// Serialize to TOML string
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize icon-sync config")
    }

    /// Merge with overrides into the library config
    pub fn into_export_config(self, overrides: Overrides) -> Result<ExportConfig> {
        let file_key = overrides
            .file_key
            .or(self.figma.file_key)
            .context("No Figma file key. Pass --file-key, set FIGMA_FILE_KEY or add figma.file_key to icon-sync.toml")?;
        let node_id = overrides
            .node_id
            .or(self.figma.node_id)
            .context("No node id. Pass --node-id, set FIGMA_NODE_ID or add figma.node_id to icon-sync.toml")?;
        let token = overrides
            .token
            .or(self.figma.token)
            .context("No access token. Pass --token or set FIGMA_TOKEN")?;

        let api_base = overrides
            .api_base
            .or(self.figma.api_base)
            .unwrap_or_else(|| DEFAULT_API_BASE.to_string());
        let output = overrides
            .output
            .unwrap_or_else(|| PathBuf::from(self.output.path));

        Ok(ExportConfig::new(file_key, node_id, token)
            .with_api_base(api_base)
            .with_output(output)
            .with_timeout(self.figma.timeout_secs.map(Duration::from_secs))
            .with_naming(self.naming.into_naming()))
    }
}
