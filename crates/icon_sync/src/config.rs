//! Export configuration
//!
//! Everything a run needs is carried by [`ExportConfig`] and passed into
//! [`crate::run_export`]. Nothing is read from globals.

use crate::error::{IconSyncError, Result};
use std::path::PathBuf;
use std::time::Duration;

/// Default Figma REST API base URL
pub const DEFAULT_API_BASE: &str = "https://api.figma.com";

/// Default output file, relative to the working directory
pub const DEFAULT_OUTPUT: &str = "icons-data.json";

/// Naming conventions used to recognize icons in the document tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamingConfig {
    /// Name of the frame that holds the icon component sets
    pub content_frame: String,
    /// Prefix stripped from component set names to get the size key
    pub icon_prefix: String,
    /// Component set name that maps to the weather bucket
    pub weather_label: String,
    /// Prefix stripped from component names to get the variant name
    pub variant_prefix: String,
}

impl Default for NamingConfig {
    fn default() -> Self {
        Self {
            content_frame: "컨텐츠".to_string(),
            icon_prefix: "icon-".to_string(),
            weather_label: "날씨".to_string(),
            variant_prefix: "Property 1=".to_string(),
        }
    }
}

/// Configuration for one export run
#[derive(Debug, Clone)]
pub struct ExportConfig {
    /// Figma file key
    pub file_key: String,
    /// Node id of the icon page subtree (e.g. `221:911`)
    pub node_id: String,
    /// Personal access token sent as `X-Figma-Token`
    pub access_token: String,
    /// API base URL, without trailing slash
    pub api_base: String,
    /// Where the JSON bundle is written
    pub output: PathBuf,
    /// Per-request timeout; `None` waits forever
    pub timeout: Option<Duration>,
    pub naming: NamingConfig,
}

impl ExportConfig {
    pub fn new(
        file_key: impl Into<String>,
        node_id: impl Into<String>,
        access_token: impl Into<String>,
    ) -> Self {
        Self {
            file_key: file_key.into(),
            node_id: node_id.into(),
            access_token: access_token.into(),
            api_base: DEFAULT_API_BASE.to_string(),
            output: PathBuf::from(DEFAULT_OUTPUT),
            timeout: None,
            naming: NamingConfig::default(),
        }
    }

    pub fn with_output(mut self, output: impl Into<PathBuf>) -> Self {
        self.output = output.into();
        self
    }

    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_naming(mut self, naming: NamingConfig) -> Self {
        self.naming = naming;
        self
    }

    /// Check that the identifiers and credential are present
    pub fn validate(&self) -> Result<()> {
        let required = [
            ("file key", &self.file_key),
            ("node id", &self.node_id),
            ("access token", &self.access_token),
        ];
        for (what, value) in required {
            if value.trim().is_empty() {
                return Err(IconSyncError::Config(format!("{} must not be empty", what)));
            }
        }
        if self.api_base.is_empty() {
            return Err(IconSyncError::Config("API base URL must not be empty".to_string()));
        }
        Ok(())
    }
}
