//! Configuration Management
//!
//! Handles persistent configuration storage for the bizfly CLI. The auth
//! token is never written to disk.

use crate::api::http::{TransportConfig, DEFAULT_API_URL};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Output format for command results
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Json,
    Yaml,
}

/// User configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Config {
    /// Default API URL
    #[serde(default)]
    pub api_url: Option<String>,
    /// Project sent with every request
    #[serde(default)]
    pub project_id: Option<String>,
    /// Service name -> base URL overrides
    #[serde(default)]
    pub endpoints: BTreeMap<String, String>,
    /// Per-request timeout in seconds
    #[serde(default)]
    pub timeout_secs: Option<u64>,
    #[serde(default)]
    pub output: OutputFormat,
}

impl Config {
    /// Get the config file path
    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("bizfly").join("config.json"))
    }

    /// Load configuration from disk
    pub fn load() -> Self {
        match Self::config_path() {
            Some(path) => Self::load_from(&path),
            None => Self::default(),
        }
    }

    /// Load configuration from `path`, falling back to defaults when the
    /// file is missing or unreadable
    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }

        match std::fs::read_to_string(path) {
            Ok(content) => serde_json::from_str(&content).unwrap_or_else(|err| {
                tracing::warn!("Ignoring invalid config file {:?}: {}", path, err);
                Self::default()
            }),
            Err(_) => Self::default(),
        }
    }

    /// Save configuration to disk
    pub fn save(&self) -> Result<()> {
        let Some(path) = Self::config_path() else {
            return Ok(());
        };
        self.save_to(&path)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {:?}", parent))?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content).with_context(|| format!("Failed to write {:?}", path))?;

        Ok(())
    }

    /// Get effective API URL (config > built-in default)
    pub fn effective_api_url(&self) -> String {
        self.api_url
            .clone()
            .unwrap_or_else(|| DEFAULT_API_URL.to_string())
    }

    /// Build the transport settings, applying `auth_token` if given
    pub fn transport_config(&self, auth_token: Option<&str>) -> Result<TransportConfig> {
        let api_url = self.effective_api_url();
        let mut transport = TransportConfig::new(&api_url)
            .with_context(|| format!("Invalid API URL {:?}", api_url))?;

        for (service, url) in &self.endpoints {
            transport = transport
                .with_endpoint(service, url)
                .with_context(|| format!("Invalid endpoint for service {:?}", service))?;
        }
        if let Some(token) = auth_token {
            transport = transport.with_auth_token(token);
        }
        if let Some(project_id) = &self.project_id {
            transport = transport.with_project_id(project_id);
        }
        if let Some(secs) = self.timeout_secs {
            transport = transport.with_timeout(Duration::from_secs(secs));
        }

        Ok(transport)
    }

    /// Set API URL and save
    pub fn set_api_url(&mut self, api_url: &str) -> Result<()> {
        self.api_url = Some(api_url.to_string());
        self.save()
    }

    /// Set project and save
    pub fn set_project(&mut self, project_id: &str) -> Result<()> {
        self.project_id = Some(project_id.to_string());
        self.save()
    }

    /// Set a service endpoint and save
    pub fn set_endpoint(&mut self, service: &str, url: &str) -> Result<()> {
        self.endpoints.insert(service.to_string(), url.to_string());
        self.save()
    }
}
