//! Configuration management for the ledger client
//!
//! Built once at process start and handed to [`crate::LedgerClient::new`];
//! nothing in the request path reads ambient state afterwards.

use crate::error::{LedgerError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Connection settings for the Conductor gateway
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConductorConfig {
    #[serde(alias = "token")] // Accept both 'api_key' and 'token'
    pub api_key: String,

    /// Tenant identity sent on every request
    pub end_user_id: String,

    #[serde(alias = "api_url", default = "default_base_url")]
    pub base_url: String,
}

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerConfig {
    pub conductor: ConductorConfig,

    /// Directory of per-vendor posting pattern files
    #[serde(default = "default_patterns_dir")]
    pub patterns_dir: PathBuf,

    /// Directory the audit log writes into
    #[serde(default = "default_logs_dir")]
    pub logs_dir: PathBuf,

    /// Most pages one list operation will fetch before truncating
    #[serde(default = "default_page_cap")]
    pub page_cap: usize,

    /// How far back duplicate detection looks, in months
    #[serde(default = "default_duplicate_window_months")]
    pub duplicate_window_months: u32,
}

// Default functions
fn default_base_url() -> String {
    "https://api.conductor.is/v1".to_string()
}

fn default_patterns_dir() -> PathBuf {
    PathBuf::from("patterns")
}

fn default_logs_dir() -> PathBuf {
    PathBuf::from("logs/quickbooks")
}

fn default_page_cap() -> usize {
    20
}

fn default_duplicate_window_months() -> u32 {
    6
}

impl LedgerConfig {
    /// Load configuration from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| LedgerError::Config(format!("Failed to read config file: {}", e)))?;

        Self::from_json_str(&content)
    }

    /// Load configuration from a JSON string
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: LedgerConfig = serde_json::from_str(json)
            .map_err(|e| LedgerError::Config(format!("Failed to parse config: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    /// Build configuration from environment variables alone.
    /// `CONDUCTOR_API_KEY` and `CONDUCTOR_END_USER_ID` are required;
    /// everything else falls back to the defaults.
    pub fn from_env() -> Result<Self> {
        let config = Self {
            conductor: ConductorConfig {
                api_key: std::env::var("CONDUCTOR_API_KEY").unwrap_or_default(),
                end_user_id: std::env::var("CONDUCTOR_END_USER_ID").unwrap_or_default(),
                base_url: std::env::var("CONDUCTOR_BASE_URL")
                    .unwrap_or_else(|_| default_base_url()),
            },
            patterns_dir: std::env::var("LEDGER_PATTERNS_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| default_patterns_dir()),
            logs_dir: std::env::var("LEDGER_LOGS_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| default_logs_dir()),
            page_cap: default_page_cap(),
            duplicate_window_months: default_duplicate_window_months(),
        };

        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.conductor.api_key.is_empty() {
            return Err(LedgerError::Config(
                "Conductor API key is required".to_string(),
            ));
        }

        if self.conductor.end_user_id.is_empty() {
            return Err(LedgerError::Config(
                "Conductor end-user id is required".to_string(),
            ));
        }

        if self.conductor.base_url.is_empty() {
            return Err(LedgerError::Config(
                "Conductor base URL must not be empty".to_string(),
            ));
        }

        if self.page_cap == 0 {
            return Err(LedgerError::Config(
                "page_cap must be at least 1".to_string(),
            ));
        }

        Ok(())
    }
}
