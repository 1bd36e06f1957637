use std::time::Duration;

use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};

use crate::controller::popup::PopupSettings;
use crate::matcher::fill::NotifyPolicy;
use crate::profile::store::DEFAULT_PROFILE_KEY;

// ============================================================================
// CLI Argument Parsing (clap derive)
// ============================================================================

#[derive(Parser, Debug)]
#[command(
    name = "lightning-fill",
    version,
    about = "Capture form fields from a page and autofill them later"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to config file (default: lightning-fill.yaml in current dir)
    #[arg(long, global = true)]
    pub config: Option<String>,

    /// Storage file holding the saved profile
    #[arg(long, global = true)]
    pub store: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Capture the filled fields of a page snapshot and save them
    Capture {
        /// Page snapshot JSON (the active page)
        #[arg(long)]
        page: Option<String>,
    },

    /// Autofill a page snapshot from the saved profile
    Fill {
        /// Page snapshot JSON (the active page)
        #[arg(long)]
        page: Option<String>,

        /// Where to write the filled snapshot (default: overwrite --page)
        #[arg(short, long)]
        output: Option<String>,

        /// Notification policy: always or on_change
        #[arg(long)]
        notify: Option<String>,
    },

    /// Remove the saved profile
    Clear,

    /// Show the saved field count and keys
    Show,
}

// ============================================================================
// Config File Model (optional YAML)
// ============================================================================

/// Optional YAML config file: `lightning-fill.yaml`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub status: StatusConfig,
    #[serde(default)]
    pub fill: FillConfig,
    #[serde(default)]
    pub trace: TraceConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "default_store_path")]
    pub path: String,

    #[serde(default = "default_profile_key")]
    pub key: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            path: default_store_path(),
            key: default_profile_key(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusConfig {
    #[serde(default = "default_status_timeout")]
    pub timeout_ms: u64,

    #[serde(default = "default_load_failure_timeout")]
    pub load_failure_timeout_ms: u64,
}

impl Default for StatusConfig {
    fn default() -> Self {
        Self {
            timeout_ms: default_status_timeout(),
            load_failure_timeout_ms: default_load_failure_timeout(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FillConfig {
    #[serde(default)]
    pub notify: NotifyPolicy,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TraceConfig {
    pub path: Option<String>,
}

// Serde default helpers
fn default_store_path() -> String { ".lightning-fill/storage.json".to_string() }
fn default_profile_key() -> String { DEFAULT_PROFILE_KEY.to_string() }
fn default_status_timeout() -> u64 { 2000 }
fn default_load_failure_timeout() -> u64 { 3000 }

// ============================================================================
// Config File Loading
// ============================================================================

/// Load config from a YAML file. Returns defaults if file is missing or malformed.
pub fn load_config(path: Option<&str>) -> AppConfig {
    let config_path = path.unwrap_or("lightning-fill.yaml");
    match std::fs::read_to_string(config_path) {
        Ok(content) => serde_yaml::from_str(&content).unwrap_or_default(),
        Err(_) => AppConfig::default(),
    }
}

// ============================================================================
// Config Builders (merge CLI args with config file)
// ============================================================================

pub fn build_popup_settings(config: &AppConfig) -> PopupSettings {
    PopupSettings {
        status_timeout: Duration::from_millis(config.status.timeout_ms),
        load_failure_timeout: Duration::from_millis(config.status.load_failure_timeout_ms),
    }
}

/// `--notify` value, falling back to the config file.
pub fn resolve_notify_policy(cli: Option<&str>, config: &AppConfig) -> Result<NotifyPolicy, String> {
    match cli.map(|s| s.trim().to_lowercase()) {
        None => Ok(config.fill.notify),
        Some(s) if s == "always" => Ok(NotifyPolicy::Always),
        Some(s) if s == "on_change" || s == "on-change" => Ok(NotifyPolicy::OnChange),
        Some(other) => Err(format!(
            "unknown notify policy '{}' (expected always or on_change)",
            other
        )),
    }
}

/// `--store` value, falling back to the config file.
pub fn resolve_store_path(cli: Option<&str>, config: &AppConfig) -> String {
    cli.map(str::to_string)
        .unwrap_or_else(|| config.storage.path.clone())
}
