//! Application configuration for Gleaner.
//!
//! User config lives at `~/.gleaner/gleaner.toml`.
//! CLI flags override config file values, which override defaults.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{GleanerError, Result};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "gleaner.toml";

/// Default config directory name under the user's home.
const CONFIG_DIR_NAME: &str = ".gleaner";

/// Browser-like User-Agent sent with every request.
const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
     (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

// ---------------------------------------------------------------------------
// Config structs (matching gleaner.toml schema)
// ---------------------------------------------------------------------------

/// Top-level application config, deserialized from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Global defaults.
    #[serde(default)]
    pub defaults: DefaultsConfig,

    /// Fetch and extraction settings.
    #[serde(default)]
    pub scrape: ScrapeSection,
}

/// `[defaults]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DefaultsConfig {
    /// Tenant id used when `--team-id` is not given.
    #[serde(default = "default_team_id")]
    pub team_id: String,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            team_id: default_team_id(),
        }
    }
}

fn default_team_id() -> String {
    "aline123".into()
}

/// `[scrape]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScrapeSection {
    /// Sleep before every request made by a rate-limited adapter.
    #[serde(default = "default_request_delay")]
    pub request_delay_ms: u64,

    /// Per-request timeout.
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// User-Agent header sent with every request.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Author recorded on chapters extracted from PDF books.
    #[serde(default = "default_book_author")]
    pub book_author: String,
}

impl Default for ScrapeSection {
    fn default() -> Self {
        Self {
            request_delay_ms: default_request_delay(),
            timeout_secs: default_timeout(),
            user_agent: default_user_agent(),
            book_author: default_book_author(),
        }
    }
}

fn default_request_delay() -> u64 {
    1000
}
fn default_timeout() -> u64 {
    10
}
fn default_user_agent() -> String {
    DEFAULT_USER_AGENT.into()
}
fn default_book_author() -> String {
    "Aline".into()
}

// ---------------------------------------------------------------------------
// Scrape config (runtime, merged from config + CLI flags)
// ---------------------------------------------------------------------------

/// Runtime scrape configuration.
#[derive(Debug, Clone)]
pub struct ScrapeConfig {
    /// Delay before each request of a rate-limited adapter.
    pub request_delay: Duration,
    /// Per-request timeout.
    pub timeout: Duration,
    /// User-Agent header.
    pub user_agent: String,
    /// Author recorded on PDF chapters.
    pub book_author: String,
}

impl Default for ScrapeConfig {
    fn default() -> Self {
        Self::from(&AppConfig::default())
    }
}

impl From<&AppConfig> for ScrapeConfig {
    fn from(config: &AppConfig) -> Self {
        Self {
            request_delay: Duration::from_millis(config.scrape.request_delay_ms),
            timeout: Duration::from_secs(config.scrape.timeout_secs),
            user_agent: config.scrape.user_agent.clone(),
            book_author: config.scrape.book_author.clone(),
        }
    }
}

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Get the path to the config directory (`~/.gleaner/`).
pub fn config_dir() -> Result<PathBuf> {
    let home = dirs::home_dir()
        .ok_or_else(|| GleanerError::config("could not determine home directory"))?;
    Ok(home.join(CONFIG_DIR_NAME))
}

/// Get the path to the config file (`~/.gleaner/gleaner.toml`).
pub fn config_file_path() -> Result<PathBuf> {
    Ok(config_dir()?.join(CONFIG_FILE_NAME))
}

/// Load the application config from disk. Returns defaults if the file does not exist.
pub fn load_config() -> Result<AppConfig> {
    let path = config_file_path()?;

    if !path.exists() {
        tracing::debug!(?path, "config file not found, using defaults");
        return Ok(AppConfig::default());
    }

    load_config_from(&path)
}

/// Load the application config from a specific file path.
pub fn load_config_from(path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| GleanerError::io(path, e))?;

    toml::from_str(&content)
        .map_err(|e| GleanerError::config(format!("failed to parse {}: {e}", path.display())))
}

/// Create the config directory and write a default config file.
/// Returns the path to the created file.
pub fn init_config() -> Result<PathBuf> {
    let dir = config_dir()?;
    std::fs::create_dir_all(&dir).map_err(|e| GleanerError::io(&dir, e))?;

    let path = dir.join(CONFIG_FILE_NAME);
    let config = AppConfig::default();
    let content =
        toml::to_string_pretty(&config).map_err(|e| GleanerError::config(e.to_string()))?;

    std::fs::write(&path, content).map_err(|e| GleanerError::io(&path, e))?;
    tracing::info!(?path, "created default config file");

    Ok(path)
}
