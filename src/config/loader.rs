//! Configuration file loading with precedence handling.

use super::keybindings::{KeyBindingError, KeyBindings};
use crate::query::PageSize;
use crate::state::{Settings, TagRefreshPolicy};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Environment variable naming the config file.
pub const CONFIG_ENV: &str = "QABOARD_CONFIG";
/// Environment variable overriding the store path.
pub const STORE_ENV: &str = "QABOARD_STORE";
/// Environment variable overriding the page size.
pub const PAGE_SIZE_ENV: &str = "QABOARD_PAGE_SIZE";

/// Errors that can occur during config loading.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Failed to read config file (file may not exist or have permission issues).
    #[error("Failed to read config file at {path}: {reason}")]
    ReadError {
        /// Path that failed to read.
        path: PathBuf,
        /// Reason for failure.
        reason: String,
    },

    /// Config file contains invalid TOML syntax or unknown keys.
    #[error("Invalid TOML in {path}: {reason}")]
    ParseError {
        /// Path with invalid TOML.
        path: PathBuf,
        /// Parse error details.
        reason: String,
    },

    /// A setting has a value outside its domain.
    #[error("Invalid value '{value}' for {key}: {reason}")]
    InvalidValue {
        /// Setting name (file key, env var or flag).
        key: String,
        /// Offending value.
        value: String,
        /// Why it was rejected.
        reason: String,
    },

    /// Bad `[keybindings]` entry.
    #[error(transparent)]
    KeyBindings(#[from] KeyBindingError),
}

/// TOML configuration file structure.
///
/// All fields are optional - if not specified, hardcoded defaults are used.
/// Corresponds to `~/.config/qaboard/config.toml`.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    /// JSON document backing the record store.
    #[serde(default)]
    pub store_path: Option<PathBuf>,

    /// Rows per list page.
    #[serde(default)]
    pub page_size: Option<u32>,

    /// Search debounce in milliseconds (0 = fetch per keystroke).
    #[serde(default)]
    pub search_debounce_ms: Option<u64>,

    /// Tag universe refresh policy: "mount" or "mutation".
    #[serde(default)]
    pub tag_refresh: Option<String>,

    /// Whether answers may be deleted from the detail screen.
    #[serde(default)]
    pub allow_answer_delete: Option<bool>,

    /// Header title.
    #[serde(default)]
    pub board_title: Option<String>,

    /// Author recorded for answers and pre-filled in the ask form.
    #[serde(default)]
    pub author_name: Option<String>,

    /// Path to log file for tracing output.
    #[serde(default)]
    pub log_file_path: Option<PathBuf>,

    /// Action name to key specs, e.g. `next_page = ["n", "right"]`.
    #[serde(default)]
    pub keybindings: Option<HashMap<String, Vec<String>>>,
}

/// Resolved configuration after applying precedence rules.
///
/// Created by merging defaults, config file, env vars, and CLI args.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedConfig {
    /// Store document path.
    pub store_path: PathBuf,
    /// Rows per list page.
    pub page_size: PageSize,
    /// Search debounce.
    pub search_debounce: Duration,
    /// Tag universe refresh policy.
    pub tag_refresh: TagRefreshPolicy,
    /// Answer deletion capability.
    pub allow_answer_delete: bool,
    /// Header title.
    pub board_title: String,
    /// Author for TUI-written content; blank means anonymous.
    pub author_name: String,
    /// Path to log file for tracing output.
    pub log_file_path: PathBuf,
    /// Raw key binding overrides.
    pub keybindings: HashMap<String, Vec<String>>,
}

/// Default header title.
pub const DEFAULT_BOARD_TITLE: &str = "Q&A Board";

impl Default for ResolvedConfig {
    fn default() -> Self {
        Self {
            store_path: default_store_path(),
            page_size: PageSize::DEFAULT,
            search_debounce: Duration::ZERO,
            tag_refresh: TagRefreshPolicy::default(),
            allow_answer_delete: false,
            board_title: DEFAULT_BOARD_TITLE.to_string(),
            author_name: String::new(),
            log_file_path: default_log_path(),
            keybindings: HashMap::new(),
        }
    }
}

impl ResolvedConfig {
    /// Runtime settings for the state layer.
    pub fn to_settings(&self) -> Settings {
        Settings {
            page_size: self.page_size,
            search_debounce: self.search_debounce,
            tag_refresh: self.tag_refresh,
            allow_answer_delete: self.allow_answer_delete,
            author_name: self.author_name.clone(),
        }
    }

    /// Default bindings with the configured overrides applied.
    pub fn key_bindings(&self) -> Result<KeyBindings, ConfigError> {
        Ok(KeyBindings::with_overrides(&self.keybindings)?)
    }
}

/// Resolve default log file path.
///
/// Returns `~/.local/state/qaboard/qaboard.log` on Unix-like systems,
/// or appropriate platform path on other systems.
///
/// If state directory cannot be determined, falls back to current directory.
pub fn default_log_path() -> PathBuf {
    if let Some(state_dir) = dirs::state_dir() {
        state_dir.join("qaboard").join("qaboard.log")
    } else {
        PathBuf::from("qaboard.log")
    }
}

/// Resolve default store document path (`~/.local/share/qaboard/board.json`).
pub fn default_store_path() -> PathBuf {
    match dirs::data_dir() {
        Some(data_dir) => data_dir.join("qaboard").join("board.json"),
        None => PathBuf::from("board.json"),
    }
}

/// Load configuration file from a specific path.
///
/// Returns `Ok(None)` if file doesn't exist (not an error - use defaults).
///
/// # Errors
///
/// Returns error if file exists but has read or parse errors.
pub fn load_config_file(path: impl Into<PathBuf>) -> Result<Option<ConfigFile>, ConfigError> {
    let path = path.into();

    // Missing file is not an error - use defaults
    if !path.exists() {
        return Ok(None);
    }

    let contents = std::fs::read_to_string(&path).map_err(|e| ConfigError::ReadError {
        path: path.clone(),
        reason: e.to_string(),
    })?;

    let config: ConfigFile = toml::from_str(&contents).map_err(|e| ConfigError::ParseError {
        path: path.clone(),
        reason: e.to_string(),
    })?;

    Ok(Some(config))
}

/// Resolve default config file path.
///
/// Returns `~/.config/qaboard/config.toml` on Unix, appropriate path on other platforms.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("qaboard").join("config.toml"))
}

/// Load configuration with precedence handling.
///
/// Precedence (highest to lowest):
/// 1. Explicit `config_path` argument (CLI `--config`)
/// 2. `QABOARD_CONFIG` environment variable
/// 3. Default path `~/.config/qaboard/config.toml`
///
/// Missing config files are NOT errors - defaults are used.
pub fn load_config_with_precedence(
    config_path: Option<PathBuf>,
) -> Result<Option<ConfigFile>, ConfigError> {
    if let Some(path) = config_path {
        return load_config_file(path);
    }

    if let Ok(env_path) = std::env::var(CONFIG_ENV) {
        return load_config_file(PathBuf::from(env_path));
    }

    if let Some(default_path) = default_config_path() {
        return load_config_file(default_path);
    }

    Ok(None)
}

fn page_size_from(key: &str, n: u32) -> Result<PageSize, ConfigError> {
    PageSize::new(n).map_err(|e| ConfigError::InvalidValue {
        key: key.to_string(),
        value: n.to_string(),
        reason: e.to_string(),
    })
}

fn parse_page_size(key: &str, raw: &str) -> Result<PageSize, ConfigError> {
    let n = raw
        .trim()
        .parse::<u32>()
        .map_err(|e| ConfigError::InvalidValue {
            key: key.to_string(),
            value: raw.to_string(),
            reason: e.to_string(),
        })?;
    page_size_from(key, n)
}

/// Merge config file into defaults to create resolved config.
///
/// For each field in `ConfigFile`, if `Some(value)`, use it; otherwise use default.
pub fn merge_config(config_file: Option<ConfigFile>) -> Result<ResolvedConfig, ConfigError> {
    let defaults = ResolvedConfig::default();

    let Some(config) = config_file else {
        return Ok(defaults);
    };

    let page_size = match config.page_size {
        Some(n) => page_size_from("page_size", n)?,
        None => defaults.page_size,
    };
    let tag_refresh = match config.tag_refresh {
        Some(raw) => TagRefreshPolicy::parse(&raw).ok_or_else(|| ConfigError::InvalidValue {
            key: "tag_refresh".to_string(),
            value: raw.clone(),
            reason: "expected \"mount\" or \"mutation\"".to_string(),
        })?,
        None => defaults.tag_refresh,
    };

    Ok(ResolvedConfig {
        store_path: config.store_path.unwrap_or(defaults.store_path),
        page_size,
        search_debounce: config
            .search_debounce_ms
            .map(Duration::from_millis)
            .unwrap_or(defaults.search_debounce),
        tag_refresh,
        allow_answer_delete: config
            .allow_answer_delete
            .unwrap_or(defaults.allow_answer_delete),
        board_title: config.board_title.unwrap_or(defaults.board_title),
        author_name: config.author_name.unwrap_or(defaults.author_name),
        log_file_path: config.log_file_path.unwrap_or(defaults.log_file_path),
        keybindings: config.keybindings.unwrap_or(defaults.keybindings),
    })
}

/// Apply environment variable overrides to resolved config.
///
/// Checks for:
/// - `QABOARD_STORE`: store document path
/// - `QABOARD_PAGE_SIZE`: rows per page (must be a positive integer)
pub fn apply_env_overrides(mut config: ResolvedConfig) -> Result<ResolvedConfig, ConfigError> {
    if let Ok(path) = std::env::var(STORE_ENV) {
        config.store_path = PathBuf::from(path);
    }
    if let Ok(raw) = std::env::var(PAGE_SIZE_ENV) {
        config.page_size = parse_page_size(PAGE_SIZE_ENV, &raw)?;
    }
    Ok(config)
}

/// Apply CLI argument overrides to resolved config.
///
/// CLI args have the highest precedence and override all other sources.
/// Only applies overrides for flags that were explicitly set by the user.
///
/// Precedence chain: Defaults → Config File → Env Vars → CLI Args (highest)
pub fn apply_cli_overrides(
    mut config: ResolvedConfig,
    store_override: Option<PathBuf>,
    page_size_override: Option<u32>,
) -> Result<ResolvedConfig, ConfigError> {
    if let Some(path) = store_override {
        config.store_path = path;
    }
    if let Some(n) = page_size_override {
        config.page_size = page_size_from("--page-size", n)?;
    }
    Ok(config)
}

/// Run the whole precedence chain.
pub fn resolve(
    config_path: Option<PathBuf>,
    store_override: Option<PathBuf>,
    page_size_override: Option<u32>,
) -> Result<ResolvedConfig, ConfigError> {
    let file = load_config_with_precedence(config_path)?;
    let config = apply_env_overrides(merge_config(file)?)?;
    apply_cli_overrides(config, store_override, page_size_override)
}

#[cfg(test)]
#[path = "loader_tests.rs"]
mod tests;
