//! Shared configuration for the nodepulse CLI and TUI.
//!
//! Two concerns live here:
//!
//! - **`Config`** — how to reach the panel (URL, timeout, TLS) plus output
//!   defaults, loaded from a TOML file merged with `NODEPULSE_*` env vars.
//! - **`FileStateStore`** — the persisted client state (session token and
//!   dark-mode flag), the local-storage analogue the view-model reads at
//!   bootstrap. Kept separate from the config file: it is written by the
//!   tools, not edited by the user.

use std::path::PathBuf;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

use nodepulse_core::StateStore;

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("no panel URL configured")]
    NoPanelUrl,

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config ─────────────────────────────────────────────────────

/// Top-level TOML configuration shared by CLI and TUI.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    /// Panel base URL (e.g., "http://panel.example:8080").
    pub panel: Option<String>,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout: u64,

    /// Accept invalid TLS certificates.
    #[serde(default)]
    pub insecure: bool,

    /// Output defaults for the CLI.
    #[serde(default)]
    pub defaults: Defaults,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            panel: None,
            timeout: default_timeout(),
            insecure: false,
            defaults: Defaults::default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Defaults {
    #[serde(default = "default_output")]
    pub output: String,

    #[serde(default = "default_color")]
    pub color: String,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            output: default_output(),
            color: default_color(),
        }
    }
}

fn default_output() -> String {
    "table".into()
}
fn default_color() -> String {
    "auto".into()
}
fn default_timeout() -> u64 {
    30
}

// ── Paths ───────────────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("io", "nodepulse", "nodepulse").map_or_else(
        || dirs_fallback().join("config.toml"),
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

/// Resolve the state file path (token + theme), kept under the data dir.
pub fn state_path() -> PathBuf {
    ProjectDirs::from("io", "nodepulse", "nodepulse").map_or_else(
        || dirs_fallback().join("state.toml"),
        |dirs| dirs.data_dir().join("state.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("nodepulse");
    p
}

// ── Config loading / saving ─────────────────────────────────────────

/// Load the full Config from file + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(config_path()))
        .merge(Env::prefixed("NODEPULSE_"));

    let config: Config = figment.extract()?;
    Ok(config)
}

/// Load config, returning defaults if the file doesn't exist or is invalid.
pub fn load_config_or_default() -> Config {
    load_config().unwrap_or_default()
}

/// Serialize config to TOML and write it to the canonical config path.
pub fn save_config(cfg: &Config) -> Result<(), ConfigError> {
    let path = config_path();
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(&path, toml_str)?;
    Ok(())
}

/// Parse and validate the panel URL out of a config.
pub fn panel_url(cfg: &Config) -> Result<url::Url, ConfigError> {
    let raw = cfg.panel.as_deref().ok_or(ConfigError::NoPanelUrl)?;
    raw.parse().map_err(|_| ConfigError::Validation {
        field: "panel".into(),
        reason: format!("invalid URL: {raw}"),
    })
}

// ── Persisted client state ──────────────────────────────────────────

/// On-disk shape of the state file: the session token and the theme flag,
/// nothing else.
#[derive(Debug, Default, Deserialize, Serialize)]
struct PersistedState {
    #[serde(default)]
    token: Option<String>,
    #[serde(default)]
    dark_mode: bool,
}

/// File-backed [`StateStore`]. Reads go to disk on every call — the state
/// file is tiny and another process may have logged in or out meanwhile.
/// Write failures are logged and swallowed: losing a preference write must
/// never break the panel.
pub struct FileStateStore {
    path: PathBuf,
}

impl FileStateStore {
    /// Store at the canonical platform state path.
    pub fn new() -> Self {
        Self::at(state_path())
    }

    /// Store at an explicit path (tests, portable setups).
    pub fn at(path: PathBuf) -> Self {
        Self { path }
    }

    fn load(&self) -> PersistedState {
        match std::fs::read_to_string(&self.path) {
            Ok(raw) => toml::from_str(&raw).unwrap_or_else(|err| {
                warn!(path = %self.path.display(), error = %err, "state file unreadable, starting fresh");
                PersistedState::default()
            }),
            Err(_) => PersistedState::default(),
        }
    }

    fn save(&self, state: &PersistedState) {
        let write = || -> Result<(), ConfigError> {
            if let Some(parent) = self.path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(&self.path, toml::to_string_pretty(state)?)?;
            Ok(())
        };
        if let Err(err) = write() {
            warn!(path = %self.path.display(), error = %err, "failed to persist client state");
        }
    }
}

impl Default for FileStateStore {
    fn default() -> Self {
        Self::new()
    }
}

impl StateStore for FileStateStore {
    fn load_token(&self) -> Option<SecretString> {
        self.load().token.map(SecretString::from)
    }

    fn save_token(&self, token: &SecretString) {
        let mut state = self.load();
        state.token = Some(token.expose_secret().to_owned());
        self.save(&state);
    }

    fn clear_token(&self) {
        let mut state = self.load();
        state.token = None;
        self.save(&state);
    }

    fn load_dark_mode(&self) -> bool {
        self.load().dark_mode
    }

    fn save_dark_mode(&self, enabled: bool) {
        let mut state = self.load();
        state.dark_mode = enabled;
        self.save(&state);
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn state_round_trips_token_and_theme() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStateStore::at(dir.path().join("state.toml"));

        assert!(store.load_token().is_none());
        assert!(!store.load_dark_mode());

        store.save_token(&SecretString::from("tok-1".to_string()));
        store.save_dark_mode(true);

        assert_eq!(store.load_token().unwrap().expose_secret(), "tok-1");
        assert!(store.load_dark_mode());

        store.clear_token();
        assert!(store.load_token().is_none());
        // Clearing the token leaves the theme alone.
        assert!(store.load_dark_mode());
    }

    #[test]
    fn missing_state_file_reads_as_defaults() {
        let store = FileStateStore::at(PathBuf::from("/nonexistent/nodepulse/state.toml"));
        assert!(store.load_token().is_none());
        assert!(!store.load_dark_mode());
    }

    #[test]
    fn config_defaults_are_sane() {
        let cfg = Config::default();
        assert_eq!(cfg.timeout, 30);
        assert!(!cfg.insecure);
        assert_eq!(cfg.defaults.output, "table");
        assert!(panel_url(&cfg).is_err());
    }
}
