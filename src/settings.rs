//! Runtime settings
//!
//! Loaded from a JSON file (`$ARKANOID_SETTINGS`, else `arkanoid.json` in the
//! working directory). Missing keys fall back to defaults, so a file can set
//! just what it cares about. A few environment variables override the file.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::consts::TICK_MS;
use crate::error::{ArkanoidError, Result};
use crate::event_log::MAX_LOG_ENTRIES;

/// Settings file used when `ARKANOID_SETTINGS` is not set
pub const DEFAULT_SETTINGS_FILE: &str = "arkanoid.json";

/// Game settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Game loop interval in milliseconds
    pub tick_ms: u64,

    // === Score store ===
    /// Best-score endpoint (GET returns `{score}`, POST `{score}` returns `{score}`)
    pub score_url: String,
    /// Talk to the score store at all
    pub score_enabled: bool,

    // === Display bridge ===
    /// How long `connect` waits for the display
    pub bridge_timeout_ms: u64,

    // === Assets ===
    pub logo_path: PathBuf,
    pub gameover_path: PathBuf,

    // === Diagnostics ===
    /// Entries kept by the in-memory event log
    pub log_capacity: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            tick_ms: TICK_MS,

            score_url: "http://127.0.0.1:8787/api/best-score".to_string(),
            score_enabled: true,

            bridge_timeout_ms: 6000,

            logo_path: PathBuf::from("assets/logo.png"),
            gameover_path: PathBuf::from("assets/gameover.png"),

            log_capacity: MAX_LOG_ENTRIES,
        }
    }
}

impl Settings {
    /// Load from the default location and apply environment overrides.
    /// Never fails: problems are logged and defaults used.
    pub fn load() -> Self {
        let path = std::env::var_os("ARKANOID_SETTINGS")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_SETTINGS_FILE));

        let mut settings = match Self::load_from(&path) {
            Ok(Some(settings)) => {
                log::info!("Loaded settings from {}", path.display());
                settings
            }
            Ok(None) => {
                log::info!("No settings at {}, using defaults", path.display());
                Self::default()
            }
            Err(e) => {
                log::warn!("{}; using defaults", e);
                Self::default()
            }
        };

        settings.apply_overrides(|key| std::env::var(key).ok());
        settings
    }

    /// Read a settings file. `Ok(None)` if it does not exist.
    pub fn load_from(path: &Path) -> Result<Option<Self>> {
        let json = match std::fs::read_to_string(path) {
            Ok(json) => json,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(ArkanoidError::Settings(format!(
                    "{}: {}",
                    path.display(),
                    e
                )));
            }
        };
        Self::from_json(&json).map(Some)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| ArkanoidError::Settings(e.to_string()))
    }

    /// Apply `ARKANOID_SCORE_URL`, `ARKANOID_TICK_MS` and
    /// `ARKANOID_SCORE_DISABLED` from `lookup`.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(url) = lookup("ARKANOID_SCORE_URL") {
            self.score_url = url;
        }
        if let Some(ms) = lookup("ARKANOID_TICK_MS") {
            match ms.parse::<u64>() {
                Ok(ms) if ms > 0 => self.tick_ms = ms,
                _ => log::warn!("Ignoring ARKANOID_TICK_MS={:?}", ms),
            }
        }
        if let Some(flag) = lookup("ARKANOID_SCORE_DISABLED") {
            if flag == "1" || flag.eq_ignore_ascii_case("true") {
                self.score_enabled = false;
            }
        }
    }

    /// Tick interval, never zero
    pub fn tick_interval(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.tick_ms.max(1))
    }

    pub fn bridge_timeout(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.bridge_timeout_ms)
    }
}
