//! Application settings structs, defaults and TOML persistence.
//!
//! All structs implement `Serialize`, `Deserialize`, `Default` and `Clone`
//! so they can be round-tripped through TOML files and shared across threads.

use anyhow::Result;
use serde::{Deserialize, Serialize};

use super::AppPaths;

/// Environment variable that overrides the TOML API key.
pub const API_KEY_ENV: &str = "GEMINI_API_KEY";

// ---------------------------------------------------------------------------
// GeminiConfig
// ---------------------------------------------------------------------------

/// Connection settings for the hosted Gemini API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeminiConfig {
    /// Base URL of the API endpoint.
    ///
    /// Default: `https://generativelanguage.googleapis.com`
    pub base_url: String,
    /// API key — the `GEMINI_API_KEY` environment variable takes precedence
    /// over this value when both are set.
    pub api_key: Option<String>,
    /// Model identifier sent to the API (e.g. `"gemini-1.5-flash"`).
    pub model: String,
    /// Maximum seconds to wait for any single HTTP request before timing out.
    pub timeout_secs: u64,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            base_url: "https://generativelanguage.googleapis.com".into(),
            api_key: None,
            model: "gemini-1.5-flash".into(),
            timeout_secs: 120,
        }
    }
}

impl GeminiConfig {
    /// Resolve the API key: environment variable first, TOML value second.
    ///
    /// Returns `None` when neither source provides a non-empty key — a fatal
    /// startup condition for the application.
    pub fn resolve_api_key(&self) -> Option<String> {
        if let Ok(key) = std::env::var(API_KEY_ENV) {
            if !key.trim().is_empty() {
                return Some(key);
            }
        }
        self.api_key
            .as_deref()
            .filter(|k| !k.trim().is_empty())
            .map(|k| k.to_string())
    }
}

// ---------------------------------------------------------------------------
// PollConfig
// ---------------------------------------------------------------------------

/// Settings for the remote file-processing poll loop.
///
/// The Files API returns uploaded media in `PROCESSING` state; the pipeline
/// re-fetches the handle until it becomes `ACTIVE`.  The loop is bounded:
/// after `max_attempts` fetches the run fails with a timeout instead of
/// waiting forever.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PollConfig {
    /// Seconds to sleep between state fetches.
    pub interval_secs: u64,
    /// Maximum number of state fetches before giving up.
    pub max_attempts: u32,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            interval_secs: 2,
            max_attempts: 150,
        }
    }
}

// ---------------------------------------------------------------------------
// UiConfig
// ---------------------------------------------------------------------------

/// egui window appearance settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    /// Last saved window position `(x, y)` in screen pixels.  `None` means
    /// let the OS / window manager pick a position on first launch.
    pub window_position: Option<(f32, f32)>,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            window_position: None,
        }
    }
}

// ---------------------------------------------------------------------------
// AppConfig  (top-level)
// ---------------------------------------------------------------------------

/// Top-level application configuration, serialised as `settings.toml`.
///
/// # Persistence
///
/// ```rust,no_run
/// use pitch_vision::config::AppConfig;
///
/// // Load (returns Default when file is missing)
/// let config = AppConfig::load().unwrap();
///
/// // Modify and save
/// // config.save().unwrap();
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    /// Gemini API connection settings.
    pub gemini: GeminiConfig,
    /// Remote processing poll settings.
    pub poll: PollConfig,
    /// UI / window settings.
    pub ui: UiConfig,
}

impl AppConfig {
    /// Load configuration from the platform-appropriate `settings.toml`.
    ///
    /// Returns `Ok(AppConfig::default())` when the file does not exist yet
    /// (first-run scenario) so callers never need to special-case a missing
    /// file.
    pub fn load() -> Result<Self> {
        Self::load_from(&AppPaths::new().settings_file)
    }

    /// Load from an explicit path (useful for tests).
    pub fn load_from(path: &std::path::Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to the platform-appropriate `settings.toml`,
    /// creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        self.save_to(&AppPaths::new().settings_file)
    }

    /// Save to an explicit path (useful for tests).
    pub fn save_to(&self, path: &std::path::Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
