//! Configuration module for the capture CLI
//!
//! Acquisition-loop settings persisted as JSON in the platform-appropriate
//! data directory:
//!
//! - **Linux**: `~/.local/share/novacap-rs/`
//! - **macOS**: `~/Library/Application Support/novacap-rs/`
//!
//! Only loop behavior lives here. The wire-protocol constants (family name,
//! block size, stride widths) are contracts with the kernel driver and are
//! deliberately not configurable; see `backend::link`.

use crate::error::{NovacapError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Application identifier for data directories
pub const APP_ID: &str = "novacap-rs";

/// Settings filename
pub const SETTINGS_FILE: &str = "settings.json";

/// Default pause between polls; one chunk is ~11.6 ms of signal at 44.1 kHz
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 10;

/// Default throughput-report cadence, in accepted chunks
pub const DEFAULT_REPORT_EVERY_CHUNKS: u64 = 256;

/// Get the application data directory path
pub fn app_data_dir() -> Option<PathBuf> {
    dirs_next::data_dir().map(|p| p.join(APP_ID))
}

/// Get the path to the settings file
pub fn settings_path() -> Option<PathBuf> {
    app_data_dir().map(|p| p.join(SETTINGS_FILE))
}

fn default_source_name() -> String {
    crate::source::novena::SOURCE_NAME.to_string()
}

fn default_poll_interval_ms() -> u64 {
    DEFAULT_POLL_INTERVAL_MS
}

fn default_report_every_chunks() -> u64 {
    DEFAULT_REPORT_EVERY_CHUNKS
}

/// Acquisition-loop settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CaptureSettings {
    /// Registered name of the source to open
    #[serde(default = "default_source_name")]
    pub source_name: String,

    /// Sleep between polls, in milliseconds
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,

    /// Log a throughput report every this many accepted chunks
    #[serde(default = "default_report_every_chunks")]
    pub report_every_chunks: u64,
}

impl Default for CaptureSettings {
    fn default() -> Self {
        Self {
            source_name: default_source_name(),
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
            report_every_chunks: DEFAULT_REPORT_EVERY_CHUNKS,
        }
    }
}

impl CaptureSettings {
    /// Load settings from an explicit path
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let contents = std::fs::read_to_string(path.as_ref())?;
        serde_json::from_str(&contents)
            .map_err(|e| NovacapError::Config(format!("failed to parse settings: {}", e)))
    }

    /// Load from the default location, falling back to defaults if the file
    /// is missing or unreadable.
    pub fn load_or_default() -> Self {
        let Some(path) = settings_path() else {
            return Self::default();
        };
        match Self::load(&path) {
            Ok(settings) => settings,
            Err(e) => {
                if path.exists() {
                    tracing::warn!(path = %path.display(), error = %e, "ignoring unreadable settings");
                }
                Self::default()
            }
        }
    }

    /// Save settings to an explicit path, creating parent directories.
    pub fn save_to(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(self)
            .map_err(|e| NovacapError::Config(format!("failed to serialize settings: {}", e)))?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    /// Save to the default location
    pub fn save(&self) -> Result<()> {
        let path = settings_path().ok_or_else(|| {
            NovacapError::Config("could not determine app data directory".to_string())
        })?;
        self.save_to(path)
    }
}
