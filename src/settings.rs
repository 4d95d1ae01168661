// SPDX-License-Identifier: GPL-3.0-only

//! User preferences and their durable storage.
//!
//! [`Settings`] is the flat set of boolean preferences the controller
//! consults: which side of the primary layout the variant key sits on,
//! whether the variant key produces eth instead of thorn, and whether key
//! presses vibrate. The controller re-reads its cached copy on every
//! layout (re)build and every vibrate decision; writes go through a
//! [`SettingsStore`] so the host can persist them.
//!
//! Two stores are provided: [`JsonSettingsStore`] persists a JSON
//! document on disk, [`MemoryStore`] keeps settings in memory for tests
//! and hosts without durable storage.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::app_settings;

/// User preferences that persist between sessions.
///
/// Unknown or missing fields in a stored document fall back to the field
/// defaults, so documents written by older versions keep loading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Whether the variant key column sits on the right side of the
    /// primary layout. Default: `false` (left side).
    pub thorn_on_right: bool,
    /// Whether the variant key produces eth (ð) instead of thorn (þ).
    /// Default: `false` (thorn).
    pub use_eth_instead: bool,
    /// Whether each key press triggers a short haptic pulse.
    /// Default: `true`.
    pub vibrate_on_keypress: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            thorn_on_right: false,
            use_eth_instead: false,
            vibrate_on_keypress: true,
        }
    }
}

// ============================================================================
// Error Handling
// ============================================================================

/// Result type for settings store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors that can occur while loading or saving settings.
#[derive(Debug)]
pub enum StoreError {
    /// I/O error while reading or writing the settings document.
    Io {
        /// The underlying I/O error.
        source: std::io::Error,
        /// Path of the document that caused the error, if known.
        file_path: Option<String>,
    },
    /// The settings document exists but is not valid JSON.
    Json {
        /// The underlying JSON error.
        source: serde_json::Error,
        /// Path of the document being parsed, if known.
        file_path: Option<String>,
    },
}

impl StoreError {
    fn io(source: std::io::Error, path: &Path) -> Self {
        Self::Io {
            source,
            file_path: Some(path.display().to_string()),
        }
    }

    fn json(source: serde_json::Error, path: &Path) -> Self {
        Self::Json {
            source,
            file_path: Some(path.display().to_string()),
        }
    }
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::Io { source, file_path } => {
                write!(f, "settings I/O failed")?;
                if let Some(path) = file_path {
                    write!(f, " ({path})")?;
                }
                write!(f, ": {source}")
            }
            StoreError::Json { source, file_path } => {
                write!(f, "settings document is not valid JSON")?;
                if let Some(path) = file_path {
                    write!(f, " ({path})")?;
                }
                write!(f, ": {source}")
            }
        }
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StoreError::Io { source, .. } => Some(source),
            StoreError::Json { source, .. } => Some(source),
        }
    }
}

// ============================================================================
// Stores
// ============================================================================

/// Durable storage contract for [`Settings`].
pub trait SettingsStore: Send + Sync {
    /// Loads the persisted settings. A store with nothing persisted yet
    /// returns the defaults rather than an error.
    fn load(&self) -> StoreResult<Settings>;

    /// Persists `settings`, replacing whatever was stored before.
    fn save(&self, settings: &Settings) -> StoreResult<()>;
}

/// Settings store backed by a JSON document on disk.
#[derive(Debug, Clone)]
pub struct JsonSettingsStore {
    path: PathBuf,
}

impl JsonSettingsStore {
    /// Creates a store persisting at `path`.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Creates a store persisting at the default file name inside `dir`.
    #[must_use]
    pub fn in_dir(dir: &Path) -> Self {
        Self {
            path: dir.join(app_settings::SETTINGS_FILE_NAME),
        }
    }

    /// Path of the persisted document.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SettingsStore for JsonSettingsStore {
    fn load(&self) -> StoreResult<Settings> {
        if !self.path.exists() {
            tracing::debug!(path = %self.path.display(), "no settings document, using defaults");
            return Ok(Settings::default());
        }
        let raw = fs::read_to_string(&self.path).map_err(|e| StoreError::io(e, &self.path))?;
        serde_json::from_str(&raw).map_err(|e| StoreError::json(e, &self.path))
    }

    fn save(&self, settings: &Settings) -> StoreResult<()> {
        // A bare file name has an empty parent; nothing to create then.
        let parent = self.path.parent().filter(|p| !p.as_os_str().is_empty());
        if let Some(parent) = parent {
            fs::create_dir_all(parent).map_err(|e| StoreError::io(e, &self.path))?;
        }
        let raw =
            serde_json::to_string_pretty(settings).map_err(|e| StoreError::json(e, &self.path))?;
        fs::write(&self.path, raw).map_err(|e| StoreError::io(e, &self.path))?;
        tracing::debug!(path = %self.path.display(), "settings persisted");
        Ok(())
    }
}

/// In-memory settings store for tests and hosts without durable storage.
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: Mutex<Settings>,
}

impl MemoryStore {
    /// Creates a store holding the default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store pre-seeded with `settings`.
    #[must_use]
    pub fn with_settings(settings: Settings) -> Self {
        Self {
            inner: Mutex::new(settings),
        }
    }
}

impl SettingsStore for MemoryStore {
    fn load(&self) -> StoreResult<Settings> {
        Ok(*self.inner.lock().unwrap_or_else(|e| e.into_inner()))
    }

    fn save(&self, settings: &Settings) -> StoreResult<()> {
        *self.inner.lock().unwrap_or_else(|e| e.into_inner()) = *settings;
        Ok(())
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
