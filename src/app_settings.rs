// SPDX-License-Identifier: GPL-3.0-only

//! Centralized application settings and constants.

/// Application ID in RDNN (reverse domain name notation) format.
pub const APP_ID: &str = "io.github.thornboard.Thornboard";

/// Double-tap window for caps lock detection in milliseconds.
///
/// Two shift presses closer together than this lock caps; anything
/// slower is an ordinary shift toggle.
pub const CAPS_DOUBLE_TAP_MS: u64 = 300;

/// Initial delay before a held backspace starts repeating, in milliseconds.
pub const DELETE_REPEAT_DELAY_MS: u64 = 400;

/// Interval between repeated deletes while backspace is held, in milliseconds.
pub const DELETE_REPEAT_INTERVAL_MS: u64 = 50;

/// Duration of the keypress haptic pulse in milliseconds.
pub const KEYPRESS_VIBRATE_MS: u64 = 30;

/// File name of the persisted settings document.
pub const SETTINGS_FILE_NAME: &str = "settings.json";
