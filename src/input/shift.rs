// SPDX-License-Identifier: GPL-3.0-only

//! Shift and caps-lock state tracking.
//!
//! A single shift tap toggles shift for the next character; two taps
//! inside the double-tap window lock caps. Caps lock is sticky across
//! character commits and is cleared by one more slow tap. Shift, by
//! contrast, is one-shot: it resets to off after a single ordinary
//! character has been committed.
//!
//! `state() != Off` is the single source of truth for whether the next
//! character is uppercase.

use std::time::{Duration, Instant};

use crate::app_settings::CAPS_DOUBLE_TAP_MS;

/// Modifier state applied to the next committed character.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ShiftState {
    /// No modifier; characters commit lowercase.
    #[default]
    Off,
    /// One-shot shift; cleared after the next ordinary character.
    Shift,
    /// Sticky caps lock; survives character commits.
    CapsLock,
}

impl ShiftState {
    /// `true` when the next character should be uppercase.
    #[must_use]
    pub fn is_shifted(self) -> bool {
        self != ShiftState::Off
    }
}

/// Tracks shift state across presses and commits.
///
/// Owns the last-press timestamp used for double-tap classification.
/// Timestamps are supplied by the caller so tests can drive the clock.
#[derive(Debug, Clone, Default)]
pub struct ShiftTracker {
    state: ShiftState,
    last_press: Option<Instant>,
}

impl ShiftTracker {
    /// Creates a tracker in the session-start state (off, no press seen).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current shift state.
    #[must_use]
    pub fn state(&self) -> ShiftState {
        self.state
    }

    /// `true` when the next character should be uppercase.
    #[must_use]
    pub fn is_shifted(&self) -> bool {
        self.state.is_shifted()
    }

    /// Processes a shift key press at `now` and returns the new state.
    ///
    /// Two presses closer together than the double-tap window lock caps
    /// regardless of the state in between; a slow press toggles
    /// Off ↔ Shift, and cancels caps lock in one tap. The last-press
    /// timestamp is updated on every press, whatever the outcome.
    pub fn on_press(&mut self, now: Instant) -> ShiftState {
        let double_tap = self.last_press.is_some_and(|previous| {
            now.duration_since(previous) < Duration::from_millis(CAPS_DOUBLE_TAP_MS)
        });
        self.state = if double_tap {
            ShiftState::CapsLock
        } else {
            match self.state {
                ShiftState::Off => ShiftState::Shift,
                ShiftState::Shift | ShiftState::CapsLock => ShiftState::Off,
            }
        };
        self.last_press = Some(now);
        tracing::debug!(state = ?self.state, "shift press");
        self.state
    }

    /// Applies the one-shot rule after an ordinary character commit.
    ///
    /// Exactly `Shift` resets to `Off`; caps lock is unaffected.
    pub fn on_character_committed(&mut self) -> ShiftState {
        if self.state == ShiftState::Shift {
            self.state = ShiftState::Off;
            tracing::debug!("one-shot shift consumed");
        }
        self.state
    }

    /// Resets to the session-start state.
    pub fn reset(&mut self) {
        self.state = ShiftState::Off;
        self.last_press = None;
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
