// SPDX-License-Identifier: GPL-3.0-only

//! Host-side collaborator contracts.
//!
//! The controller core never talks to a platform directly. Everything it
//! needs from the host (committing text, deleting around the cursor,
//! signalling confirm/newline, vibrating) goes through the traits in
//! this module. All host calls are fire-and-forget and non-failing from
//! the controller's perspective; failures are the host's concern.

use std::time::Duration;

/// Text-editing surface provided by the host.
///
/// Implementations forward to the platform's current input connection.
/// Every call is synchronous and must not block the dispatch path.
pub trait InputSurface: Send + Sync {
    /// Inserts `text` at the cursor position.
    fn commit_text(&self, text: &str);

    /// Deletes one code point before the cursor.
    fn delete_one_code_point(&self);

    /// Emits the platform confirm/newline signal.
    fn send_confirm_signal(&self);
}

/// Haptic feedback sink.
///
/// The controller decides *whether* to vibrate (from the
/// `vibrate_on_keypress` preference); the host decides how.
pub trait Haptics: Send + Sync {
    /// Plays one pulse of the given duration.
    fn vibrate(&self, duration: Duration);
}

/// Haptics sink that drops every pulse.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopHaptics;

impl Haptics for NoopHaptics {
    fn vibrate(&self, _duration: Duration) {}
}
