// SPDX-License-Identifier: GPL-3.0-only

//! Input handling module for the thornboard controller.
//!
//! This module provides the pieces the session controller composes for
//! every incoming key event:
//!
//! - **Keycode decoding**: raw integer codes become the closed [`Key`]
//!   enum exactly once, at the dispatch boundary
//! - **Shift tracking**: one-shot shift and double-tap caps lock with
//!   timestamp-based classification
//! - **Repeat delete**: a cancellable timer task for hold-to-repeat
//!   backspace
//! - **Glyph resolution**: ordinary codes become committed text
//!
//! # Example
//!
//! ```rust,ignore
//! use thornboard::input::{Key, ShiftTracker, UnicodeGlyphs, GlyphResolver};
//! use std::time::Instant;
//!
//! let mut shift = ShiftTracker::new();
//! shift.on_press(Instant::now());
//!
//! match Key::from_code(97) {
//!     Key::Ordinary(code) => {
//!         let text = UnicodeGlyphs.resolve(code, shift.is_shifted());
//!         assert_eq!(text, "A");
//!     }
//!     _ => unreachable!(),
//! }
//! ```

// Sub-modules
pub mod glyph;
pub mod keycode;
pub mod repeat;
pub mod shift;

// Re-export public API
pub use glyph::{GlyphResolver, UnicodeGlyphs};
pub use keycode::{Key, codes};
pub use repeat::RepeatDelete;
pub use shift::{ShiftState, ShiftTracker};

// ============================================================================
// Module Tests
// ============================================================================
