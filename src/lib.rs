// SPDX-License-Identifier: GPL-3.0-only

//! Thornboard - input session controller for a thorn/eth soft keyboard
//!
//! This crate provides the stateful core of a soft keyboard: it turns
//! discrete key events from an on-screen keyboard into text-editing
//! actions against a host input surface, tracking shift/caps state,
//! the active layout, hold-to-repeat backspace, and the clipboard
//! preview bar along the way.
//!
//! # Architecture
//!
//! The controller is a single [`session::InputSession`] instance that
//! exclusively owns all mutable state. The platform-specific pieces
//! (the input surface, the clipboard, haptics, the glyph table, and the
//! settings store) are traits the host implements; the controller calls
//! them fire-and-forget and never blocks on them.
//!
//! Events are processed strictly in arrival order, one at a time, to
//! completion. The only asynchronous construct is the timer behind the
//! repeat-delete scheduler.
//!
//! # Modules
//!
//! - `app_settings`: Centralized application constants and timings
//! - `clipboard`: Clipboard snapshot model and preview bar controller
//! - `host`: Host collaborator traits (input surface, haptics)
//! - `input`: Keycode decoding, shift tracking, repeat delete, glyphs
//! - `layout`: Layout registry, primary variants, derived key caps
//! - `session`: The input session controller and event loop
//! - `settings`: User preferences and their durable storage

pub mod app_settings;
pub mod clipboard;
pub mod host;
pub mod input;
pub mod layout;
pub mod session;
pub mod settings;

pub use session::{InputEvent, InputSession, PanelView};

// ============================================================================
// Integration Tests
// ============================================================================
