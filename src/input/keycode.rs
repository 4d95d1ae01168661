// SPDX-License-Identifier: GPL-3.0-only

//! Raw key codes and their decoded form.
//!
//! On-screen keys deliver bare integer codes. Control codes are a small
//! fixed set (negative values plus space and the variant character);
//! every other value is an ordinary code resolved by the glyph resolver.
//! Raw integers are decoded exactly once, at the dispatch boundary, into
//! [`Key`]; nothing downstream re-inspects raw values.
//!
//! # Code Table
//!
//! | Code | Key |
//! |------|-----|
//! | -1 | shift/caps |
//! | -2, -67 | switch to symbols layout |
//! | -68 | switch to primary layout |
//! | -69 | switch to math layout |
//! | -10 | toggle settings panel |
//! | -5 | backspace |
//! | -4 | enter/confirm |
//! | 32 | space |
//! | 254 | variant character (thorn/eth) |
//! | other | ordinary code |

/// Raw control codes as delivered by the on-screen keys.
///
/// These values are part of the wire contract with the host keyboard
/// view and must not change.
pub mod codes {
    /// Shift/caps key.
    pub const SHIFT: i64 = -1;
    /// Switch to the symbols layout.
    pub const SYMBOLS: i64 = -2;
    /// Alias for [`SYMBOLS`] used by some key definitions.
    pub const SYMBOLS_ALT: i64 = -67;
    /// Switch to the primary layout.
    pub const PRIMARY: i64 = -68;
    /// Switch to the math symbols layout.
    pub const MATH: i64 = -69;
    /// Toggle the settings panel.
    pub const SETTINGS_TOGGLE: i64 = -10;
    /// Backspace; press arms the repeat scheduler, release disarms it.
    pub const BACKSPACE: i64 = -5;
    /// Enter/confirm.
    pub const ENTER: i64 = -4;
    /// Space bar.
    pub const SPACE: i64 = 32;
    /// Variant character key (thorn/eth family).
    pub const VARIANT: i64 = 254;
}

/// A key decoded from its raw code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    /// Shift/caps modifier.
    Shift,
    /// Switch to the symbols layout.
    Symbols,
    /// Switch to the primary layout.
    Primary,
    /// Switch to the math symbols layout.
    Math,
    /// Toggle between the keyboard surface and the settings panel.
    SettingsToggle,
    /// Delete one code point; arms hold-to-repeat while pressed.
    Backspace,
    /// Confirm/newline.
    Enter,
    /// Literal space.
    Space,
    /// Variant character key whose glyph depends on the eth preference.
    Variant,
    /// Any other code, resolved by the glyph resolver.
    Ordinary(i64),
}

impl Key {
    /// Decodes a raw key code.
    ///
    /// Total over all inputs: unrecognized codes decode to
    /// [`Key::Ordinary`] rather than an error.
    #[must_use]
    pub fn from_code(code: i64) -> Self {
        match code {
            codes::SHIFT => Key::Shift,
            codes::SYMBOLS | codes::SYMBOLS_ALT => Key::Symbols,
            codes::PRIMARY => Key::Primary,
            codes::MATH => Key::Math,
            codes::SETTINGS_TOGGLE => Key::SettingsToggle,
            codes::BACKSPACE => Key::Backspace,
            codes::ENTER => Key::Enter,
            codes::SPACE => Key::Space,
            codes::VARIANT => Key::Variant,
            other => Key::Ordinary(other),
        }
    }
}

impl From<i64> for Key {
    fn from(code: i64) -> Self {
        Key::from_code(code)
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
