// SPDX-License-Identifier: GPL-3.0-only

//! Ordinary-code glyph resolution.
//!
//! Ordinary key codes carry the Unicode scalar value of the character on
//! the key cap. A [`GlyphResolver`] turns a code plus the shift flag
//! into the text to commit. [`UnicodeGlyphs`] is the default resolver:
//! it maps the variant code to thorn (the eth preference is applied
//! upstream by the dispatcher) and uppercases ordinary characters when
//! shifted, including multi-character expansions like ß → SS.

use crate::input::keycode::codes;

/// Maps an ordinary key code and shift flag to committed text.
///
/// Unmappable codes resolve to an empty string rather than an error;
/// a failed lookup is never the controller's problem.
pub trait GlyphResolver: Send + Sync {
    /// Resolves `code` to the text to insert.
    fn resolve(&self, code: i64, shifted: bool) -> String;
}

/// Default resolver backed by Unicode scalar values.
#[derive(Debug, Default, Clone, Copy)]
pub struct UnicodeGlyphs;

impl GlyphResolver for UnicodeGlyphs {
    fn resolve(&self, code: i64, shifted: bool) -> String {
        // The variant code is not a scalar value; it names the thorn key.
        if code == codes::VARIANT {
            let thorn = if shifted { "Þ" } else { "þ" };
            return thorn.to_string();
        }

        let Ok(value) = u32::try_from(code) else {
            return String::new();
        };
        if value == 0 {
            return String::new();
        }
        let Some(c) = char::from_u32(value) else {
            return String::new();
        };
        if shifted {
            c.to_uppercase().collect()
        } else {
            c.to_string()
        }
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
