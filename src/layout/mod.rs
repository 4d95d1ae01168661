// SPDX-License-Identifier: GPL-3.0-only

//! Layout registry and derived key-cap state.
//!
//! Three layouts (primary, symbols, and math) exist for the lifetime of
//! a session, and exactly one is active at any time. The primary layout
//! has four concrete variants resolved from two independent preferences:
//! which side the variant key column sits on, and whether that key
//! produces eth instead of thorn.
//!
//! State-dependent key caps (the variant key's glyph and the shift key's
//! icon tier) are derived once per shift or preference change and stored
//! keyed by layout in a [`LabelSet`]; the renderer reads the derived
//! values and never recomputes them inside a draw loop.

use crate::input::shift::ShiftState;
use crate::settings::Settings;

// ============================================================================
// Layout Identity
// ============================================================================

/// Identifier of one of the three simultaneous layouts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LayoutId {
    /// The letter layout, in one of four concrete variants.
    Primary,
    /// Punctuation and symbols.
    Symbols,
    /// Math symbols.
    Math,
}

/// Concrete primary layout, resolved from the two layout preferences.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrimaryVariant {
    /// Thorn key on the left (both preferences off; the default).
    ThornLeft,
    /// Thorn key on the right.
    ThornRight,
    /// Eth key on the left.
    EthLeft,
    /// Eth key on the right.
    EthRight,
}

impl PrimaryVariant {
    /// Resolves the variant from the side and glyph preferences.
    ///
    /// A pure function of the two booleans; the four combinations give
    /// four distinct variants, never a partial or mixed state.
    #[must_use]
    pub fn from_settings(settings: &Settings) -> Self {
        match (settings.thorn_on_right, settings.use_eth_instead) {
            (false, false) => PrimaryVariant::ThornLeft,
            (true, false) => PrimaryVariant::ThornRight,
            (false, true) => PrimaryVariant::EthLeft,
            (true, true) => PrimaryVariant::EthRight,
        }
    }

    /// Whether the variant key column sits on the right side.
    #[must_use]
    pub fn on_right(self) -> bool {
        matches!(self, PrimaryVariant::ThornRight | PrimaryVariant::EthRight)
    }

    /// Whether the variant key produces eth.
    #[must_use]
    pub fn uses_eth(self) -> bool {
        matches!(self, PrimaryVariant::EthLeft | PrimaryVariant::EthRight)
    }
}

// ============================================================================
// Derived Label State
// ============================================================================

/// Icon tier shown on the shift key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShiftIcon {
    /// Shift off.
    Base,
    /// One-shot shift active.
    Active,
    /// Caps locked.
    Caps,
}

impl ShiftIcon {
    fn from_state(state: ShiftState) -> Self {
        match state {
            ShiftState::Off => ShiftIcon::Base,
            ShiftState::Shift => ShiftIcon::Active,
            ShiftState::CapsLock => ShiftIcon::Caps,
        }
    }
}

/// State-dependent key caps for one layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyCaps {
    /// Glyph shown on the variant key.
    pub variant_label: &'static str,
    /// Icon tier shown on the shift key.
    pub shift_icon: ShiftIcon,
}

/// Derived label state for all three layouts, keyed by [`LayoutId`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LabelSet {
    primary: KeyCaps,
    symbols: KeyCaps,
    math: KeyCaps,
}

impl LabelSet {
    fn uniform(caps: KeyCaps) -> Self {
        Self {
            primary: caps,
            symbols: caps,
            math: caps,
        }
    }

    /// Key caps for `layout`.
    #[must_use]
    pub fn for_layout(&self, layout: LayoutId) -> &KeyCaps {
        match layout {
            LayoutId::Primary => &self.primary,
            LayoutId::Symbols => &self.symbols,
            LayoutId::Math => &self.math,
        }
    }
}

/// The variant key's glyph: the preference picks the letter, the shift
/// flag picks the case.
fn variant_label(use_eth: bool, shifted: bool) -> &'static str {
    match (use_eth, shifted) {
        (false, false) => "þ",
        (false, true) => "Þ",
        (true, false) => "ð",
        (true, true) => "Ð",
    }
}

// ============================================================================
// Registry
// ============================================================================

/// Holds the active layout, the resolved primary variant, and the
/// derived label state.
#[derive(Debug, Clone)]
pub struct LayoutRegistry {
    active: LayoutId,
    variant: PrimaryVariant,
    labels: LabelSet,
}

impl LayoutRegistry {
    /// Creates a registry with the primary layout active, the variant
    /// resolved from `settings`, and labels derived for shift-off.
    #[must_use]
    pub fn new(settings: &Settings) -> Self {
        let caps = KeyCaps {
            variant_label: variant_label(settings.use_eth_instead, false),
            shift_icon: ShiftIcon::Base,
        };
        Self {
            active: LayoutId::Primary,
            variant: PrimaryVariant::from_settings(settings),
            labels: LabelSet::uniform(caps),
        }
    }

    /// The active layout. There is always exactly one.
    #[must_use]
    pub fn active(&self) -> LayoutId {
        self.active
    }

    /// The resolved concrete primary layout.
    #[must_use]
    pub fn primary_variant(&self) -> PrimaryVariant {
        self.variant
    }

    /// The derived label state for the renderer to read.
    #[must_use]
    pub fn labels(&self) -> &LabelSet {
        &self.labels
    }

    /// Makes `layout` the active layout.
    ///
    /// Pure assignment with no other side effect. Switching to the
    /// already-active layout is an idempotent no-op; the return value
    /// reports whether the active layout changed.
    pub fn switch_to(&mut self, layout: LayoutId) -> bool {
        if self.active == layout {
            return false;
        }
        tracing::debug!(from = ?self.active, to = ?layout, "layout switch");
        self.active = layout;
        true
    }

    /// Re-resolves the concrete primary variant from `settings`.
    pub fn reload_variant(&mut self, settings: &Settings) -> PrimaryVariant {
        let variant = PrimaryVariant::from_settings(settings);
        if variant != self.variant {
            tracing::debug!(?variant, "primary variant resolved");
            self.variant = variant;
        }
        variant
    }

    /// Recomputes the per-layout label state from the shift state and
    /// the glyph preference.
    ///
    /// All three layouts are relabeled at once: the variant key's case
    /// follows shift and its grapheme follows the eth preference.
    pub fn rebuild_labels(&mut self, shift: ShiftState, settings: &Settings) -> &LabelSet {
        let caps = KeyCaps {
            variant_label: variant_label(settings.use_eth_instead, shift.is_shifted()),
            shift_icon: ShiftIcon::from_state(shift),
        };
        self.labels = LabelSet::uniform(caps);
        &self.labels
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
