// SPDX-License-Identifier: GPL-3.0-only

//! The input session controller.
//!
//! One [`InputSession`] owns every piece of mutable keyboard state:
//! shift tracking, the active layout, the repeat-delete scheduler, the
//! clipboard bar, the settings cache, and the panel visibility. Nothing
//! is global; hosts may run any number of independent sessions.
//!
//! # Dispatch
//!
//! [`InputSession::on_key`] is total over the decoded [`Key`] enum. Each
//! dispatch performs at most one host call (commit, delete, or confirm)
//! plus possibly one shift transition and/or one layout switch, and
//! never blocks. Press/release events are handled separately: a
//! backspace press arms the repeat scheduler and its release disarms it,
//! while the tap itself deletes one code point immediately.
//!
//! # Ordering
//!
//! Events are processed strictly in arrival order, one at a time, to
//! completion. [`InputSession::run`] drains a `futures` mpsc channel of
//! [`InputEvent`]s for hosts that deliver input asynchronously.
//!
//! # Degraded paths
//!
//! While no session is active, every dispatch, press, and paste is a
//! silent no-op; there is nothing meaningful to surface to the user
//! mid-keystroke. The controller core has no fatal errors.

use std::sync::Arc;
use std::time::{Duration, Instant};

use futures::StreamExt;
use futures::channel::mpsc;

use crate::app_settings::KEYPRESS_VIBRATE_MS;
use crate::clipboard::{BarVisibility, ClipboardBar, ClipboardSnapshot, ClipboardSource};
use crate::host::{Haptics, InputSurface};
use crate::input::glyph::GlyphResolver;
use crate::input::keycode::Key;
use crate::input::repeat::RepeatDelete;
use crate::input::shift::{ShiftState, ShiftTracker};
use crate::layout::{LabelSet, LayoutId, LayoutRegistry, PrimaryVariant};
use crate::settings::{Settings, SettingsStore};

/// Which surface the host is showing. Exactly one is visible at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PanelView {
    /// The keyboard surface.
    #[default]
    Keyboard,
    /// The settings panel.
    Settings,
}

/// Input events delivered by the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputEvent {
    /// A key went down.
    Press(i64),
    /// A key came back up.
    Release(i64),
    /// A key was tapped (press and release resolved by the host view).
    Key(i64),
    /// The primary clip changed.
    ClipboardChanged(ClipboardSnapshot),
}

/// Stateful controller for one input session.
pub struct InputSession {
    surface: Arc<dyn InputSurface>,
    glyphs: Arc<dyn GlyphResolver>,
    clipboard_source: Arc<dyn ClipboardSource>,
    store: Arc<dyn SettingsStore>,
    haptics: Arc<dyn Haptics>,

    settings: Settings,
    shift: ShiftTracker,
    layouts: LayoutRegistry,
    repeat: RepeatDelete,
    clipboard_bar: ClipboardBar,
    panel: PanelView,
    active: bool,
}

impl InputSession {
    /// Creates a session wired to its host collaborators.
    ///
    /// Settings load from `store` up front; a store failure logs a
    /// warning and falls back to the defaults.
    pub fn new(
        surface: Arc<dyn InputSurface>,
        glyphs: Arc<dyn GlyphResolver>,
        clipboard_source: Arc<dyn ClipboardSource>,
        store: Arc<dyn SettingsStore>,
        haptics: Arc<dyn Haptics>,
    ) -> Self {
        let settings = store.load().unwrap_or_else(|e| {
            tracing::warn!(error = %e, "settings load failed, using defaults");
            Settings::default()
        });
        let layouts = LayoutRegistry::new(&settings);
        Self {
            surface,
            glyphs,
            clipboard_source,
            store,
            haptics,
            settings,
            shift: ShiftTracker::new(),
            layouts,
            repeat: RepeatDelete::new(),
            clipboard_bar: ClipboardBar::new(),
            panel: PanelView::default(),
            active: false,
        }
    }

    // ========================================================================
    // State Accessors
    // ========================================================================

    /// `true` while an input session is active.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Current shift state.
    #[must_use]
    pub fn shift_state(&self) -> ShiftState {
        self.shift.state()
    }

    /// The active layout.
    #[must_use]
    pub fn active_layout(&self) -> LayoutId {
        self.layouts.active()
    }

    /// The resolved concrete primary layout.
    #[must_use]
    pub fn primary_variant(&self) -> PrimaryVariant {
        self.layouts.primary_variant()
    }

    /// Derived per-layout label state for the renderer.
    #[must_use]
    pub fn labels(&self) -> &LabelSet {
        self.layouts.labels()
    }

    /// Which surface the host should show.
    #[must_use]
    pub fn panel(&self) -> PanelView {
        self.panel
    }

    /// The cached settings.
    #[must_use]
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Clipboard preview bar visibility.
    #[must_use]
    pub fn clipboard_visibility(&self) -> BarVisibility {
        self.clipboard_bar.visibility()
    }

    /// Clipboard preview text, if the bar is visible.
    #[must_use]
    pub fn clipboard_preview(&self) -> Option<&str> {
        self.clipboard_bar.preview()
    }

    // ========================================================================
    // Session Lifecycle
    // ========================================================================

    /// Begins an input session.
    ///
    /// Shift resets to off, the primary variant re-resolves from the
    /// current settings, labels rebuild, and the clipboard bar
    /// re-evaluates against the host clip.
    pub fn start_input(&mut self) {
        self.active = true;
        self.shift.reset();
        self.layouts.reload_variant(&self.settings);
        self.layouts.rebuild_labels(self.shift.state(), &self.settings);
        self.clipboard_bar.refresh(self.clipboard_source.as_ref());
        tracing::info!("input session started");
    }

    /// Ends the session. Further input is a no-op until the next start.
    pub fn finish_input(&mut self) {
        self.repeat.disarm();
        self.active = false;
        tracing::info!("input session finished");
    }

    // ========================================================================
    // Press / Release
    // ========================================================================

    /// Handles a key going down.
    ///
    /// Plays the haptic pulse when enabled, and arms the repeat-delete
    /// scheduler for backspace. Must run within a tokio runtime for the
    /// backspace case.
    pub fn on_press(&mut self, code: i64) {
        if !self.active {
            tracing::trace!(code, "press dropped, no active session");
            return;
        }
        if self.settings.vibrate_on_keypress {
            self.haptics.vibrate(Duration::from_millis(KEYPRESS_VIBRATE_MS));
        }
        if Key::from_code(code) == Key::Backspace {
            self.repeat.arm(Arc::clone(&self.surface));
        }
    }

    /// Handles a key coming back up.
    ///
    /// A backspace release always disarms the repeat scheduler, even
    /// when no matching press was seen; the cancel is idempotent.
    pub fn on_release(&mut self, code: i64) {
        if Key::from_code(code) == Key::Backspace {
            self.repeat.disarm();
        }
    }

    // ========================================================================
    // Dispatch
    // ========================================================================

    /// Dispatches a completed key tap using the current wall clock.
    pub fn on_key(&mut self, code: i64) {
        self.on_key_at(code, Instant::now());
    }

    /// Dispatches a completed key tap with an explicit timestamp.
    ///
    /// The timestamp only matters for the shift key's double-tap
    /// classification; separating it from the wall clock keeps dispatch
    /// deterministic under test.
    pub fn on_key_at(&mut self, code: i64, now: Instant) {
        if !self.active {
            tracing::trace!(code, "key dropped, no active session");
            return;
        }
        match Key::from_code(code) {
            Key::Shift => {
                let state = self.shift.on_press(now);
                self.layouts.rebuild_labels(state, &self.settings);
            }
            Key::Symbols => self.switch_layout(LayoutId::Symbols),
            Key::Primary => {
                // Re-resolve the variant: the side or glyph preference
                // may have changed since the layout was last shown.
                self.layouts.reload_variant(&self.settings);
                self.switch_layout(LayoutId::Primary);
            }
            Key::Math => self.switch_layout(LayoutId::Math),
            Key::SettingsToggle => self.toggle_settings_panel(),
            Key::Backspace => self.surface.delete_one_code_point(),
            Key::Enter => self.surface.send_confirm_signal(),
            Key::Space => self.surface.commit_text(" "),
            Key::Variant => {
                // The eth preference bypasses the resolver; thorn comes
                // out of it.
                let text = if self.settings.use_eth_instead {
                    let glyph = if self.shift.is_shifted() { "Ð" } else { "ð" };
                    glyph.to_string()
                } else {
                    self.glyphs.resolve(code, self.shift.is_shifted())
                };
                self.commit_character(&text);
            }
            Key::Ordinary(raw) => {
                let text = self.glyphs.resolve(raw, self.shift.is_shifted());
                self.commit_character(&text);
            }
        }
    }

    fn commit_character(&mut self, text: &str) {
        self.surface.commit_text(text);
        let before = self.shift.state();
        let after = self.shift.on_character_committed();
        if after != before {
            self.layouts.rebuild_labels(after, &self.settings);
        }
    }

    fn switch_layout(&mut self, layout: LayoutId) {
        // Idempotent: switching to the active layout skips the relabel.
        if self.layouts.switch_to(layout) {
            self.layouts.rebuild_labels(self.shift.state(), &self.settings);
        }
    }

    /// Flips between the keyboard surface and the settings panel.
    ///
    /// Also reachable from the host's close button on the panel itself.
    pub fn toggle_settings_panel(&mut self) {
        self.panel = match self.panel {
            PanelView::Keyboard => PanelView::Settings,
            PanelView::Settings => PanelView::Keyboard,
        };
        tracing::debug!(panel = ?self.panel, "panel toggled");
    }

    // ========================================================================
    // Settings Mutation
    // ========================================================================

    /// Moves the variant key column to the chosen side and re-resolves
    /// the primary layout.
    pub fn set_thorn_on_right(&mut self, on_right: bool) {
        self.settings.thorn_on_right = on_right;
        self.persist_settings();
        self.layouts.reload_variant(&self.settings);
        self.layouts.rebuild_labels(self.shift.state(), &self.settings);
    }

    /// Switches the variant key between thorn and eth.
    pub fn set_use_eth_instead(&mut self, use_eth: bool) {
        self.settings.use_eth_instead = use_eth;
        self.persist_settings();
        self.layouts.reload_variant(&self.settings);
        self.layouts.rebuild_labels(self.shift.state(), &self.settings);
    }

    /// Enables or disables the keypress haptic pulse.
    pub fn set_vibrate_on_keypress(&mut self, vibrate: bool) {
        self.settings.vibrate_on_keypress = vibrate;
        self.persist_settings();
    }

    fn persist_settings(&self) {
        // The cached value stays authoritative if the save fails.
        if let Err(e) = self.store.save(&self.settings) {
            tracing::warn!(error = %e, "failed to persist settings");
        }
    }

    // ========================================================================
    // Clipboard
    // ========================================================================

    /// Handles a primary-clip change notification.
    pub fn on_clipboard_changed(&mut self, snapshot: ClipboardSnapshot) {
        self.clipboard_bar.on_clipboard_changed(snapshot);
    }

    /// Commits the previewed clip text, if any.
    pub fn paste(&self) {
        if !self.active {
            tracing::trace!("paste dropped, no active session");
            return;
        }
        self.clipboard_bar.paste(self.surface.as_ref());
    }

    /// Clears the host clipboard; the preview bar hides.
    pub fn clear_clipboard(&mut self) {
        self.clipboard_bar.clear(self.clipboard_source.as_ref());
    }

    // ========================================================================
    // Event Loop
    // ========================================================================

    /// Applies one input event.
    pub fn handle_event(&mut self, event: InputEvent) {
        match event {
            InputEvent::Press(code) => self.on_press(code),
            InputEvent::Release(code) => self.on_release(code),
            InputEvent::Key(code) => self.on_key(code),
            InputEvent::ClipboardChanged(snapshot) => self.on_clipboard_changed(snapshot),
        }
    }

    /// Drains `rx`, applying events strictly in arrival order, one at a
    /// time, to completion. Returns when the sender side closes.
    pub async fn run(&mut self, mut rx: mpsc::Receiver<InputEvent>) {
        while let Some(event) = rx.next().await {
            self.handle_event(event);
        }
        tracing::debug!("input event stream closed");
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::glyph::UnicodeGlyphs;
    use crate::input::keycode::codes;
    use crate::settings::MemoryStore;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Debug, Clone, PartialEq, Eq)]
    enum HostCall {
        Commit(String),
        Delete,
        Confirm,
    }

    #[derive(Default)]
    struct RecordingSurface {
        calls: Mutex<Vec<HostCall>>,
    }

    impl RecordingSurface {
        fn calls(&self) -> Vec<HostCall> {
            self.calls.lock().expect("surface lock").clone()
        }

        fn committed_text(&self) -> String {
            self.calls()
                .iter()
                .filter_map(|c| match c {
                    HostCall::Commit(text) => Some(text.as_str().to_string()),
                    _ => None,
                })
                .collect()
        }
    }

    impl InputSurface for RecordingSurface {
        fn commit_text(&self, text: &str) {
            self.calls
                .lock()
                .expect("surface lock")
                .push(HostCall::Commit(text.to_string()));
        }

        fn delete_one_code_point(&self) {
            self.calls.lock().expect("surface lock").push(HostCall::Delete);
        }

        fn send_confirm_signal(&self) {
            self.calls.lock().expect("surface lock").push(HostCall::Confirm);
        }
    }

    #[derive(Default)]
    struct MemoryClipboard {
        clip: Mutex<ClipboardSnapshot>,
    }

    impl ClipboardSource for MemoryClipboard {
        fn read(&self) -> ClipboardSnapshot {
            self.clip.lock().expect("clipboard lock").clone()
        }

        fn write(&self, snapshot: ClipboardSnapshot) {
            *self.clip.lock().expect("clipboard lock") = snapshot;
        }
    }

    #[derive(Default)]
    struct CountingHaptics {
        pulses: AtomicUsize,
    }

    impl Haptics for CountingHaptics {
        fn vibrate(&self, _duration: Duration) {
            self.pulses.fetch_add(1, Ordering::SeqCst);
        }
    }

    struct Fixture {
        surface: Arc<RecordingSurface>,
        clipboard: Arc<MemoryClipboard>,
        store: Arc<MemoryStore>,
        haptics: Arc<CountingHaptics>,
        session: InputSession,
    }

    fn fixture() -> Fixture {
        fixture_with_settings(Settings::default())
    }

    fn fixture_with_settings(settings: Settings) -> Fixture {
        let surface = Arc::new(RecordingSurface::default());
        let clipboard = Arc::new(MemoryClipboard::default());
        let store = Arc::new(MemoryStore::with_settings(settings));
        let haptics = Arc::new(CountingHaptics::default());
        let mut session = InputSession::new(
            surface.clone(),
            Arc::new(UnicodeGlyphs),
            clipboard.clone(),
            store.clone(),
            haptics.clone(),
        );
        session.start_input();
        Fixture {
            surface,
            clipboard,
            store,
            haptics,
            session,
        }
    }

    /// Ordinary characters commit through the resolver with the shift
    /// flag, and a one-shot shift is consumed by the commit.
    #[test]
    fn test_ordinary_commit_consumes_shift() {
        let mut f = fixture();
        let t0 = Instant::now();

        f.session.on_key_at(codes::SHIFT, t0);
        assert_eq!(f.session.shift_state(), ShiftState::Shift);

        f.session.on_key('a' as i64);
        assert_eq!(f.session.shift_state(), ShiftState::Off);

        f.session.on_key('b' as i64);
        assert_eq!(f.surface.committed_text(), "Ab");
    }

    /// Caps lock survives commits until a slow shift press clears it.
    #[test]
    fn test_caps_lock_sticky_across_commits() {
        let mut f = fixture();
        let t0 = Instant::now();

        f.session.on_key_at(codes::SHIFT, t0);
        f.session.on_key_at(codes::SHIFT, t0 + Duration::from_millis(100));
        assert_eq!(f.session.shift_state(), ShiftState::CapsLock);

        f.session.on_key('a' as i64);
        f.session.on_key('b' as i64);
        assert_eq!(f.session.shift_state(), ShiftState::CapsLock);
        assert_eq!(f.surface.committed_text(), "AB");

        f.session.on_key_at(codes::SHIFT, t0 + Duration::from_millis(2000));
        assert_eq!(f.session.shift_state(), ShiftState::Off);
    }

    /// Space, enter, and backspace map to their host calls.
    #[test]
    fn test_control_key_host_calls() {
        let mut f = fixture();

        f.session.on_key(codes::SPACE);
        f.session.on_key(codes::ENTER);
        f.session.on_key(codes::BACKSPACE);

        assert_eq!(
            f.surface.calls(),
            vec![
                HostCall::Commit(" ".to_string()),
                HostCall::Confirm,
                HostCall::Delete,
            ]
        );
    }

    /// The variant key resolves thorn by default and bypasses the
    /// resolver for eth, in both cases following the shift flag and the
    /// one-shot reset.
    #[test]
    fn test_variant_key_thorn_and_eth() {
        let mut f = fixture();
        let t0 = Instant::now();

        f.session.on_key(codes::VARIANT);
        f.session.on_key_at(codes::SHIFT, t0);
        f.session.on_key(codes::VARIANT);
        assert_eq!(f.surface.committed_text(), "þÞ");
        assert_eq!(
            f.session.shift_state(),
            ShiftState::Off,
            "variant commit consumes one-shot shift"
        );

        f.session.set_use_eth_instead(true);
        f.session.on_key(codes::VARIANT);
        f.session.on_key_at(codes::SHIFT, t0 + Duration::from_millis(2000));
        f.session.on_key(codes::VARIANT);
        assert_eq!(f.surface.committed_text(), "þÞðÐ");
    }

    /// Layout switches are pure assignments that never touch shift, and
    /// the two symbols aliases land on the same layout.
    #[test]
    fn test_layout_switching_preserves_shift() {
        let mut f = fixture();
        let t0 = Instant::now();

        f.session.on_key_at(codes::SHIFT, t0);
        let shifted = f.session.shift_state();

        f.session.on_key(codes::SYMBOLS);
        assert_eq!(f.session.active_layout(), LayoutId::Symbols);
        f.session.on_key(codes::SYMBOLS_ALT);
        assert_eq!(f.session.active_layout(), LayoutId::Symbols);
        f.session.on_key(codes::MATH);
        assert_eq!(f.session.active_layout(), LayoutId::Math);
        f.session.on_key(codes::PRIMARY);
        assert_eq!(f.session.active_layout(), LayoutId::Primary);

        assert_eq!(f.session.shift_state(), shifted);
        assert!(f.surface.calls().is_empty(), "switching makes no host calls");
    }

    /// Returning to the primary layout picks up preference changes made
    /// while another layout was active.
    #[test]
    fn test_primary_switch_reresolves_variant() {
        let mut f = fixture();

        f.session.on_key(codes::SYMBOLS);
        f.session.set_thorn_on_right(true);
        f.session.on_key(codes::PRIMARY);

        assert_eq!(f.session.primary_variant(), PrimaryVariant::ThornRight);
    }

    /// The settings toggle flips between exactly two panels.
    #[test]
    fn test_settings_panel_toggle() {
        let mut f = fixture();
        assert_eq!(f.session.panel(), PanelView::Keyboard);

        f.session.on_key(codes::SETTINGS_TOGGLE);
        assert_eq!(f.session.panel(), PanelView::Settings);

        f.session.on_key(codes::SETTINGS_TOGGLE);
        assert_eq!(f.session.panel(), PanelView::Keyboard);
    }

    /// Settings mutations persist through the store and re-derive
    /// dependent state.
    #[test]
    fn test_settings_mutation_persists_and_rederives() {
        let mut f = fixture();

        f.session.set_use_eth_instead(true);
        assert_eq!(f.session.primary_variant(), PrimaryVariant::EthLeft);
        assert_eq!(
            f.session.labels().for_layout(LayoutId::Primary).variant_label,
            "ð"
        );
        assert!(f.store.load().expect("store load").use_eth_instead);

        f.session.set_thorn_on_right(true);
        assert_eq!(f.session.primary_variant(), PrimaryVariant::EthRight);
        let stored = f.store.load().expect("store load");
        assert!(stored.thorn_on_right);
        assert!(stored.use_eth_instead, "side toggle leaves glyph choice alone");
    }

    /// The vibrate decision re-reads the preference on every press.
    #[test]
    fn test_vibrate_decision() {
        let mut f = fixture();

        f.session.on_press('a' as i64);
        assert_eq!(f.haptics.pulses.load(Ordering::SeqCst), 1);

        f.session.set_vibrate_on_keypress(false);
        f.session.on_press('a' as i64);
        assert_eq!(f.haptics.pulses.load(Ordering::SeqCst), 1);
    }

    /// Without an active session every dispatch is a silent no-op.
    #[test]
    fn test_inactive_session_is_noop() {
        let mut f = fixture();
        f.session.finish_input();

        f.session.on_key('a' as i64);
        f.session.on_key(codes::SPACE);
        f.session.on_press('a' as i64);
        f.session.paste();

        assert!(f.surface.calls().is_empty());
        assert_eq!(f.haptics.pulses.load(Ordering::SeqCst), 0);
    }

    /// Starting a session resets shift to off.
    #[test]
    fn test_start_input_resets_shift() {
        let mut f = fixture();
        f.session.on_key_at(codes::SHIFT, Instant::now());
        assert_eq!(f.session.shift_state(), ShiftState::Shift);

        f.session.finish_input();
        f.session.start_input();
        assert_eq!(f.session.shift_state(), ShiftState::Off);
    }

    /// A backspace release without a press is a safe no-op.
    #[test]
    fn test_unmatched_backspace_release() {
        let mut f = fixture();
        f.session.on_release(codes::BACKSPACE);
        f.session.on_release(codes::BACKSPACE);
        assert!(f.surface.calls().is_empty());
    }

    /// Press arms the repeat scheduler and release disarms it; the held
    /// window produces the immediate delete plus the scheduled repeats.
    #[tokio::test(start_paused = true)]
    async fn test_backspace_hold_repeats() {
        use crate::app_settings::{DELETE_REPEAT_DELAY_MS, DELETE_REPEAT_INTERVAL_MS};

        let mut f = fixture();

        f.session.on_press(codes::BACKSPACE);
        f.session.on_key(codes::BACKSPACE);

        let held = DELETE_REPEAT_DELAY_MS + 2 * DELETE_REPEAT_INTERVAL_MS + 10;
        tokio::time::sleep(Duration::from_millis(held)).await;
        f.session.on_release(codes::BACKSPACE);

        let deletes = f
            .surface
            .calls()
            .iter()
            .filter(|c| **c == HostCall::Delete)
            .count();
        assert_eq!(deletes, 4, "one immediate delete plus three repeats");

        tokio::time::sleep(Duration::from_millis(2000)).await;
        let after = f
            .surface
            .calls()
            .iter()
            .filter(|c| **c == HostCall::Delete)
            .count();
        assert_eq!(after, 4, "nothing fires after release");
    }

    /// Clipboard notifications drive visibility; paste and clear work
    /// through the session.
    #[test]
    fn test_clipboard_flow() {
        let mut f = fixture();
        assert_eq!(f.session.clipboard_visibility(), BarVisibility::Hidden);

        f.session
            .on_clipboard_changed(ClipboardSnapshot::new("hello"));
        assert_eq!(f.session.clipboard_visibility(), BarVisibility::Visible);
        assert_eq!(f.session.clipboard_preview(), Some("hello"));

        f.session.paste();
        assert_eq!(f.surface.committed_text(), "hello");

        f.session.clear_clipboard();
        assert_eq!(f.session.clipboard_visibility(), BarVisibility::Hidden);
        assert_eq!(f.clipboard.read().text(), Some(""));
    }

    /// Session start picks up a clip that existed before the session.
    #[test]
    fn test_session_start_reads_clipboard() {
        let surface = Arc::new(RecordingSurface::default());
        let clipboard = Arc::new(MemoryClipboard::default());
        clipboard.write(ClipboardSnapshot::new("earlier"));

        let mut session = InputSession::new(
            surface,
            Arc::new(UnicodeGlyphs),
            clipboard,
            Arc::new(MemoryStore::new()),
            Arc::new(CountingHaptics::default()),
        );
        session.start_input();
        assert_eq!(session.clipboard_visibility(), BarVisibility::Visible);
        assert_eq!(session.clipboard_preview(), Some("earlier"));
    }
}
