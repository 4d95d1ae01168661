// SPDX-License-Identifier: GPL-3.0-only

//! Clipboard preview bar state.
//!
//! The host notifies the controller whenever the primary clip changes;
//! the bar derives a binary visibility from the snapshot (visible iff
//! the clip holds text that is more than whitespace) and offers paste
//! and clear actions. Visibility is re-evaluated on every notification
//! and once at session start.

use crate::host::InputSurface;

/// Snapshot of the host clipboard's primary clip.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClipboardSnapshot {
    text: Option<String>,
}

impl ClipboardSnapshot {
    /// Snapshot holding `text` as the primary clip.
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
        }
    }

    /// Snapshot with no primary clip at all.
    #[must_use]
    pub fn absent() -> Self {
        Self { text: None }
    }

    /// The clip text, if any.
    #[must_use]
    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    /// `true` when the clip holds text that is more than whitespace.
    #[must_use]
    pub fn has_content(&self) -> bool {
        self.text.as_deref().is_some_and(|t| !t.trim().is_empty())
    }
}

/// Host clipboard contract.
///
/// The controller only reads the current clip and replaces it wholesale;
/// change notifications arrive as [`ClipboardSnapshot`] values through
/// the event stream.
pub trait ClipboardSource: Send + Sync {
    /// Reads the current primary clip.
    fn read(&self) -> ClipboardSnapshot;

    /// Replaces the primary clip.
    fn write(&self, snapshot: ClipboardSnapshot);
}

/// Visibility of the clipboard preview bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BarVisibility {
    /// The bar shows the clip preview.
    Visible,
    /// The bar is hidden.
    Hidden,
}

/// Derives the preview bar's visibility and content from clip snapshots.
#[derive(Debug, Clone, Default)]
pub struct ClipboardBar {
    snapshot: ClipboardSnapshot,
}

impl ClipboardBar {
    /// Creates a bar with no clip tracked; hidden until a snapshot with
    /// content arrives.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the tracked snapshot. Called on every primary-clip
    /// change notification and once at session start.
    pub fn on_clipboard_changed(&mut self, snapshot: ClipboardSnapshot) {
        self.snapshot = snapshot;
        tracing::debug!(visibility = ?self.visibility(), "clipboard bar updated");
    }

    /// Re-reads the current clip from `source`.
    pub fn refresh(&mut self, source: &dyn ClipboardSource) {
        self.on_clipboard_changed(source.read());
    }

    /// Current visibility, derived from the tracked snapshot.
    #[must_use]
    pub fn visibility(&self) -> BarVisibility {
        if self.snapshot.has_content() {
            BarVisibility::Visible
        } else {
            BarVisibility::Hidden
        }
    }

    /// The preview text shown while visible.
    #[must_use]
    pub fn preview(&self) -> Option<&str> {
        if self.snapshot.has_content() {
            self.snapshot.text()
        } else {
            None
        }
    }

    /// Commits the current clip text verbatim. An absent clip commits
    /// nothing.
    pub fn paste(&self, surface: &dyn InputSurface) {
        if let Some(text) = self.snapshot.text() {
            surface.commit_text(text);
        }
    }

    /// Replaces the host clipboard with an empty plain-text clip and
    /// re-evaluates visibility, which becomes hidden.
    pub fn clear(&mut self, source: &dyn ClipboardSource) {
        source.write(ClipboardSnapshot::new(""));
        self.refresh(source);
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

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
    struct RecordingSurface {
        committed: Mutex<Vec<String>>,
    }

    impl InputSurface for RecordingSurface {
        fn commit_text(&self, text: &str) {
            self.committed.lock().expect("surface lock").push(text.to_string());
        }

        fn delete_one_code_point(&self) {}

        fn send_confirm_signal(&self) {}
    }

    /// Hidden for empty, whitespace-only, and absent clips; visible for
    /// real text.
    #[test]
    fn test_visibility_rules() {
        let mut bar = ClipboardBar::new();
        assert_eq!(bar.visibility(), BarVisibility::Hidden);

        bar.on_clipboard_changed(ClipboardSnapshot::new(""));
        assert_eq!(bar.visibility(), BarVisibility::Hidden);

        bar.on_clipboard_changed(ClipboardSnapshot::new("   \t\n"));
        assert_eq!(bar.visibility(), BarVisibility::Hidden);

        bar.on_clipboard_changed(ClipboardSnapshot::absent());
        assert_eq!(bar.visibility(), BarVisibility::Hidden);

        bar.on_clipboard_changed(ClipboardSnapshot::new("hello"));
        assert_eq!(bar.visibility(), BarVisibility::Visible);
        assert_eq!(bar.preview(), Some("hello"));
    }

    /// Paste forwards the clip text verbatim, including surrounding
    /// whitespace.
    #[test]
    fn test_paste_commits_verbatim() {
        let surface = RecordingSurface::default();
        let mut bar = ClipboardBar::new();

        bar.on_clipboard_changed(ClipboardSnapshot::new("  copied text "));
        bar.paste(&surface);

        let committed = surface.committed.lock().expect("surface lock");
        assert_eq!(committed.as_slice(), ["  copied text "]);
    }

    /// Paste with an absent clip commits nothing.
    #[test]
    fn test_paste_absent_clip_commits_nothing() {
        let surface = RecordingSurface::default();
        let bar = ClipboardBar::new();

        bar.paste(&surface);
        assert!(surface.committed.lock().expect("surface lock").is_empty());
    }

    /// Clear writes an empty clip to the host and hides the bar.
    #[test]
    fn test_clear_hides_bar() {
        let source = MemoryClipboard::default();
        source.write(ClipboardSnapshot::new("something"));

        let mut bar = ClipboardBar::new();
        bar.refresh(&source);
        assert_eq!(bar.visibility(), BarVisibility::Visible);

        bar.clear(&source);
        assert_eq!(bar.visibility(), BarVisibility::Hidden);
        assert_eq!(source.read().text(), Some(""));
    }

    /// Refresh picks up the source's current clip at session start.
    #[test]
    fn test_refresh_reads_source() {
        let source = MemoryClipboard::default();
        source.write(ClipboardSnapshot::new("preexisting"));

        let mut bar = ClipboardBar::new();
        bar.refresh(&source);
        assert_eq!(bar.preview(), Some("preexisting"));
    }
}
