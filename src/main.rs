// SPDX-License-Identifier: GPL-3.0-only

//! Thornboard demo driver
//!
//! Runs an input session against stdin so the controller can be
//! exercised without a host keyboard view. Host calls print to stdout.
//!
//! Commands, one per line:
//!
//! - `key <code>`: dispatch a tapped key code (e.g. `key -1` for shift)
//! - `press <code>` / `release <code>`: raw press and release events
//! - `type <text>`: dispatch each character of `text` as an ordinary key
//! - `clip <text>`: deliver a clipboard-change notification
//! - `paste` / `clear`: clipboard bar actions
//! - `state`: print the controller state
//! - `quit`: end the session

use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::io::{AsyncBufReadExt, BufReader};

use thornboard::InputSession;
use thornboard::app_settings;
use thornboard::clipboard::{ClipboardSnapshot, ClipboardSource};
use thornboard::host::{Haptics, InputSurface};
use thornboard::input::codes;
use thornboard::input::glyph::UnicodeGlyphs;
use thornboard::settings::JsonSettingsStore;

/// Surface that prints every host call.
struct StdoutSurface;

impl InputSurface for StdoutSurface {
    fn commit_text(&self, text: &str) {
        println!("» commit {text:?}");
    }

    fn delete_one_code_point(&self) {
        println!("» delete one code point");
    }

    fn send_confirm_signal(&self) {
        println!("» confirm");
    }
}

/// Process-local stand-in for the platform clipboard.
#[derive(Default)]
struct LocalClipboard {
    clip: Mutex<ClipboardSnapshot>,
}

impl ClipboardSource for LocalClipboard {
    fn read(&self) -> ClipboardSnapshot {
        self.clip.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    fn write(&self, snapshot: ClipboardSnapshot) {
        *self.clip.lock().unwrap_or_else(|e| e.into_inner()) = snapshot;
    }
}

/// Haptics sink that prints instead of vibrating.
struct StdoutHaptics;

impl Haptics for StdoutHaptics {
    fn vibrate(&self, duration: Duration) {
        tracing::debug!(?duration, "vibrate");
    }
}

fn print_state(session: &InputSession) {
    let labels = session.labels().for_layout(session.active_layout());
    println!(
        "shift: {:?} | layout: {:?} ({:?}) | panel: {:?} | variant key: {} | clipboard: {:?}",
        session.shift_state(),
        session.active_layout(),
        session.primary_variant(),
        session.panel(),
        labels.variant_label,
        session.clipboard_visibility(),
    );
}

fn dispatch_line(session: &mut InputSession, line: &str) -> bool {
    let line = line.trim();
    let (command, rest) = match line.split_once(' ') {
        Some((command, rest)) => (command, rest),
        None => (line, ""),
    };
    match command {
        "" => {}
        "key" => match rest.parse::<i64>() {
            Ok(code) => session.on_key(code),
            Err(_) => eprintln!("key wants an integer code, got {rest:?}"),
        },
        "press" => match rest.parse::<i64>() {
            Ok(code) => session.on_press(code),
            Err(_) => eprintln!("press wants an integer code, got {rest:?}"),
        },
        "release" => match rest.parse::<i64>() {
            Ok(code) => session.on_release(code),
            Err(_) => eprintln!("release wants an integer code, got {rest:?}"),
        },
        "type" => {
            for c in rest.chars() {
                session.on_key(c as i64);
            }
        }
        "clip" => session.on_clipboard_changed(ClipboardSnapshot::new(rest)),
        "paste" => session.paste(),
        "clear" => session.clear_clipboard(),
        "state" => print_state(session),
        "quit" => return false,
        other => eprintln!("unknown command {other:?}"),
    }
    true
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> std::io::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("thornboard=info".parse().unwrap()),
        )
        .init();

    tracing::info!("starting {}", app_settings::APP_ID);

    let store = JsonSettingsStore::new("thornboard-settings.json");
    let mut session = InputSession::new(
        Arc::new(StdoutSurface),
        Arc::new(UnicodeGlyphs),
        Arc::new(LocalClipboard::default()),
        Arc::new(store),
        Arc::new(StdoutHaptics),
    );
    session.start_input();

    println!("thornboard demo session (key/press/release/type/clip/paste/clear/state/quit)");
    println!(
        "control codes: shift={} symbols={} primary={} math={} settings={} backspace={} enter={} space={} variant={}",
        codes::SHIFT,
        codes::SYMBOLS,
        codes::PRIMARY,
        codes::MATH,
        codes::SETTINGS_TOGGLE,
        codes::BACKSPACE,
        codes::ENTER,
        codes::SPACE,
        codes::VARIANT,
    );
    print_state(&session);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        if !dispatch_line(&mut session, &line) {
            break;
        }
    }

    session.finish_input();
    Ok(())
}
