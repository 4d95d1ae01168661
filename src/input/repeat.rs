// SPDX-License-Identifier: GPL-3.0-only

//! Hold-to-repeat backspace scheduling.
//!
//! Holding backspace deletes continuously: the first automatic delete
//! fires after an initial delay, then one more per interval until the
//! key is released. Arming spawns a cancellable timer task against the
//! host surface; disarming is idempotent and guarantees that no delete
//! lands afterwards, even if a tick was already in flight: the task
//! rechecks the armed flag immediately before every delete and before
//! rescheduling, and disarm additionally aborts the task at its next
//! await point.
//!
//! Timing constants live in [`crate::app_settings`]: 400 ms before the
//! first repeat, 50 ms between repeats.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use tokio::task::JoinHandle;

use crate::app_settings::{DELETE_REPEAT_DELAY_MS, DELETE_REPEAT_INTERVAL_MS};
use crate::host::InputSurface;

/// Cancellable repeat-delete session, armed while backspace is held.
#[derive(Debug, Default)]
pub struct RepeatDelete {
    armed: Arc<AtomicBool>,
    task: Option<JoinHandle<()>>,
}

impl RepeatDelete {
    /// Creates a disarmed scheduler.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// `true` while a backspace press is being held.
    #[must_use]
    pub fn is_armed(&self) -> bool {
        self.armed.load(Ordering::SeqCst)
    }

    /// Arms the scheduler against `surface`.
    ///
    /// Must be called from within a tokio runtime. A second arm without
    /// an intervening release replaces the previous task.
    pub fn arm(&mut self, surface: Arc<dyn InputSurface>) {
        self.disarm();
        self.armed.store(true, Ordering::SeqCst);
        let armed = Arc::clone(&self.armed);
        tracing::debug!("repeat delete armed");
        self.task = Some(tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(DELETE_REPEAT_DELAY_MS)).await;
            loop {
                // Recheck on every tick: a release may have landed while
                // this tick was already queued.
                if !armed.load(Ordering::SeqCst) {
                    break;
                }
                surface.delete_one_code_point();
                tokio::time::sleep(Duration::from_millis(DELETE_REPEAT_INTERVAL_MS)).await;
            }
        }));
    }

    /// Disarms the scheduler.
    ///
    /// Safe to call at any time, including when never armed or already
    /// disarmed; unmatched releases are expected input.
    pub fn disarm(&mut self) {
        let was_armed = self.armed.swap(false, Ordering::SeqCst);
        if let Some(task) = self.task.take() {
            task.abort();
        }
        if was_armed {
            tracing::debug!("repeat delete disarmed");
        }
    }
}

impl Drop for RepeatDelete {
    fn drop(&mut self) {
        self.disarm();
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
