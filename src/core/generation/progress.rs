//! Cosmetic progress indication for in-flight submissions.
//!
//! The service gives no progress signal, so the UI shows a monotonically
//! increasing simulated percentage while the call is in flight. The
//! animation is deliberately decoupled from real completion: a background
//! ticker nudges the percentage toward (but never past) a ceiling below
//! 100, and whichever terminal outcome the submission reaches snaps the
//! value to 100.

use std::sync::Arc;

use parking_lot::Mutex;
use tokio::task::JoinHandle;
use tracing::trace;

// =============================================================================
// Constants
// =============================================================================

/// Highest value the simulation may show before the call resolves.
const SIMULATED_CEILING: u8 = 99;

/// Divisor controlling how quickly increments decay as the bar fills.
const DECAY_DIVISOR: u8 = 10;

// =============================================================================
// ProgressHandle
// =============================================================================

#[derive(Debug, Default)]
struct ProgressState {
    percent: u8,
    finished: bool,
}

/// Shared handle on the simulated progress value.
///
/// Cloned freely; the UI reads `percent()` on its own cadence while the
/// ticker task advances the shared state.
#[derive(Debug, Clone, Default)]
pub struct ProgressHandle {
    state: Arc<Mutex<ProgressState>>,
}

impl ProgressHandle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current displayed percentage (0-100).
    pub fn percent(&self) -> u8 {
        self.state.lock().percent
    }

    /// Whether the submission has resolved.
    pub fn is_finished(&self) -> bool {
        self.state.lock().finished
    }

    /// One simulation step: increments decay as the bar approaches the
    /// ceiling so the display slows down instead of stalling at a wall.
    /// No-op once finished.
    pub fn tick(&self) {
        let mut state = self.state.lock();
        if state.finished || state.percent >= SIMULATED_CEILING {
            return;
        }
        let remaining = SIMULATED_CEILING - state.percent;
        let step = (remaining / DECAY_DIVISOR).max(1);
        state.percent += step;
        trace!(percent = state.percent, "simulated progress tick");
    }

    /// Snaps the display to 100. Called on either terminal outcome -
    /// success and failure both end the animation.
    pub fn finish(&self) {
        let mut state = self.state.lock();
        state.percent = 100;
        state.finished = true;
    }
}

/// Spawns the ticker task driving a handle until `finish()` is called.
///
/// The task is purely cosmetic; dropping or aborting it never affects the
/// real submission future.
pub fn spawn_simulated_progress(
    handle: ProgressHandle,
    tick: std::time::Duration,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(tick);
        // The first tick of a tokio interval fires immediately; skip it so
        // the bar starts at zero.
        interval.tick().await;
        loop {
            interval.tick().await;
            if handle.is_finished() {
                break;
            }
            handle.tick();
        }
    })
}

// =============================================================================
// Tests
// =============================================================================
