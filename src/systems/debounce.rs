use std::time::{Duration, Instant};

use log::debug;
use serde::{Deserialize, Serialize};

use super::classifier::GestureLabel;

/// Silence window after an emitted event; the same or a different gesture
/// can only fire again once this has elapsed
pub const COOLDOWN_DURATION: Duration = Duration::from_millis(3000);

/// A single discrete gesture, debounced out of the raw per-frame label
/// stream. The label is always Positive or Negative, never None.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct GestureEvent {
    pub label: GestureLabel,
}

/// Converts the noisy per-frame classification stream into discrete events:
/// a held pose emits exactly once, then nothing fires until the cooldown
/// elapses. The cooldown is wall-clock, evaluated lazily on each tick, so
/// there is no timer thread to cancel at teardown.
pub struct GestureDebouncer {
    last_emitted: Option<GestureLabel>,
    cooldown_started: Option<Instant>,
}

impl GestureDebouncer {
    pub fn new() -> GestureDebouncer {
        GestureDebouncer {
            last_emitted: None,
            cooldown_started: None,
        }
    }

    /// Feed one frame's label; returns an event for at most one tick per
    /// cooldown window. Callers supply `now` so that cooldown timing stays
    /// independent of frame-processing throughput.
    pub fn tick(&mut self, label: GestureLabel, now: Instant) -> Option<GestureEvent> {
        if let Some(started) = self.cooldown_started {
            if now.duration_since(started) < COOLDOWN_DURATION {
                return None;
            }
            // Expiry is the single point where the repeat guard clears too
            debug!("Gesture cooldown expired");
            self.cooldown_started = None;
            self.last_emitted = None;
        }

        if label == GestureLabel::None {
            return None;
        }
        if self.last_emitted == Some(label) {
            return None;
        }

        self.last_emitted = Some(label);
        self.cooldown_started = Some(now);
        Some(GestureEvent { label })
    }

    pub fn is_cooling_down(&self, now: Instant) -> bool {
        match self.cooldown_started {
            Some(started) => now.duration_since(started) < COOLDOWN_DURATION,
            None => false,
        }
    }

    /// Session teardown: stop the pending cooldown without firing anything
    pub fn reset(&mut self) {
        self.cooldown_started = None;
        self.last_emitted = None;
    }
}

impl Default for GestureDebouncer {
    fn default() -> Self {
        GestureDebouncer::new()
    }
}
