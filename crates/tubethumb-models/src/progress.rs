//! Cosmetic lookup progress.
//!
//! Progress is a pure function of elapsed time: it climbs linearly towards
//! [`ProgressTracker::IN_FLIGHT_CAP`] over the expected duration, holds there
//! until the lookup settles, then jumps to 100.

use std::time::{Duration, Instant};

/// Phase of the progress state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookupPhase {
    Idle,
    InFlight { started_at: Instant },
    Settled,
}

/// Tracks progress for at most one lookup at a time.
#[derive(Debug, Clone)]
pub struct ProgressTracker {
    phase: LookupPhase,
    expected: Duration,
}

impl ProgressTracker {
    /// Highest value reported before the lookup settles.
    pub const IN_FLIGHT_CAP: f32 = 90.0;

    pub fn new(expected: Duration) -> Self {
        Self {
            phase: LookupPhase::Idle,
            expected,
        }
    }

    pub fn phase(&self) -> LookupPhase {
        self.phase
    }

    /// Begin tracking a lookup. Any previous lookup is forgotten.
    pub fn start(&mut self, now: Instant) {
        self.phase = LookupPhase::InFlight { started_at: now };
    }

    pub fn settle(&mut self) {
        self.phase = LookupPhase::Settled;
    }

    pub fn reset(&mut self) {
        self.phase = LookupPhase::Idle;
    }

    /// Progress percentage (0-100) at `now`.
    pub fn progress_at(&self, now: Instant) -> f32 {
        match self.phase {
            LookupPhase::Idle => 0.0,
            LookupPhase::Settled => 100.0,
            LookupPhase::InFlight { started_at } => {
                if self.expected.is_zero() {
                    return Self::IN_FLIGHT_CAP;
                }
                let elapsed = now.saturating_duration_since(started_at);
                let fraction = elapsed.as_secs_f32() / self.expected.as_secs_f32();
                (fraction * Self::IN_FLIGHT_CAP).min(Self::IN_FLIGHT_CAP)
            }
        }
    }
}
