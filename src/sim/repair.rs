//! Timed repair: heal the damage out, then wipe the state

use serde::{Deserialize, Serialize};

use crate::consts::{REPAIR_DURATION_MS, REPAIR_HOLD_MS};

/// Healing interpolation driven by frame timestamps
///
/// Healing rises linearly to 1, the caller wipes the damage, then the
/// healed value is held briefly before dropping back to 0.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RepairController {
    /// Start of the running fade (ms), if any
    start: Option<f64>,
    /// End of the post-wipe hold (ms), if any
    hold_until: Option<f64>,
    duration: f64,
}

impl Default for RepairController {
    fn default() -> Self {
        Self::new(REPAIR_DURATION_MS)
    }
}

impl RepairController {
    pub fn new(duration: f64) -> Self {
        Self {
            start: None,
            hold_until: None,
            duration: duration.max(1.0),
        }
    }

    /// Begin healing from `now`. Restarts a repair already in progress.
    pub fn begin(&mut self, now: f64) {
        self.start = Some(now);
        self.hold_until = None;
    }

    /// Fading or holding
    pub fn in_progress(&self) -> bool {
        self.start.is_some() || self.hold_until.is_some()
    }

    /// Healing fraction at `now` without advancing anything
    pub fn progress(&self, now: f64) -> f32 {
        match (self.start, self.hold_until) {
            (Some(start), _) => ((now - start) / self.duration).clamp(0.0, 1.0) as f32,
            (None, Some(_)) => 1.0,
            (None, None) => 0.0,
        }
    }

    /// Advance to `now`. Returns the healing value and whether the damage
    /// should be wiped on this tick.
    pub fn advance(&mut self, now: f64) -> (f32, bool) {
        if let Some(until) = self.hold_until {
            if now >= until {
                self.hold_until = None;
                return (0.0, false);
            }
            return (1.0, false);
        }
        if self.start.is_none() {
            return (0.0, false);
        }
        let k = self.progress(now);
        if k >= 1.0 {
            self.start = None;
            self.hold_until = Some(now + REPAIR_HOLD_MS);
            (1.0, true)
        } else {
            (k, false)
        }
    }
}
