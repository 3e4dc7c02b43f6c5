//! Tick-by-tick cue matching.
//!
//! The matcher owns the fired set for one run. Matching is exact: a cue
//! fires only at the tick where the remaining time equals its trigger
//! offset. If a foreign tick source ever skips a value of remaining time,
//! cues inside the skipped range never fire; there is no retroactive
//! catch-up. The bundled [`Clock`](crate::clock::Clock) delivers every tick
//! in order, so a skip cannot occur under it.

use std::collections::BTreeSet;

use super::Schedule;

/// Fires each scheduled cue at most once per run.
#[derive(Debug, Clone, Default)]
pub struct CueMatcher {
    fired: BTreeSet<String>,
}

impl CueMatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Match the current remaining time against the schedule.
    ///
    /// Returns the cues that fire on this tick, in no particular relative
    /// order; the caller must process all of them before accepting the next
    /// tick. Each returned cue is recorded so it can never fire again this
    /// run.
    pub fn on_tick(&mut self, time_remaining: u32, schedule: &Schedule) -> Vec<String> {
        let mut newly_fired = Vec::new();
        for (cue_id, trigger_at) in schedule.iter() {
            if time_remaining == trigger_at && !self.fired.contains(cue_id) {
                self.fired.insert(cue_id.to_string());
                newly_fired.push(cue_id.to_string());
            }
        }
        newly_fired
    }

    /// The cues that have fired so far this run.
    pub fn fired(&self) -> &BTreeSet<String> {
        &self.fired
    }

    pub fn has_fired(&self, cue_id: &str) -> bool {
        self.fired.contains(cue_id)
    }
}
