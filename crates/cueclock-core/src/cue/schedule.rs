//! Schedule derivation.
//!
//! A schedule maps cue ids to the exact number of seconds remaining at which
//! they fire. It is derived once per run from the selection snapshot taken at
//! start time; mutating the selection afterwards has no effect on the active
//! run.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

/// Fires when one minute remains.
pub const BLACKOUT_CUE: &str = "blackout";
/// Fires when five seconds remain.
pub const GAMEOVER_CUE: &str = "gameover";

const BLACKOUT_TRIGGER_SECS: u32 = 60;
const GAMEOVER_TRIGGER_SECS: u32 = 5;

/// Resolve a cue id to its trigger offset in seconds remaining.
///
/// Recognized forms, in priority order:
/// 1. `blackout` -> 60
/// 2. `gameover` -> 5
/// 3. `<N>min` for a non-negative integer N -> N * 60
///
/// Returns `None` for anything else. Unknown ids are a silent-skip policy,
/// not an error: they simply never appear in a schedule.
pub fn trigger_offset(cue_id: &str) -> Option<u32> {
    match cue_id {
        BLACKOUT_CUE => Some(BLACKOUT_TRIGGER_SECS),
        GAMEOVER_CUE => Some(GAMEOVER_TRIGGER_SECS),
        _ => cue_id
            .strip_suffix("min")
            .and_then(|minutes| minutes.parse::<u32>().ok())
            .map(|minutes| minutes.saturating_mul(60)),
    }
}

/// The resolved cue -> trigger-offset mapping for one run.
///
/// Immutable once built; discarded when the run ends.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schedule {
    entries: BTreeMap<String, u32>,
}

impl Schedule {
    /// Derive a schedule from a cue selection and the run duration.
    ///
    /// Pure and deterministic: identical inputs always yield an identical
    /// schedule, independent of prior runs. Cues whose trigger offset exceeds
    /// `total_seconds` (e.g. `blackout` in a 30-second run) are kept in the
    /// schedule but can never match -- remaining time starts below their
    /// offset. They are reported at debug level rather than dropped.
    pub fn build(selection: &BTreeSet<String>, total_seconds: u32) -> Self {
        let mut entries = BTreeMap::new();
        for cue_id in selection {
            let Some(trigger_at) = trigger_offset(cue_id) else {
                log::debug!("ignoring unknown cue id '{cue_id}'");
                continue;
            };
            if trigger_at > total_seconds {
                log::debug!(
                    "cue '{cue_id}' triggers at {trigger_at}s remaining, \
                     unreachable in a {total_seconds}s run"
                );
            }
            entries.insert(cue_id.clone(), trigger_at);
        }
        Self { entries }
    }

    /// Trigger offset for a scheduled cue, if present.
    pub fn trigger_at(&self, cue_id: &str) -> Option<u32> {
        self.entries.get(cue_id).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u32)> {
        self.entries.iter().map(|(id, at)| (id.as_str(), *at))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn selection(ids: &[&str]) -> BTreeSet<String> {
        ids.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn blackout_triggers_at_one_minute() {
        assert_eq!(trigger_offset("blackout"), Some(60));
    }

    #[test]
    fn gameover_triggers_at_five_seconds() {
        assert_eq!(trigger_offset("gameover"), Some(5));
    }

    #[test]
    fn minute_pattern_resolves() {
        assert_eq!(trigger_offset("5min"), Some(300));
        assert_eq!(trigger_offset("45min"), Some(2700));
        assert_eq!(trigger_offset("0min"), Some(0));
    }

    #[test]
    fn unknown_ids_resolve_to_none() {
        assert_eq!(trigger_offset("min"), None);
        assert_eq!(trigger_offset("-5min"), None);
        assert_eq!(trigger_offset("fivemin"), None);
        assert_eq!(trigger_offset("blackout2"), None);
        assert_eq!(trigger_offset(""), None);
    }

    #[test]
    fn build_includes_known_cues_only() {
        let schedule = Schedule::build(&selection(&["5min", "gameover", "bogus"]), 3600);
        assert_eq!(schedule.len(), 2);
        assert_eq!(schedule.trigger_at("5min"), Some(300));
        assert_eq!(schedule.trigger_at("gameover"), Some(5));
        assert_eq!(schedule.trigger_at("bogus"), None);
    }

    #[test]
    fn unreachable_blackout_is_kept_not_dropped() {
        // In a 30-second run the blackout offset can never be reached, but
        // the entry stays in the schedule.
        let schedule = Schedule::build(&selection(&["blackout"]), 30);
        assert_eq!(schedule.trigger_at("blackout"), Some(60));
    }

    #[test]
    fn build_is_pure() {
        let sel = selection(&["blackout", "10min", "gameover"]);
        let first = Schedule::build(&sel, 3600);
        let second = Schedule::build(&sel, 3600);
        assert_eq!(first, second);
    }

    #[test]
    fn empty_selection_builds_empty_schedule() {
        let schedule = Schedule::build(&BTreeSet::new(), 3600);
        assert!(schedule.is_empty());
    }
}
