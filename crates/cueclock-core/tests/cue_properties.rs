//! Property tests for schedule derivation and cue firing.

use std::collections::{BTreeSet, HashMap};

use cueclock_core::{trigger_offset, CueMatcher, Schedule};
use proptest::prelude::*;

fn cue_id_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("blackout".to_string()),
        Just("gameover".to_string()),
        (0u32..120).prop_map(|n| format!("{n}min")),
        // Junk ids exercise the silent-skip policy.
        "[a-z]{1,8}",
    ]
}

fn selection_strategy() -> impl Strategy<Value = BTreeSet<String>> {
    proptest::collection::btree_set(cue_id_strategy(), 0..6)
}

proptest! {
    #[test]
    fn schedule_derivation_is_pure(
        selection in selection_strategy(),
        total in 1u32..5000,
    ) {
        prop_assert_eq!(
            Schedule::build(&selection, total),
            Schedule::build(&selection, total)
        );
    }

    #[test]
    fn scheduled_entries_come_from_the_selection(
        selection in selection_strategy(),
        total in 1u32..5000,
    ) {
        let schedule = Schedule::build(&selection, total);
        for (id, trigger_at) in schedule.iter() {
            prop_assert!(selection.contains(id));
            prop_assert_eq!(trigger_offset(id), Some(trigger_at));
        }
    }

    #[test]
    fn each_cue_fires_at_most_once_per_run(
        selection in selection_strategy(),
        total in 1u32..2000,
    ) {
        let schedule = Schedule::build(&selection, total);
        let mut matcher = CueMatcher::new();
        let mut fire_counts: HashMap<String, u32> = HashMap::new();

        // A run ticks through total-1, total-2, .., 0.
        for remaining in (0..total).rev() {
            for cue_id in matcher.on_tick(remaining, &schedule) {
                *fire_counts.entry(cue_id).or_insert(0) += 1;
            }
        }

        for (id, trigger_at) in schedule.iter() {
            // Fires exactly once when the offset is ticked through, never
            // when it lies at or beyond the starting value.
            let expected = u32::from(trigger_at < total);
            prop_assert_eq!(fire_counts.get(id).copied().unwrap_or(0), expected);
        }
        for id in fire_counts.keys() {
            prop_assert!(schedule.trigger_at(id).is_some());
        }
    }
}
