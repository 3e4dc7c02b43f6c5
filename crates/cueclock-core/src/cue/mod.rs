mod catalog;
mod matcher;
mod schedule;

pub use catalog::{builtin_catalog, CueDefinition};
pub use matcher::CueMatcher;
pub use schedule::{trigger_offset, Schedule, BLACKOUT_CUE, GAMEOVER_CUE};
