use std::collections::BTreeSet;

use clap::Subcommand;
use cueclock_core::{Config, Schedule};

#[derive(Subcommand)]
pub enum ScheduleAction {
    /// Print the schedule a run would derive, as JSON
    Preview {
        /// Countdown length in minutes (defaults to run.default_minutes)
        #[arg(long)]
        minutes: Option<u32>,
        /// Cue to include; repeat for more (defaults to cues.default_selection)
        #[arg(long = "cue")]
        cues: Vec<String>,
    },
}

pub fn run(action: ScheduleAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        ScheduleAction::Preview { minutes, cues } => {
            let config = Config::load_or_default();
            let minutes = minutes.unwrap_or(config.run.default_minutes);
            let selection: BTreeSet<String> = if cues.is_empty() {
                config.cues.default_selection.iter().cloned().collect()
            } else {
                cues.into_iter().collect()
            };

            let schedule = Schedule::build(&selection, minutes.saturating_mul(60));
            println!("{}", serde_json::to_string_pretty(&schedule)?);
            Ok(())
        }
    }
}
