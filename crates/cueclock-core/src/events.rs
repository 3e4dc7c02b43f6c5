use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::countdown::RunState;
use crate::cue::Schedule;

/// Every state change in the system produces an Event.
/// The CLI prints them as they happen; other front ends may poll snapshots.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    RunStarted {
        total_seconds: u32,
        selection: BTreeSet<String>,
        /// The schedule derived for this run, for diagnostics.
        schedule: Schedule,
        at: DateTime<Utc>,
    },
    /// A cue reached its trigger offset this tick. Fires at most once per
    /// cue per run.
    CueFired {
        cue_id: String,
        time_remaining: u32,
        at: DateTime<Utc>,
    },
    RunCompleted {
        total_seconds: u32,
        at: DateTime<Utc>,
    },
    /// A run was abandoned before reaching zero.
    RunReset {
        time_remaining: u32,
        at: DateTime<Utc>,
    },
    /// A message arrived over the external trigger channel. Independent of
    /// run state.
    ExternalMessage {
        id: Uuid,
        message: String,
        at: DateTime<Utc>,
    },
    StateSnapshot {
        state: RunState,
        time_remaining: u32,
        total_seconds: u32,
        progress: f64,
        fired: BTreeSet<String>,
        at: DateTime<Utc>,
    },
}

/// One entry in the external message log.
///
/// The log is append-only for the lifetime of the session and survives
/// countdown restarts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReceivedMessage {
    /// Unique id for idempotent downstream handling.
    pub id: Uuid,
    pub message: String,
    pub at: DateTime<Utc>,
}

impl ReceivedMessage {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            message: message.into(),
            at: Utc::now(),
        }
    }
}
