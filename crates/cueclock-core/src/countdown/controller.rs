//! Countdown controller.
//!
//! The controller is the run/idle state machine. It does not own a thread --
//! a driver (the session runtime, a test) delivers ticks by calling `tick()`
//! once per elapsed second.
//!
//! ## State transitions
//!
//! ```text
//! Idle -> start() -> Running -> (time reaches 0) -> Finished -> Idle
//! ```
//!
//! `Finished` is transient: the transition back to `Idle` happens inside the
//! same `tick()` call that observed zero, so `state()` never reports it.
//! Run-scoped state (schedule, fired set, remaining time) is allocated fresh
//! at `start()` and dropped as a unit when the run ends; the cue selection
//! and the external message log survive across runs.

use std::collections::BTreeSet;
use std::sync::Arc;

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::cue::{CueMatcher, Schedule};
use crate::error::CountdownError;
use crate::events::{Event, ReceivedMessage};
use crate::notify::NotificationSink;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunState {
    Idle,
    Running,
    /// Transient: resolves to `Idle` within the same tick that reaches zero.
    Finished,
}

/// State that lives exactly as long as one run.
#[derive(Debug)]
struct ActiveRun {
    schedule: Schedule,
    matcher: CueMatcher,
    total_seconds: u32,
    time_remaining: u32,
}

/// The countdown state machine.
pub struct CountdownController {
    sink: Arc<dyn NotificationSink>,
    selection: BTreeSet<String>,
    run: Option<ActiveRun>,
    messages: Vec<ReceivedMessage>,
}

impl CountdownController {
    pub fn new(sink: Arc<dyn NotificationSink>) -> Self {
        Self {
            sink,
            selection: BTreeSet::new(),
            run: None,
            messages: Vec::new(),
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn state(&self) -> RunState {
        if self.run.is_some() {
            RunState::Running
        } else {
            RunState::Idle
        }
    }

    /// Seconds left in the active run, or 0 while idle.
    pub fn time_remaining(&self) -> u32 {
        self.run.as_ref().map(|r| r.time_remaining).unwrap_or(0)
    }

    /// Total length of the active run, or 0 while idle.
    pub fn total_seconds(&self) -> u32 {
        self.run.as_ref().map(|r| r.total_seconds).unwrap_or(0)
    }

    /// 0.0 .. 1.0 progress through the active run, 0.0 while idle.
    pub fn progress(&self) -> f64 {
        match &self.run {
            Some(run) => 1.0 - (run.time_remaining as f64 / run.total_seconds as f64),
            None => 0.0,
        }
    }

    /// The selection that will seed (or did seed) the current run.
    pub fn selection(&self) -> &BTreeSet<String> {
        &self.selection
    }

    /// Snapshot of the cues fired so far this run. Empty while idle.
    pub fn fired_cues(&self) -> BTreeSet<String> {
        self.run
            .as_ref()
            .map(|r| r.matcher.fired().clone())
            .unwrap_or_default()
    }

    /// Every externally triggered message received this session, oldest
    /// first. Survives countdown restarts.
    pub fn received_external_messages(&self) -> Vec<String> {
        self.messages.iter().map(|m| m.message.clone()).collect()
    }

    /// The full message log with ids and timestamps.
    pub fn message_log(&self) -> &[ReceivedMessage] {
        &self.messages
    }

    /// Build a full state snapshot event.
    pub fn snapshot(&self) -> Event {
        Event::StateSnapshot {
            state: self.state(),
            time_remaining: self.time_remaining(),
            total_seconds: self.total_seconds(),
            progress: self.progress(),
            fired: self.fired_cues(),
            at: Utc::now(),
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Start a run.
    ///
    /// Snapshots `selection` (it becomes the retained selection), derives
    /// the schedule once, resets the fired set, and starts the main track.
    /// Rejected with `InvalidConfig` for a zero-length run and with
    /// `AlreadyRunning` while a run is active; in both cases existing state
    /// is untouched.
    pub fn start(
        &mut self,
        selection: BTreeSet<String>,
        total_seconds: u32,
    ) -> Result<Event, CountdownError> {
        if self.run.is_some() {
            return Err(CountdownError::AlreadyRunning);
        }
        if total_seconds == 0 {
            return Err(CountdownError::InvalidConfig { total_seconds });
        }

        let schedule = Schedule::build(&selection, total_seconds);
        log::debug!("run started: {total_seconds}s, schedule {schedule:?}");

        self.selection = selection;
        self.run = Some(ActiveRun {
            schedule: schedule.clone(),
            matcher: CueMatcher::new(),
            total_seconds,
            time_remaining: total_seconds,
        });
        self.notify("main track", |s| s.play_main_track());

        Ok(Event::RunStarted {
            total_seconds,
            selection: self.selection.clone(),
            schedule,
            at: Utc::now(),
        })
    }

    /// Replace the retained selection. Only allowed while idle.
    pub fn set_selection(&mut self, selection: BTreeSet<String>) -> Result<(), CountdownError> {
        if self.run.is_some() {
            return Err(CountdownError::AlreadyRunning);
        }
        self.selection = selection;
        Ok(())
    }

    /// Advance the countdown by one second.
    ///
    /// Decrements the remaining time, matches cues at the new value, plays
    /// each newly fired cue, and completes the run when zero is reached.
    /// All of a tick's cue notifications are handed off before this returns,
    /// so the driver never interleaves them with the next tick. Returns the
    /// events produced by this tick; empty while idle or on an uneventful
    /// tick.
    pub fn tick(&mut self) -> Vec<Event> {
        let sink = Arc::clone(&self.sink);
        let Some(run) = self.run.as_mut() else {
            return Vec::new();
        };

        run.time_remaining -= 1;
        let fired = run.matcher.on_tick(run.time_remaining, &run.schedule);
        log::trace!(
            "tick: {}s remaining, fired {:?}",
            run.time_remaining,
            fired
        );

        let mut events = Vec::with_capacity(fired.len() + 1);
        let time_remaining = run.time_remaining;
        for cue_id in fired {
            if let Err(e) = sink.play_cue(&cue_id) {
                log::warn!("cue '{cue_id}' notification failed: {e}");
            }
            events.push(Event::CueFired {
                cue_id,
                time_remaining,
                at: Utc::now(),
            });
        }

        if time_remaining == 0 {
            // Finished -> Idle in the same step; the run state drops here.
            let total_seconds = run.total_seconds;
            self.run = None;
            self.notify("main track", |s| s.stop_main_track());
            log::debug!("run completed after {total_seconds}s");
            events.push(Event::RunCompleted {
                total_seconds,
                at: Utc::now(),
            });
        }

        events
    }

    /// Abandon the active run without waiting for zero.
    ///
    /// No-op while idle. The retained selection and the message log are
    /// kept; everything run-scoped is dropped.
    pub fn reset(&mut self) -> Option<Event> {
        let run = self.run.take()?;
        self.notify("main track", |s| s.stop_main_track());
        log::debug!(
            "run reset with {}s remaining of {}s",
            run.time_remaining,
            run.total_seconds
        );
        Some(Event::RunReset {
            time_remaining: run.time_remaining,
            at: Utc::now(),
        })
    }

    /// Record an externally triggered message and surface it through the
    /// notification sink. Works in every run state.
    pub fn record_external_message(&mut self, message: impl Into<String>) -> Event {
        let record = ReceivedMessage::new(message);
        if let Err(e) = self.sink.deliver_message(&record.message) {
            log::warn!("external message notification failed: {e}");
        }
        self.messages.push(record.clone());
        Event::ExternalMessage {
            id: record.id,
            message: record.message,
            at: record.at,
        }
    }

    fn notify<F>(&self, what: &str, f: F)
    where
        F: FnOnce(&dyn NotificationSink) -> Result<(), crate::error::NotificationError>,
    {
        if let Err(e) = f(self.sink.as_ref()) {
            log::warn!("{what} notification failed: {e}");
        }
    }
}
