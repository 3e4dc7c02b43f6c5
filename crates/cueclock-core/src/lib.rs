//! # Cueclock Core Library
//!
//! This library provides the core logic for Cueclock: a countdown for a
//! timed activity that fires one-shot audio cues at fixed offsets from the
//! end of the run, plus a one-way bridge for externally triggered messages.
//! All operations are available through the standalone CLI binary; other
//! front ends are thin layers over the same library.
//!
//! ## Architecture
//!
//! - **Countdown Controller**: a tick-driven state machine that requires the
//!   driver to deliver `tick()` once per elapsed second
//! - **Schedule Builder**: pure derivation of cue id -> trigger offset,
//!   snapshotted once per run
//! - **Cue Matcher**: fires each scheduled cue at most once, by exact match
//!   against the remaining time
//! - **Clock**: 1 Hz tokio tick source with generation-guarded cancellation
//! - **External Event Bridge**: long-lived push-channel subscription feeding
//!   the same notification surface as timed cues
//!
//! ## Key Components
//!
//! - [`CountdownController`]: core countdown state machine
//! - [`Session`]: async runtime gluing clock, controller, and bridge
//! - [`Schedule`] / [`CueMatcher`]: cue scheduling and firing
//! - [`NotificationSink`]: the capability the countdown drives
//! - [`Config`]: application configuration management

pub mod bridge;
pub mod clock;
pub mod config;
pub mod countdown;
pub mod cue;
pub mod error;
pub mod events;
pub mod notify;

pub use bridge::{ExternalBridge, MemoryChannel, PushChannel, TriggerEvent, TriggerInjector};
pub use clock::{Clock, ClockHandle, Tick};
pub use config::Config;
pub use countdown::{CountdownController, RunState, Session};
pub use cue::{builtin_catalog, trigger_offset, CueDefinition, CueMatcher, Schedule};
pub use error::{
    BridgeError, ConfigError, CoreError, CountdownError, NotificationError, Result,
};
pub use events::{Event, ReceivedMessage};
pub use notify::{AudioRegistry, CueSound, LoggingSink, NotificationSink, MAIN_TRACK_ID};
