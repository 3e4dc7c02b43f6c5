//! Session runtime.
//!
//! Glues the clock, the controller, and the external bridge together on one
//! logical control flow. Ticks and bridge deliveries are pulled off their
//! channels one at a time and applied to the controller in full before the
//! next is accepted, so run-scoped state needs no locking. Intended to run
//! on a current-thread tokio runtime.

use std::collections::BTreeSet;
use std::sync::Arc;

use tokio::sync::mpsc;

use crate::bridge::{ExternalBridge, PushChannel, TriggerEvent};
use crate::clock::{Clock, ClockHandle, Tick};
use crate::countdown::{CountdownController, RunState};
use crate::error::CountdownError;
use crate::events::Event;
use crate::notify::NotificationSink;

/// One countdown session: a controller plus the async plumbing that feeds it.
pub struct Session {
    controller: CountdownController,
    clock: Clock,
    clock_handle: Option<ClockHandle>,
    tick_tx: mpsc::UnboundedSender<Tick>,
    tick_rx: mpsc::UnboundedReceiver<Tick>,
    trigger_tx: mpsc::UnboundedSender<TriggerEvent>,
    trigger_rx: mpsc::UnboundedReceiver<TriggerEvent>,
    _bridge: Option<ExternalBridge>,
}

impl Session {
    pub fn new(sink: Arc<dyn NotificationSink>) -> Self {
        let (tick_tx, tick_rx) = mpsc::unbounded_channel();
        let (trigger_tx, trigger_rx) = mpsc::unbounded_channel();
        Self {
            controller: CountdownController::new(sink),
            clock: Clock::new(),
            clock_handle: None,
            tick_tx,
            tick_rx,
            trigger_tx,
            trigger_rx,
            _bridge: None,
        }
    }

    /// Open the external trigger subscription for the lifetime of this
    /// session. Call at most once; the subscription outlives individual
    /// runs and is released when the session drops.
    pub fn attach_channel<C: PushChannel>(&mut self, channel: C) {
        self._bridge = Some(ExternalBridge::open(channel, self.trigger_tx.clone()));
    }

    pub fn controller(&self) -> &CountdownController {
        &self.controller
    }

    /// Start a run and arm the clock.
    pub fn start(
        &mut self,
        selection: BTreeSet<String>,
        total_seconds: u32,
    ) -> Result<Event, CountdownError> {
        let event = self.controller.start(selection, total_seconds)?;
        self.clock_handle = Some(self.clock.start(self.tick_tx.clone()));
        Ok(event)
    }

    /// Stop the clock and abandon any active run.
    pub fn stop(&mut self) -> Option<Event> {
        if let Some(handle) = self.clock_handle.take() {
            handle.stop();
        }
        self.controller.reset()
    }

    /// Wait for the next delivery (tick or external trigger) and apply it.
    ///
    /// Returns the events it produced; an uneventful or stale tick yields an
    /// empty vec. When a tick completes the run, the clock is stopped before
    /// this returns, and any tick it already queued will be discarded as
    /// stale on a later call.
    pub async fn next_events(&mut self) -> Vec<Event> {
        tokio::select! {
            Some(tick) = self.tick_rx.recv() => {
                if !self.clock.is_live(&tick) {
                    log::trace!("discarding stale tick (generation {})", tick.generation);
                    return Vec::new();
                }
                let events = self.controller.tick();
                if self.controller.state() == RunState::Idle {
                    if let Some(handle) = self.clock_handle.take() {
                        handle.stop();
                    }
                }
                events
            }
            Some(trigger) = self.trigger_rx.recv() => {
                vec![self.controller.record_external_message(trigger.message)]
            }
        }
    }
}
