//! One-tick-per-second countdown clock.
//!
//! The clock is a tokio task driving a fixed 1 Hz interval into an mpsc
//! channel. Every tick carries the generation it was produced under;
//! `ClockHandle::stop` retires the generation before the task is torn down,
//! so a tick that was already queued when `stop` returned is recognizably
//! stale and gets discarded by the consumer. Starting a new generation
//! retires the previous one the same way, which is the reset path.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// One delivered clock tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tick {
    pub generation: u64,
}

/// Tick source with start/stop/reset semantics.
#[derive(Debug)]
pub struct Clock {
    next_generation: u64,
    live: Arc<AtomicU64>,
}

impl Default for Clock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock {
    pub const TICK_PERIOD: Duration = Duration::from_secs(1);

    pub fn new() -> Self {
        Self {
            next_generation: 1,
            live: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Start delivering ticks into `ticks`.
    ///
    /// The first tick arrives one period after the call. Any previously
    /// started generation is retired immediately. The returned handle owns
    /// the task; dropping it tears the task down.
    pub fn start(&mut self, ticks: mpsc::UnboundedSender<Tick>) -> ClockHandle {
        let generation = self.next_generation;
        self.next_generation += 1;
        self.live.store(generation, Ordering::SeqCst);

        let live = Arc::clone(&self.live);
        let task = tokio::spawn(async move {
            let start = tokio::time::Instant::now() + Clock::TICK_PERIOD;
            let mut interval = tokio::time::interval_at(start, Clock::TICK_PERIOD);
            loop {
                interval.tick().await;
                if live.load(Ordering::SeqCst) != generation {
                    break;
                }
                if ticks.send(Tick { generation }).is_err() {
                    break;
                }
            }
        });

        ClockHandle {
            generation,
            live: Arc::clone(&self.live),
            task,
        }
    }

    /// Whether a received tick belongs to the live generation.
    ///
    /// False for ticks that were queued before a `stop` or restart; the
    /// consumer must drop those without mutating state.
    pub fn is_live(&self, tick: &Tick) -> bool {
        self.live.load(Ordering::SeqCst) == tick.generation
    }
}

/// Owner of one running clock generation.
pub struct ClockHandle {
    generation: u64,
    live: Arc<AtomicU64>,
    task: JoinHandle<()>,
}

impl ClockHandle {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Stop the clock. No tick of this generation is observed as live after
    /// this returns, even one already sitting in the channel.
    pub fn stop(self) {
        // Retire only our own generation; a newer start must stay live.
        let _ = self.live.compare_exchange(
            self.generation,
            0,
            Ordering::SeqCst,
            Ordering::SeqCst,
        );
        // Drop aborts the task.
    }
}

impl Drop for ClockHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}
