//! External trigger bridge.
//!
//! A one-way adapter between an external push channel and the session: any
//! `{message}` payload the channel delivers is forwarded to the countdown's
//! notification surface, independent of run state. The subscription is
//! opened once per session and held for its whole lifetime; dropping the
//! bridge guard releases it. Channel trouble is logged and retried with
//! backoff -- the countdown never depends on bridge health.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::error::BridgeError;

const INITIAL_BACKOFF: Duration = Duration::from_secs(1);
const MAX_BACKOFF: Duration = Duration::from_secs(30);

/// Payload of one externally triggered event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TriggerEvent {
    pub message: String,
}

/// A source of externally triggered events.
///
/// `subscribe` opens (or re-opens) the underlying connection and hands back
/// the receiving end of the event stream. The bridge calls it again whenever
/// the stream ends.
pub trait PushChannel: Send + 'static {
    fn subscribe(&mut self) -> Result<mpsc::UnboundedReceiver<TriggerEvent>, BridgeError>;
}

/// Guard for a running bridge subscription.
///
/// Forwards every received event into `deliveries` until dropped. Dropping
/// the guard aborts the subscription task, which is the deterministic
/// teardown path for session end.
pub struct ExternalBridge {
    task: JoinHandle<()>,
}

impl ExternalBridge {
    /// Open the subscription and start forwarding.
    pub fn open<C: PushChannel>(
        mut channel: C,
        deliveries: mpsc::UnboundedSender<TriggerEvent>,
    ) -> Self {
        let task = tokio::spawn(async move {
            let mut backoff = INITIAL_BACKOFF;
            loop {
                match channel.subscribe() {
                    Ok(mut events) => {
                        backoff = INITIAL_BACKOFF;
                        while let Some(event) = events.recv().await {
                            if deliveries.send(event).is_err() {
                                // Session is gone; nothing left to forward to.
                                return;
                            }
                        }
                        log::warn!("trigger channel disconnected, reconnecting");
                    }
                    Err(e) => {
                        log::warn!("trigger channel unavailable: {e}");
                    }
                }
                tokio::time::sleep(backoff).await;
                backoff = (backoff * 2).min(MAX_BACKOFF);
            }
        });
        Self { task }
    }
}

impl Drop for ExternalBridge {
    fn drop(&mut self) {
        self.task.abort();
    }
}

type SharedSender = Arc<Mutex<Option<mpsc::UnboundedSender<TriggerEvent>>>>;

/// In-process push channel.
///
/// Backs the tests and the CLI's stdin trigger mode; a networked channel
/// implementation plugs in behind the same trait.
pub struct MemoryChannel {
    shared: SharedSender,
}

/// Producer side of a [`MemoryChannel`].
#[derive(Clone)]
pub struct TriggerInjector {
    shared: SharedSender,
}

impl MemoryChannel {
    pub fn new() -> (Self, TriggerInjector) {
        let shared: SharedSender = Arc::new(Mutex::new(None));
        (
            Self {
                shared: Arc::clone(&shared),
            },
            TriggerInjector { shared },
        )
    }
}

impl PushChannel for MemoryChannel {
    fn subscribe(&mut self) -> Result<mpsc::UnboundedReceiver<TriggerEvent>, BridgeError> {
        let (tx, rx) = mpsc::unbounded_channel();
        *self.shared.lock().unwrap() = Some(tx);
        Ok(rx)
    }
}

impl TriggerInjector {
    /// Deliver a message to the current subscriber.
    pub fn send(&self, message: impl Into<String>) -> Result<(), BridgeError> {
        let guard = self.shared.lock().unwrap();
        let sender = guard
            .as_ref()
            .ok_or_else(|| BridgeError::ChannelUnavailable("no active subscription".into()))?;
        sender
            .send(TriggerEvent {
                message: message.into(),
            })
            .map_err(|_| BridgeError::Closed)
    }

    /// Drop the current subscription, simulating a disconnect.
    pub fn disconnect(&self) {
        *self.shared.lock().unwrap() = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn forwards_injected_events() {
        let (channel, injector) = MemoryChannel::new();
        let (tx, mut rx) = mpsc::unbounded_channel();
        let _bridge = ExternalBridge::open(channel, tx);

        // Let the bridge task subscribe before injecting.
        tokio::task::yield_now().await;
        injector.send("look under the rug").unwrap();

        let event = rx.recv().await.unwrap();
        assert_eq!(event.message, "look under the rug");
    }

    #[tokio::test(start_paused = true)]
    async fn reconnects_after_disconnect() {
        let (channel, injector) = MemoryChannel::new();
        let (tx, mut rx) = mpsc::unbounded_channel();
        let _bridge = ExternalBridge::open(channel, tx);

        tokio::task::yield_now().await;
        injector.send("first").unwrap();
        assert_eq!(rx.recv().await.unwrap().message, "first");

        // Dropping the subscriber ends the stream; the bridge backs off and
        // resubscribes, after which delivery works again.
        injector.disconnect();
        loop {
            tokio::time::sleep(Duration::from_secs(1)).await;
            if injector.send("second").is_ok() {
                break;
            }
        }
        assert_eq!(rx.recv().await.unwrap().message, "second");
    }

    #[tokio::test(start_paused = true)]
    async fn dropping_bridge_releases_subscription() {
        let (channel, injector) = MemoryChannel::new();
        let (tx, mut rx) = mpsc::unbounded_channel();
        let bridge = ExternalBridge::open(channel, tx);

        tokio::task::yield_now().await;
        drop(bridge);

        // The forwarding task is gone: nothing arrives even though the
        // injector can still push into the dangling subscription.
        let _ = injector.send("into the void");
        assert!(rx.recv().await.is_none());
    }

    #[test]
    fn injector_without_subscription_errors() {
        let (_channel, injector) = MemoryChannel::new();
        assert!(matches!(
            injector.send("early"),
            Err(BridgeError::ChannelUnavailable(_))
        ));
    }
}
