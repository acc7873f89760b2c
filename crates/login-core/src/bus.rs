// ── Application event bus ──
//
// Named events fanned out over a `broadcast` channel. Subscribers pick
// the event names they care about; everything else is skipped.

use std::sync::Arc;

use serde_json::Value;
use tokio::sync::broadcast;
use tokio::sync::broadcast::error::{RecvError, TryRecvError};
use tracing::{trace, warn};

const EVENT_CHANNEL_SIZE: usize = 256;

/// Well-known event names exchanged on the bus.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
    strum::EnumIter,
)]
pub enum AppEvent {
    /// A session was established. Triggers a current-user fetch.
    #[strum(serialize = "loggedin")]
    LoggedIn,
    /// The session ended. Clears the current user.
    #[strum(serialize = "logout")]
    Logout,
    /// The API answered 401 with an authentication challenge.
    #[strum(serialize = "authenticationError")]
    AuthenticationError,
}

/// One published event.
#[derive(Debug, Clone, PartialEq)]
pub struct BusEvent {
    pub name: String,
    pub payload: Value,
}

impl BusEvent {
    /// The well-known event this carries, if any.
    pub fn kind(&self) -> Option<AppEvent> {
        self.name.parse().ok()
    }
}

/// Narrow publish/subscribe capability the services depend on.
pub trait EventBus: Send + Sync {
    /// Publish an event. Returns how many subscribers were reached.
    fn publish(&self, name: &str, payload: Value) -> usize;

    /// Subscribe to any of the given event names.
    fn subscribe_all(&self, names: &[&str]) -> EventSubscription;

    /// Subscribe to a single event name.
    fn subscribe(&self, name: &str) -> EventSubscription {
        self.subscribe_all(&[name])
    }
}

// ── Broadcaster ──────────────────────────────────────────────────

/// In-process [`EventBus`] backed by `tokio::sync::broadcast`.
///
/// Cheap to clone; every clone publishes into the same channel.
#[derive(Debug, Clone)]
pub struct Broadcaster {
    tx: broadcast::Sender<Arc<BusEvent>>,
}

impl Broadcaster {
    pub fn new() -> Self {
        Self::with_capacity(EVENT_CHANNEL_SIZE)
    }

    /// Create a bus whose subscribers may fall `capacity` events behind
    /// before they start skipping.
    pub fn with_capacity(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx }
    }

    /// Publish a well-known event.
    pub fn broadcast(&self, event: AppEvent, payload: Value) -> usize {
        self.publish(event.as_ref(), payload)
    }

    /// Subscribe to a well-known event.
    pub fn on(&self, event: AppEvent) -> EventSubscription {
        self.subscribe(event.as_ref())
    }

    /// Number of live subscriptions.
    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for Broadcaster {
    fn default() -> Self {
        Self::new()
    }
}

impl EventBus for Broadcaster {
    fn publish(&self, name: &str, payload: Value) -> usize {
        trace!(event = name, "publishing");
        let event = Arc::new(BusEvent {
            name: name.to_owned(),
            payload,
        });
        // `send` only fails when nobody is listening.
        self.tx.send(event).unwrap_or(0)
    }

    fn subscribe_all(&self, names: &[&str]) -> EventSubscription {
        EventSubscription {
            names: names.iter().map(|n| (*n).to_owned()).collect(),
            rx: self.tx.subscribe(),
        }
    }
}

// ── EventSubscription ────────────────────────────────────────────

/// Receiving end of a bus subscription, filtered by event name.
///
/// Only events published after the subscription was created are seen.
pub struct EventSubscription {
    names: Vec<String>,
    rx: broadcast::Receiver<Arc<BusEvent>>,
}

impl EventSubscription {
    /// Event names this subscription accepts.
    pub fn names(&self) -> &[String] {
        &self.names
    }

    fn accepts(&self, event: &BusEvent) -> bool {
        self.names.iter().any(|n| *n == event.name)
    }

    /// Wait for the next matching event.
    ///
    /// Returns `None` once every publisher has been dropped.
    pub async fn recv(&mut self) -> Option<Arc<BusEvent>> {
        loop {
            match self.rx.recv().await {
                Ok(event) if self.accepts(&event) => return Some(event),
                Ok(_) => {}
                Err(RecvError::Lagged(n)) => {
                    warn!(events = ?self.names, skipped = n, "bus subscriber lagged");
                }
                Err(RecvError::Closed) => return None,
            }
        }
    }

    /// Take the next matching event that is already queued, without waiting.
    pub fn try_recv(&mut self) -> Option<Arc<BusEvent>> {
        loop {
            match self.rx.try_recv() {
                Ok(event) if self.accepts(&event) => return Some(event),
                Ok(_) => {}
                Err(TryRecvError::Lagged(n)) => {
                    warn!(events = ?self.names, skipped = n, "bus subscriber lagged");
                }
                Err(TryRecvError::Empty | TryRecvError::Closed) => return None,
            }
        }
    }
}
