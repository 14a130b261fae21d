//! Events published for the presentation shell.
//!
//! The session and voice wrapper emit lightweight events on a broadcast
//! channel. A graphical shell subscribes and marshals updates onto its own
//! UI thread; nothing in the core blocks on a subscriber, and a missing or
//! lagging subscriber is fine.

use tokio::sync::broadcast;

/// What the assistant is doing right now, for the status display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssistantStatus {
    /// Waiting for the next listen attempt.
    Idle,
    /// A capture attempt is in flight.
    Listening,
    /// A captured utterance is being resolved.
    Recognizing,
    /// A response is being spoken.
    Speaking,
}

impl std::fmt::Display for AssistantStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Idle => write!(f, "Idle"),
            Self::Listening => write!(f, "Listening..."),
            Self::Recognizing => write!(f, "Recognizing..."),
            Self::Speaking => write!(f, "Speaking..."),
        }
    }
}

/// Events emitted by the session for UI and observability.
#[derive(Debug, Clone)]
pub enum AssistantEvent {
    /// The status display should change.
    Status(AssistantStatus),
    /// A transcribed utterance entered the dispatcher.
    Heard(String),
    /// A pending reminder fired.
    ReminderFired(String),
    /// The session loop ended.
    Exited,
}

/// Cloneable publisher handle for assistant events.
#[derive(Debug, Clone)]
pub struct EventBus {
    tx: broadcast::Sender<AssistantEvent>,
}

impl EventBus {
    /// Create a bus retaining up to `capacity` undelivered events per
    /// subscriber.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let (tx, _rx) = broadcast::channel(capacity);
        Self { tx }
    }

    /// Subscribe to events published after this call.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<AssistantEvent> {
        self.tx.subscribe()
    }

    /// Publish an event. Delivery is best-effort.
    pub fn publish(&self, event: AssistantEvent) {
        let _ = self.tx.send(event);
    }
}
