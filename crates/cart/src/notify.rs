//! Same-context change notification.
//!
//! A no-payload broadcast: "the cart changed, re-read canonical state."
//! Consumers never receive cart data through the bus; they go back to the
//! engine (or the persisted blob) after each signal, so derived values
//! cannot drift from the source of truth.

use tokio::sync::broadcast;

/// Default broadcast channel capacity.
///
/// Consumers that lag past this many signals miss only intermediate
/// notifications; since every signal means "re-read", the latest one is
/// always sufficient.
const DEFAULT_CHANNEL_CAPACITY: usize = 32;

/// No-payload publish/subscribe bus for "cart changed" signals.
#[derive(Debug)]
pub struct ChangeBus {
    sender: broadcast::Sender<()>,
}

impl ChangeBus {
    /// Create a bus with the default capacity.
    #[must_use]
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(DEFAULT_CHANNEL_CAPACITY);
        Self { sender }
    }

    /// Subscribe to change signals.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<()> {
        self.sender.subscribe()
    }

    /// Publish a change signal to all current subscribers.
    ///
    /// Publishing with no subscribers is a no-op, not an error.
    pub fn publish(&self) {
        let _ = self.sender.send(());
    }

    /// Number of active subscribers.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for ChangeBus {
    fn default() -> Self {
        Self::new()
    }
}
