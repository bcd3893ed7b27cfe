// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Event bus for routing events to subscribers

use super::subscription::{SubscriberId, Subscription};
use crate::event::{Event, EventName};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use tokio::sync::mpsc;
use tracing::debug;

/// Sender for event delivery
pub type EventSender = mpsc::UnboundedSender<Event>;
/// Receiver for event delivery
pub type EventReceiver = mpsc::UnboundedReceiver<Event>;

/// The event bus routes published events to the subscribers of their tag.
///
/// Subscribers of one tag are dispatched in registration order. A closed
/// or dropped receiver is skipped without affecting the rest.
pub struct EventBus {
    subscribers: Arc<RwLock<HashMap<EventName, Vec<(Subscription, EventSender)>>>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self {
            subscribers: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Subscribe to events with the given tag.
    /// Returns a receiver for delivered events.
    ///
    /// Subscriptions are never deduplicated; registering the same id twice
    /// retains both, and `unsubscribe` removes both.
    pub fn subscribe(&self, subscription: Subscription) -> EventReceiver {
        let (tx, rx) = mpsc::unbounded_channel();

        let mut subs = self.subscribers.write().unwrap_or_else(|e| e.into_inner());
        subs.entry(subscription.event)
            .or_default()
            .push((subscription, tx));

        rx
    }

    /// Remove every subscription registered under `id`.
    /// No-op if the id is unknown.
    pub fn unsubscribe(&self, id: &SubscriberId) {
        let mut subs = self.subscribers.write().unwrap_or_else(|e| e.into_inner());
        for entries in subs.values_mut() {
            entries.retain(|(subscription, _)| subscription.id != *id);
        }
    }

    /// Publish an event to all subscribers of its tag, in registration
    /// order. Publishing with no subscribers is a no-op.
    pub fn publish(&self, event: Event) {
        let name = event.name();

        let subs = self.subscribers.read().unwrap_or_else(|e| e.into_inner());
        let Some(entries) = subs.get(&name) else {
            debug!(event = %name, "no subscribers");
            return;
        };

        for (_, tx) in entries {
            // A closed receiver must not stop delivery to the rest.
            let _ = tx.send(event.clone());
        }
    }

    /// Get count of active subscriptions across all tags
    pub fn subscriber_count(&self) -> usize {
        self.subscribers
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .values()
            .map(Vec::len)
            .sum()
    }

    /// List all subscription IDs
    pub fn list_subscriptions(&self) -> Vec<SubscriberId> {
        self.subscribers
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .values()
            .flat_map(|entries| entries.iter().map(|(s, _)| s.id.clone()))
            .collect()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for EventBus {
    fn clone(&self) -> Self {
        Self {
            subscribers: Arc::clone(&self.subscribers),
        }
    }
}

#[cfg(test)]
#[path = "bus_tests.rs"]
mod tests;
