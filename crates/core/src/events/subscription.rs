// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Subscriptions to domain events

use crate::event::EventName;

/// Subscriber handle for unsubscribing
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct SubscriberId(pub String);

/// A subscription to a single event tag
#[derive(Clone, Debug)]
pub struct Subscription {
    pub id: SubscriberId,
    pub event: EventName,
    pub description: String,
}

impl Subscription {
    pub fn new(id: impl Into<String>, event: EventName, description: impl Into<String>) -> Self {
        Self {
            id: SubscriberId(id.into()),
            event,
            description: description.into(),
        }
    }
}
