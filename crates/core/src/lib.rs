// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! qdb-core: Domain events for the qdb configuration database client
//!
//! This crate provides:
//! - The closed set of domain events the UI layer reacts to
//! - An event bus routing published events to subscribers
//! - The opaque `Snapshot` blob type

pub mod event;
pub mod events;
pub mod snapshot;

// Re-exports
pub use event::{Event, EventName};
pub use events::{EventBus, EventReceiver, EventSender, SubscriberId, Subscription};
pub use snapshot::Snapshot;
