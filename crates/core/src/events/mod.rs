// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Event bus for routing domain events to UI subscribers
//!
//! This module provides:
//! - `EventBus` - Name-keyed fan-out of published events
//! - `Subscription` - A named registration for one event tag

mod bus;
mod subscription;

pub use bus::{EventBus, EventReceiver, EventSender};
pub use subscription::{SubscriberId, Subscription};
