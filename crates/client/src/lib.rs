// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! qdb-client: Typed client for the qdb remote configuration database
//!
//! This crate provides:
//! - A typed wire protocol (requests, responses, server pushes) with
//!   length-prefixed JSON framing
//! - The `Connection` trait and a production socket implementation that
//!   correlates concurrent in-flight requests to their responses
//! - `DatabaseClient`, the operation facade that translates successful
//!   responses into domain events on an [`qdb_core::EventBus`]

pub mod client;
pub mod connection;
pub mod protocol;

#[cfg(any(test, feature = "test-support"))]
pub mod fake;

// Re-exports
pub use client::{ClientError, DatabaseClient};
pub use connection::{
    Connection, ConnectionError, ConnectionUpdate, SocketConnection, UpdateReceiver,
};
pub use protocol::{FieldSchema, Request, Response, ServerPush, Status};

#[cfg(any(test, feature = "test-support"))]
pub use fake::FakeConnection;
