// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fake connection for testing

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::sync::oneshot;

use crate::connection::{Connection, ConnectionError};
use crate::protocol::{Request, Response};

type FakeResult = Result<Response, ConnectionError>;

#[derive(Default)]
struct FakeInner {
    submitted: Vec<Request>,
    scripted: VecDeque<FakeResult>,
    waiting: Vec<(Request, oneshot::Sender<FakeResult>)>,
}

/// Fake connection for testing.
///
/// Records every submitted request. Scripted results are consumed FIFO;
/// a submit with no scripted result parks until the test resolves it
/// with [`resolve_nth`](Self::resolve_nth), which allows driving
/// completions out of submission order.
#[derive(Clone, Default)]
pub struct FakeConnection {
    inner: Arc<Mutex<FakeInner>>,
}

impl FakeConnection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a result for the next unscripted submit
    pub fn enqueue(&self, result: FakeResult) {
        self.inner
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .scripted
            .push_back(result);
    }

    /// Get all recorded requests
    pub fn submitted(&self) -> Vec<Request> {
        self.inner
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .submitted
            .clone()
    }

    /// Number of submits currently parked awaiting resolution
    pub fn waiting_count(&self) -> usize {
        self.inner
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .waiting
            .len()
    }

    /// Resolve the nth parked submit (in submission order).
    /// Returns false if there is no such submit.
    pub fn resolve_nth(&self, n: usize, result: FakeResult) -> bool {
        let entry = {
            let mut inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());
            if n >= inner.waiting.len() {
                return false;
            }
            inner.waiting.remove(n)
        };
        let (_, tx) = entry;
        tx.send(result).is_ok()
    }
}

#[async_trait]
impl Connection for FakeConnection {
    async fn submit(&self, request: Request) -> Result<Response, ConnectionError> {
        let rx = {
            let mut inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());
            inner.submitted.push(request.clone());

            if let Some(result) = inner.scripted.pop_front() {
                return result;
            }

            let (tx, rx) = oneshot::channel();
            inner.waiting.push((request, tx));
            rx
        };

        rx.await.unwrap_or(Err(ConnectionError::Closed))
    }
}

#[cfg(test)]
#[path = "fake_tests.rs"]
mod tests;
