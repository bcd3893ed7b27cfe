// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Operation facade over the connection and the event bus
//!
//! Every operation follows one template: build the typed request, submit
//! it, validate the response, and on success publish exactly one domain
//! event. Failures are logged and returned; no event is published for
//! them.

use qdb_core::{Event, EventBus, EventReceiver, Snapshot, SubscriberId, Subscription};
use thiserror::Error;
use tokio::task::JoinHandle;
use tracing::{debug, error};

use crate::connection::{Connection, ConnectionError, ConnectionUpdate, UpdateReceiver};
use crate::protocol::{FieldSchema, Request, Response, ServerPush, Status};

/// Client errors
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Transport failure: {0}")]
    Transport(#[from] ConnectionError),

    #[error("{op} rejected with status {status}")]
    Rejected { op: &'static str, status: Status },

    #[error("Unexpected response to {op}")]
    UnexpectedResponse { op: &'static str },

    #[error("{0} is not supported yet")]
    NotSupported(&'static str),
}

/// Typed client for the remote configuration database.
///
/// Owns the connection handle and the event bus. Cheap to clone; clones
/// share both.
#[derive(Clone)]
pub struct DatabaseClient<C: Connection> {
    connection: C,
    events: EventBus,
}

impl<C: Connection> DatabaseClient<C> {
    pub fn new(connection: C) -> Self {
        Self {
            connection,
            events: EventBus::new(),
        }
    }

    pub fn events(&self) -> &EventBus {
        &self.events
    }

    /// Subscribe to domain events
    pub fn subscribe(&self, subscription: Subscription) -> EventReceiver {
        self.events.subscribe(subscription)
    }

    /// Unsubscribe from domain events
    pub fn unsubscribe(&self, id: &SubscriberId) {
        self.events.unsubscribe(id);
    }

    /// Forward connection updates (lifecycle and server pushes) to the
    /// event bus until the update channel closes.
    pub fn spawn_update_forwarder(&self, updates: UpdateReceiver) -> JoinHandle<()> {
        let events = self.events.clone();
        tokio::spawn(forward_updates(events, updates))
    }

    // -- operations ---------------------------------------------------

    pub async fn create_entity(
        &self,
        parent_id: &str,
        name: &str,
        entity_type: &str,
    ) -> Result<(), ClientError> {
        const OP: &str = "create_entity";
        let request = Request::CreateEntity {
            parent_id: parent_id.to_string(),
            name: name.to_string(),
            entity_type: entity_type.to_string(),
        };

        let status = match self.submit(OP, request).await? {
            Response::CreateEntity { status } => status,
            _ => return Err(self.unexpected(OP)),
        };
        self.check_status(OP, status)?;

        self.events.publish(Event::EntityCreated {
            entity_name: name.to_string(),
            entity_type: entity_type.to_string(),
            parent_id: parent_id.to_string(),
        });
        Ok(())
    }

    pub async fn delete_entity(&self, entity_id: &str) -> Result<(), ClientError> {
        const OP: &str = "delete_entity";
        let request = Request::DeleteEntity {
            entity_id: entity_id.to_string(),
        };

        let status = match self.submit(OP, request).await? {
            Response::DeleteEntity { status } => status,
            _ => return Err(self.unexpected(OP)),
        };
        self.check_status(OP, status)?;

        self.events.publish(Event::EntityDeleted {
            entity_id: entity_id.to_string(),
        });
        Ok(())
    }

    pub async fn create_field(
        &self,
        field_name: &str,
        field_type: &str,
    ) -> Result<(), ClientError> {
        const OP: &str = "create_field";
        let request = Request::SetFieldSchema {
            field: field_name.to_string(),
            schema: FieldSchema {
                name: field_name.to_string(),
                field_type: field_type.to_string(),
            },
        };

        let status = match self.submit(OP, request).await? {
            Response::SetFieldSchema { status } => status,
            _ => return Err(self.unexpected(OP)),
        };
        self.check_status(OP, status)?;

        self.events.publish(Event::FieldCreated {
            field_name: field_name.to_string(),
            field_type: field_type.to_string(),
        });
        Ok(())
    }

    pub async fn create_snapshot(&self) -> Result<(), ClientError> {
        const OP: &str = "create_snapshot";

        let (status, snapshot) = match self.submit(OP, Request::CreateSnapshot).await? {
            Response::CreateSnapshot { status, snapshot } => (status, snapshot),
            _ => return Err(self.unexpected(OP)),
        };
        self.check_status(OP, status)?;

        self.events.publish(Event::CreateSnapshot { snapshot });
        Ok(())
    }

    pub async fn restore_snapshot(&self, snapshot: Snapshot) -> Result<(), ClientError> {
        const OP: &str = "restore_snapshot";
        let request = Request::RestoreSnapshot { snapshot };

        let status = match self.submit(OP, request).await? {
            Response::RestoreSnapshot { status } => status,
            _ => return Err(self.unexpected(OP)),
        };
        self.check_status(OP, status)?;

        self.events.publish(Event::RestoreSnapshot);
        Ok(())
    }

    /// Query all field names. Succeeds or fails on transport outcome
    /// alone; the full list is published as the event payload.
    pub async fn query_all_fields(&self) -> Result<(), ClientError> {
        const OP: &str = "query_all_fields";

        let fields = match self.submit(OP, Request::GetAllFields).await? {
            Response::GetAllFields { fields } => fields,
            _ => return Err(self.unexpected(OP)),
        };

        self.events.publish(Event::QueryAllFields { fields });
        Ok(())
    }

    /// Query all entity types. Same contract as [`query_all_fields`](Self::query_all_fields).
    pub async fn query_all_entity_types(&self) -> Result<(), ClientError> {
        const OP: &str = "query_all_entity_types";

        let entity_types = match self.submit(OP, Request::GetEntityTypes).await? {
            Response::GetEntityTypes { entity_types } => entity_types,
            _ => return Err(self.unexpected(OP)),
        };

        self.events
            .publish(Event::QueryAllEntityTypes { entity_types });
        Ok(())
    }

    // -- reserved surface, kept for incremental caller migration ------

    pub async fn query_entity(&self, _entity_id: &str) -> Result<(), ClientError> {
        Err(ClientError::NotSupported("query_entity"))
    }

    pub async fn update_entity(&self, _entity_id: &str) -> Result<(), ClientError> {
        Err(ClientError::NotSupported("update_entity"))
    }

    pub async fn register_notification(&self, _token: &str) -> Result<(), ClientError> {
        Err(ClientError::NotSupported("register_notification"))
    }

    pub async fn unregister_notification(&self, _token: &str) -> Result<(), ClientError> {
        Err(ClientError::NotSupported("unregister_notification"))
    }

    // -- template helpers ---------------------------------------------

    async fn submit(&self, op: &'static str, request: Request) -> Result<Response, ClientError> {
        self.connection.submit(request).await.map_err(|e| {
            error!(op, error = %e, "request failed");
            ClientError::Transport(e)
        })
    }

    fn check_status(&self, op: &'static str, status: Status) -> Result<(), ClientError> {
        if status.is_success() {
            return Ok(());
        }
        error!(op, %status, "server rejected request");
        Err(ClientError::Rejected { op, status })
    }

    fn unexpected(&self, op: &'static str) -> ClientError {
        error!(op, "unexpected response variant");
        ClientError::UnexpectedResponse { op }
    }
}

/// Map connection updates onto domain events; push payloads are
/// forwarded unmodified.
async fn forward_updates(events: EventBus, mut updates: UpdateReceiver) {
    while let Some(update) = updates.recv().await {
        let event = match update {
            ConnectionUpdate::Opened => Event::Connected,
            ConnectionUpdate::Closed => Event::Disconnected,
            ConnectionUpdate::Push(ServerPush::Notification { payload }) => {
                Event::Notification { payload }
            }
            ConnectionUpdate::Push(ServerPush::ReadResult { payload }) => {
                Event::ReadResult { payload }
            }
        };
        debug!(event = %event.name(), "forwarding connection update");
        events.publish(event);
    }
}

#[cfg(test)]
#[path = "client_tests.rs"]
mod tests;
