// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Domain events published by the database client

use crate::snapshot::Snapshot;
use serde::{Deserialize, Serialize};

/// The closed set of event tags the UI can subscribe to.
///
/// Payload shape is determined solely by the tag; see [`Event`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventName {
    Connected,
    Disconnected,
    EntityCreated,
    EntityDeleted,
    FieldCreated,
    EntityTypeCreated,
    QueryAllFields,
    QueryAllEntityTypes,
    QueryEntity,
    CreateSnapshot,
    RestoreSnapshot,
    Notification,
    ReadResult,
}

impl EventName {
    /// Stable snake_case name, used in logs.
    pub fn as_str(&self) -> &'static str {
        match self {
            EventName::Connected => "connected",
            EventName::Disconnected => "disconnected",
            EventName::EntityCreated => "entity_created",
            EventName::EntityDeleted => "entity_deleted",
            EventName::FieldCreated => "field_created",
            EventName::EntityTypeCreated => "entity_type_created",
            EventName::QueryAllFields => "query_all_fields",
            EventName::QueryAllEntityTypes => "query_all_entity_types",
            EventName::QueryEntity => "query_entity",
            EventName::CreateSnapshot => "create_snapshot",
            EventName::RestoreSnapshot => "restore_snapshot",
            EventName::Notification => "notification",
            EventName::ReadResult => "read_result",
        }
    }
}

impl std::fmt::Display for EventName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Events emitted by the database client.
///
/// One variant per [`EventName`]; `EntityTypeCreated` and `QueryEntity`
/// are reserved for operations not yet wired up locally.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Event {
    // Connection lifecycle
    Connected,
    Disconnected,

    // Mutations
    EntityCreated {
        entity_name: String,
        entity_type: String,
        parent_id: String,
    },
    EntityDeleted {
        entity_id: String,
    },
    FieldCreated {
        field_name: String,
        field_type: String,
    },
    EntityTypeCreated {
        entity_type: String,
    },

    // Queries
    QueryAllFields {
        fields: Vec<String>,
    },
    QueryAllEntityTypes {
        entity_types: Vec<String>,
    },
    QueryEntity {
        payload: serde_json::Value,
    },

    // Snapshots
    CreateSnapshot {
        snapshot: Snapshot,
    },
    RestoreSnapshot,

    // Server-pushed, payload forwarded unmodified
    Notification {
        payload: serde_json::Value,
    },
    ReadResult {
        payload: serde_json::Value,
    },
}

impl Event {
    /// The tag this event is dispatched under.
    pub fn name(&self) -> EventName {
        match self {
            Event::Connected => EventName::Connected,
            Event::Disconnected => EventName::Disconnected,
            Event::EntityCreated { .. } => EventName::EntityCreated,
            Event::EntityDeleted { .. } => EventName::EntityDeleted,
            Event::FieldCreated { .. } => EventName::FieldCreated,
            Event::EntityTypeCreated { .. } => EventName::EntityTypeCreated,
            Event::QueryAllFields { .. } => EventName::QueryAllFields,
            Event::QueryAllEntityTypes { .. } => EventName::QueryAllEntityTypes,
            Event::QueryEntity { .. } => EventName::QueryEntity,
            Event::CreateSnapshot { .. } => EventName::CreateSnapshot,
            Event::RestoreSnapshot => EventName::RestoreSnapshot,
            Event::Notification { .. } => EventName::Notification,
            Event::ReadResult { .. } => EventName::ReadResult,
        }
    }
}

#[cfg(test)]
#[path = "event_tests.rs"]
mod tests;
