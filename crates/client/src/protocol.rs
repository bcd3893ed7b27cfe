// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Wire protocol: typed messages and length-prefixed JSON framing

use qdb_core::Snapshot;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

/// Maximum accepted message size (16 MiB); snapshots dominate
pub const MAX_MESSAGE_SIZE: usize = 16 * 1024 * 1024;

/// Protocol errors
#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Connection closed")]
    ConnectionClosed,

    #[error("Message too large: {0} bytes")]
    MessageTooLarge(usize),

    #[error("Timeout")]
    Timeout,
}

/// Schema for a database field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldSchema {
    pub name: String,
    pub field_type: String,
}

/// Response-embedded outcome code. Only `Success` means success; every
/// other value is a uniform failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    Unspecified,
    Success,
    Failure,
}

impl Status {
    pub fn is_success(&self) -> bool {
        matches!(self, Status::Success)
    }
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Status::Unspecified => "unspecified",
            Status::Success => "success",
            Status::Failure => "failure",
        };
        write!(f, "{}", s)
    }
}

/// Requests sent to the configuration database
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Request {
    CreateEntity {
        parent_id: String,
        name: String,
        entity_type: String,
    },
    DeleteEntity {
        entity_id: String,
    },
    SetFieldSchema {
        field: String,
        schema: FieldSchema,
    },
    GetAllFields,
    GetEntityTypes,
    CreateSnapshot,
    RestoreSnapshot {
        snapshot: Snapshot,
    },
}

/// Responses from the configuration database, one variant per request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Response {
    CreateEntity { status: Status },
    DeleteEntity { status: Status },
    SetFieldSchema { status: Status },
    GetAllFields { fields: Vec<String> },
    GetEntityTypes { entity_types: Vec<String> },
    CreateSnapshot { status: Status, snapshot: Snapshot },
    RestoreSnapshot { status: Status },
}

/// Unsolicited server-pushed messages
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ServerPush {
    Notification { payload: serde_json::Value },
    ReadResult { payload: serde_json::Value },
}

/// Outbound frame carrying a correlated request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestFrame {
    pub id: u64,
    pub request: Request,
}

/// Inbound frames: a correlated response or an unsolicited push
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "frame", rename_all = "snake_case")]
pub enum ServerFrame {
    Response { id: u64, response: Response },
    Push { push: ServerPush },
}

/// Encode a message as JSON (no length prefix)
pub fn encode<T: Serialize>(message: &T) -> Result<Vec<u8>, ProtocolError> {
    Ok(serde_json::to_vec(message)?)
}

/// Decode a message from JSON bytes
pub fn decode<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, ProtocolError> {
    Ok(serde_json::from_slice(bytes)?)
}

/// Write a message with a 4-byte big-endian length prefix
pub async fn write_message<W>(writer: &mut W, data: &[u8]) -> Result<(), ProtocolError>
where
    W: AsyncWrite + Unpin,
{
    if data.len() > MAX_MESSAGE_SIZE {
        return Err(ProtocolError::MessageTooLarge(data.len()));
    }

    let len = data.len() as u32;
    writer.write_all(&len.to_be_bytes()).await?;
    writer.write_all(data).await?;
    writer.flush().await?;
    Ok(())
}

/// Read a length-prefixed message
pub async fn read_message<R>(reader: &mut R) -> Result<Vec<u8>, ProtocolError>
where
    R: AsyncRead + Unpin,
{
    let mut len_buf = [0u8; 4];
    reader.read_exact(&mut len_buf).await.map_err(eof_as_close)?;

    let len = u32::from_be_bytes(len_buf) as usize;
    if len > MAX_MESSAGE_SIZE {
        return Err(ProtocolError::MessageTooLarge(len));
    }

    let mut data = vec![0u8; len];
    reader.read_exact(&mut data).await.map_err(eof_as_close)?;
    Ok(data)
}

fn eof_as_close(e: std::io::Error) -> ProtocolError {
    if e.kind() == std::io::ErrorKind::UnexpectedEof {
        ProtocolError::ConnectionClosed
    } else {
        ProtocolError::Io(e)
    }
}

#[cfg(test)]
#[path = "protocol_tests.rs"]
mod tests;
