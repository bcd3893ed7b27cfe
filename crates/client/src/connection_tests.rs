// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Socket connection tests against a loopback server

use super::*;
use crate::protocol::Status;
use tokio::net::TcpListener;

fn respond_to(frame: &RequestFrame) -> ServerFrame {
    let response = match &frame.request {
        Request::GetAllFields => Response::GetAllFields {
            fields: vec!["A".to_string()],
        },
        Request::GetEntityTypes => Response::GetEntityTypes {
            entity_types: vec!["Door".to_string()],
        },
        _ => Response::DeleteEntity {
            status: Status::Unspecified,
        },
    };
    ServerFrame::Response {
        id: frame.id,
        response,
    }
}

async fn bind_server() -> (TcpListener, String) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap().to_string();
    (listener, addr)
}

#[tokio::test]
async fn correlates_out_of_order_responses() {
    let (listener, addr) = bind_server().await;

    let server = tokio::spawn(async move {
        let (stream, _) = listener.accept().await.unwrap();
        let (mut reader, mut writer) = stream.into_split();

        let first: RequestFrame =
            protocol::decode(&protocol::read_message(&mut reader).await.unwrap()).unwrap();
        let second: RequestFrame =
            protocol::decode(&protocol::read_message(&mut reader).await.unwrap()).unwrap();

        // Answer the later request first
        for frame in [respond_to(&second), respond_to(&first)] {
            let data = protocol::encode(&frame).unwrap();
            protocol::write_message(&mut writer, &data).await.unwrap();
        }
    });

    let (connection, mut updates) = SocketConnection::connect(&addr).await.unwrap();
    assert!(matches!(updates.recv().await, Some(ConnectionUpdate::Opened)));

    let fields = {
        let connection = connection.clone();
        tokio::spawn(async move { connection.submit(Request::GetAllFields).await })
    };
    let types = {
        let connection = connection.clone();
        tokio::spawn(async move { connection.submit(Request::GetEntityTypes).await })
    };

    let fields = fields.await.unwrap().unwrap();
    assert_eq!(
        fields,
        Response::GetAllFields {
            fields: vec!["A".to_string()],
        }
    );

    let types = types.await.unwrap().unwrap();
    assert_eq!(
        types,
        Response::GetEntityTypes {
            entity_types: vec!["Door".to_string()],
        }
    );

    server.await.unwrap();
}

#[tokio::test]
async fn disconnect_fails_outstanding_requests() {
    let (listener, addr) = bind_server().await;

    let server = tokio::spawn(async move {
        let (stream, _) = listener.accept().await.unwrap();
        let (mut reader, _writer) = stream.into_split();

        // Read one request, then drop the stream without answering
        let _ = protocol::read_message(&mut reader).await.unwrap();
    });

    let (connection, mut updates) = SocketConnection::connect(&addr).await.unwrap();
    assert!(matches!(updates.recv().await, Some(ConnectionUpdate::Opened)));

    let result = connection.submit(Request::GetAllFields).await;
    assert!(matches!(result, Err(ConnectionError::Closed)));

    assert!(matches!(updates.recv().await, Some(ConnectionUpdate::Closed)));

    // The connection is closed; later submits fail fast
    let result = connection.submit(Request::GetAllFields).await;
    assert!(matches!(result, Err(ConnectionError::Closed)));

    server.await.unwrap();
}

#[tokio::test]
async fn forwards_server_pushes() {
    let (listener, addr) = bind_server().await;

    let server = tokio::spawn(async move {
        let (stream, _) = listener.accept().await.unwrap();
        let (_reader, mut writer) = stream.into_split();

        let frame = ServerFrame::Push {
            push: ServerPush::Notification {
                payload: serde_json::json!({"token": "t-1"}),
            },
        };
        let data = protocol::encode(&frame).unwrap();
        protocol::write_message(&mut writer, &data).await.unwrap();
    });

    let (_connection, mut updates) = SocketConnection::connect(&addr).await.unwrap();

    assert!(matches!(updates.recv().await, Some(ConnectionUpdate::Opened)));
    match updates.recv().await {
        Some(ConnectionUpdate::Push(ServerPush::Notification { payload })) => {
            assert_eq!(payload, serde_json::json!({"token": "t-1"}));
        }
        other => panic!("expected notification push, got {:?}", other),
    }

    // Server dropped the stream after the push
    assert!(matches!(updates.recv().await, Some(ConnectionUpdate::Closed)));

    server.await.unwrap();
}
