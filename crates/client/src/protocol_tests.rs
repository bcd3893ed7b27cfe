// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Protocol unit tests

use super::*;

#[test]
fn encode_decode_request_frame() {
    let frame = RequestFrame {
        id: 7,
        request: Request::CreateEntity {
            parent_id: "root".to_string(),
            name: "garage-door".to_string(),
            entity_type: "Door".to_string(),
        },
    };

    let encoded = encode(&frame).expect("encode failed");
    let decoded: RequestFrame = decode(&encoded).expect("decode failed");

    assert_eq!(frame, decoded);
}

#[test]
fn encode_decode_response_frame() {
    let frame = ServerFrame::Response {
        id: 7,
        response: Response::CreateSnapshot {
            status: Status::Success,
            snapshot: Snapshot::from(vec![0xde, 0xad]),
        },
    };

    let encoded = encode(&frame).expect("encode failed");
    let decoded: ServerFrame = decode(&encoded).expect("decode failed");

    assert_eq!(frame, decoded);
}

#[test]
fn encode_decode_push_frame() {
    let frame = ServerFrame::Push {
        push: ServerPush::Notification {
            payload: serde_json::json!({"token": "t-1"}),
        },
    };

    let encoded = encode(&frame).expect("encode failed");
    let decoded: ServerFrame = decode(&encoded).expect("decode failed");

    assert_eq!(frame, decoded);
}

#[test]
fn only_success_status_is_success() {
    assert!(Status::Success.is_success());
    assert!(!Status::Failure.is_success());
    assert!(!Status::Unspecified.is_success());
}

#[test]
fn encode_returns_json_without_length_prefix() {
    let request = Request::GetAllFields;
    let encoded = encode(&request).expect("encode failed");

    // encode() returns raw JSON, no length prefix
    let json_str = std::str::from_utf8(&encoded).expect("should be valid UTF-8");
    assert!(
        json_str.starts_with('{'),
        "should be JSON object: {}",
        json_str
    );
}

#[tokio::test]
async fn read_write_message_roundtrip() {
    let original = b"hello world";

    let mut buffer = Vec::new();
    write_message(&mut buffer, original)
        .await
        .expect("write failed");

    // write_message adds 4-byte length prefix
    assert_eq!(buffer.len(), 4 + original.len());

    let mut cursor = std::io::Cursor::new(buffer);
    let read_back = read_message(&mut cursor).await.expect("read failed");

    assert_eq!(read_back, original);
}

#[tokio::test]
async fn write_message_adds_length_prefix() {
    let data = b"test data";

    let mut buffer = Vec::new();
    write_message(&mut buffer, data).await.expect("write failed");

    // First 4 bytes are the length prefix
    let len = u32::from_be_bytes([buffer[0], buffer[1], buffer[2], buffer[3]]) as usize;

    assert_eq!(len, data.len());
    assert_eq!(&buffer[4..], data);
}

#[tokio::test]
async fn read_message_maps_eof_to_connection_closed() {
    let mut cursor = std::io::Cursor::new(Vec::<u8>::new());
    let err = read_message(&mut cursor).await.unwrap_err();
    assert!(matches!(err, ProtocolError::ConnectionClosed));

    // Truncated body is also a close, not a generic IO error
    let mut buffer = Vec::new();
    write_message(&mut buffer, b"full message").await.unwrap();
    buffer.truncate(buffer.len() - 3);
    let mut cursor = std::io::Cursor::new(buffer);
    let err = read_message(&mut cursor).await.unwrap_err();
    assert!(matches!(err, ProtocolError::ConnectionClosed));
}

#[tokio::test]
async fn read_message_rejects_oversized_length() {
    let len = (MAX_MESSAGE_SIZE as u32 + 1).to_be_bytes();
    let mut cursor = std::io::Cursor::new(len.to_vec());
    let err = read_message(&mut cursor).await.unwrap_err();
    assert!(matches!(err, ProtocolError::MessageTooLarge(_)));
}
