//! Server-sent-event parsing for the `users` change feed.
//!
//! The platform pushes one event per table mutation, each a JSON payload in
//! an SSE `data:` field. Events are extracted incrementally from the
//! response byte stream; the feed ends when the connection does, with no
//! retry on this side.

use async_stream::stream;
use futures::Stream;
use uuid::Uuid;

use cotador_core::UserId;

use super::error::GatewayError;
use super::{ChangeEvent, UserRecord};

/// Wire form of one change-feed event.
#[derive(Debug, serde::Deserialize)]
struct WireEvent {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    record: Option<UserRecord>,
    #[serde(default)]
    old_record: Option<DeletedRecord>,
}

#[derive(Debug, serde::Deserialize)]
struct DeletedRecord {
    id: Uuid,
}

/// Turn a streaming feed response into a stream of change events.
pub(crate) fn events(
    response: reqwest::Response,
) -> impl Stream<Item = Result<ChangeEvent, GatewayError>> + Send {
    stream! {
        use futures::StreamExt;

        let mut buffer = String::new();
        let mut byte_stream = std::pin::pin!(response.bytes_stream());

        while let Some(chunk_result) = byte_stream.next().await {
            match chunk_result {
                Ok(chunk) => {
                    let Ok(text) = std::str::from_utf8(&chunk) else {
                        yield Err(GatewayError::Stream("invalid UTF-8 in feed".to_owned()));
                        continue;
                    };
                    buffer.push_str(text);

                    while let Some(data) = next_event_data(&mut buffer) {
                        match parse_event(&data) {
                            Ok(Some(event)) => yield Ok(event),
                            Ok(None) => {}
                            Err(e) => yield Err(e),
                        }
                    }
                }
                Err(e) => {
                    yield Err(GatewayError::Stream(e.to_string()));
                    break;
                }
            }
        }
    }
}

/// Extract the `data` payload of the next complete SSE event, if any.
///
/// Events are separated by a blank line; `data:` lines inside one event are
/// joined with newlines per the SSE framing rules. Comment and `event:`
/// lines are skipped.
fn next_event_data(buffer: &mut String) -> Option<String> {
    let boundary = buffer.find("\n\n")?;
    let raw: String = buffer.drain(..boundary + 2).collect();

    let data: Vec<&str> = raw
        .lines()
        .filter_map(|line| line.strip_prefix("data:"))
        .map(str::trim_start)
        .collect();

    if data.is_empty() {
        // Keep-alive comment or event-name-only frame.
        return None;
    }
    Some(data.join("\n"))
}

/// Parse one `data` payload into a change event.
///
/// Unknown event kinds are skipped rather than failing the feed.
fn parse_event(data: &str) -> Result<Option<ChangeEvent>, GatewayError> {
    let wire: WireEvent = serde_json::from_str(data)
        .map_err(|e| GatewayError::Parse(format!("change event: {e}")))?;

    let event = match wire.kind.as_str() {
        "INSERT" => wire
            .record
            .map(UserRecord::into_user)
            .transpose()?
            .map(ChangeEvent::Insert),
        "UPDATE" => wire
            .record
            .map(UserRecord::into_user)
            .transpose()?
            .map(ChangeEvent::Update),
        "DELETE" => wire
            .old_record
            .map(|r| ChangeEvent::Delete(UserId::new(r.id))),
        other => {
            tracing::debug!("ignoring change event of kind {other}");
            None
        }
    };

    Ok(event)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_next_event_data_waits_for_blank_line() {
        let mut buffer = String::from("data: {\"a\":1}");
        assert!(next_event_data(&mut buffer).is_none());

        buffer.push_str("\n\ndata: tail");
        assert_eq!(next_event_data(&mut buffer).unwrap(), "{\"a\":1}");
        assert_eq!(buffer, "data: tail");
    }

    #[test]
    fn test_next_event_data_skips_comment_frames() {
        let mut buffer = String::from(": keep-alive\n\ndata: x\n\n");
        assert!(next_event_data(&mut buffer).is_none());
        assert_eq!(next_event_data(&mut buffer).unwrap(), "x");
    }

    #[test]
    fn test_parse_insert_event() {
        let data = r#"{
            "type": "INSERT",
            "record": {
                "id": "6dfe2d31-7c55-4f12-9c4e-0a2ab8e1a001",
                "cpf": "111.222.333-44",
                "name": "Maria Souza",
                "status": "pending",
                "created_at": "2026-01-10T12:30:00Z"
            }
        }"#;

        let event = parse_event(data).unwrap().unwrap();
        assert!(matches!(event, ChangeEvent::Insert(_)));
    }

    #[test]
    fn test_parse_delete_event_carries_only_id() {
        let data = r#"{
            "type": "DELETE",
            "old_record": { "id": "6dfe2d31-7c55-4f12-9c4e-0a2ab8e1a001" }
        }"#;

        let event = parse_event(data).unwrap().unwrap();
        let ChangeEvent::Delete(id) = event else {
            panic!("expected delete event");
        };
        assert_eq!(
            id.to_string(),
            "6dfe2d31-7c55-4f12-9c4e-0a2ab8e1a001"
        );
    }

    #[test]
    fn test_parse_unknown_kind_is_skipped() {
        let data = r#"{ "type": "TRUNCATE" }"#;
        assert!(parse_event(data).unwrap().is_none());
    }

    #[test]
    fn test_parse_garbage_is_an_error() {
        assert!(parse_event("not json").is_err());
    }
}
