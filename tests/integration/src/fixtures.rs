//! Stream frame fixtures
//!
//! Builders for the JSON frames a streaming server pushes to the agent.

use serde_json::{json, Value};

/// A new note on the joined channel
pub fn note_event(note_id: &str) -> String {
    json!({
        "type": "channel",
        "body": {
            "id": "channel-connection",
            "type": "note",
            "body": {
                "id": note_id,
                "text": "hello",
                "userId": "user-1"
            }
        }
    })
    .to_string()
}

/// A reaction added to a subscribed note
pub fn reacted_event(note_id: &str, reaction: &str) -> String {
    note_updated(note_id, "reacted", reaction)
}

/// A reaction removed from a subscribed note
pub fn unreacted_event(note_id: &str, reaction: &str) -> String {
    note_updated(note_id, "unreacted", reaction)
}

fn note_updated(note_id: &str, kind: &str, reaction: &str) -> String {
    json!({
        "type": "noteUpdated",
        "body": {
            "id": note_id,
            "type": kind,
            "body": {"reaction": reaction, "userId": "user-2"}
        }
    })
    .to_string()
}

/// Check whether a recorded command has the given type and note ID
pub fn is_command(command: &Value, kind: &str, note_id: &str) -> bool {
    command["type"] == kind && command["body"]["id"] == note_id
}

/// Count commands of a given type
pub fn count_commands(commands: &[Value], kind: &str) -> usize {
    commands.iter().filter(|c| c["type"] == kind).count()
}
