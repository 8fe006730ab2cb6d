//! Outbound client messages

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tally_core::PostId;

/// Channel joined on every (re)connection
pub const LOCAL_TIMELINE: &str = "localTimeline";

/// Commands sent to the server
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "body", rename_all = "camelCase")]
pub enum ClientMessage {
    /// Join a streaming channel
    Connect(ConnectBody),
    /// Start receiving `noteUpdated` events for a post
    SubNote(NoteRef),
    /// Stop receiving `noteUpdated` events for a post
    UnsubNote(NoteRef),
}

/// Body of a `connect` command
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConnectBody {
    pub channel: String,
    pub id: String,
    #[serde(default)]
    pub params: Map<String, Value>,
}

/// Body of `subNote` / `unsubNote`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoteRef {
    pub id: PostId,
}

impl ClientMessage {
    /// Join the local timeline under the given session ID
    #[must_use]
    pub fn connect(session_id: &str) -> Self {
        Self::Connect(ConnectBody {
            channel: LOCAL_TIMELINE.to_string(),
            id: session_id.to_string(),
            params: Map::new(),
        })
    }

    #[must_use]
    pub fn sub_note(id: PostId) -> Self {
        Self::SubNote(NoteRef { id })
    }

    #[must_use]
    pub fn unsub_note(id: PostId) -> Self {
        Self::UnsubNote(NoteRef { id })
    }

    /// Serialize to JSON string
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

impl std::fmt::Display for ClientMessage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Connect(body) => write!(f, "connect(channel={})", body.channel),
            Self::SubNote(note) => write!(f, "subNote({})", note.id),
            Self::UnsubNote(note) => write!(f, "unsubNote({})", note.id),
        }
    }
}
