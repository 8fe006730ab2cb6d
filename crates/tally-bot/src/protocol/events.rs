//! Inbound stream messages
//!
//! Every frame is `{type, body}`. Only two shapes matter to the agent:
//! a new note on the joined channel and a reaction change on a subscribed
//! note. Everything else, malformed frames included, maps to
//! [`InboundEvent::Ignored`].

use serde::Deserialize;
use serde_json::Value;
use tally_core::PostId;

/// Raw inbound envelope
#[derive(Debug, Clone, Deserialize)]
pub struct StreamMessage {
    /// Type discriminator (`channel`, `noteUpdated`, ...)
    #[serde(rename = "type")]
    pub kind: String,

    /// Event data payload
    #[serde(default)]
    pub body: Option<Value>,
}

#[derive(Debug, Deserialize)]
struct ChannelBody {
    #[serde(rename = "type")]
    kind: String,
    body: Value,
}

#[derive(Debug, Deserialize)]
struct NoteBody {
    id: PostId,
}

#[derive(Debug, Deserialize)]
struct NoteUpdatedBody {
    #[serde(default)]
    id: Option<PostId>,
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    body: Option<Value>,
}

#[derive(Debug, Deserialize)]
struct ReactionBody {
    reaction: String,
}

/// Direction of a reaction change
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReactionChange {
    Reacted,
    Unreacted,
}

/// Reaction change on a subscribed note
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteUpdate {
    pub note_id: Option<PostId>,
    pub change: ReactionChange,
    pub reaction: String,
}

impl StreamMessage {
    /// Deserialize from JSON string
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Try to parse as a new note on a joined channel
    pub fn as_note(&self) -> Option<PostId> {
        if self.kind != "channel" {
            return None;
        }
        let channel: ChannelBody = serde_json::from_value(self.body.clone()?).ok()?;
        if channel.kind != "note" {
            return None;
        }
        serde_json::from_value::<NoteBody>(channel.body)
            .ok()
            .map(|note| note.id)
    }

    /// Try to parse as a reaction change on a subscribed note
    pub fn as_note_updated(&self) -> Option<NoteUpdate> {
        if self.kind != "noteUpdated" {
            return None;
        }
        let updated: NoteUpdatedBody = serde_json::from_value(self.body.clone()?).ok()?;
        let change = match updated.kind.as_str() {
            "reacted" => ReactionChange::Reacted,
            "unreacted" => ReactionChange::Unreacted,
            _ => return None,
        };
        let reaction: ReactionBody = serde_json::from_value(updated.body?).ok()?;

        Some(NoteUpdate {
            note_id: updated.id,
            change,
            reaction: reaction.reaction,
        })
    }
}

/// Inbound event after demultiplexing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InboundEvent {
    /// A post appeared on the joined timeline
    NewNote(PostId),
    /// A reaction was added to or removed from a subscribed post
    NoteUpdated(NoteUpdate),
    /// Anything else
    Ignored,
}

impl InboundEvent {
    /// Demultiplex a text frame
    pub fn parse(text: &str) -> Self {
        let Ok(message) = StreamMessage::from_json(text) else {
            return Self::Ignored;
        };

        if let Some(id) = message.as_note() {
            Self::NewNote(id)
        } else if let Some(update) = message.as_note_updated() {
            Self::NoteUpdated(update)
        } else {
            Self::Ignored
        }
    }
}
