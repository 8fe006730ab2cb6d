//! Streaming protocol definitions
//!
//! Outbound commands and inbound event envelopes of the server's streaming API.

mod events;
mod messages;

pub use events::{InboundEvent, NoteUpdate, ReactionChange, StreamMessage};
pub use messages::{ClientMessage, ConnectBody, NoteRef, LOCAL_TIMELINE};
