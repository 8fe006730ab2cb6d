//! Stream transport
//!
//! Keeps a WebSocket connection to the streaming endpoint alive and exposes
//! it to the agent as a pair of channels.

mod stream;

pub use stream::{StreamTransport, TransportError, TransportEvent, TransportHandle};
