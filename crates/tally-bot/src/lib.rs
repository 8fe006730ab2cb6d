//! # tally-bot
//!
//! Streaming agent that watches the local timeline, tallies reactions on
//! new posts until the end of the hour, and posts a periodic report.

pub mod agent;
pub mod protocol;
pub mod publisher;
pub mod runtime;
pub mod transport;

pub use runtime::{run, run_with_publisher};
