//! # tally-core
//!
//! Domain layer for the reaction tally agent: reaction parsing, the hourly
//! reaction counter, the set of watched posts, and report scheduling.
//! This crate performs no I/O; every time-dependent operation takes `now`
//! explicitly.

pub mod error;
pub mod report;
pub mod tally;
pub mod value_objects;
pub mod watch;

// Re-export commonly used types at crate root
pub use error::DomainError;
pub use report::{
    Report, ReportSchedule, ReportTemplate, ReportingCycle, DEFAULT_REPORT_TEMPLATE,
};
pub use tally::{ReactionTally, TallySnapshot};
pub use value_objects::{OriginPolicy, PostId, Reaction, TargetEmojiSet};
pub use watch::{end_of_hour, WatchList, WatchedPost};
