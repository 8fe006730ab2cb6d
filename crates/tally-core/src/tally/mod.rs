//! Reaction tally - per-window emoji counters

mod reaction_tally;

pub use reaction_tally::{ReactionTally, TallySnapshot};
