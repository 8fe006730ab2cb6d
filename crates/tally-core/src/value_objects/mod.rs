//! Value objects - immutable domain primitives

mod post_id;
mod reaction;
mod target_emojis;

pub use post_id::PostId;
pub use reaction::{OriginPolicy, Reaction};
pub use target_emojis::TargetEmojiSet;
