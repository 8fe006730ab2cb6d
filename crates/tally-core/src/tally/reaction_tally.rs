//! Reaction tally
//!
//! Counts reactions per emoji key for the current reporting window. Counts
//! never go negative and a key whose count reaches zero is removed.

use crate::value_objects::{OriginPolicy, Reaction, TargetEmojiSet};
use std::collections::HashMap;

/// Mutable emoji counter for the current window
#[derive(Debug, Clone, Default)]
pub struct ReactionTally {
    counts: HashMap<String, u64>,
    policy: OriginPolicy,
}

impl ReactionTally {
    /// Create an empty tally with the given origin policy
    #[must_use]
    pub fn new(policy: OriginPolicy) -> Self {
        Self {
            counts: HashMap::new(),
            policy,
        }
    }

    /// Record an added reaction
    ///
    /// Returns `true` if the reaction was counted.
    pub fn on_reacted(&mut self, raw: &str) -> bool {
        let Some(reaction) = self.accept(raw) else {
            return false;
        };

        let current = self.counts.get(reaction.emoji()).copied().unwrap_or(0);
        self.counts.insert(reaction.emoji().to_string(), current + 1);
        true
    }

    /// Record a removed reaction
    ///
    /// Returns `true` if a count was decremented. Removing an emoji that is
    /// not tracked is a no-op.
    pub fn on_unreacted(&mut self, raw: &str) -> bool {
        let Some(reaction) = self.accept(raw) else {
            return false;
        };

        match self.counts.get_mut(reaction.emoji()) {
            Some(count) if *count > 1 => {
                *count -= 1;
                true
            }
            Some(_) => {
                self.counts.remove(reaction.emoji());
                true
            }
            None => false,
        }
    }

    /// Take the current counts and start a fresh, empty window
    pub fn drain_and_reset(&mut self) -> TallySnapshot {
        TallySnapshot(std::mem::take(&mut self.counts))
    }

    /// Current count for an emoji key (0 if absent)
    pub fn get(&self, emoji: &str) -> u64 {
        self.counts.get(emoji).copied().unwrap_or(0)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    #[inline]
    pub fn policy(&self) -> OriginPolicy {
        self.policy
    }

    fn accept(&self, raw: &str) -> Option<Reaction> {
        let reaction = Reaction::parse(raw).ok()?;
        self.policy.accepts(&reaction).then_some(reaction)
    }
}

/// Counts captured at the end of a window
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TallySnapshot(HashMap<String, u64>);

impl TallySnapshot {
    /// Sum the counts of every emoji in the target set
    pub fn count_targets(&self, targets: &TargetEmojiSet) -> u64 {
        self.0
            .iter()
            .filter(|(emoji, _)| targets.contains(emoji))
            .map(|(_, n)| n)
            .sum()
    }

    pub fn get(&self, emoji: &str) -> u64 {
        self.0.get(emoji).copied().unwrap_or(0)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Sum of every tracked count, targets or not
    pub fn total(&self) -> u64 {
        self.0.values().sum()
    }
}
