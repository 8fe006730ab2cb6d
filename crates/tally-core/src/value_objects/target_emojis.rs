//! Target emoji set - the emoji keys that make it into the report

use crate::error::DomainError;
use std::collections::HashSet;

/// Fixed set of emoji keys counted at report time
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetEmojiSet(HashSet<String>);

impl TargetEmojiSet {
    /// Build from emoji keys, rejecting an empty set
    pub fn new<I, S>(keys: I) -> Result<Self, DomainError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let set: HashSet<String> = keys
            .into_iter()
            .map(Into::into)
            .filter(|k| !k.is_empty())
            .collect();

        if set.is_empty() {
            return Err(DomainError::EmptyTargetSet);
        }
        Ok(Self(set))
    }

    /// Parse a whitespace-separated list such as `"fire star"`
    pub fn parse(list: &str) -> Result<Self, DomainError> {
        Self::new(list.split_whitespace())
    }

    #[inline]
    pub fn contains(&self, emoji: &str) -> bool {
        self.0.contains(emoji)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
