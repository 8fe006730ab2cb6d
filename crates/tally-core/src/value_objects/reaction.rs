//! Reaction - a normalized emoji reaction string
//!
//! The stream reports reactions as `:emojiKey:` for emoji hosted on this
//! server, `:emojiKey@domain:` for emoji from elsewhere, or a bare unicode
//! emoji. `@.` is the server's own shorthand for "this instance".

use crate::error::DomainError;
use serde::{Deserialize, Serialize};

/// Which reactions the tally accepts, based on where the emoji comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OriginPolicy {
    /// Count every reaction regardless of the emoji's origin
    #[default]
    AllOrigins,
    /// Count only reactions whose emoji originates on this server
    LocalOnly,
}

impl OriginPolicy {
    /// Build from the `countAllOrigins` switch
    #[must_use]
    pub fn from_count_all(count_all_origins: bool) -> Self {
        if count_all_origins {
            Self::AllOrigins
        } else {
            Self::LocalOnly
        }
    }

    /// Check whether a reaction passes this policy
    #[must_use]
    pub fn accepts(&self, reaction: &Reaction) -> bool {
        match self {
            Self::AllOrigins => true,
            Self::LocalOnly => reaction.is_local(),
        }
    }
}

/// A parsed reaction: emoji key plus optional origin domain
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Reaction {
    emoji: String,
    domain: Option<String>,
}

impl Reaction {
    /// Parse a raw reaction string
    ///
    /// Colons are stripped, then the remainder is split on `@` into the emoji
    /// key and the domain. Anything after a second `@` is discarded.
    pub fn parse(raw: &str) -> Result<Self, DomainError> {
        let stripped = raw.replace(':', "");
        let mut parts = stripped.split('@').map(str::trim);

        let emoji = parts.next().unwrap_or_default();
        if emoji.is_empty() {
            return Err(DomainError::InvalidReaction(raw.to_string()));
        }

        Ok(Self {
            emoji: emoji.to_string(),
            domain: parts.next().map(String::from),
        })
    }

    /// The normalized emoji key used as the tally key
    #[inline]
    pub fn emoji(&self) -> &str {
        &self.emoji
    }

    /// Origin domain, if the reaction carried one
    #[inline]
    pub fn domain(&self) -> Option<&str> {
        self.domain.as_deref()
    }

    /// True when the emoji belongs to this server (no domain, empty, or `.`)
    pub fn is_local(&self) -> bool {
        matches!(self.domain.as_deref(), None | Some("" | "."))
    }
}
