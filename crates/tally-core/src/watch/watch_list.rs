//! Watch list
//!
//! Min-heap of watched posts keyed by expiry. The owner sleeps until
//! [`WatchList::next_expiry`] and then calls [`WatchList::expire_due`], so a
//! single timer covers any number of posts.

use crate::value_objects::PostId;
use chrono::{DateTime, Duration, Utc};
use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashSet};

/// Last millisecond of the clock hour containing `now`
///
/// Hours are aligned to the Unix epoch, which matches local clock hours in
/// every whole-hour time zone. In zones with a half-hour or 45-minute offset
/// (UTC+05:30, UTC+05:45, ...) the window still ends on the UTC hour, not on
/// the local one.
pub fn end_of_hour(now: DateTime<Utc>) -> DateTime<Utc> {
    let into_hour = Duration::seconds(now.timestamp().rem_euclid(3600))
        + Duration::nanoseconds(i64::from(now.timestamp_subsec_nanos()));
    now - into_hour + Duration::hours(1) - Duration::milliseconds(1)
}

/// A post currently subscribed for reaction events
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct WatchedPost {
    // Field order drives the derived Ord: expiry first.
    pub expires_at: DateTime<Utc>,
    pub post_id: PostId,
}

/// Set of watched posts ordered by expiry
#[derive(Debug, Default)]
pub struct WatchList {
    heap: BinaryHeap<Reverse<WatchedPost>>,
    ids: HashSet<PostId>,
}

impl WatchList {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start watching a post until the end of the current hour
    ///
    /// Returns the new entry, or `None` if the post is already watched.
    pub fn watch(&mut self, post_id: PostId, now: DateTime<Utc>) -> Option<WatchedPost> {
        if !self.ids.insert(post_id.clone()) {
            return None;
        }

        let entry = WatchedPost {
            expires_at: end_of_hour(now),
            post_id,
        };
        self.heap.push(Reverse(entry.clone()));
        Some(entry)
    }

    /// Earliest pending expiry
    pub fn next_expiry(&self) -> Option<DateTime<Utc>> {
        self.heap.peek().map(|Reverse(entry)| entry.expires_at)
    }

    /// Remove and return every post whose expiry is at or before `now`
    pub fn expire_due(&mut self, now: DateTime<Utc>) -> Vec<WatchedPost> {
        let mut expired = Vec::new();

        while let Some(Reverse(entry)) = self.heap.peek() {
            if entry.expires_at > now {
                break;
            }
            if let Some(Reverse(entry)) = self.heap.pop() {
                self.ids.remove(&entry.post_id);
                expired.push(entry);
            }
        }

        expired
    }

    pub fn contains(&self, post_id: &PostId) -> bool {
        self.ids.contains(post_id)
    }

    /// Watched post IDs in no particular order
    pub fn post_ids(&self) -> impl Iterator<Item = &PostId> {
        self.ids.iter()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}
