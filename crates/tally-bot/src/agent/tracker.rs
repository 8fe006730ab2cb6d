//! Subscription tracker
//!
//! Subscribes to every new post's reaction stream and unsubscribes at the
//! end of the hour the post appeared in.

use crate::protocol::ClientMessage;
use chrono::{DateTime, Utc};
use tally_core::{PostId, WatchList, WatchedPost};
use tokio::sync::mpsc;

/// Tracks which posts are subscribed and until when
#[derive(Debug)]
pub struct SubscriptionTracker {
    watched: WatchList,
    commands: mpsc::UnboundedSender<ClientMessage>,
}

impl SubscriptionTracker {
    pub fn new(commands: mpsc::UnboundedSender<ClientMessage>) -> Self {
        Self {
            watched: WatchList::new(),
            commands,
        }
    }

    /// Subscribe to a newly observed post
    ///
    /// A post that is already watched keeps its original expiry and is not
    /// subscribed twice.
    pub fn on_new_post(&mut self, post_id: PostId, now: DateTime<Utc>) -> Option<WatchedPost> {
        let Some(entry) = self.watched.watch(post_id.clone(), now) else {
            tracing::debug!(note_id = %post_id, "Post already watched");
            return None;
        };

        tracing::info!(
            note_id = %post_id,
            expires_at = %entry.expires_at,
            "Start capture"
        );
        self.send(ClientMessage::sub_note(post_id));

        Some(entry)
    }

    /// Unsubscribe every post whose window has ended
    pub fn expire_due(&mut self, now: DateTime<Utc>) -> usize {
        let expired = self.watched.expire_due(now);

        for entry in &expired {
            tracing::info!(note_id = %entry.post_id, "End capture");
            self.send(ClientMessage::unsub_note(entry.post_id.clone()));
        }

        expired.len()
    }

    /// Re-send `subNote` for every watched post after a reconnect
    pub fn resubscribe_all(&self) -> usize {
        let ids: Vec<PostId> = self.watched.post_ids().cloned().collect();

        for id in &ids {
            self.send(ClientMessage::sub_note(id.clone()));
        }

        if !ids.is_empty() {
            tracing::info!(count = ids.len(), "Resubscribed watched posts");
        }
        ids.len()
    }

    pub fn next_expiry(&self) -> Option<DateTime<Utc>> {
        self.watched.next_expiry()
    }

    pub fn watched(&self) -> &WatchList {
        &self.watched
    }

    fn send(&self, message: ClientMessage) {
        if let Err(e) = self.commands.send(message) {
            tracing::warn!(command = %e.0, "Command channel closed, dropping command");
        }
    }
}
