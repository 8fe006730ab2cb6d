//! Event dispatch
//!
//! Routes transport events to the tracker and the reporting cycle.

use super::Agent;
use crate::protocol::{ClientMessage, InboundEvent, ReactionChange};
use crate::transport::TransportEvent;
use chrono::{DateTime, Utc};
use tally_common::AppError;

impl Agent {
    /// Handle one transport event
    pub fn handle_transport_event(&mut self, event: TransportEvent, now: DateTime<Utc>) {
        match event {
            TransportEvent::Opened => self.on_opened(),
            TransportEvent::Message(text) => self.on_frame(&text, now),
            TransportEvent::Error(e) => {
                let e = AppError::transport(e);
                tracing::error!(error = %e, code = e.error_code(), "Connection error");
            }
            TransportEvent::Closed => {
                tracing::warn!("Connection closed");
            }
        }
    }

    fn on_opened(&mut self) {
        tracing::info!(session_id = %self.session_id, "Stream opened, joining timeline");
        self.send(ClientMessage::connect(&self.session_id));

        if self.has_connected {
            self.tracker.resubscribe_all();
        }
        self.has_connected = true;
    }

    fn on_frame(&mut self, text: &str, now: DateTime<Utc>) {
        match InboundEvent::parse(text) {
            InboundEvent::NewNote(post_id) => {
                self.tracker.on_new_post(post_id, now);
            }
            InboundEvent::NoteUpdated(update) => {
                let counted = match update.change {
                    ReactionChange::Reacted => self.cycle.on_reacted(&update.reaction),
                    ReactionChange::Unreacted => self.cycle.on_unreacted(&update.reaction),
                };
                tracing::debug!(
                    note_id = ?update.note_id,
                    reaction = %update.reaction,
                    change = ?update.change,
                    counted,
                    "Reaction update"
                );
            }
            InboundEvent::Ignored => {
                tracing::trace!("Ignoring stream message");
            }
        }
    }

    fn send(&self, message: ClientMessage) {
        if let Err(e) = self.commands.send(message) {
            tracing::warn!(command = %e.0, "Command channel closed, dropping command");
        }
    }
}
