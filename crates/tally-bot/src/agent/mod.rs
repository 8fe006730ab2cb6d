//! Agent
//!
//! A single task owns every piece of mutable state (watched posts, reaction
//! tally, report schedule) and serializes all handlers through one
//! `select!` loop, so no locking is needed.

mod dispatch;
mod tracker;

pub use tracker::SubscriptionTracker;

use crate::protocol::ClientMessage;
use crate::publisher::ReportPublisher;
use crate::transport::TransportEvent;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use std::time::Duration;
use tally_common::{AppConfig, AppError, AppResult};
use tally_core::{ReactionTally, ReportSchedule, ReportingCycle};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Time left until `deadline`, zero if it has passed
fn until(deadline: DateTime<Utc>, now: DateTime<Utc>) -> Duration {
    (deadline - now).to_std().unwrap_or(Duration::ZERO)
}

/// The reaction tally agent
pub struct Agent {
    session_id: String,
    tracker: SubscriptionTracker,
    cycle: ReportingCycle,
    schedule: ReportSchedule,
    publisher: Arc<dyn ReportPublisher>,
    commands: mpsc::UnboundedSender<ClientMessage>,
    has_connected: bool,
}

impl Agent {
    /// Create an agent
    ///
    /// `session_id` is sent with every channel join and never changes.
    pub fn new(
        session_id: String,
        config: &AppConfig,
        commands: mpsc::UnboundedSender<ClientMessage>,
        publisher: Arc<dyn ReportPublisher>,
    ) -> Self {
        let cycle = ReportingCycle::new(
            ReactionTally::new(config.tally.origin_policy()),
            config.tally.target_emojis.clone(),
            config.report.template.clone(),
        );

        Self {
            session_id,
            tracker: SubscriptionTracker::new(commands.clone()),
            cycle,
            schedule: config.report.schedule,
            publisher,
            commands,
            has_connected: false,
        }
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    pub fn tracker(&self) -> &SubscriptionTracker {
        &self.tracker
    }

    pub fn cycle(&self) -> &ReportingCycle {
        &self.cycle
    }

    /// Close the current window and publish its report in the background
    ///
    /// The tally is drained before publishing; a failed publish loses that
    /// window's report.
    pub fn fire_report(&mut self) -> JoinHandle<()> {
        let report = self.cycle.close_window();
        tracing::info!(
            count = report.count,
            tracked_emojis = report.snapshot.len(),
            tracked_total = report.snapshot.total(),
            "Closing report window"
        );

        let publisher = Arc::clone(&self.publisher);
        tokio::spawn(async move {
            match publisher.publish(&report.text).await.map_err(AppError::publish) {
                Ok(()) => tracing::info!(count = report.count, "Report published"),
                Err(e) => tracing::error!(
                    error = %e,
                    code = e.error_code(),
                    count = report.count,
                    "Failed to publish report"
                ),
            }
        })
    }

    /// Run until the transport's event stream ends
    pub async fn run(mut self, mut events: mpsc::Receiver<TransportEvent>) -> AppResult<()> {
        let mut next_report = self.schedule.next_after(Utc::now());
        tracing::info!(next_report = %next_report, "Agent started");

        loop {
            let now = Utc::now();
            let report_in = until(next_report, now);
            let next_expiry = self.tracker.next_expiry();
            let expiry_in = next_expiry.map_or(report_in, |at| until(at, now));

            tokio::select! {
                event = events.recv() => {
                    match event {
                        Some(event) => self.handle_transport_event(event, Utc::now()),
                        None => {
                            tracing::warn!("Transport event stream ended");
                            return Err(AppError::transport("event stream ended"));
                        }
                    }
                }

                () = tokio::time::sleep(expiry_in), if next_expiry.is_some() => {
                    self.tracker.expire_due(Utc::now());
                }

                () = tokio::time::sleep(report_in) => {
                    let _publish = self.fire_report();
                    next_report = self.schedule.following(next_report, Utc::now());
                    tracing::debug!(next_report = %next_report, "Next report scheduled");
                }
            }
        }
    }
}

impl std::fmt::Debug for Agent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Agent")
            .field("session_id", &self.session_id)
            .field("tracker", &self.tracker)
            .field("cycle", &self.cycle)
            .field("schedule", &self.schedule)
            .finish_non_exhaustive()
    }
}
