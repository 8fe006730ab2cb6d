//! Agent startup
//!
//! Wires the transport, the publisher, and the agent together.

use crate::agent::Agent;
use crate::publisher::{NotesPublisher, ReportPublisher};
use crate::transport::StreamTransport;
use std::sync::Arc;
use std::time::Duration;
use tally_common::{AppConfig, AppResult};

/// Generate a new session ID
#[must_use]
pub fn generate_session_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// Run the agent against a custom publisher
pub async fn run_with_publisher(
    config: AppConfig,
    publisher: Arc<dyn ReportPublisher>,
) -> AppResult<()> {
    let session_id = generate_session_id();

    tracing::info!(
        domain = %config.instance.domain,
        session_id = %session_id,
        targets = config.tally.target_emojis.len(),
        count_all_origins = config.tally.count_all_origins,
        "Starting reaction tally agent"
    );

    let transport = StreamTransport::spawn(
        config.instance.streaming_url(),
        Duration::from_millis(config.transport.reconnect_delay_ms),
    );

    let agent = Agent::new(session_id, &config, transport.commands, publisher);
    let result = agent.run(transport.events).await;

    transport.task.abort();
    result
}

/// Run the agent with configuration
pub async fn run(config: AppConfig) -> AppResult<()> {
    let publisher = Arc::new(NotesPublisher::new(&config.instance));
    run_with_publisher(config, publisher).await
}
