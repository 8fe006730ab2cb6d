//! Note creation client

use async_trait::async_trait;
use serde::Serialize;
use tally_common::InstanceConfig;

/// Visibility of report notes
pub const REPORT_VISIBILITY: &str = "public";

/// Error type for publish operations
#[derive(Debug, thiserror::Error)]
pub enum PublishError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Unexpected status: {0}")]
    UnexpectedStatus(u16),
}

/// Publishes a report text
#[async_trait]
pub trait ReportPublisher: Send + Sync {
    /// Publish the text once; callers do not retry
    async fn publish(&self, text: &str) -> Result<(), PublishError>;
}

#[derive(Debug, Serialize)]
struct CreateNoteRequest<'a> {
    i: &'a str,
    visibility: &'a str,
    text: &'a str,
}

/// Creates notes through `api/notes/create`
#[derive(Clone)]
pub struct NotesPublisher {
    client: reqwest::Client,
    url: String,
    token: String,
}

impl NotesPublisher {
    pub fn new(instance: &InstanceConfig) -> Self {
        Self::with_client(reqwest::Client::new(), instance)
    }

    pub fn with_client(client: reqwest::Client, instance: &InstanceConfig) -> Self {
        Self {
            client,
            url: instance.notes_create_url(),
            token: instance.token.clone(),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

impl std::fmt::Debug for NotesPublisher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NotesPublisher")
            .field("url", &self.url)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl ReportPublisher for NotesPublisher {
    async fn publish(&self, text: &str) -> Result<(), PublishError> {
        let request = CreateNoteRequest {
            i: &self.token,
            visibility: REPORT_VISIBILITY,
            text,
        };

        let response = self.client.post(&self.url).json(&request).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(PublishError::UnexpectedStatus(status.as_u16()));
        }

        tracing::debug!(status = status.as_u16(), "Report note created");
        Ok(())
    }
}
