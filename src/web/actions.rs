// ABOUTME: Stop/delete job triggers posting the job id to the experiment server
// Fire-and-forget: confirmed once, sent once, response logged, never retried

use serde::Serialize;
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
pub enum ActionError {
    #[error("Request failed: {0}")]
    Http(#[from] reqwest::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobAction {
    Stop,
    Delete,
}

impl JobAction {
    pub const fn route(self) -> &'static str {
        match self {
            Self::Stop => "stop_job",
            Self::Delete => "delete_job",
        }
    }

    pub const fn verb(self) -> &'static str {
        match self {
            Self::Stop => "Stop",
            Self::Delete => "Delete",
        }
    }

    pub const fn gerund(self) -> &'static str {
        match self {
            Self::Stop => "stopping",
            Self::Delete => "deleting",
        }
    }

    /// Question shown before anything is sent
    pub fn prompt(self, job_id: &str) -> String {
        format!("{} experiment {}?", self.verb(), job_id)
    }
}

#[derive(Serialize)]
struct JobRequest<'a> {
    id: &'a str,
}

pub struct JobActionClient {
    http: reqwest::Client,
    base_url: String,
}

impl JobActionClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn url(&self, action: JobAction) -> String {
        format!("{}/{}", self.base_url, action.route())
    }

    /// Ask `confirm`; on approval post `{"id": job_id}` once and log the response body.
    /// Returns `None` when the user declined.
    pub async fn trigger<F>(
        &self,
        action: JobAction,
        job_id: &str,
        confirm: F,
    ) -> Result<Option<String>, ActionError>
    where
        F: FnOnce(&str) -> bool,
    {
        if !confirm(&action.prompt(job_id)) {
            info!("Not {} {}", action.gerund(), job_id);
            return Ok(None);
        }

        info!("{} experiment {}", action.verb(), job_id);
        let body = self
            .http
            .post(self.url(action))
            .json(&JobRequest { id: job_id })
            .send()
            .await?
            .text()
            .await?;
        info!("{} {} response: {}", action.route(), job_id, body);
        Ok(Some(body))
    }
}
