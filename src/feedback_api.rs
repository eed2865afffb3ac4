use std::time::Duration;

use anyhow::{Context, Result};
use log::debug;
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum FeedbackKind {
    Positive,
    Negative,
}

/// One feedback record, as POSTed to (and read back from) the feedback REST
/// API. `id` and `created_at` are assigned server-side and only present on
/// records fetched back.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct FeedbackRecord {
    #[serde(rename = "type")]
    pub kind: FeedbackKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

impl FeedbackRecord {
    /// The bare record a positive gesture submits immediately
    pub fn positive() -> FeedbackRecord {
        FeedbackRecord {
            kind: FeedbackKind::Positive,
            name: None,
            email: None,
            message: None,
            id: None,
            created_at: None,
        }
    }
}

/// Thin blocking client for the feedback REST API
pub struct FeedbackClient {
    agent: ureq::Agent,
    base_url: String,
}

impl FeedbackClient {
    pub fn new(base_url: &str) -> FeedbackClient {
        FeedbackClient {
            agent: ureq::AgentBuilder::new()
                .timeout(Duration::from_secs(5))
                .build(),
            base_url: String::from(base_url.trim_end_matches('/')),
        }
    }

    pub fn create_feedback(&self, record: &FeedbackRecord) -> Result<()> {
        let url = format!("{}/feedback", self.base_url);
        debug!("POST {}: {:?}", url, record);
        self.agent
            .post(&url)
            .send_json(record)
            .with_context(|| format!("failed to POST feedback record to {}", url))?;
        Ok(())
    }

    pub fn list_feedbacks(&self) -> Result<Vec<FeedbackRecord>> {
        let url = format!("{}/feedbacks", self.base_url);
        let records: Vec<FeedbackRecord> = self
            .agent
            .get(&url)
            .call()
            .with_context(|| format!("failed to GET {}", url))?
            .into_json()
            .context("failed to decode feedbacks response")?;
        Ok(records)
    }
}
