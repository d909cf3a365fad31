//! Domain model for a task-completion claim awaiting a parent decision.
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shared::ProofStatus;
use uuid::Uuid;

/// Title and reward are copied from the task at submission time so the claim
/// stays displayable after the task is edited or deleted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Proof {
    pub id: String,
    pub task_id: String,
    pub child_id: String,
    pub task_title: String,
    pub reward: u32,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub status: ProofStatus,
}

impl Proof {
    pub fn generate_id(timestamp_ms: i64) -> String {
        let suffix = Uuid::new_v4().simple().to_string();
        format!("proof::{}::{}", timestamp_ms, &suffix[..8])
    }

    pub fn is_pending(&self) -> bool {
        self.status == ProofStatus::Pending
    }
}
