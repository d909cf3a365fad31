//! Domain model for a task in the catalog.
use serde::{Deserialize, Serialize};
use shared::TaskCategory;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub reward: u32,
    pub category: TaskCategory,
    #[serde(default)]
    pub is_custom: bool,
    #[serde(default)]
    pub requires_proof: bool,
    #[serde(default)]
    pub icon: String,
}

impl Task {
    pub fn generate_id(epoch_millis: i64) -> String {
        format!("task::{}", epoch_millis)
    }
}

/// Tasks seeded on first run
pub fn default_tasks() -> Vec<Task> {
    let seed = |id: &str, title: &str, description: &str, reward, category, requires_proof, icon: &str| Task {
        id: id.to_string(),
        title: title.to_string(),
        description: description.to_string(),
        reward,
        category,
        is_custom: false,
        requires_proof,
        icon: icon.to_string(),
    };
    vec![
        seed("t1", "閱讀課外書", "閱讀 30 分鐘", 15, TaskCategory::Reading, true, "book"),
        seed("t2", "戶外運動", "戶外玩耍 1 小時", 20, TaskCategory::Outdoor, true, "sun"),
        seed("t3", "整理餐具", "將乾淨的碗盤歸位", 5, TaskCategory::Chore, false, "home"),
        seed("t4", "數學練習", "完成一頁練習卷", 10, TaskCategory::Study, true, "pen"),
    ]
}

/// Candidate task proposed by the advisory service, not yet in the catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskDraft {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub reward: u32,
    /// Free text from the model; parsed leniently on acceptance
    #[serde(default)]
    pub category: String,
}

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum TaskValidationError {
    #[error("Title cannot be empty")]
    EmptyTitle,
    #[error("Reward must be positive")]
    NonPositiveReward,
}

/// Fields of a task that a parent may change after creation
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub reward: Option<u32>,
    pub category: Option<TaskCategory>,
    pub requires_proof: Option<bool>,
    pub icon: Option<String>,
}

impl TaskPatch {
    pub fn validate(&self) -> Result<(), TaskValidationError> {
        if let Some(title) = &self.title {
            if title.trim().is_empty() {
                return Err(TaskValidationError::EmptyTitle);
            }
        }
        if self.reward == Some(0) {
            return Err(TaskValidationError::NonPositiveReward);
        }
        Ok(())
    }

    /// Apply the patch. Callers validate first.
    pub fn apply_to(self, task: &mut Task) {
        if let Some(title) = self.title {
            task.title = title.trim().to_string();
        }
        if let Some(description) = self.description {
            task.description = description;
        }
        if let Some(reward) = self.reward {
            task.reward = reward;
        }
        if let Some(category) = self.category {
            task.category = category;
        }
        if let Some(requires_proof) = self.requires_proof {
            task.requires_proof = requires_proof;
        }
        if let Some(icon) = self.icon {
            task.icon = icon;
        }
    }
}
