use log::{info, warn};
use shared::TaskCategory;
use std::sync::Arc;

use crate::backend::domain::clock::Clock;
use crate::backend::domain::commands::tasks::CreateTaskCommand;
use crate::backend::domain::errors::BankError;
use crate::backend::domain::models::{Task, TaskDraft, TaskPatch, TaskValidationError};
use crate::backend::storage::StateStore;

/// Icon given to tasks created by a parent or accepted from a suggestion
pub const CUSTOM_TASK_ICON: &str = "star";

/// Service for the family's task catalog
#[derive(Clone)]
pub struct TaskService {
    store: Arc<StateStore>,
    clock: Arc<dyn Clock>,
}

impl TaskService {
    pub fn new(store: Arc<StateStore>, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    /// Tasks in insertion order
    pub fn list(&self) -> Result<Vec<Task>, BankError> {
        Ok(self.store.read(|state| state.tasks.clone())?)
    }

    pub fn get(&self, task_id: &str) -> Result<Task, BankError> {
        self.store
            .read(|state| state.task(task_id).cloned())?
            .ok_or_else(|| BankError::TaskNotFound(task_id.to_string()))
    }

    /// Store a task as given. No validation happens here; an odd task only
    /// looks wrong, it never breaks the workflow.
    pub fn add(&self, task: Task) -> Result<Task, BankError> {
        info!("Adding task '{}' ({} minutes)", task.title, task.reward);
        self.store.mutate(|state| state.tasks.push(task.clone()))?;
        Ok(task)
    }

    /// Remove a task. Proofs already submitted against it are unaffected.
    pub fn remove(&self, task_id: &str) -> Result<Task, BankError> {
        let removed = self.store.mutate(|state| {
            let index = state.tasks.iter().position(|t| t.id == task_id)?;
            Some(state.tasks.remove(index))
        })?;
        match removed {
            Some(task) => {
                info!("Removed task {} ('{}')", task.id, task.title);
                Ok(task)
            }
            None => {
                warn!("Task not found: {}", task_id);
                Err(BankError::TaskNotFound(task_id.to_string()))
            }
        }
    }

    /// Create a parent-authored task from the task form
    pub fn create_task(&self, command: CreateTaskCommand) -> Result<Task, BankError> {
        let title = command.title.trim().to_string();
        if title.is_empty() {
            return Err(TaskValidationError::EmptyTitle.into());
        }
        if command.reward == 0 {
            return Err(TaskValidationError::NonPositiveReward.into());
        }
        self.add_custom(title, command.description, command.reward, command.category)
    }

    /// Turn an advisory suggestion into a catalog task
    pub fn accept_suggestion(&self, draft: TaskDraft) -> Result<Task, BankError> {
        let category = TaskCategory::parse_lenient(&draft.category);
        self.add_custom(draft.title.trim().to_string(), draft.description, draft.reward, category)
    }

    pub fn update_task(&self, task_id: &str, patch: TaskPatch) -> Result<Task, BankError> {
        patch.validate()?;
        let updated = self.store.mutate(|state| {
            let task = state.tasks.iter_mut().find(|t| t.id == task_id)?;
            patch.apply_to(task);
            Some(task.clone())
        })?;
        let task = updated.ok_or_else(|| {
            warn!("Task not found: {}", task_id);
            BankError::TaskNotFound(task_id.to_string())
        })?;
        info!("Updated task {}", task.id);
        Ok(task)
    }

    fn add_custom(&self, title: String, description: String, reward: u32, category: TaskCategory) -> Result<Task, BankError> {
        let base_id = Task::generate_id(self.clock.now().timestamp_millis());
        let task = self.store.mutate(|state| {
            // ids are millisecond based; keep them unique within the catalog
            let id = if state.task(&base_id).is_some() {
                format!("{}::{}", base_id, uuid::Uuid::new_v4().simple())
            } else {
                base_id
            };
            let task = Task {
                id,
                title,
                description,
                reward,
                category,
                is_custom: true,
                requires_proof: true,
                icon: CUSTOM_TASK_ICON.to_string(),
            };
            state.tasks.push(task.clone());
            task
        })?;
        info!("Added custom task {} ('{}', {} minutes)", task.id, task.title, task.reward);
        Ok(task)
    }
}
