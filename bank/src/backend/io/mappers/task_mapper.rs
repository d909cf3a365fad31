use crate::backend::domain::commands::tasks::CreateTaskCommand;
use crate::backend::domain::models::{Task as DomainTask, TaskDraft, TaskPatch};
use shared::{CreateTaskRequest, Task as SharedTask, TaskListResponse, TaskSuggestion, UpdateTaskRequest};

/// Mapper between shared task DTOs and the domain catalog types.
pub struct TaskMapper;

impl TaskMapper {
    pub fn to_dto(domain: DomainTask) -> SharedTask {
        SharedTask {
            id: domain.id,
            title: domain.title,
            description: domain.description,
            reward: domain.reward,
            category: domain.category,
            is_custom: domain.is_custom,
            requires_proof: domain.requires_proof,
            icon: domain.icon,
        }
    }

    pub fn to_list_dto(tasks: Vec<DomainTask>) -> TaskListResponse {
        TaskListResponse {
            tasks: tasks.into_iter().map(Self::to_dto).collect(),
        }
    }

    pub fn to_create_command(request: CreateTaskRequest) -> CreateTaskCommand {
        CreateTaskCommand {
            title: request.title,
            description: request.description,
            reward: request.reward,
            category: request.category,
        }
    }

    pub fn to_patch(request: UpdateTaskRequest) -> TaskPatch {
        TaskPatch {
            title: request.title,
            description: request.description,
            reward: request.reward,
            category: request.category,
            requires_proof: request.requires_proof,
            icon: request.icon,
        }
    }

    pub fn to_suggestion_dto(draft: TaskDraft) -> TaskSuggestion {
        TaskSuggestion {
            title: draft.title,
            description: draft.description,
            reward: draft.reward,
            category: draft.category,
        }
    }

    pub fn to_draft(suggestion: TaskSuggestion) -> TaskDraft {
        TaskDraft {
            title: suggestion.title,
            description: suggestion.description,
            reward: suggestion.reward,
            category: suggestion.category,
        }
    }
}
