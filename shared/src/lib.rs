use serde::{Deserialize, Serialize};
use std::fmt;

/// Role of an account within the family
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    Parent,
    Child,
}

/// Category of a task, serialized with the names the web client stores
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TaskCategory {
    Reading,
    Outdoor,
    Chore,
    Study,
    Health,
    Other,
}

impl TaskCategory {
    pub const ALL: [TaskCategory; 6] = [
        TaskCategory::Reading,
        TaskCategory::Outdoor,
        TaskCategory::Chore,
        TaskCategory::Study,
        TaskCategory::Health,
        TaskCategory::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TaskCategory::Reading => "Reading",
            TaskCategory::Outdoor => "Outdoor",
            TaskCategory::Chore => "Chore",
            TaskCategory::Study => "Study",
            TaskCategory::Health => "Health",
            TaskCategory::Other => "Other",
        }
    }

    /// Parse a category name case-insensitively, falling back to `Other`
    /// for anything unrecognised (suggestions come from free-form text).
    pub fn parse_lenient(value: &str) -> TaskCategory {
        let wanted = value.trim();
        Self::ALL
            .iter()
            .copied()
            .find(|c| c.as_str().eq_ignore_ascii_case(wanted))
            .unwrap_or(TaskCategory::Other)
    }
}

impl fmt::Display for TaskCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Direction of a ledger event. Amounts are always non-negative;
/// the direction lives here rather than in the sign.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TransactionType {
    Earn,
    Spend,
    Adjustment,
}

impl TransactionType {
    /// Signed delta used when replaying the log.
    /// Adjustments carry no direction and replay as zero.
    pub fn signed_delta(&self, amount: u32) -> i64 {
        match self {
            TransactionType::Earn => amount as i64,
            TransactionType::Spend => -(amount as i64),
            TransactionType::Adjustment => 0,
        }
    }
}

/// Lifecycle state of a proof submission
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ProofStatus {
    Pending,
    Approved,
    Rejected,
}

/// Logged-in user as seen by the presentation layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentUser {
    pub id: String,
    pub name: String,
    pub role: Role,
    pub avatar: String,
}

/// Child ledger state for display
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChildProfile {
    pub id: String,
    pub name: String,
    pub avatar: String,
    /// Spendable minutes
    pub balance: u32,
    /// Lifetime earned minutes
    pub total_earned: u32,
    pub level: u32,
    pub is_locked: bool,
    pub weekly_allowance: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChildListResponse {
    pub children: Vec<ChildProfile>,
}

/// A ledger transaction for display
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: String,
    pub account_id: String,
    pub amount: u32,
    pub description: String,
    /// RFC 3339 timestamp
    pub timestamp: String,
    pub transaction_type: TransactionType,
    pub category: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionListResponse {
    pub transactions: Vec<Transaction>,
}

/// Result of replaying a child's log against the stored balance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReconciliationResponse {
    pub account_id: String,
    pub replayed_balance: i64,
    pub actual_balance: u32,
    pub discrepancy: i64,
    pub transaction_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    pub title: String,
    pub description: String,
    pub reward: u32,
    pub category: TaskCategory,
    pub is_custom: bool,
    pub requires_proof: bool,
    pub icon: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskListResponse {
    pub tasks: Vec<Task>,
}

/// Request for creating a task from the parent form
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateTaskRequest {
    pub title: String,
    pub description: String,
    pub reward: u32,
    pub category: TaskCategory,
}

/// Partial task update; `None` fields are left untouched
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UpdateTaskRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub reward: Option<u32>,
    pub category: Option<TaskCategory>,
    pub requires_proof: Option<bool>,
    pub icon: Option<String>,
}

/// Candidate task produced by the suggestion service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskSuggestion {
    pub title: String,
    pub description: String,
    pub reward: u32,
    pub category: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Proof {
    pub id: String,
    pub task_id: String,
    pub child_id: String,
    pub task_title: String,
    pub reward: u32,
    /// RFC 3339 timestamp
    pub timestamp: String,
    pub image_url: Option<String>,
    pub notes: Option<String>,
    pub status: ProofStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PendingProofsResponse {
    pub proofs: Vec<Proof>,
}

/// Request for submitting proof of a completed task
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmitProofRequest {
    pub task_id: String,
    pub image_url: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecideProofRequest {
    pub proof_id: String,
    pub approved: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecideProofResponse {
    /// `None` when the proof was no longer pending
    pub status: Option<ProofStatus>,
    pub transaction: Option<Transaction>,
    pub success_message: String,
}

/// Advisory score for a proof photo
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProofAnalysis {
    pub score: u8,
    pub comment: String,
}

/// Parent-issued reward or penalty
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdjustBalanceRequest {
    pub child_id: String,
    pub amount: u32,
    pub reason: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdjustBalanceResponse {
    pub transaction: Transaction,
    pub new_balance: u32,
    pub success_message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoginRequest {
    pub account_id: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoginResponse {
    pub user: CurrentUser,
    pub success_message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChangePasswordRequest {
    pub old_password: String,
    pub new_password: String,
    pub confirm_password: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AddMemberRequest {
    pub name: String,
    pub avatar: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StartSessionRequest {
    pub app_name: String,
}

/// Live usage session as seen by the child
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionStatus {
    pub active: bool,
    pub app_name: Option<String>,
    pub elapsed_seconds: u64,
    pub charged_minutes: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetroactiveUsageRequest {
    pub app_name: String,
    pub minutes: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AllowedApp {
    pub name: String,
    pub rule: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AllowedAppListResponse {
    pub apps: Vec<AllowedApp>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AddAllowedAppRequest {
    pub name: String,
    pub rule: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FamilySettings {
    pub exchange_rate: u32,
    pub weekday_curfew_start: String,
    pub weekday_curfew_end: String,
    pub weekend_curfew_start: String,
    pub weekend_curfew_end: String,
}

/// Partial settings update; `None` fields are left untouched
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UpdateSettingsRequest {
    pub exchange_rate: Option<u32>,
    pub weekday_curfew_start: Option<String>,
    pub weekday_curfew_end: Option<String>,
    pub weekend_curfew_start: Option<String>,
    pub weekend_curfew_end: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_task_category_parse_lenient() {
        assert_eq!(TaskCategory::parse_lenient("Reading"), TaskCategory::Reading);
        assert_eq!(TaskCategory::parse_lenient(" outdoor "), TaskCategory::Outdoor);
        assert_eq!(TaskCategory::parse_lenient("HEALTH"), TaskCategory::Health);
        assert_eq!(TaskCategory::parse_lenient("Cooking"), TaskCategory::Other);
        assert_eq!(TaskCategory::parse_lenient(""), TaskCategory::Other);
    }

    #[test]
    fn test_task_category_serializes_with_stored_names() {
        let json = serde_json::to_string(&TaskCategory::Chore).unwrap();
        assert_eq!(json, "\"Chore\"");
        assert_eq!(TaskCategory::Study.to_string(), "Study");
    }

    #[test]
    fn test_transaction_type_signed_delta() {
        assert_eq!(TransactionType::Earn.signed_delta(15), 15);
        assert_eq!(TransactionType::Spend.signed_delta(20), -20);
        assert_eq!(TransactionType::Adjustment.signed_delta(7), 0);
    }

    #[test]
    fn test_enum_wire_names() {
        assert_eq!(serde_json::to_string(&Role::Parent).unwrap(), "\"PARENT\"");
        assert_eq!(serde_json::to_string(&TransactionType::Spend).unwrap(), "\"SPEND\"");
        assert_eq!(serde_json::to_string(&ProofStatus::Pending).unwrap(), "\"PENDING\"");
        let role: Role = serde_json::from_str("\"CHILD\"").unwrap();
        assert_eq!(role, Role::Child);
    }
}
