//! # Time Bank API
//!
//! The single surface the presentation layer talks to. Every call takes and
//! returns DTOs from the `shared` crate; domain types stay behind this line.
//!
//! Mutating calls check the logged-in user's role first and fail with
//! `BankError::AccessDenied` before touching any state:
//!
//! - parent only: members, tasks, proof decisions, rewards and penalties,
//!   locks, settings, allowed apps, password resets, advisory calls
//! - child only, acting on itself: proof submission, sessions, retroactive
//!   usage entries
//!
//! Reads are open to any caller, since the login screen needs them.

use log::{info, warn};
use shared::{
    AddAllowedAppRequest, AddMemberRequest, AdjustBalanceRequest, AdjustBalanceResponse, AllowedAppListResponse,
    ChangePasswordRequest, ChildListResponse, ChildProfile, CreateTaskRequest, CurrentUser, DecideProofRequest,
    DecideProofResponse, FamilySettings, LoginRequest, LoginResponse, PendingProofsResponse, Proof, ProofAnalysis,
    ReconciliationResponse, RetroactiveUsageRequest, Role, SessionStatus, StartSessionRequest, SubmitProofRequest,
    Task, TaskListResponse, TaskSuggestion, TransactionListResponse, UpdateSettingsRequest, UpdateTaskRequest,
};

use crate::backend::domain::advisory_service::{AdvisoryService, ANALYSIS_EMPTY_COMMENT};
use crate::backend::domain::commands::ledger::CreateChildCommand;
use crate::backend::domain::commands::proofs::SubmitProofCommand;
use crate::backend::domain::errors::{BankError, SessionStartError};
use crate::backend::domain::models::Account;
use crate::backend::domain::{
    IdentityService, LedgerService, ProofService, SessionService, SettingsService, TaskService,
    TransactionLogService,
};
use crate::backend::io::mappers::{
    AccountMapper, ProofMapper, SessionMapper, SettingsMapper, TaskMapper, TransactionMapper,
};

#[derive(Clone)]
pub struct TimeBankApi {
    identity: IdentityService,
    ledger: LedgerService,
    transactions: TransactionLogService,
    proofs: ProofService,
    tasks: TaskService,
    sessions: SessionService,
    settings: SettingsService,
    advisory: AdvisoryService,
}

impl TimeBankApi {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        identity: IdentityService,
        ledger: LedgerService,
        transactions: TransactionLogService,
        proofs: ProofService,
        tasks: TaskService,
        sessions: SessionService,
        settings: SettingsService,
        advisory: AdvisoryService,
    ) -> Self {
        Self {
            identity,
            ledger,
            transactions,
            proofs,
            tasks,
            sessions,
            settings,
            advisory,
        }
    }

    // ---- identity ----

    pub fn login(&self, request: LoginRequest) -> Result<LoginResponse, BankError> {
        let account = self.identity.login(&request.account_id, &request.password)?;
        Ok(AccountMapper::to_login_dto(&account))
    }

    pub fn logout(&self) -> Result<(), BankError> {
        self.identity.logout()
    }

    pub fn current_user(&self) -> Result<Option<CurrentUser>, BankError> {
        Ok(self.identity.current_user()?.as_ref().map(AccountMapper::to_current_user))
    }

    /// Parent switches the view to another account without its password
    pub fn switch_user(&self, account_id: &str) -> Result<CurrentUser, BankError> {
        self.identity.require_role(Role::Parent)?;
        let account = self.identity.switch_user(account_id)?;
        Ok(AccountMapper::to_current_user(&account))
    }

    /// Change the logged-in user's own password
    pub fn change_password(&self, request: ChangePasswordRequest) -> Result<(), BankError> {
        let user = self.logged_in()?;
        self.identity.change_password(
            user.id(),
            &request.old_password,
            &request.new_password,
            &request.confirm_password,
        )
    }

    /// Parent resets any account's password
    pub fn reset_password(&self, account_id: &str, new_password: &str) -> Result<(), BankError> {
        self.identity.require_role(Role::Parent)?;
        if new_password.is_empty() {
            return Err(BankError::PasswordMismatch);
        }
        self.identity.rotate_credential(account_id, new_password)
    }

    // ---- accounts ----

    pub fn list_children(&self) -> Result<ChildListResponse, BankError> {
        Ok(AccountMapper::to_child_list_dto(self.ledger.list_children()?))
    }

    pub fn get_child(&self, child_id: &str) -> Result<ChildProfile, BankError> {
        Ok(AccountMapper::to_child_dto(self.ledger.get_child(child_id)?))
    }

    pub fn parent(&self) -> Result<CurrentUser, BankError> {
        let parent = self.ledger.parent_profile()?;
        Ok(AccountMapper::to_current_user(&Account::Parent(parent)))
    }

    pub fn add_member(&self, request: AddMemberRequest) -> Result<ChildProfile, BankError> {
        self.identity.require_role(Role::Parent)?;
        let child = self.ledger.create_account(CreateChildCommand {
            name: request.name,
            avatar: request.avatar,
        })?;
        Ok(AccountMapper::to_child_dto(child))
    }

    pub fn delete_member(&self, child_id: &str) -> Result<ChildProfile, BankError> {
        self.identity.require_role(Role::Parent)?;
        let child = self.ledger.delete_account(child_id)?;
        // a removed child cannot keep a session running
        self.sessions.tick(child_id)?;
        Ok(AccountMapper::to_child_dto(child))
    }

    pub fn reward(&self, request: AdjustBalanceRequest) -> Result<AdjustBalanceResponse, BankError> {
        self.identity.require_role(Role::Parent)?;
        let result = self.ledger.reward(&request.child_id, request.amount, request.reason)?;
        let message = format!("已獎勵 {} 分鐘", request.amount);
        Ok(TransactionMapper::to_adjust_response_dto(result, &message))
    }

    pub fn penalize(&self, request: AdjustBalanceRequest) -> Result<AdjustBalanceResponse, BankError> {
        self.identity.require_role(Role::Parent)?;
        let result = self.ledger.penalize(&request.child_id, request.amount, request.reason)?;
        // an emptied balance stops a running session right away
        self.sessions.tick(&request.child_id)?;
        let message = format!("已扣除 {} 分鐘", request.amount);
        Ok(TransactionMapper::to_adjust_response_dto(result, &message))
    }

    pub fn set_locked(&self, child_id: &str, locked: bool) -> Result<ChildProfile, BankError> {
        self.identity.require_role(Role::Parent)?;
        let child = self.ledger.set_locked(child_id, locked)?;
        self.sessions.tick(child_id)?;
        Ok(AccountMapper::to_child_dto(child))
    }

    pub fn toggle_lock(&self, child_id: &str) -> Result<ChildProfile, BankError> {
        self.identity.require_role(Role::Parent)?;
        let child = self.ledger.toggle_lock(child_id)?;
        self.sessions.tick(child_id)?;
        Ok(AccountMapper::to_child_dto(child))
    }

    // ---- transactions ----

    pub fn transactions(&self, child_id: &str) -> Result<TransactionListResponse, BankError> {
        Ok(TransactionMapper::to_list_dto(self.transactions.list_for_display(child_id)?))
    }

    pub fn reconcile(&self, child_id: &str) -> Result<ReconciliationResponse, BankError> {
        Ok(TransactionMapper::to_reconciliation_dto(self.transactions.reconcile(child_id)?))
    }

    // ---- tasks ----

    pub fn list_tasks(&self) -> Result<TaskListResponse, BankError> {
        Ok(TaskMapper::to_list_dto(self.tasks.list()?))
    }

    pub fn create_task(&self, request: CreateTaskRequest) -> Result<Task, BankError> {
        self.identity.require_role(Role::Parent)?;
        let task = self.tasks.create_task(TaskMapper::to_create_command(request))?;
        Ok(TaskMapper::to_dto(task))
    }

    pub fn update_task(&self, task_id: &str, request: UpdateTaskRequest) -> Result<Task, BankError> {
        self.identity.require_role(Role::Parent)?;
        let task = self.tasks.update_task(task_id, TaskMapper::to_patch(request))?;
        Ok(TaskMapper::to_dto(task))
    }

    pub fn delete_task(&self, task_id: &str) -> Result<Task, BankError> {
        self.identity.require_role(Role::Parent)?;
        Ok(TaskMapper::to_dto(self.tasks.remove(task_id)?))
    }

    pub fn accept_suggestion(&self, suggestion: TaskSuggestion) -> Result<Task, BankError> {
        self.identity.require_role(Role::Parent)?;
        let task = self.tasks.accept_suggestion(TaskMapper::to_draft(suggestion))?;
        Ok(TaskMapper::to_dto(task))
    }

    // ---- proofs ----

    pub fn pending_proofs(&self) -> Result<PendingProofsResponse, BankError> {
        Ok(ProofMapper::to_pending_dto(self.proofs.list_pending()?))
    }

    /// Child claims a task from the catalog
    pub fn submit_proof(&self, request: SubmitProofRequest) -> Result<Proof, BankError> {
        let child = self.identity.require_role(Role::Child)?;
        let task = self.tasks.get(&request.task_id)?;
        let proof = self.proofs.submit(SubmitProofCommand {
            child_id: child.id().to_string(),
            task_id: task.id,
            task_title: task.title,
            reward: task.reward,
            image_url: request.image_url,
            notes: request.notes,
        })?;
        Ok(ProofMapper::to_dto(proof))
    }

    pub fn decide_proof(&self, request: DecideProofRequest) -> Result<DecideProofResponse, BankError> {
        self.identity.require_role(Role::Parent)?;
        let decision = self.proofs.decide(&request.proof_id, request.approved)?;
        Ok(ProofMapper::to_decision_dto(decision))
    }

    // ---- sessions ----

    pub fn start_session(&self, request: StartSessionRequest) -> Result<SessionStatus, BankError> {
        let child = self.identity.require_role(Role::Child)?;
        let snapshot = self.sessions.start_session(child.id(), &request.app_name)?;
        Ok(SessionMapper::to_status_dto(Some(snapshot)))
    }

    pub fn stop_session(&self) -> Result<SessionStatus, BankError> {
        let child = self.identity.require_role(Role::Child)?;
        self.sessions.stop_session(child.id())?;
        Ok(SessionMapper::to_status_dto(None))
    }

    pub fn session_status(&self, child_id: &str) -> Result<SessionStatus, BankError> {
        Ok(SessionMapper::to_status_dto(self.sessions.status(child_id)?))
    }

    pub fn record_retroactive(&self, request: RetroactiveUsageRequest) -> Result<AdjustBalanceResponse, BankError> {
        let child = self.identity.require_role(Role::Child)?;
        if request.app_name.trim().is_empty() {
            return Err(SessionStartError::NoAppSelected.into());
        }
        let result = self
            .sessions
            .record_retroactive(child.id(), &request.app_name, request.minutes)?;
        self.sessions.tick(child.id())?;
        Ok(TransactionMapper::to_adjust_response_dto(result, "補登成功！"))
    }

    // ---- settings ----

    pub fn settings(&self) -> Result<FamilySettings, BankError> {
        Ok(SettingsMapper::to_dto(self.settings.get_settings()?))
    }

    pub fn update_settings(&self, request: UpdateSettingsRequest) -> Result<FamilySettings, BankError> {
        self.identity.require_role(Role::Parent)?;
        let settings = self.settings.update_settings(SettingsMapper::to_patch(request))?;
        Ok(SettingsMapper::to_dto(settings))
    }

    pub fn allowed_apps(&self) -> Result<AllowedAppListResponse, BankError> {
        Ok(SettingsMapper::to_app_list_dto(self.settings.list_allowed_apps()?))
    }

    /// Returns false when the app was already listed
    pub fn add_allowed_app(&self, request: AddAllowedAppRequest) -> Result<bool, BankError> {
        self.identity.require_role(Role::Parent)?;
        self.settings.add_allowed_app(&request.name, request.rule.as_deref())
    }

    pub fn remove_allowed_app(&self, name: &str) -> Result<bool, BankError> {
        self.identity.require_role(Role::Parent)?;
        self.settings.remove_allowed_app(name)
    }

    // ---- advisory ----

    pub async fn weekly_report(&self, child_id: &str) -> Result<String, BankError> {
        self.identity.require_role(Role::Parent)?;
        let child = self.ledger.get_child(child_id)?;
        let transactions = self.transactions.list_for_display(child_id)?;
        info!("Requesting report for {} over {} transactions", child_id, transactions.len());
        Ok(self.advisory.generate_report(&child.name, &transactions).await)
    }

    pub async fn suggest_tasks(&self, interest: &str) -> Result<Vec<TaskSuggestion>, BankError> {
        self.identity.require_role(Role::Parent)?;
        let drafts = self.advisory.suggest_tasks(interest).await;
        Ok(drafts.into_iter().map(TaskMapper::to_suggestion_dto).collect())
    }

    /// Score a pending proof's photo. The proof stays pending either way.
    pub async fn analyze_proof(&self, proof_id: &str) -> Result<ProofAnalysis, BankError> {
        self.identity.require_role(Role::Parent)?;
        let proof = self
            .proofs
            .get_pending(proof_id)?
            .ok_or_else(|| BankError::ProofNotFound(proof_id.to_string()))?;
        let Some(image) = proof.image_url.as_deref() else {
            warn!("Proof {} has no image to analyze", proof_id);
            return Ok(ProofAnalysis { score: 0, comment: ANALYSIS_EMPTY_COMMENT.to_string() });
        };
        let assessment = self.advisory.analyze_proof(image, &proof.task_title).await;
        Ok(ProofMapper::to_analysis_dto(assessment))
    }

    fn logged_in(&self) -> Result<Account, BankError> {
        self.identity.current_user()?.ok_or_else(|| {
            warn!("Attempted an operation without logging in");
            BankError::AccessDenied
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Arc;

    use crate::backend::config::BankConfig;
    use crate::backend::domain::errors::AdvisoryError;
    use crate::backend::domain::test_utils::test_start;
    use crate::backend::domain::{AdvisoryClient, AdvisoryRequest, ManualClock};
    use crate::backend::storage::InMemoryKeyValueStore;
    use crate::backend::Backend;

    struct CannedClient(&'static str);

    #[async_trait]
    impl AdvisoryClient for CannedClient {
        async fn generate(&self, _request: AdvisoryRequest) -> Result<Option<String>, AdvisoryError> {
            Ok(Some(self.0.to_string()))
        }
    }

    fn setup_with_client(client: Arc<dyn AdvisoryClient>) -> (Backend, ManualClock) {
        let clock = ManualClock::new(test_start());
        let backend = Backend::with_components(
            BankConfig::default(),
            Arc::new(InMemoryKeyValueStore::new()),
            Arc::new(clock.clone()),
            client,
        )
        .unwrap();
        (backend, clock)
    }

    fn setup() -> (Backend, ManualClock) {
        setup_with_client(Arc::new(CannedClient("")))
    }

    fn login(api: &TimeBankApi, account_id: &str, password: &str) {
        api.login(LoginRequest { account_id: account_id.into(), password: password.into() })
            .unwrap();
    }

    fn adjust(child_id: &str, amount: u32) -> AdjustBalanceRequest {
        AdjustBalanceRequest { child_id: child_id.into(), amount, reason: None }
    }

    #[test]
    fn test_child_cannot_use_parent_operations() {
        let (backend, _clock) = setup();
        let api = backend.api();
        login(api, "c1", "1234");

        assert!(matches!(api.reward(adjust("c1", 30)), Err(BankError::AccessDenied)));
        assert!(matches!(api.toggle_lock("c2"), Err(BankError::AccessDenied)));
        assert!(matches!(api.delete_task("t1"), Err(BankError::AccessDenied)));
        assert!(matches!(
            api.add_member(AddMemberRequest { name: "Zoe".into(), avatar: None }),
            Err(BankError::AccessDenied)
        ));

        assert_eq!(api.get_child("c1").unwrap().balance, 45);
        assert!(!api.get_child("c2").unwrap().is_locked);
        assert_eq!(api.list_tasks().unwrap().tasks.len(), 4);
        assert_eq!(api.list_children().unwrap().children.len(), 2);
    }

    #[test]
    fn test_logged_out_caller_is_denied() {
        let (backend, _clock) = setup();
        let api = backend.api();
        assert!(matches!(api.penalize(adjust("c1", 5)), Err(BankError::AccessDenied)));
        assert!(matches!(
            api.start_session(StartSessionRequest { app_name: "YouTube".into() }),
            Err(BankError::AccessDenied)
        ));

        login(api, "p1", "0000");
        api.logout().unwrap();
        assert!(api.current_user().unwrap().is_none());
        assert!(matches!(api.toggle_lock("c1"), Err(BankError::AccessDenied)));
    }

    #[test]
    fn test_bad_password_does_not_log_in() {
        let (backend, _clock) = setup();
        let api = backend.api();
        let result = api.login(LoginRequest { account_id: "c1".into(), password: "9999".into() });
        assert!(matches!(result, Err(BankError::InvalidCredential)));
        assert!(api.current_user().unwrap().is_none());
    }

    #[test]
    fn test_proof_flow_from_submission_to_approval() {
        let (backend, _clock) = setup();
        let api = backend.api();

        login(api, "c1", "1234");
        let proof = api
            .submit_proof(SubmitProofRequest {
                task_id: "t1".into(),
                image_url: Some("data:image/jpeg;base64,AAAA".into()),
                notes: Some("讀完了".into()),
            })
            .unwrap();
        assert_eq!(proof.reward, 15);
        assert_eq!(proof.child_id, "c1");
        assert!(matches!(
            api.decide_proof(DecideProofRequest { proof_id: proof.id.clone(), approved: true }),
            Err(BankError::AccessDenied)
        ));

        assert!(matches!(api.switch_user("p1"), Err(BankError::AccessDenied)));
        login(api, "p1", "0000");
        assert_eq!(api.pending_proofs().unwrap().proofs.len(), 1);

        let response = api
            .decide_proof(DecideProofRequest { proof_id: proof.id.clone(), approved: true })
            .unwrap();
        assert_eq!(response.transaction.unwrap().amount, 15);
        assert_eq!(api.get_child("c1").unwrap().balance, 60);
        assert!(api.pending_proofs().unwrap().proofs.is_empty());

        let again = api
            .decide_proof(DecideProofRequest { proof_id: proof.id, approved: true })
            .unwrap();
        assert!(again.transaction.is_none());
        assert_eq!(api.get_child("c1").unwrap().balance, 60);
        assert_eq!(api.reconcile("c1").unwrap().discrepancy, 0);
    }

    #[test]
    fn test_session_is_metered_through_the_api() {
        let (backend, clock) = setup();
        let api = backend.api();
        login(api, "c2", "1234");

        let status = api.start_session(StartSessionRequest { app_name: "YouTube".into() }).unwrap();
        assert!(status.active);

        clock.advance_secs(60);
        backend.sessions().tick_all().unwrap();
        assert_eq!(api.get_child("c2").unwrap().balance, 9);
        assert_eq!(api.session_status("c2").unwrap().charged_minutes, 1);

        clock.advance_secs(30);
        let stopped = api.stop_session().unwrap();
        assert!(!stopped.active);
        assert_eq!(api.get_child("c2").unwrap().balance, 9);
    }

    #[test]
    fn test_locking_stops_a_running_session() {
        let (backend, clock) = setup();
        let api = backend.api();
        let mut notices = backend.sessions().subscribe();

        login(api, "c1", "1234");
        api.start_session(StartSessionRequest { app_name: "Minecraft".into() }).unwrap();
        clock.advance_secs(10);

        login(api, "p1", "0000");
        let child = api.set_locked("c1", true).unwrap();
        assert!(child.is_locked);
        assert!(!api.session_status("c1").unwrap().active);
        assert_eq!(api.get_child("c1").unwrap().balance, 45);

        let notice = notices.try_recv().unwrap();
        assert_eq!(notice.child_id, "c1");
        assert_eq!(notice.reason, crate::backend::domain::StopReason::Locked);
    }

    #[test]
    fn test_penalty_that_empties_balance_stops_session() {
        let (backend, _clock) = setup();
        let api = backend.api();
        login(api, "c2", "1234");
        api.start_session(StartSessionRequest { app_name: "YouTube".into() }).unwrap();

        login(api, "p1", "0000");
        let response = api.penalize(adjust("c2", 20)).unwrap();
        assert_eq!(response.new_balance, 0);
        assert_eq!(response.transaction.amount, 20);
        assert!(!api.session_status("c2").unwrap().active);
    }

    #[test]
    fn test_retroactive_usage_requires_an_app() {
        let (backend, _clock) = setup();
        let api = backend.api();
        login(api, "c1", "1234");

        let missing = api.record_retroactive(RetroactiveUsageRequest { app_name: " ".into(), minutes: 5 });
        assert!(matches!(
            missing,
            Err(BankError::SessionRejected(SessionStartError::NoAppSelected))
        ));

        let response = api
            .record_retroactive(RetroactiveUsageRequest { app_name: "Switch".into(), minutes: 5 })
            .unwrap();
        assert_eq!(response.new_balance, 40);
        assert_eq!(api.transactions("c1").unwrap().transactions[0].description, "補登: Switch");
    }

    #[test]
    fn test_change_password_applies_to_the_logged_in_user() {
        let (backend, _clock) = setup();
        let api = backend.api();
        login(api, "c1", "1234");
        api.change_password(ChangePasswordRequest {
            old_password: "1234".into(),
            new_password: "4321".into(),
            confirm_password: "4321".into(),
        })
        .unwrap();
        api.logout().unwrap();

        assert!(api.login(LoginRequest { account_id: "c1".into(), password: "1234".into() }).is_err());
        login(api, "c1", "4321");
    }

    #[test]
    fn test_parent_manages_members_and_tasks() {
        let (backend, _clock) = setup();
        let api = backend.api();
        login(api, "p1", "0000");

        let zoe = api.add_member(AddMemberRequest { name: "Zoe".into(), avatar: None }).unwrap();
        assert_eq!(zoe.balance, 0);
        assert_eq!(api.list_children().unwrap().children.len(), 3);

        let task = api
            .create_task(CreateTaskRequest {
                title: "洗碗".into(),
                description: String::new(),
                reward: 10,
                category: shared::TaskCategory::Chore,
            })
            .unwrap();
        assert!(task.is_custom);
        let renamed = api
            .update_task(&task.id, UpdateTaskRequest { title: Some("洗碗盤".into()), ..Default::default() })
            .unwrap();
        assert_eq!(renamed.title, "洗碗盤");
        api.delete_task(&task.id).unwrap();

        api.delete_member(&zoe.id).unwrap();
        assert!(matches!(api.get_child(&zoe.id), Err(BankError::AccountNotFound(_))));
    }

    #[test]
    fn test_allowed_apps_reject_duplicates() {
        let (backend, _clock) = setup();
        let api = backend.api();
        login(api, "p1", "0000");
        let before = api.allowed_apps().unwrap().apps.len();

        assert!(api.add_allowed_app(AddAllowedAppRequest { name: "Khan Academy".into(), rule: None }).unwrap());
        assert!(!api.add_allowed_app(AddAllowedAppRequest { name: "Khan Academy".into(), rule: None }).unwrap());
        assert_eq!(api.allowed_apps().unwrap().apps.len(), before + 1);
        assert!(api.remove_allowed_app("Khan Academy").unwrap());
    }

    #[tokio::test]
    async fn test_advisory_calls_go_through_the_client() {
        let (backend, _clock) = setup_with_client(Arc::new(CannedClient(r#"{"score": 88, "comment": "很乾淨"}"#)));
        let api = backend.api();

        login(api, "c1", "1234");
        let with_image = api
            .submit_proof(SubmitProofRequest {
                task_id: "t3".into(),
                image_url: Some("data:image/png;base64,AAAA".into()),
                notes: None,
            })
            .unwrap();
        let without_image = api
            .submit_proof(SubmitProofRequest { task_id: "t3".into(), image_url: None, notes: None })
            .unwrap();
        assert!(matches!(api.analyze_proof(&with_image.id).await, Err(BankError::AccessDenied)));

        login(api, "p1", "0000");
        let analysis = api.analyze_proof(&with_image.id).await.unwrap();
        assert_eq!(analysis.score, 88);
        assert_eq!(analysis.comment, "很乾淨");

        let blank = api.analyze_proof(&without_image.id).await.unwrap();
        assert_eq!(blank.score, 0);
        assert_eq!(api.pending_proofs().unwrap().proofs.len(), 2);

        assert!(matches!(api.analyze_proof("missing").await, Err(BankError::ProofNotFound(_))));
    }

    #[tokio::test]
    async fn test_report_falls_back_without_a_model() {
        let (backend, _clock) = setup_with_client(Arc::new(crate::backend::domain::UnavailableAdvisoryClient));
        let api = backend.api();
        login(api, "p1", "0000");
        let report = api.weekly_report("c1").await.unwrap();
        assert!(!report.is_empty());
        assert!(api.suggest_tasks("恐龍").await.unwrap().is_empty());
    }
}
