use crate::backend::domain::models::{Account, ChildProfile as DomainChild};
use shared::{ChildListResponse, ChildProfile as SharedChild, CurrentUser, LoginResponse};

/// Mapper from domain accounts to shared DTOs. Credentials never leave
/// the domain.
pub struct AccountMapper;

impl AccountMapper {
    pub fn to_current_user(account: &Account) -> CurrentUser {
        CurrentUser {
            id: account.id().to_string(),
            name: account.name().to_string(),
            role: account.role(),
            avatar: account.avatar().to_string(),
        }
    }

    pub fn to_child_dto(domain: DomainChild) -> SharedChild {
        SharedChild {
            id: domain.id,
            name: domain.name,
            avatar: domain.avatar,
            balance: domain.balance,
            total_earned: domain.total_earned,
            level: domain.level,
            is_locked: domain.is_locked,
            weekly_allowance: domain.weekly_allowance,
        }
    }

    pub fn to_child_list_dto(children: Vec<DomainChild>) -> ChildListResponse {
        ChildListResponse {
            children: children.into_iter().map(Self::to_child_dto).collect(),
        }
    }

    pub fn to_login_dto(account: &Account) -> LoginResponse {
        LoginResponse {
            user: Self::to_current_user(account),
            success_message: format!("歡迎回來，{}！", account.name()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::domain::models::ParentProfile;
    use shared::Role;

    #[test]
    fn test_current_user_has_no_password() {
        let parent = Account::Parent(ParentProfile::default());
        let user = AccountMapper::to_current_user(&parent);
        assert_eq!(user.id, "p1");
        assert_eq!(user.role, Role::Parent);
        let json = serde_json::to_string(&user).unwrap();
        assert!(!json.contains("0000"));
    }

    #[test]
    fn test_child_dto_copies_ledger_fields() {
        let mut child = DomainChild::new("c9".into(), "Ann".into(), "a.png".into(), "1234".into(), 30);
        child.apply_credit(130);
        let dto = AccountMapper::to_child_dto(child);
        assert_eq!((dto.balance, dto.total_earned, dto.level), (130, 130, 2));
    }
}
