use crate::backend::domain::session_service::SessionSnapshot;
use shared::SessionStatus;

pub struct SessionMapper;

impl SessionMapper {
    /// No session maps to an inactive status with zeroed counters
    pub fn to_status_dto(snapshot: Option<SessionSnapshot>) -> SessionStatus {
        match snapshot {
            Some(s) => SessionStatus {
                active: true,
                app_name: Some(s.app_name),
                elapsed_seconds: s.elapsed_seconds,
                charged_minutes: s.charged_minutes,
            },
            None => SessionStatus {
                active: false,
                app_name: None,
                elapsed_seconds: 0,
                charged_minutes: 0,
            },
        }
    }
}
