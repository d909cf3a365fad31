use crate::backend::domain::models::{AllowedApp as DomainApp, FamilySettings as DomainSettings, SettingsPatch};
use shared::{AllowedApp as SharedApp, AllowedAppListResponse, FamilySettings as SharedSettings, UpdateSettingsRequest};

/// Mapper between shared settings DTOs and domain settings.
pub struct SettingsMapper;

impl SettingsMapper {
    pub fn to_dto(domain: DomainSettings) -> SharedSettings {
        SharedSettings {
            exchange_rate: domain.exchange_rate,
            weekday_curfew_start: domain.weekday_curfew_start,
            weekday_curfew_end: domain.weekday_curfew_end,
            weekend_curfew_start: domain.weekend_curfew_start,
            weekend_curfew_end: domain.weekend_curfew_end,
        }
    }

    pub fn to_patch(request: UpdateSettingsRequest) -> SettingsPatch {
        SettingsPatch {
            exchange_rate: request.exchange_rate,
            weekday_curfew_start: request.weekday_curfew_start,
            weekday_curfew_end: request.weekday_curfew_end,
            weekend_curfew_start: request.weekend_curfew_start,
            weekend_curfew_end: request.weekend_curfew_end,
        }
    }

    pub fn to_app_list_dto(apps: Vec<DomainApp>) -> AllowedAppListResponse {
        AllowedAppListResponse {
            apps: apps
                .into_iter()
                .map(|app| SharedApp { name: app.name, rule: app.rule })
                .collect(),
        }
    }
}
