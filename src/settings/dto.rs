use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;

#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    pub email_notifications: bool,
    pub payment_alerts: bool,
    pub project_reminders: bool,
    pub weekly_reports: bool,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

/// Partial update; absent flags keep their value.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsUpdate {
    pub email_notifications: Option<bool>,
    pub payment_alerts: Option<bool>,
    pub project_reminders: Option<bool>,
    pub weekly_reports: Option<bool>,
}

impl SettingsUpdate {
    pub fn is_empty(&self) -> bool {
        self.email_notifications.is_none()
            && self.payment_alerts.is_none()
            && self.project_reminders.is_none()
            && self.weekly_reports.is_none()
    }
}
