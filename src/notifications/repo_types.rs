use sqlx::FromRow;
use time::{Date, OffsetDateTime};
use uuid::Uuid;

use super::dto::Notification;

#[derive(Debug, Clone, FromRow)]
pub struct NotificationRow {
    pub id: Uuid,
    pub project_id: Option<Uuid>,
    pub title: String,
    pub message: String,
    #[sqlx(rename = "type")]
    pub kind: String,
    pub read: bool,
    pub created_at: OffsetDateTime,
}

impl From<NotificationRow> for Notification {
    fn from(r: NotificationRow) -> Self {
        Self {
            id: r.id,
            title: r.title,
            message: r.message,
            // unknown values from older rows fall back to info
            kind: r.kind.parse().unwrap_or_default(),
            read: r.read,
            project_id: r.project_id,
            created_at: r.created_at,
        }
    }
}

/// An active project nearing its due date whose owner wants reminders.
#[derive(Debug, Clone, FromRow)]
pub struct ReminderCandidate {
    pub project_id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub client: String,
    pub due_date: Date,
}
