use anyhow::Context;
use sqlx::PgPool;
use time::Date;
use uuid::Uuid;

use super::dto::NotificationKind;
use super::repo_types::{NotificationRow, ReminderCandidate};

const COLUMNS: &str = "id, project_id, title, message, type, read, created_at";

pub async fn insert(
    db: &PgPool,
    user_id: Uuid,
    project_id: Option<Uuid>,
    kind: NotificationKind,
    title: &str,
    message: &str,
) -> anyhow::Result<NotificationRow> {
    let sql = format!(
        r#"
        INSERT INTO notifications (id, user_id, project_id, title, message, type)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING {COLUMNS}
        "#
    );
    let row = sqlx::query_as::<_, NotificationRow>(&sql)
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(project_id)
        .bind(title)
        .bind(message)
        .bind(kind.as_str())
        .fetch_one(db)
        .await
        .context("insert notification")?;
    Ok(row)
}

/// Newest first.
pub async fn list_by_user(db: &PgPool, user_id: Uuid) -> anyhow::Result<Vec<NotificationRow>> {
    let sql = format!(
        "SELECT {COLUMNS} FROM notifications WHERE user_id = $1 ORDER BY created_at DESC, id"
    );
    let rows = sqlx::query_as::<_, NotificationRow>(&sql)
        .bind(user_id)
        .fetch_all(db)
        .await
        .context("list notifications")?;
    Ok(rows)
}

pub async fn mark_read(db: &PgPool, user_id: Uuid, id: Uuid) -> anyhow::Result<Option<NotificationRow>> {
    let sql = format!(
        r#"
        UPDATE notifications SET read = TRUE
         WHERE id = $1 AND user_id = $2
        RETURNING {COLUMNS}
        "#
    );
    let row = sqlx::query_as::<_, NotificationRow>(&sql)
        .bind(id)
        .bind(user_id)
        .fetch_optional(db)
        .await
        .context("mark notification read")?;
    Ok(row)
}

/// Returns how many notifications flipped to read.
pub async fn mark_all_read(db: &PgPool, user_id: Uuid) -> anyhow::Result<u64> {
    let res = sqlx::query("UPDATE notifications SET read = TRUE WHERE user_id = $1 AND NOT read")
        .bind(user_id)
        .execute(db)
        .await
        .context("mark all notifications read")?;
    Ok(res.rows_affected())
}

pub async fn delete(db: &PgPool, user_id: Uuid, id: Uuid) -> anyhow::Result<bool> {
    let res = sqlx::query("DELETE FROM notifications WHERE id = $1 AND user_id = $2")
        .bind(id)
        .bind(user_id)
        .execute(db)
        .await
        .context("delete notification")?;
    Ok(res.rows_affected() > 0)
}

/// Active projects due in `[today, until]` whose owner has reminders on
/// (no settings row counts as on) and who got no reminder for the project
/// in the last 24 hours.
pub async fn reminder_candidates(
    db: &PgPool,
    today: Date,
    until: Date,
) -> anyhow::Result<Vec<ReminderCandidate>> {
    let rows = sqlx::query_as::<_, ReminderCandidate>(
        r#"
        SELECT p.id AS project_id, p.user_id, p.title, p.client, p.due_date
          FROM projects p
          LEFT JOIN user_settings s ON s.user_id = p.user_id
         WHERE p.status IN ('pending', 'in-progress')
           AND p.due_date BETWEEN $1 AND $2
           AND COALESCE(s.project_reminders, TRUE)
           AND NOT EXISTS (
                SELECT 1 FROM notifications n
                 WHERE n.project_id = p.id
                   AND n.type = 'warning'
                   AND n.created_at > now() - INTERVAL '24 hours'
           )
         ORDER BY p.due_date, p.id
        "#,
    )
    .bind(today)
    .bind(until)
    .fetch_all(db)
    .await
    .context("load reminder candidates")?;
    Ok(rows)
}
