use anyhow::Context;
use sqlx::PgPool;
use uuid::Uuid;

use super::dto::{Settings, SettingsUpdate};

const COLUMNS: &str =
    "email_notifications, payment_alerts, project_reminders, weekly_reports, updated_at";

/// Returns the user's settings, creating the default row on first access.
/// The `users` row must already exist.
pub async fn ensure(db: &PgPool, user_id: Uuid) -> anyhow::Result<Settings> {
    sqlx::query(
        r#"
        INSERT INTO user_settings (user_id)
        VALUES ($1)
        ON CONFLICT (user_id) DO NOTHING
        "#,
    )
    .bind(user_id)
    .execute(db)
    .await
    .context("insert default settings")?;

    let sql = format!("SELECT {COLUMNS} FROM user_settings WHERE user_id = $1");
    let row = sqlx::query_as::<_, Settings>(&sql)
        .bind(user_id)
        .fetch_one(db)
        .await
        .context("load settings")?;
    Ok(row)
}

pub async fn update(db: &PgPool, user_id: Uuid, upd: &SettingsUpdate) -> anyhow::Result<Option<Settings>> {
    let sql = format!(
        r#"
        UPDATE user_settings
           SET email_notifications = COALESCE($2, email_notifications),
               payment_alerts = COALESCE($3, payment_alerts),
               project_reminders = COALESCE($4, project_reminders),
               weekly_reports = COALESCE($5, weekly_reports),
               updated_at = now()
         WHERE user_id = $1
        RETURNING {COLUMNS}
        "#
    );
    let row = sqlx::query_as::<_, Settings>(&sql)
        .bind(user_id)
        .bind(upd.email_notifications)
        .bind(upd.payment_alerts)
        .bind(upd.project_reminders)
        .bind(upd.weekly_reports)
        .fetch_optional(db)
        .await
        .context("update settings")?;
    Ok(row)
}
