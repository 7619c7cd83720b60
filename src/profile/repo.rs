use anyhow::Context;
use sqlx::PgPool;
use uuid::Uuid;

use super::repo_types::{ProfileChanges, UserRow};

const COLUMNS: &str =
    "id, email, name, company, avatar_key, currency, theme, date_format, created_at, updated_at";

/// Returns the user's row, creating it with defaults on first access.
pub async fn ensure(db: &PgPool, id: Uuid, email: Option<&str>) -> anyhow::Result<UserRow> {
    sqlx::query(
        r#"
        INSERT INTO users (id, email)
        VALUES ($1, $2)
        ON CONFLICT (id) DO NOTHING
        "#,
    )
    .bind(id)
    .bind(email)
    .execute(db)
    .await
    .context("insert user")?;

    let sql = format!("SELECT {COLUMNS} FROM users WHERE id = $1");
    let row = sqlx::query_as::<_, UserRow>(&sql)
        .bind(id)
        .fetch_one(db)
        .await
        .context("load user")?;
    Ok(row)
}

pub async fn update(db: &PgPool, id: Uuid, changes: &ProfileChanges) -> anyhow::Result<Option<UserRow>> {
    let sql = format!(
        r#"
        UPDATE users
           SET email = COALESCE($2, email),
               name = COALESCE($3, name),
               company = COALESCE($4, company),
               currency = COALESCE($5, currency),
               theme = COALESCE($6, theme),
               date_format = COALESCE($7, date_format),
               updated_at = now()
         WHERE id = $1
        RETURNING {COLUMNS}
        "#
    );
    let row = sqlx::query_as::<_, UserRow>(&sql)
        .bind(id)
        .bind(changes.email.as_deref())
        .bind(changes.name.as_deref())
        .bind(changes.company.as_deref())
        .bind(changes.currency.as_deref())
        .bind(changes.theme)
        .bind(changes.date_format)
        .fetch_optional(db)
        .await
        .context("update user")?;
    Ok(row)
}

/// Points the profile at a new avatar object and returns the previous key.
pub async fn swap_avatar_key(
    db: &PgPool,
    id: Uuid,
    key: Option<&str>,
) -> anyhow::Result<Option<String>> {
    let previous: Option<Option<String>> = sqlx::query_scalar(
        r#"
        UPDATE users u
           SET avatar_key = $2, updated_at = now()
          FROM (SELECT id, avatar_key FROM users WHERE id = $1 FOR UPDATE) old
         WHERE u.id = old.id
        RETURNING old.avatar_key
        "#,
    )
    .bind(id)
    .bind(key)
    .fetch_optional(db)
    .await
    .context("swap avatar key")?;
    Ok(previous.flatten())
}
