use anyhow::Context;
use sqlx::PgPool;
use uuid::Uuid;

use super::dto::ExpenseInput;
use super::repo_types::ExpenseRow;

const COLUMNS: &str =
    "e.id, e.description, e.amount, e.date, e.category";

/// Expenses of one project, most recent first. Empty when the user does not own it.
pub async fn list_by_project(
    db: &PgPool,
    user_id: Uuid,
    project_id: Uuid,
) -> anyhow::Result<Vec<ExpenseRow>> {
    let sql = format!(
        r#"
        SELECT {COLUMNS}
          FROM expenses e
          JOIN projects p ON p.id = e.project_id
         WHERE e.project_id = $1 AND p.user_id = $2
         ORDER BY e.date DESC, e.created_at DESC
        "#
    );
    let rows = sqlx::query_as::<_, ExpenseRow>(&sql)
        .bind(project_id)
        .bind(user_id)
        .fetch_all(db)
        .await
        .context("list expenses by project")?;
    Ok(rows)
}

/// Every expense across the user's projects.
pub async fn list_by_user(db: &PgPool, user_id: Uuid) -> anyhow::Result<Vec<ExpenseRow>> {
    let sql = format!(
        r#"
        SELECT {COLUMNS}
          FROM expenses e
          JOIN projects p ON p.id = e.project_id
         WHERE p.user_id = $1
         ORDER BY e.date DESC
        "#
    );
    let rows = sqlx::query_as::<_, ExpenseRow>(&sql)
        .bind(user_id)
        .fetch_all(db)
        .await
        .context("list expenses by user")?;
    Ok(rows)
}

/// Caller must have checked project ownership.
pub async fn insert(db: &PgPool, project_id: Uuid, input: &ExpenseInput) -> anyhow::Result<ExpenseRow> {
    let row = sqlx::query_as::<_, ExpenseRow>(
        r#"
        INSERT INTO expenses AS e (id, project_id, description, amount, date, category)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING e.id, e.description, e.amount, e.date, e.category
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(project_id)
    .bind(&input.description)
    .bind(input.amount)
    .bind(input.date)
    .bind(&input.category)
    .fetch_one(db)
    .await
    .context("insert expense")?;
    Ok(row)
}

pub async fn update(
    db: &PgPool,
    user_id: Uuid,
    project_id: Uuid,
    expense_id: Uuid,
    input: &ExpenseInput,
) -> anyhow::Result<Option<ExpenseRow>> {
    let row = sqlx::query_as::<_, ExpenseRow>(
        r#"
        UPDATE expenses AS e
           SET description = $4, amount = $5, date = $6, category = $7, updated_at = now()
          FROM projects p
         WHERE e.id = $1 AND e.project_id = $2
           AND p.id = e.project_id AND p.user_id = $3
        RETURNING e.id, e.description, e.amount, e.date, e.category
        "#,
    )
    .bind(expense_id)
    .bind(project_id)
    .bind(user_id)
    .bind(&input.description)
    .bind(input.amount)
    .bind(input.date)
    .bind(&input.category)
    .fetch_optional(db)
    .await
    .context("update expense")?;
    Ok(row)
}

pub async fn delete(
    db: &PgPool,
    user_id: Uuid,
    project_id: Uuid,
    expense_id: Uuid,
) -> anyhow::Result<bool> {
    let res = sqlx::query(
        r#"
        DELETE FROM expenses e
         USING projects p
         WHERE e.id = $1 AND e.project_id = $2
           AND p.id = e.project_id AND p.user_id = $3
        "#,
    )
    .bind(expense_id)
    .bind(project_id)
    .bind(user_id)
    .execute(db)
    .await
    .context("delete expense")?;
    Ok(res.rows_affected() > 0)
}
