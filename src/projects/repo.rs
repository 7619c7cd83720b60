use anyhow::Context;
use sqlx::PgPool;
use uuid::Uuid;

use super::dto::ProjectStatus;
use super::repo_types::{ProjectRecord, ProjectRow};

const COLUMNS: &str = "id, title, client, description, start_date, due_date, budget, \
     hourly_rate, hours_worked, status, completion_percentage, category, created_at, updated_at";

/// All projects owned by the user, newest first.
pub async fn list_by_user(db: &PgPool, user_id: Uuid) -> anyhow::Result<Vec<ProjectRow>> {
    let sql = format!(
        "SELECT {COLUMNS} FROM projects WHERE user_id = $1 ORDER BY created_at DESC"
    );
    let rows = sqlx::query_as::<_, ProjectRow>(&sql)
        .bind(user_id)
        .fetch_all(db)
        .await
        .context("list projects by user")?;
    Ok(rows)
}

pub async fn find(db: &PgPool, user_id: Uuid, id: Uuid) -> anyhow::Result<Option<ProjectRow>> {
    let sql = format!("SELECT {COLUMNS} FROM projects WHERE id = $1 AND user_id = $2");
    let row = sqlx::query_as::<_, ProjectRow>(&sql)
        .bind(id)
        .bind(user_id)
        .fetch_optional(db)
        .await
        .context("find project")?;
    Ok(row)
}

pub async fn insert(db: &PgPool, user_id: Uuid, rec: &ProjectRecord) -> anyhow::Result<ProjectRow> {
    let sql = format!(
        r#"
        INSERT INTO projects (id, user_id, title, client, description, start_date, due_date,
                              budget, hourly_rate, hours_worked, status, completion_percentage, category)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
        RETURNING {COLUMNS}
        "#
    );
    let row = sqlx::query_as::<_, ProjectRow>(&sql)
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(&rec.title)
        .bind(&rec.client)
        .bind(&rec.description)
        .bind(rec.start_date)
        .bind(rec.due_date)
        .bind(rec.budget)
        .bind(rec.hourly_rate)
        .bind(rec.hours_worked)
        .bind(rec.status.as_str())
        .bind(i32::from(rec.completion_percentage))
        .bind(&rec.category)
        .fetch_one(db)
        .await
        .context("insert project")?;
    Ok(row)
}

pub async fn update(
    db: &PgPool,
    user_id: Uuid,
    id: Uuid,
    rec: &ProjectRecord,
) -> anyhow::Result<Option<ProjectRow>> {
    let sql = format!(
        r#"
        UPDATE projects
           SET title = $3, client = $4, description = $5, start_date = $6, due_date = $7,
               budget = $8, hourly_rate = $9, hours_worked = $10, status = $11,
               completion_percentage = $12, category = $13, updated_at = now()
         WHERE id = $1 AND user_id = $2
        RETURNING {COLUMNS}
        "#
    );
    let row = sqlx::query_as::<_, ProjectRow>(&sql)
        .bind(id)
        .bind(user_id)
        .bind(&rec.title)
        .bind(&rec.client)
        .bind(&rec.description)
        .bind(rec.start_date)
        .bind(rec.due_date)
        .bind(rec.budget)
        .bind(rec.hourly_rate)
        .bind(rec.hours_worked)
        .bind(rec.status.as_str())
        .bind(i32::from(rec.completion_percentage))
        .bind(&rec.category)
        .fetch_optional(db)
        .await
        .context("update project")?;
    Ok(row)
}

pub async fn set_progress(
    db: &PgPool,
    user_id: Uuid,
    id: Uuid,
    completion_percentage: u8,
    status: ProjectStatus,
) -> anyhow::Result<Option<ProjectRow>> {
    let sql = format!(
        r#"
        UPDATE projects
           SET completion_percentage = $3, status = $4, updated_at = now()
         WHERE id = $1 AND user_id = $2
        RETURNING {COLUMNS}
        "#
    );
    let row = sqlx::query_as::<_, ProjectRow>(&sql)
        .bind(id)
        .bind(user_id)
        .bind(i32::from(completion_percentage))
        .bind(status.as_str())
        .fetch_optional(db)
        .await
        .context("update project progress")?;
    Ok(row)
}

/// Deletes the project and its expenses in one transaction.
/// Returns `(deleted, expenses_removed)`.
pub async fn delete_with_expenses(
    db: &PgPool,
    user_id: Uuid,
    id: Uuid,
) -> anyhow::Result<(bool, u64)> {
    let mut tx = db.begin().await.context("begin tx")?;

    let expenses = sqlx::query(
        r#"
        DELETE FROM expenses
         WHERE project_id = $1
           AND EXISTS (SELECT 1 FROM projects p WHERE p.id = $1 AND p.user_id = $2)
        "#,
    )
    .bind(id)
    .bind(user_id)
    .execute(&mut *tx)
    .await
    .context("delete project expenses")?
    .rows_affected();

    let deleted = sqlx::query(r#"DELETE FROM projects WHERE id = $1 AND user_id = $2"#)
        .bind(id)
        .bind(user_id)
        .execute(&mut *tx)
        .await
        .context("delete project")?
        .rows_affected();

    tx.commit().await.context("commit tx")?;
    Ok((deleted > 0, expenses))
}

#[cfg(test)]
mod db_tests {
    use super::*;
    use crate::expenses::{dto::ExpenseInput, repo as expense_repo};
    use time::macros::date;

    async fn seed_user(db: &PgPool) -> Uuid {
        let id = Uuid::new_v4();
        sqlx::query("INSERT INTO users (id, email) VALUES ($1, $2)")
            .bind(id)
            .bind(format!("{id}@example.com"))
            .execute(db)
            .await
            .unwrap();
        id
    }

    fn record() -> ProjectRecord {
        ProjectRecord {
            title: "Landing page".into(),
            client: "Delta".into(),
            description: String::new(),
            start_date: date!(2024 - 05 - 01),
            due_date: date!(2024 - 05 - 20),
            budget: 1200.0,
            hourly_rate: None,
            hours_worked: None,
            status: ProjectStatus::InProgress,
            completion_percentage: 0,
            category: "web".into(),
        }
    }

    #[ignore = "requires DATABASE_URL"]
    #[sqlx::test(migrations = "./migrations")]
    async fn deleting_a_project_removes_its_expenses(db: PgPool) {
        let user = seed_user(&db).await;
        let project = insert(&db, user, &record()).await.unwrap();
        for amount in [10.0, 20.0] {
            let input = ExpenseInput {
                description: "hosting".into(),
                amount,
                date: date!(2024 - 05 - 02),
                category: "infra".into(),
            };
            expense_repo::insert(&db, project.id, &input).await.unwrap();
        }

        let (deleted, removed) = delete_with_expenses(&db, user, project.id).await.unwrap();
        assert!(deleted);
        assert_eq!(removed, 2);

        let left: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM expenses WHERE project_id = $1")
            .bind(project.id)
            .fetch_one(&db)
            .await
            .unwrap();
        assert_eq!(left, 0);
    }

    #[ignore = "requires DATABASE_URL"]
    #[sqlx::test(migrations = "./migrations")]
    async fn other_users_cannot_see_or_delete(db: PgPool) {
        let owner = seed_user(&db).await;
        let stranger = seed_user(&db).await;
        let project = insert(&db, owner, &record()).await.unwrap();

        assert!(find(&db, stranger, project.id).await.unwrap().is_none());
        let (deleted, _) = delete_with_expenses(&db, stranger, project.id).await.unwrap();
        assert!(!deleted);
        assert!(find(&db, owner, project.id).await.unwrap().is_some());
    }
}
