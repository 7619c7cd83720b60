use sqlx::PgPool;
use time::{Date, Duration, OffsetDateTime};
use tracing::{debug, info, warn};

use super::dto::NotificationKind;
use super::repo;
use crate::state::AppState;

const REMINDER_TITLE: &str = "Deadline approaching";

/// Runs forever. Sleeps first so startup is not slowed by a sweep.
pub async fn run_reminder_poller(state: AppState) {
    let cfg = state.config.reminders.clone();
    info!(
        interval_secs = cfg.interval().as_secs(),
        horizon_days = cfg.horizon_days,
        "reminder poller started"
    );
    loop {
        tokio::time::sleep(cfg.interval()).await;
        match run_once(&state.db, OffsetDateTime::now_utc(), cfg.horizon_days).await {
            Ok(0) => debug!("reminder sweep: nothing due"),
            Ok(n) => info!(created = n, "reminder sweep done"),
            Err(e) => warn!(error = ?e, "reminder sweep failed"),
        }
    }
}

/// One sweep: inserts a warning for every eligible project and returns how
/// many were created.
pub async fn run_once(db: &PgPool, now: OffsetDateTime, horizon_days: i64) -> anyhow::Result<usize> {
    let today = now.date();
    let until = today.saturating_add(Duration::days(horizon_days.max(0)));
    let due = repo::reminder_candidates(db, today, until).await?;

    let mut created = 0;
    for c in &due {
        let message = reminder_message(&c.title, &c.client, c.due_date, today);
        repo::insert(
            db,
            c.user_id,
            Some(c.project_id),
            NotificationKind::Warning,
            REMINDER_TITLE,
            &message,
        )
        .await?;
        created += 1;
    }
    Ok(created)
}

pub fn reminder_message(title: &str, client: &str, due: Date, today: Date) -> String {
    let when = match (due - today).whole_days() {
        d if d <= 0 => "today".to_string(),
        1 => "tomorrow".to_string(),
        d => format!("in {d} days"),
    };
    format!("\"{title}\" for {client} is due {when} ({due}).")
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;

    #[test]
    fn message_names_relative_day() {
        let today = date!(2024 - 03 - 01);
        assert_eq!(
            reminder_message("Logo", "Acme", today, today),
            "\"Logo\" for Acme is due today (2024-03-01)."
        );
        assert!(reminder_message("Logo", "Acme", date!(2024 - 03 - 02), today).contains("due tomorrow"));
        assert!(reminder_message("Logo", "Acme", date!(2024 - 03 - 04), today).contains("due in 3 days"));
    }

    #[test]
    fn month_boundary_counts_days() {
        let msg = reminder_message("Site", "Beta", date!(2024 - 03 - 02), date!(2024 - 02 - 28));
        assert!(msg.contains("in 3 days"), "{msg}");
    }
}

#[cfg(test)]
mod db_tests {
    use super::*;
    use crate::profile::repo as profile_repo;
    use time::macros::datetime;
    use uuid::Uuid;

    #[ignore = "requires DATABASE_URL"]
    #[sqlx::test(migrations = "./migrations")]
    async fn sweep_respects_opt_out_and_dedup(db: PgPool) {
        let keen = Uuid::new_v4();
        let quiet = Uuid::new_v4();
        for u in [keen, quiet] {
            profile_repo::ensure(&db, u, None).await.unwrap();
            sqlx::query(
                r#"
                INSERT INTO projects (id, user_id, title, client, start_date, due_date, budget, status)
                VALUES ($1, $2, 'Site', 'Acme', DATE '2024-06-01', DATE '2024-06-11', 100, 'in-progress')
                "#,
            )
            .bind(Uuid::new_v4())
            .bind(u)
            .execute(&db)
            .await
            .unwrap();
        }
        sqlx::query("INSERT INTO user_settings (user_id, project_reminders) VALUES ($1, FALSE)")
            .bind(quiet)
            .execute(&db)
            .await
            .unwrap();

        let now = datetime!(2024-06-10 8:00 UTC);
        assert_eq!(run_once(&db, now, 3).await.unwrap(), 1);
        assert_eq!(run_once(&db, now, 3).await.unwrap(), 0);
        assert_eq!(repo::list_by_user(&db, keen).await.unwrap().len(), 1);
        assert!(repo::list_by_user(&db, quiet).await.unwrap().is_empty());
    }
}
