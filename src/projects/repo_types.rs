use anyhow::Context;
use sqlx::FromRow;
use time::{Date, OffsetDateTime};
use uuid::Uuid;

use super::dto::{Project, ProjectStatus};

#[derive(Debug, Clone, FromRow)]
pub struct ProjectRow {
    pub id: Uuid,
    pub title: String,
    pub client: String,
    pub description: Option<String>,
    pub start_date: Date,
    pub due_date: Date,
    pub budget: f64,
    pub hourly_rate: Option<f64>,
    pub hours_worked: Option<f64>,
    pub status: String,
    pub completion_percentage: i32,
    pub category: Option<String>,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

impl TryFrom<ProjectRow> for Project {
    type Error = anyhow::Error;

    fn try_from(r: ProjectRow) -> anyhow::Result<Self> {
        let status = r
            .status
            .parse::<ProjectStatus>()
            .map_err(anyhow::Error::msg)
            .with_context(|| format!("project {}", r.id))?;
        Ok(Self {
            id: r.id,
            title: r.title,
            client: r.client,
            description: r.description.unwrap_or_default(),
            start_date: r.start_date,
            due_date: r.due_date,
            budget: r.budget,
            hourly_rate: r.hourly_rate,
            hours_worked: r.hours_worked,
            status,
            completion_percentage: r.completion_percentage.clamp(0, 100) as u8,
            category: r.category.unwrap_or_default(),
            created_at: r.created_at,
            updated_at: r.updated_at,
        })
    }
}

/// Validated column values for an insert or full update.
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectRecord {
    pub title: String,
    pub client: String,
    pub description: String,
    pub start_date: Date,
    pub due_date: Date,
    pub budget: f64,
    pub hourly_rate: Option<f64>,
    pub hours_worked: Option<f64>,
    pub status: ProjectStatus,
    pub completion_percentage: u8,
    pub category: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::{date, datetime};

    fn row(status: &str, completion: i32) -> ProjectRow {
        ProjectRow {
            id: Uuid::new_v4(),
            title: "Brand refresh".into(),
            client: "Nile Co".into(),
            description: None,
            start_date: date!(2024 - 01 - 01),
            due_date: date!(2024 - 03 - 01),
            budget: 2500.0,
            hourly_rate: Some(40.0),
            hours_worked: None,
            status: status.into(),
            completion_percentage: completion,
            category: None,
            created_at: datetime!(2024-01-01 10:00 UTC),
            updated_at: datetime!(2024-01-02 10:00 UTC),
        }
    }

    #[test]
    fn nullable_text_columns_become_empty_strings() {
        let p = Project::try_from(row("in-progress", 40)).unwrap();
        assert_eq!(p.description, "");
        assert_eq!(p.category, "");
        assert_eq!(p.status, ProjectStatus::InProgress);
        assert_eq!(p.completion_percentage, 40);
    }

    #[test]
    fn unknown_status_is_an_error() {
        assert!(Project::try_from(row("archived", 0)).is_err());
    }
}
