use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use time::{Date, OffsetDateTime};
use uuid::Uuid;

use crate::expenses::dto::Expense;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ProjectStatus {
    Pending,
    InProgress,
    Completed,
    Cancelled,
}

impl ProjectStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProjectStatus::Pending => "pending",
            ProjectStatus::InProgress => "in-progress",
            ProjectStatus::Completed => "completed",
            ProjectStatus::Cancelled => "cancelled",
        }
    }

    /// Pending and in-progress projects still have money outstanding.
    pub fn is_active(&self) -> bool {
        matches!(self, ProjectStatus::Pending | ProjectStatus::InProgress)
    }
}

impl fmt::Display for ProjectStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProjectStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(ProjectStatus::Pending),
            "in-progress" => Ok(ProjectStatus::InProgress),
            "completed" => Ok(ProjectStatus::Completed),
            "cancelled" => Ok(ProjectStatus::Cancelled),
            other => Err(format!("unknown project status: {other}")),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: Uuid,
    pub title: String,
    pub client: String,
    pub description: String,
    #[serde(with = "crate::dates::date")]
    pub start_date: Date,
    #[serde(with = "crate::dates::date")]
    pub due_date: Date,
    pub budget: f64,
    pub hourly_rate: Option<f64>,
    pub hours_worked: Option<f64>,
    pub status: ProjectStatus,
    pub completion_percentage: u8,
    pub category: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

/// Body of `POST /projects` and `PUT /projects/:id`.
///
/// `completionPercentage` is ignored on create (new projects start at 0) and
/// keeps the stored value on update when omitted.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectInput {
    pub title: String,
    pub client: String,
    #[serde(default)]
    pub description: String,
    #[serde(with = "crate::dates::date")]
    pub start_date: Date,
    #[serde(with = "crate::dates::date")]
    pub due_date: Date,
    pub budget: f64,
    #[serde(default)]
    pub hourly_rate: Option<f64>,
    #[serde(default)]
    pub hours_worked: Option<f64>,
    #[serde(default = "default_status")]
    pub status: ProjectStatus,
    #[serde(default)]
    pub completion_percentage: Option<u8>,
    #[serde(default)]
    pub category: String,
}

fn default_status() -> ProjectStatus {
    ProjectStatus::Pending
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressRequest {
    pub completion_percentage: u8,
}

#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    pub status: Option<String>,
    pub sort: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusFilter {
    #[default]
    All,
    Only(ProjectStatus),
}

impl FromStr for StatusFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "all" | "" => Ok(StatusFilter::All),
            other => other.parse().map(StatusFilter::Only),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    #[default]
    Newest,
    Oldest,
    BudgetHigh,
    BudgetLow,
    Deadline,
}

impl FromStr for SortOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "newest" | "" => Ok(SortOrder::Newest),
            "oldest" => Ok(SortOrder::Oldest),
            "budget-high" => Ok(SortOrder::BudgetHigh),
            "budget-low" => Ok(SortOrder::BudgetLow),
            "deadline" => Ok(SortOrder::Deadline),
            other => Err(format!("unknown sort order: {other}")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectTotals {
    pub total_expenses: f64,
    pub total_earned: f64,
    pub net_profit: f64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectDetails {
    #[serde(flatten)]
    pub project: Project,
    pub expenses: Vec<Expense>,
    pub totals: ProjectTotals,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_uses_kebab_case_on_the_wire() {
        let json = serde_json::to_string(&ProjectStatus::InProgress).unwrap();
        assert_eq!(json, r#""in-progress""#);
        let parsed: ProjectStatus = serde_json::from_str(r#""cancelled""#).unwrap();
        assert_eq!(parsed, ProjectStatus::Cancelled);
        assert_eq!("in-progress".parse::<ProjectStatus>(), Ok(ProjectStatus::InProgress));
        assert!("done".parse::<ProjectStatus>().is_err());
    }

    #[test]
    fn only_pending_and_in_progress_are_active() {
        assert!(ProjectStatus::Pending.is_active());
        assert!(ProjectStatus::InProgress.is_active());
        assert!(!ProjectStatus::Completed.is_active());
        assert!(!ProjectStatus::Cancelled.is_active());
    }

    #[test]
    fn input_defaults_optional_fields() {
        let input: ProjectInput = serde_json::from_str(
            r#"{"title":"Site","client":"ACME","startDate":"2024-01-01","dueDate":"2024-02-01","budget":1500}"#,
        )
        .unwrap();
        assert_eq!(input.status, ProjectStatus::Pending);
        assert_eq!(input.description, "");
        assert!(input.hourly_rate.is_none());
        assert!(input.completion_percentage.is_none());
    }

    #[test]
    fn list_query_values_parse() {
        assert_eq!("all".parse::<StatusFilter>(), Ok(StatusFilter::All));
        assert_eq!(
            "completed".parse::<StatusFilter>(),
            Ok(StatusFilter::Only(ProjectStatus::Completed))
        );
        assert_eq!("budget-high".parse::<SortOrder>(), Ok(SortOrder::BudgetHigh));
        assert!("cheapest".parse::<SortOrder>().is_err());
    }
}
