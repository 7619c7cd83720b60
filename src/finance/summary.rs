use serde::Serialize;
use time::{Duration, OffsetDateTime};

use super::round_cents;
use crate::projects::dto::{Project, ProjectStatus};

/// Window for `projected_earnings`.
pub const PROJECTION_WINDOW: Duration = Duration::days(30);

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FinancialSummary {
    pub total_portfolio_value: f64,
    pub pending_payments: f64,
    pub projected_earnings: f64,
    pub completed_projects: u32,
    pub active_projects: u32,
}

/// Aggregates the portfolio as of `now`.
///
/// * every budget counts toward `total_portfolio_value`, whatever the status;
/// * pending and in-progress projects are active: their unfinished share of the
///   budget is owed (`budget * (1 - completion / 100)`), and their whole budget
///   is projected when they are due within [`PROJECTION_WINDOW`] (overdue included);
/// * cancelled projects only contribute to the portfolio value.
pub fn compute_summary(projects: &[Project], now: OffsetDateTime) -> FinancialSummary {
    let horizon = (now + PROJECTION_WINDOW).date();
    let mut s = FinancialSummary::default();

    for p in projects {
        s.total_portfolio_value += p.budget;

        match p.status {
            ProjectStatus::Completed => s.completed_projects += 1,
            ProjectStatus::Pending | ProjectStatus::InProgress => {
                s.active_projects += 1;
                let remaining = 1.0 - f64::from(p.completion_percentage) / 100.0;
                s.pending_payments += p.budget * remaining;
                if p.due_date <= horizon {
                    s.projected_earnings += p.budget;
                }
            }
            ProjectStatus::Cancelled => {}
        }
    }

    s.total_portfolio_value = round_cents(s.total_portfolio_value);
    s.pending_payments = round_cents(s.pending_payments);
    s.projected_earnings = round_cents(s.projected_earnings);
    s
}
