use tracing::info;
use uuid::Uuid;

use super::dto::{
    ListQuery, Project, ProjectDetails, ProjectInput, ProjectStatus, ProjectTotals, SortOrder,
    StatusFilter,
};
use super::repo;
use super::repo_types::ProjectRecord;
use crate::error::{ApiError, ApiResult};
use crate::expenses::{dto::Expense, repo as expense_repo};
use crate::finance::round_cents;
use crate::notifications::{dto::NotificationKind, repo as notification_repo};
use crate::profile::repo as profile_repo;
use crate::state::AppState;

/// A write that lands on 100% completes the project.
pub fn resolve_status(requested: ProjectStatus, completion_percentage: u8) -> ProjectStatus {
    if completion_percentage >= 100 {
        ProjectStatus::Completed
    } else {
        requested
    }
}

fn non_negative(field: &str, value: Option<f64>) -> ApiResult<()> {
    match value {
        Some(v) if !v.is_finite() || v < 0.0 => Err(ApiError::validation(format!(
            "{field} must be a non-negative number"
        ))),
        _ => Ok(()),
    }
}

/// Validates the input and turns it into column values.
/// `completion_percentage` is the value the row will carry after the write.
pub fn to_record(input: ProjectInput, completion_percentage: u8) -> ApiResult<ProjectRecord> {
    let title = input.title.trim().to_string();
    let client = input.client.trim().to_string();
    if title.is_empty() {
        return Err(ApiError::validation("title is required"));
    }
    if client.is_empty() {
        return Err(ApiError::validation("client is required"));
    }
    non_negative("budget", Some(input.budget))?;
    non_negative("hourlyRate", input.hourly_rate)?;
    non_negative("hoursWorked", input.hours_worked)?;
    if input.due_date < input.start_date {
        return Err(ApiError::validation("dueDate must not be before startDate"));
    }
    if completion_percentage > 100 {
        return Err(ApiError::validation(
            "completionPercentage must be between 0 and 100",
        ));
    }

    Ok(ProjectRecord {
        title,
        client,
        description: input.description.trim().to_string(),
        start_date: input.start_date,
        due_date: input.due_date,
        budget: input.budget,
        hourly_rate: input.hourly_rate,
        hours_worked: input.hours_worked,
        status: resolve_status(input.status, completion_percentage),
        completion_percentage,
        category: input.category.trim().to_string(),
    })
}

pub fn parse_listing(q: &ListQuery) -> ApiResult<(StatusFilter, SortOrder)> {
    let filter: StatusFilter = q
        .status
        .as_deref()
        .map(str::parse)
        .transpose()
        .map_err(ApiError::Validation)?
        .unwrap_or_default();
    let sort: SortOrder = q
        .sort
        .as_deref()
        .map(str::parse)
        .transpose()
        .map_err(ApiError::Validation)?
        .unwrap_or_default();
    Ok((filter, sort))
}

pub fn apply_listing(projects: Vec<Project>, filter: StatusFilter, sort: SortOrder) -> Vec<Project> {
    let mut out: Vec<Project> = projects
        .into_iter()
        .filter(|p| match filter {
            StatusFilter::All => true,
            StatusFilter::Only(status) => p.status == status,
        })
        .collect();

    match sort {
        SortOrder::Newest => out.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
        SortOrder::Oldest => out.sort_by(|a, b| a.created_at.cmp(&b.created_at)),
        SortOrder::BudgetHigh => out.sort_by(|a, b| b.budget.total_cmp(&a.budget)),
        SortOrder::BudgetLow => out.sort_by(|a, b| a.budget.total_cmp(&b.budget)),
        SortOrder::Deadline => out.sort_by(|a, b| a.due_date.cmp(&b.due_date)),
    }
    out
}

pub fn totals(project: &Project, expenses: &[Expense]) -> ProjectTotals {
    let total_expenses: f64 = expenses.iter().map(|e| e.amount).sum();
    let total_earned = project.hours_worked.unwrap_or(0.0) * project.hourly_rate.unwrap_or(0.0);
    ProjectTotals {
        total_expenses: round_cents(total_expenses),
        total_earned: round_cents(total_earned),
        net_profit: round_cents(project.budget - total_expenses),
    }
}

fn into_projects(rows: Vec<super::repo_types::ProjectRow>) -> anyhow::Result<Vec<Project>> {
    rows.into_iter().map(Project::try_from).collect()
}

pub async fn list_projects(st: &AppState, user_id: Uuid) -> anyhow::Result<Vec<Project>> {
    into_projects(repo::list_by_user(&st.db, user_id).await?)
}

pub async fn get_project(st: &AppState, user_id: Uuid, id: Uuid) -> ApiResult<Project> {
    let row = repo::find(&st.db, user_id, id)
        .await?
        .ok_or(ApiError::NotFound("project"))?;
    Ok(Project::try_from(row)?)
}

pub async fn get_details(st: &AppState, user_id: Uuid, id: Uuid) -> ApiResult<ProjectDetails> {
    let project = get_project(st, user_id, id).await?;
    let expenses: Vec<Expense> = expense_repo::list_by_project(&st.db, user_id, id)
        .await?
        .into_iter()
        .map(Expense::from)
        .collect();
    let totals = totals(&project, &expenses);
    Ok(ProjectDetails {
        project,
        expenses,
        totals,
    })
}

pub async fn create_project(
    st: &AppState,
    user_id: Uuid,
    email: Option<&str>,
    input: ProjectInput,
) -> ApiResult<Project> {
    let record = to_record(input, 0)?;
    profile_repo::ensure(&st.db, user_id, email).await?;
    let project = Project::try_from(repo::insert(&st.db, user_id, &record).await?)?;
    info!(%user_id, project_id = %project.id, title = %project.title, "project created");
    Ok(project)
}

pub async fn update_project(
    st: &AppState,
    user_id: Uuid,
    id: Uuid,
    input: ProjectInput,
) -> ApiResult<Project> {
    let completion = match input.completion_percentage {
        Some(c) => c,
        None => get_project(st, user_id, id).await?.completion_percentage,
    };
    let record = to_record(input, completion)?;
    let row = repo::update(&st.db, user_id, id, &record)
        .await?
        .ok_or(ApiError::NotFound("project"))?;
    Ok(Project::try_from(row)?)
}

pub async fn update_progress(
    st: &AppState,
    user_id: Uuid,
    id: Uuid,
    completion_percentage: u8,
) -> ApiResult<Project> {
    if completion_percentage > 100 {
        return Err(ApiError::validation(
            "completionPercentage must be between 0 and 100",
        ));
    }
    let current = get_project(st, user_id, id).await?;
    let status = resolve_status(current.status, completion_percentage);

    let row = repo::set_progress(&st.db, user_id, id, completion_percentage, status)
        .await?
        .ok_or(ApiError::NotFound("project"))?;
    let project = Project::try_from(row)?;

    if project.status == ProjectStatus::Completed && current.status != ProjectStatus::Completed {
        notification_repo::insert(
            &st.db,
            user_id,
            Some(project.id),
            NotificationKind::Success,
            "Project completed",
            &format!("\"{}\" for {} is now complete.", project.title, project.client),
        )
        .await?;
        info!(%user_id, project_id = %project.id, "project completed");
    }
    Ok(project)
}

pub async fn delete_project(st: &AppState, user_id: Uuid, id: Uuid) -> ApiResult<()> {
    let (deleted, expenses) = repo::delete_with_expenses(&st.db, user_id, id).await?;
    if !deleted {
        return Err(ApiError::NotFound("project"));
    }
    info!(%user_id, project_id = %id, expenses_removed = expenses, "project deleted");
    Ok(())
}
