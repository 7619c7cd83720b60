use axum::{extract::State, routing::get, Json, Router};
use time::OffsetDateTime;
use tracing::{debug, instrument};

use super::analytics::{self, CategoryTotal, FinancialOverview};
use super::summary::{compute_summary, FinancialSummary};
use crate::{
    auth::AuthUser,
    error::ApiResult,
    expenses::{dto::Expense, repo as expense_repo},
    projects::services as project_services,
    state::AppState,
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/financial-summary", get(financial_summary))
        .route("/analytics/overview", get(financial_overview))
        .route("/analytics/expenses-by-category", get(expenses_by_category))
        .route("/analytics/income-by-category", get(income_by_category))
}

async fn user_expenses(state: &AppState, user: &AuthUser) -> anyhow::Result<Vec<Expense>> {
    let rows = expense_repo::list_by_user(&state.db, user.id).await?;
    Ok(rows.into_iter().map(Expense::from).collect())
}

#[instrument(skip(state, user), fields(user_id = %user.id))]
pub async fn financial_summary(
    State(state): State<AppState>,
    user: AuthUser,
) -> ApiResult<Json<FinancialSummary>> {
    let projects = project_services::list_projects(&state, user.id).await?;
    let summary = compute_summary(&projects, OffsetDateTime::now_utc());
    debug!(projects = projects.len(), ?summary, "financial summary computed");
    Ok(Json(summary))
}

#[instrument(skip(state, user), fields(user_id = %user.id))]
pub async fn financial_overview(
    State(state): State<AppState>,
    user: AuthUser,
) -> ApiResult<Json<FinancialOverview>> {
    let projects = project_services::list_projects(&state, user.id).await?;
    let expenses = user_expenses(&state, &user).await?;
    Ok(Json(analytics::overview(&projects, &expenses)))
}

#[instrument(skip(state, user), fields(user_id = %user.id))]
pub async fn expenses_by_category(
    State(state): State<AppState>,
    user: AuthUser,
) -> ApiResult<Json<Vec<CategoryTotal>>> {
    let expenses = user_expenses(&state, &user).await?;
    Ok(Json(analytics::expenses_by_category(&expenses)))
}

#[instrument(skip(state, user), fields(user_id = %user.id))]
pub async fn income_by_category(
    State(state): State<AppState>,
    user: AuthUser,
) -> ApiResult<Json<Vec<CategoryTotal>>> {
    let projects = project_services::list_projects(&state, user.id).await?;
    Ok(Json(analytics::income_by_category(&projects)))
}
