use tracing::info;
use uuid::Uuid;

use super::dto::{Expense, ExpenseInput};
use super::repo;
use crate::error::{ApiError, ApiResult};
use crate::projects::repo as project_repo;
use crate::state::AppState;

pub fn validate(mut input: ExpenseInput) -> ApiResult<ExpenseInput> {
    input.description = input.description.trim().to_string();
    input.category = input.category.trim().to_string();
    if input.description.is_empty() {
        return Err(ApiError::validation("description is required"));
    }
    if !input.amount.is_finite() || input.amount < 0.0 {
        return Err(ApiError::validation("amount must be a non-negative number"));
    }
    Ok(input)
}

async fn ensure_project(st: &AppState, user_id: Uuid, project_id: Uuid) -> ApiResult<()> {
    project_repo::find(&st.db, user_id, project_id)
        .await?
        .ok_or(ApiError::NotFound("project"))?;
    Ok(())
}

pub async fn list_expenses(st: &AppState, user_id: Uuid, project_id: Uuid) -> ApiResult<Vec<Expense>> {
    ensure_project(st, user_id, project_id).await?;
    let rows = repo::list_by_project(&st.db, user_id, project_id).await?;
    Ok(rows.into_iter().map(Expense::from).collect())
}

pub async fn add_expense(
    st: &AppState,
    user_id: Uuid,
    project_id: Uuid,
    input: ExpenseInput,
) -> ApiResult<Expense> {
    let input = validate(input)?;
    ensure_project(st, user_id, project_id).await?;
    let expense = Expense::from(repo::insert(&st.db, project_id, &input).await?);
    info!(%user_id, %project_id, expense_id = %expense.id, amount = expense.amount, "expense added");
    Ok(expense)
}

pub async fn update_expense(
    st: &AppState,
    user_id: Uuid,
    project_id: Uuid,
    expense_id: Uuid,
    input: ExpenseInput,
) -> ApiResult<Expense> {
    let input = validate(input)?;
    let row = repo::update(&st.db, user_id, project_id, expense_id, &input)
        .await?
        .ok_or(ApiError::NotFound("expense"))?;
    Ok(Expense::from(row))
}

pub async fn delete_expense(
    st: &AppState,
    user_id: Uuid,
    project_id: Uuid,
    expense_id: Uuid,
) -> ApiResult<()> {
    if !repo::delete(&st.db, user_id, project_id, expense_id).await? {
        return Err(ApiError::NotFound("expense"));
    }
    info!(%user_id, %project_id, %expense_id, "expense deleted");
    Ok(())
}
