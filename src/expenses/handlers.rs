use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, put},
    Json, Router,
};
use tracing::instrument;
use uuid::Uuid;

use super::dto::{Expense, ExpenseInput};
use super::services;
use crate::{auth::AuthUser, error::ApiResult, extract::JsonBody, state::AppState};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/projects/:id/expenses",
            get(list_expenses).post(add_expense),
        )
        .route(
            "/projects/:id/expenses/:expense_id",
            put(update_expense).delete(delete_expense),
        )
}

#[instrument(skip(state, user), fields(user_id = %user.id))]
pub async fn list_expenses(
    State(state): State<AppState>,
    user: AuthUser,
    Path(project_id): Path<Uuid>,
) -> ApiResult<Json<Vec<Expense>>> {
    Ok(Json(services::list_expenses(&state, user.id, project_id).await?))
}

#[instrument(skip(state, user, body), fields(user_id = %user.id))]
pub async fn add_expense(
    State(state): State<AppState>,
    user: AuthUser,
    Path(project_id): Path<Uuid>,
    JsonBody(body): JsonBody<ExpenseInput>,
) -> ApiResult<(StatusCode, Json<Expense>)> {
    let expense = services::add_expense(&state, user.id, project_id, body).await?;
    Ok((StatusCode::CREATED, Json(expense)))
}

#[instrument(skip(state, user, body), fields(user_id = %user.id))]
pub async fn update_expense(
    State(state): State<AppState>,
    user: AuthUser,
    Path((project_id, expense_id)): Path<(Uuid, Uuid)>,
    JsonBody(body): JsonBody<ExpenseInput>,
) -> ApiResult<Json<Expense>> {
    let expense = services::update_expense(&state, user.id, project_id, expense_id, body).await?;
    Ok(Json(expense))
}

#[instrument(skip(state, user), fields(user_id = %user.id))]
pub async fn delete_expense(
    State(state): State<AppState>,
    user: AuthUser,
    Path((project_id, expense_id)): Path<(Uuid, Uuid)>,
) -> ApiResult<StatusCode> {
    services::delete_expense(&state, user.id, project_id, expense_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
