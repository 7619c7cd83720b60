use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get, post},
    Json, Router,
};
use tracing::{info, instrument};
use uuid::Uuid;

use super::dto::{MarkedRead, Notification, NotificationList};
use super::repo;
use crate::{
    auth::AuthUser,
    error::{ApiError, ApiResult},
    state::AppState,
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/notifications", get(list))
        .route("/notifications/read-all", post(read_all))
        .route("/notifications/:id/read", post(read_one))
        .route("/notifications/:id", delete(remove))
}

#[instrument(skip(state, user), fields(user_id = %user.id))]
pub async fn list(State(state): State<AppState>, user: AuthUser) -> ApiResult<Json<NotificationList>> {
    let rows = repo::list_by_user(&state.db, user.id).await?;
    let items: Vec<Notification> = rows.into_iter().map(Notification::from).collect();
    Ok(Json(items.into()))
}

#[instrument(skip(state, user), fields(user_id = %user.id))]
pub async fn read_one(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Notification>> {
    let row = repo::mark_read(&state.db, user.id, id)
        .await?
        .ok_or(ApiError::NotFound("notification"))?;
    Ok(Json(row.into()))
}

#[instrument(skip(state, user), fields(user_id = %user.id))]
pub async fn read_all(State(state): State<AppState>, user: AuthUser) -> ApiResult<Json<MarkedRead>> {
    let updated = repo::mark_all_read(&state.db, user.id).await?;
    info!(user_id = %user.id, updated, "notifications marked read");
    Ok(Json(MarkedRead { updated }))
}

#[instrument(skip(state, user), fields(user_id = %user.id))]
pub async fn remove(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    if !repo::delete(&state.db, user.id, id).await? {
        return Err(ApiError::NotFound("notification"));
    }
    Ok(StatusCode::NO_CONTENT)
}
