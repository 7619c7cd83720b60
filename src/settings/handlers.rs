use axum::{extract::State, routing::get, Json, Router};
use tracing::{info, instrument};

use super::dto::{Settings, SettingsUpdate};
use super::repo;
use crate::{
    auth::AuthUser,
    error::{ApiError, ApiResult},
    extract::JsonBody,
    profile::repo as profile_repo,
    state::AppState,
};

pub fn routes() -> Router<AppState> {
    Router::new().route("/settings", get(get_settings).put(update_settings))
}

#[instrument(skip(state, user), fields(user_id = %user.id))]
pub async fn get_settings(State(state): State<AppState>, user: AuthUser) -> ApiResult<Json<Settings>> {
    profile_repo::ensure(&state.db, user.id, user.email.as_deref()).await?;
    Ok(Json(repo::ensure(&state.db, user.id).await?))
}

#[instrument(skip(state, user), fields(user_id = %user.id))]
pub async fn update_settings(
    State(state): State<AppState>,
    user: AuthUser,
    JsonBody(body): JsonBody<SettingsUpdate>,
) -> ApiResult<Json<Settings>> {
    profile_repo::ensure(&state.db, user.id, user.email.as_deref()).await?;
    let current = repo::ensure(&state.db, user.id).await?;
    if body.is_empty() {
        return Ok(Json(current));
    }
    let settings = repo::update(&state.db, user.id, &body)
        .await?
        .ok_or(ApiError::NotFound("settings"))?;
    info!(user_id = %user.id, ?body, "settings updated");
    Ok(Json(settings))
}
