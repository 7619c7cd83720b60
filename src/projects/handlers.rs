use axum::{
    extract::{Path, Query, State},
    http::{header, HeaderMap, HeaderValue, StatusCode},
    routing::{get, put},
    Json, Router,
};
use tracing::instrument;
use uuid::Uuid;

use super::dto::{ListQuery, ProgressRequest, Project, ProjectDetails, ProjectInput};
use super::services;
use crate::{auth::AuthUser, error::ApiResult, extract::JsonBody, state::AppState};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/projects", get(list_projects).post(create_project))
        .route(
            "/projects/:id",
            get(get_project).put(update_project).delete(delete_project),
        )
        .route("/projects/:id/progress", put(update_progress))
}

#[instrument(skip(state, user), fields(user_id = %user.id))]
pub async fn list_projects(
    State(state): State<AppState>,
    user: AuthUser,
    Query(q): Query<ListQuery>,
) -> ApiResult<Json<Vec<Project>>> {
    let (filter, sort) = services::parse_listing(&q)?;
    let projects = services::list_projects(&state, user.id).await?;
    Ok(Json(services::apply_listing(projects, filter, sort)))
}

#[instrument(skip(state, user), fields(user_id = %user.id))]
pub async fn get_project(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<ProjectDetails>> {
    Ok(Json(services::get_details(&state, user.id, id).await?))
}

#[instrument(skip(state, user, body), fields(user_id = %user.id))]
pub async fn create_project(
    State(state): State<AppState>,
    user: AuthUser,
    JsonBody(body): JsonBody<ProjectInput>,
) -> ApiResult<(StatusCode, HeaderMap, Json<Project>)> {
    let project =
        services::create_project(&state, user.id, user.email.as_deref(), body).await?;

    let mut headers = HeaderMap::new();
    if let Ok(location) = HeaderValue::from_str(&format!("/api/v1/projects/{}", project.id)) {
        headers.insert(header::LOCATION, location);
    }
    Ok((StatusCode::CREATED, headers, Json(project)))
}

#[instrument(skip(state, user, body), fields(user_id = %user.id))]
pub async fn update_project(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    JsonBody(body): JsonBody<ProjectInput>,
) -> ApiResult<Json<Project>> {
    Ok(Json(services::update_project(&state, user.id, id, body).await?))
}

#[instrument(skip(state, user), fields(user_id = %user.id))]
pub async fn update_progress(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    JsonBody(body): JsonBody<ProgressRequest>,
) -> ApiResult<Json<Project>> {
    let project =
        services::update_progress(&state, user.id, id, body.completion_percentage).await?;
    Ok(Json(project))
}

#[instrument(skip(state, user), fields(user_id = %user.id))]
pub async fn delete_project(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    services::delete_project(&state, user.id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
