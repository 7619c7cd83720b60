use axum::{
    extract::{multipart::MultipartError, DefaultBodyLimit, Multipart, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use bytes::BytesMut;
use tracing::{instrument, warn};

use super::dto::{Profile, ProfileUpdate};
use super::services::{self, AvatarUpload, AVATAR_MAX_BYTES};
use crate::{
    auth::AuthUser,
    error::{ApiError, ApiResult},
    extract::JsonBody,
    state::AppState,
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/me", get(get_me).put(update_me))
        .route(
            "/me/avatar",
            post(upload_avatar)
                .delete(delete_avatar)
                // hard cap; the file itself is counted against AVATAR_MAX_BYTES while reading
                .layer(DefaultBodyLimit::max(2 * AVATAR_MAX_BYTES)),
        )
}

fn multipart_error(e: MultipartError) -> ApiError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        return ApiError::PayloadTooLarge(AVATAR_MAX_BYTES);
    }
    warn!(error = %e, "malformed multipart body");
    ApiError::validation(format!("malformed multipart body: {}", e.body_text()))
}

#[instrument(skip(state, user), fields(user_id = %user.id))]
pub async fn get_me(State(state): State<AppState>, user: AuthUser) -> ApiResult<Json<Profile>> {
    let profile = services::get_profile(&state, user.id, user.email.as_deref()).await?;
    Ok(Json(profile))
}

#[instrument(skip(state, user, body), fields(user_id = %user.id))]
pub async fn update_me(
    State(state): State<AppState>,
    user: AuthUser,
    JsonBody(body): JsonBody<ProfileUpdate>,
) -> ApiResult<Json<Profile>> {
    let profile = services::update_profile(&state, user.id, user.email.as_deref(), body).await?;
    Ok(Json(profile))
}

/// POST /me/avatar (multipart, field `file`)
#[instrument(skip(state, user, mp), fields(user_id = %user.id))]
pub async fn upload_avatar(
    State(state): State<AppState>,
    user: AuthUser,
    mut mp: Multipart,
) -> ApiResult<Json<Profile>> {
    let mut upload = None;
    while let Some(mut field) = mp.next_field().await.map_err(multipart_error)? {
        if field.name() != Some("file") {
            continue;
        }
        let content_type = field
            .content_type()
            .map(|s| s.to_string())
            .unwrap_or_else(|| "application/octet-stream".into());

        let mut body = BytesMut::new();
        while let Some(chunk) = field.chunk().await.map_err(multipart_error)? {
            if body.len() + chunk.len() > AVATAR_MAX_BYTES {
                return Err(ApiError::PayloadTooLarge(AVATAR_MAX_BYTES));
            }
            body.extend_from_slice(&chunk);
        }
        upload = Some(AvatarUpload {
            body: body.freeze(),
            content_type,
        });
        break;
    }

    let upload = upload.ok_or_else(|| ApiError::validation("file is required"))?;
    let profile = services::replace_avatar(&state, user.id, user.email.as_deref(), upload).await?;
    Ok(Json(profile))
}

#[instrument(skip(state, user), fields(user_id = %user.id))]
pub async fn delete_avatar(State(state): State<AppState>, user: AuthUser) -> ApiResult<Json<Profile>> {
    let profile = services::remove_avatar(&state, user.id, user.email.as_deref()).await?;
    Ok(Json(profile))
}
