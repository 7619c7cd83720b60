use anyhow::Context;
use bytes::Bytes;
use lazy_static::lazy_static;
use regex::Regex;
use tracing::{info, warn};
use uuid::Uuid;

use super::dto::{Profile, ProfileUpdate};
use super::repo;
use super::repo_types::{ProfileChanges, UserRow};
use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

pub const AVATAR_MAX_BYTES: usize = 5 * 1024 * 1024;
const AVATAR_URL_TTL_SECS: u64 = 60 * 60;

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

pub(crate) fn is_valid_currency(code: &str) -> bool {
    lazy_static! {
        static ref CURRENCY_RE: Regex = Regex::new(r"^[a-z]{3}$").unwrap();
    }
    CURRENCY_RE.is_match(code)
}

fn trimmed(v: Option<String>) -> Option<String> {
    v.map(|s| s.trim().to_string())
}

pub fn to_changes(upd: ProfileUpdate) -> ApiResult<ProfileChanges> {
    let email = trimmed(upd.email).map(|e| e.to_lowercase());
    if let Some(e) = &email {
        if !is_valid_email(e) {
            return Err(ApiError::validation("Invalid email"));
        }
    }
    let currency = trimmed(upd.currency).map(|c| c.to_lowercase());
    if let Some(c) = &currency {
        if !is_valid_currency(c) {
            return Err(ApiError::validation(
                "currency must be a three-letter ISO 4217 code",
            ));
        }
    }
    Ok(ProfileChanges {
        email,
        name: trimmed(upd.name),
        company: trimmed(upd.company),
        currency,
        theme: upd.theme.map(|t| t.as_str()),
        date_format: upd.date_format.map(|f| f.as_str()),
    })
}

fn ext_from_mime(ct: &str) -> Option<&'static str> {
    match ct {
        "image/jpeg" | "image/jpg" => Some("jpg"),
        "image/png" => Some("png"),
        "image/webp" => Some("webp"),
        "image/gif" => Some("gif"),
        "image/svg+xml" => Some("svg"),
        _ => None,
    }
}

pub(crate) fn avatar_key(user_id: Uuid, object_id: Uuid, ext: &str) -> String {
    format!("avatars/{user_id}/{object_id}.{ext}")
}

/// Builds the response, presigning the avatar when one is stored.
pub async fn to_profile(st: &AppState, row: UserRow) -> anyhow::Result<Profile> {
    let avatar_url = match row.avatar_key.as_deref() {
        Some(key) => Some(
            st.storage
                .presign_get(key, AVATAR_URL_TTL_SECS)
                .await
                .with_context(|| format!("presign avatar {key}"))?,
        ),
        None => None,
    };
    Ok(Profile {
        id: row.id,
        email: row.email,
        name: row.name,
        company: row.company,
        avatar_url,
        currency: row.currency,
        theme: row.theme.parse().unwrap_or_default(),
        date_format: row.date_format.parse().unwrap_or_default(),
        created_at: row.created_at,
        updated_at: row.updated_at,
    })
}

pub async fn get_profile(st: &AppState, user_id: Uuid, email: Option<&str>) -> ApiResult<Profile> {
    let row = repo::ensure(&st.db, user_id, email).await?;
    Ok(to_profile(st, row).await?)
}

pub async fn update_profile(
    st: &AppState,
    user_id: Uuid,
    email: Option<&str>,
    upd: ProfileUpdate,
) -> ApiResult<Profile> {
    let changes = to_changes(upd)?;
    repo::ensure(&st.db, user_id, email).await?;
    let row = repo::update(&st.db, user_id, &changes)
        .await?
        .ok_or(ApiError::NotFound("user"))?;
    Ok(to_profile(st, row).await?)
}

pub struct AvatarUpload {
    pub body: Bytes,
    pub content_type: String,
}

pub async fn replace_avatar(
    st: &AppState,
    user_id: Uuid,
    email: Option<&str>,
    upload: AvatarUpload,
) -> ApiResult<Profile> {
    if upload.body.is_empty() {
        return Err(ApiError::validation("file is empty"));
    }
    if upload.body.len() > AVATAR_MAX_BYTES {
        return Err(ApiError::PayloadTooLarge(AVATAR_MAX_BYTES));
    }
    let ext = ext_from_mime(&upload.content_type)
        .ok_or_else(|| ApiError::UnsupportedMedia(upload.content_type.clone()))?;

    repo::ensure(&st.db, user_id, email).await?;
    let key = avatar_key(user_id, Uuid::new_v4(), ext);
    st.storage
        .put_object(&key, upload.body, &upload.content_type)
        .await?;

    let swapped = repo::swap_avatar_key(&st.db, user_id, Some(&key)).await;
    let previous = discard_on_error(st, &key, swapped).await?;
    remove_object(st, previous.as_deref()).await;
    info!(%user_id, %key, "avatar replaced");

    get_profile(st, user_id, email).await
}

pub async fn remove_avatar(st: &AppState, user_id: Uuid, email: Option<&str>) -> ApiResult<Profile> {
    repo::ensure(&st.db, user_id, email).await?;
    let previous = repo::swap_avatar_key(&st.db, user_id, None).await?;
    remove_object(st, previous.as_deref()).await;
    get_profile(st, user_id, email).await
}

/// Removes a just-uploaded object when the database write that should
/// reference it failed.
async fn discard_on_error<T>(st: &AppState, key: &str, res: anyhow::Result<T>) -> anyhow::Result<T> {
    if res.is_err() {
        remove_object(st, Some(key)).await;
    }
    res
}

/// Best effort: a failed delete is only logged.
async fn remove_object(st: &AppState, key: Option<&str>) {
    if let Some(key) = key {
        if let Err(e) = st.storage.delete_object(key).await {
            warn!(error = %e, %key, "failed to delete avatar object");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::dto::{DateFormat, Theme};
    use crate::storage::{fake::FakeStorage, StorageClient};
    use std::sync::Arc;
    use time::macros::datetime;

    #[test]
    fn test_ext_from_mime() {
        assert_eq!(ext_from_mime("image/jpeg"), Some("jpg"));
        assert_eq!(ext_from_mime("image/jpg"), Some("jpg"));
        assert_eq!(ext_from_mime("image/png"), Some("png"));
        assert_eq!(ext_from_mime("image/webp"), Some("webp"));
        assert_eq!(ext_from_mime("application/pdf"), None);
        assert_eq!(ext_from_mime("whatever/else"), None);
    }

    #[test]
    fn changes_normalise_and_validate() {
        let upd = ProfileUpdate {
            email: Some("  Sara@Example.COM ".into()),
            currency: Some("EGP".into()),
            theme: Some(Theme::Dark),
            date_format: Some(DateFormat::MonthDayYear),
            ..Default::default()
        };
        let c = to_changes(upd).unwrap();
        assert_eq!(c.email.as_deref(), Some("sara@example.com"));
        assert_eq!(c.currency.as_deref(), Some("egp"));
        assert_eq!(c.theme, Some("dark"));
        assert_eq!(c.date_format, Some("mm/dd/yyyy"));
        assert!(c.name.is_none());
    }

    #[test]
    fn changes_reject_bad_email_and_currency() {
        let bad_email = ProfileUpdate {
            email: Some("not-an-email".into()),
            ..Default::default()
        };
        assert!(matches!(to_changes(bad_email), Err(ApiError::Validation(_))));

        let bad_currency = ProfileUpdate {
            currency: Some("dollars".into()),
            ..Default::default()
        };
        assert!(matches!(to_changes(bad_currency), Err(ApiError::Validation(_))));
    }

    #[test]
    fn avatar_keys_are_namespaced_by_user() {
        let user = Uuid::nil();
        let obj = Uuid::from_u128(1);
        assert_eq!(
            avatar_key(user, obj, "png"),
            format!("avatars/{user}/{obj}.png")
        );
    }

    fn row(avatar_key: Option<&str>, theme: &str) -> UserRow {
        UserRow {
            id: Uuid::new_v4(),
            email: Some("a@b.co".into()),
            name: None,
            company: None,
            avatar_key: avatar_key.map(str::to_string),
            currency: "usd".into(),
            theme: theme.into(),
            date_format: "dd/mm/yyyy".into(),
            created_at: datetime!(2024-01-01 0:00 UTC),
            updated_at: datetime!(2024-01-01 0:00 UTC),
        }
    }

    #[tokio::test]
    async fn profile_presigns_stored_avatar() {
        let state = AppState::fake();
        let p = to_profile(&state, row(Some("avatars/u/1.png"), "dark"))
            .await
            .unwrap();
        let url = p.avatar_url.unwrap();
        assert!(url.contains("avatars/u/1.png"));
        assert_eq!(p.theme, Theme::Dark);
    }

    #[tokio::test]
    async fn profile_without_avatar_and_unknown_theme_uses_defaults() {
        let state = AppState::fake();
        let p = to_profile(&state, row(None, "neon")).await.unwrap();
        assert!(p.avatar_url.is_none());
        assert_eq!(p.theme, Theme::Light);
        assert_eq!(p.date_format, DateFormat::DayMonthYear);
    }

    #[tokio::test]
    async fn failed_db_write_discards_uploaded_object() {
        let storage = Arc::new(FakeStorage::default());
        let state = AppState::fake_with_storage(storage.clone());
        for key in ["avatars/u/kept.png", "avatars/u/orphan.png"] {
            storage
                .put_object(key, Bytes::from_static(b"png"), "image/png")
                .await
                .unwrap();
        }

        let ok = discard_on_error(&state, "avatars/u/kept.png", Ok(None::<String>)).await;
        assert!(ok.is_ok());

        let failed: anyhow::Result<Option<String>> = discard_on_error(
            &state,
            "avatars/u/orphan.png",
            Err(anyhow::anyhow!("connection reset")),
        )
        .await;
        assert!(failed.is_err());

        let objects = storage.objects.lock().unwrap();
        assert!(objects.contains_key("avatars/u/kept.png"));
        assert!(!objects.contains_key("avatars/u/orphan.png"));
    }

    #[tokio::test]
    async fn avatar_upload_is_checked_before_touching_storage() {
        let state = AppState::fake();
        let user = Uuid::new_v4();

        let empty = AvatarUpload {
            body: Bytes::new(),
            content_type: "image/png".into(),
        };
        assert!(matches!(
            replace_avatar(&state, user, None, empty).await,
            Err(ApiError::Validation(_))
        ));

        let huge = AvatarUpload {
            body: Bytes::from(vec![0u8; AVATAR_MAX_BYTES + 1]),
            content_type: "image/png".into(),
        };
        assert!(matches!(
            replace_avatar(&state, user, None, huge).await,
            Err(ApiError::PayloadTooLarge(_))
        ));

        let pdf = AvatarUpload {
            body: Bytes::from_static(b"%PDF"),
            content_type: "application/pdf".into(),
        };
        assert!(matches!(
            replace_avatar(&state, user, None, pdf).await,
            Err(ApiError::UnsupportedMedia(_))
        ));
    }
}
