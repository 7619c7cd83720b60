use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use jsonwebtoken::{decode, DecodingKey, Validation};
use tracing::{debug, warn};
use uuid::Uuid;

use super::claims::Claims;
use crate::{config::JwtConfig, error::ApiError, state::AppState};

#[derive(Clone)]
pub struct JwtKeys {
    pub decoding: DecodingKey,
    pub issuer: String,
    pub audience: String,
}

impl From<&JwtConfig> for JwtKeys {
    fn from(cfg: &JwtConfig) -> Self {
        Self {
            decoding: DecodingKey::from_secret(cfg.secret.as_bytes()),
            issuer: cfg.issuer.clone(),
            audience: cfg.audience.clone(),
        }
    }
}

impl FromRef<AppState> for JwtKeys {
    fn from_ref(state: &AppState) -> Self {
        JwtKeys::from(&state.config.jwt)
    }
}

impl JwtKeys {
    pub fn verify(&self, token: &str) -> anyhow::Result<Claims> {
        let mut validation = Validation::default();
        validation.set_audience(std::slice::from_ref(&self.audience));
        validation.set_issuer(std::slice::from_ref(&self.issuer));
        let data = decode::<Claims>(token, &self.decoding, &validation)?;
        debug!(user_id = %data.claims.sub, "jwt verified");
        Ok(data.claims)
    }
}

/// Authenticated caller, resolved from `Authorization: Bearer <jwt>`.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub id: Uuid,
    pub email: Option<String>,
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
    JwtKeys: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let keys = JwtKeys::from_ref(state);
        let auth_header = parts
            .headers
            .get(axum::http::header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| ApiError::Unauthorized("Missing Authorization header".into()))?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .or_else(|| auth_header.strip_prefix("bearer "))
            .ok_or_else(|| ApiError::Unauthorized("Invalid Authorization header".into()))?;

        let claims = keys.verify(token).map_err(|e| {
            warn!(error = %e, "invalid or expired token");
            ApiError::Unauthorized("Invalid or expired token".into())
        })?;

        Ok(AuthUser {
            id: claims.sub,
            email: claims.email,
        })
    }
}


#[cfg(test)]
mod tests {
    use super::test_tokens::sign;
    use super::*;
    use time::Duration;

    fn cfg(secret: &str, issuer: &str, audience: &str) -> JwtConfig {
        JwtConfig {
            secret: secret.into(),
            issuer: issuer.into(),
            audience: audience.into(),
        }
    }

    #[test]
    fn verify_accepts_valid_token() {
        let cfg = cfg("dev-secret", "iss", "aud");
        let user_id = Uuid::new_v4();
        let token = sign(&cfg, user_id, Duration::minutes(5));
        let claims = JwtKeys::from(&cfg).verify(&token).expect("verify token");
        assert_eq!(claims.sub, user_id);
        assert_eq!(claims.iss, "iss");
        assert_eq!(claims.email.as_deref(), Some("owner@example.com"));
    }

    #[test]
    fn verify_rejects_wrong_audience() {
        let good = cfg("same-secret", "iss", "good-aud");
        let bad = cfg("same-secret", "iss", "bad-aud");
        let token = sign(&good, Uuid::new_v4(), Duration::minutes(5));
        assert!(JwtKeys::from(&bad).verify(&token).is_err());
    }

    #[test]
    fn verify_rejects_wrong_secret() {
        let token = sign(&cfg("a", "iss", "aud"), Uuid::new_v4(), Duration::minutes(5));
        assert!(JwtKeys::from(&cfg("b", "iss", "aud")).verify(&token).is_err());
    }

    #[test]
    fn verify_rejects_expired_token() {
        let cfg = cfg("dev-secret", "iss", "aud");
        let token = sign(&cfg, Uuid::new_v4(), Duration::hours(-2));
        assert!(JwtKeys::from(&cfg).verify(&token).is_err());
    }
}
