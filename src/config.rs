use std::time::Duration;

use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    pub issuer: String,
    pub audience: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    pub endpoint: String,
    pub bucket: String,
    pub access_key: String,
    pub secret_key: String,
    pub region: String,
}

/// Deadline reminder poller settings.
#[derive(Debug, Clone, Deserialize)]
pub struct ReminderConfig {
    pub interval_secs: u64,
    pub horizon_days: i64,
}

impl ReminderConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs.max(1))
    }
}

impl Default for ReminderConfig {
    fn default() -> Self {
        Self {
            interval_secs: 3600,
            horizon_days: 3,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database_url: String,
    pub jwt: JwtConfig,
    pub storage: StorageConfig,
    pub reminders: ReminderConfig,
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.into())
}

fn env_parse<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse::<T>().ok())
        .unwrap_or(default)
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = std::env::var("DATABASE_URL")?;
        let jwt = JwtConfig {
            secret: std::env::var("JWT_SECRET")?,
            issuer: env_or("JWT_ISSUER", "projectdesk"),
            audience: env_or("JWT_AUDIENCE", "authenticated"),
        };
        let storage = StorageConfig {
            endpoint: std::env::var("S3_ENDPOINT")?,
            bucket: std::env::var("S3_BUCKET")?,
            access_key: std::env::var("S3_ACCESS_KEY")?,
            secret_key: std::env::var("S3_SECRET_KEY")?,
            region: env_or("S3_REGION", "us-east-1"),
        };
        let defaults = ReminderConfig::default();
        let reminders = ReminderConfig {
            interval_secs: env_parse("REMINDER_INTERVAL_SECS", defaults.interval_secs),
            horizon_days: env_parse("REMINDER_HORIZON_DAYS", defaults.horizon_days),
        };
        Ok(Self {
            database_url,
            jwt,
            storage,
            reminders,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reminder_interval_never_zero() {
        let cfg = ReminderConfig {
            interval_secs: 0,
            horizon_days: 1,
        };
        assert_eq!(cfg.interval(), Duration::from_secs(1));
    }

    #[test]
    fn env_parse_falls_back_on_garbage() {
        std::env::set_var("PROJECTDESK_TEST_NUM", "not-a-number");
        assert_eq!(env_parse("PROJECTDESK_TEST_NUM", 42u64), 42);
        std::env::set_var("PROJECTDESK_TEST_NUM", "7");
        assert_eq!(env_parse("PROJECTDESK_TEST_NUM", 42u64), 7);
        std::env::remove_var("PROJECTDESK_TEST_NUM");
    }
}
