use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

/// User profile row. The id is the identity provider's subject.
#[derive(Debug, Clone, FromRow)]
pub struct UserRow {
    pub id: Uuid,
    pub email: Option<String>,
    pub name: Option<String>,
    pub company: Option<String>,
    pub avatar_key: Option<String>, // object key, presigned on read
    pub currency: String,
    pub theme: String,
    pub date_format: String,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

/// Column values for a profile update, `None` keeps the stored value.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct ProfileChanges {
    pub email: Option<String>,
    pub name: Option<String>,
    pub company: Option<String>,
    pub currency: Option<String>,
    pub theme: Option<&'static str>,
    pub date_format: Option<&'static str>,
}
