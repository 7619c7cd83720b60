use serde::{Deserialize, Serialize};
use time::Date;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Expense {
    pub id: Uuid,
    pub description: String,
    pub amount: f64,
    #[serde(with = "crate::dates::date")]
    pub date: Date,
    pub category: String,
}

/// Body of `POST` and `PUT` on a project's expenses.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpenseInput {
    pub description: String,
    pub amount: f64,
    #[serde(with = "crate::dates::date")]
    pub date: Date,
    #[serde(default)]
    pub category: String,
}
