use sqlx::FromRow;
use time::Date;
use uuid::Uuid;

use super::dto::Expense;

#[derive(Debug, Clone, FromRow)]
pub struct ExpenseRow {
    pub id: Uuid,
    pub description: String,
    pub amount: f64,
    pub date: Date,
    pub category: Option<String>,
}

impl From<ExpenseRow> for Expense {
    fn from(r: ExpenseRow) -> Self {
        Self {
            id: r.id,
            description: r.description,
            amount: r.amount,
            date: r.date,
            category: r.category.unwrap_or_default(),
        }
    }
}
