use std::collections::HashMap;

use serde::Serialize;

use super::round_cents;
use crate::expenses::dto::Expense;
use crate::projects::dto::Project;

pub const UNCATEGORIZED: &str = "uncategorized";

/// Budget against spend and billed hours, across all projects.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FinancialOverview {
    pub total_budget: f64,
    pub total_expenses: f64,
    pub total_earned: f64,
    pub net_profit: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryTotal {
    pub category: String,
    pub amount: f64,
    pub count: u32,
}

pub fn overview(projects: &[Project], expenses: &[Expense]) -> FinancialOverview {
    let total_budget: f64 = projects.iter().map(|p| p.budget).sum();
    let total_earned: f64 = projects
        .iter()
        .map(|p| p.hours_worked.unwrap_or(0.0) * p.hourly_rate.unwrap_or(0.0))
        .sum();
    let total_expenses: f64 = expenses.iter().map(|e| e.amount).sum();

    FinancialOverview {
        total_budget: round_cents(total_budget),
        total_expenses: round_cents(total_expenses),
        total_earned: round_cents(total_earned),
        net_profit: round_cents(total_budget - total_expenses),
    }
}

fn category_key(category: &str) -> &str {
    match category.trim() {
        "" => UNCATEGORIZED,
        c => c,
    }
}

/// Sums `(category, amount)` pairs, largest first. Ties break on the category name.
fn group_by_category<'a>(items: impl Iterator<Item = (&'a str, f64)>) -> Vec<CategoryTotal> {
    let mut buckets: HashMap<&str, (f64, u32)> = HashMap::new();
    for (category, amount) in items {
        let entry = buckets.entry(category_key(category)).or_insert((0.0, 0));
        entry.0 += amount;
        entry.1 += 1;
    }

    let mut out: Vec<CategoryTotal> = buckets
        .into_iter()
        .map(|(category, (amount, count))| CategoryTotal {
            category: category.to_string(),
            amount: round_cents(amount),
            count,
        })
        .collect();
    out.sort_by(|a, b| {
        b.amount
            .total_cmp(&a.amount)
            .then_with(|| a.category.cmp(&b.category))
    });
    out
}

/// Spend per expense category.
pub fn expenses_by_category(expenses: &[Expense]) -> Vec<CategoryTotal> {
    group_by_category(expenses.iter().map(|e| (e.category.as_str(), e.amount)))
}

/// Budget per project category, every status included.
pub fn income_by_category(projects: &[Project]) -> Vec<CategoryTotal> {
    group_by_category(projects.iter().map(|p| (p.category.as_str(), p.budget)))
}
