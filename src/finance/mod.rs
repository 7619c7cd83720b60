//! Portfolio-level money figures derived from the user's projects and expenses.

pub mod analytics;
mod handlers;
pub mod summary;

use crate::state::AppState;
use axum::Router;

/// Rounds to 2 decimal places, halves away from zero.
pub fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

pub fn router() -> Router<AppState> {
    handlers::routes()
}

#[cfg(test)]
mod tests {
    use super::round_cents;

    #[test]
    fn rounds_to_cents() {
        assert_eq!(round_cents(0.0), 0.0);
        assert_eq!(round_cents(10.004), 10.0);
        assert_eq!(round_cents(10.005_000_1), 10.01);
        assert_eq!(round_cents(1234.5678), 1234.57);
        assert_eq!(round_cents(-3.333), -3.33);
    }
}
