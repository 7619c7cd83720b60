//! In-app notifications and the due-date reminder poller.

pub mod dto;
mod handlers;
pub mod reminders;
pub mod repo;
pub mod repo_types;

use crate::state::AppState;
use axum::Router;

pub fn router() -> Router<AppState> {
    handlers::routes()
}
