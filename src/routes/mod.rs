pub mod activities;
pub mod health;
pub mod statistics;

use axum::Router;

use crate::state::AppState;

pub fn router(state: AppState) -> Router {
    Router::new()
        .merge(health::router())
        .merge(activities::router())
        .merge(statistics::router())
        .with_state(state)
}
