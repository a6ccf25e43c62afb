use axum::{extract::State, routing::get, Json, Router};

use crate::pipeline::stats;
use crate::state::AppState;
use crate::types::activity_type::ActivityTypeCatalog;
use crate::types::statistics::SportStatistics;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/activity-types", get(activity_types))
        .route("/api/statistics", get(statistics))
}

async fn activity_types(State(state): State<AppState>) -> Json<ActivityTypeCatalog> {
    Json(state.activity_types().clone())
}

async fn statistics(State(state): State<AppState>) -> Json<Vec<SportStatistics>> {
    let records = state.all();
    Json(stats::sport_statistics(&records, state.activity_types()))
}
