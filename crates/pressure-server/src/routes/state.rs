use axum::extract::State;
use axum::Json;

use crate::auth::Admin;
use crate::state::AppState;

/// GET /api/state: simulation snapshot plus the team endpoint table.
pub async fn get_state(State(app): State<AppState>, Admin(_grant): Admin) -> Json<serde_json::Value> {
    let snapshot = app.sim.lock().await.snapshot(app.clock.now());
    let endpoints = app.endpoints.read().await.team_urls();
    Json(serde_json::json!({
        "simulation": snapshot,
        "endpoints": endpoints,
        "discovery_enabled": app.discovery_api_key.is_some(),
    }))
}
