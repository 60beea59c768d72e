use axum::extract::{Path, State};
use axum::Json;
use pressure_core::simulation::CrisisStatus;
use pressure_core::types::Team;

use crate::error::AppError;
use crate::state::AppState;

/// GET /current_crisis/{team}: the team's active crisis and the gate countdown.
pub async fn current_crisis(
    State(app): State<AppState>,
    Path(team): Path<String>,
) -> Result<Json<CrisisStatus>, AppError> {
    let team: Team = team.parse()?;
    let sim = app.sim.lock().await;
    Ok(Json(sim.read(team, app.clock.now())))
}
