use axum::extract::{Query, State};
use axum::Json;
use pressure_core::types::Team;
use serde::Deserialize;

use crate::auth::Admin;
use crate::error::AppError;
use crate::state::{AppState, SimEvent};

/// POST /advance_timeline: skip to the start of the next month.
///
/// Crisis triggers in skipped headlines are not evaluated.
pub async fn advance_timeline(
    State(app): State<AppState>,
    Admin(grant): Admin,
) -> Json<serde_json::Value> {
    let step = app.sim.lock().await.force_advance_month(&grant);
    tracing::info!(month = %step.current_month, advanced = step.advanced, "timeline advanced by instructor");
    app.publish(SimEvent::MonthAdvanced {
        current_month: step.current_month.clone(),
        advanced: step.advanced,
    });
    Json(serde_json::json!({
        "status": if step.advanced { "advanced" } else { "at_end" },
        "current_month": step.current_month,
    }))
}

#[derive(Deserialize)]
pub struct InjectParams {
    team: String,
    crisis_id: String,
}

/// POST /inject_crisis: put one crisis on one team's board.
pub async fn inject_crisis(
    State(app): State<AppState>,
    Admin(grant): Admin,
    Query(params): Query<InjectParams>,
) -> Result<Json<serde_json::Value>, AppError> {
    let team: Team = params.team.parse()?;
    let crisis = app.sim.lock().await.inject(&grant, team, &params.crisis_id)?;
    tracing::info!(%team, crisis = %crisis.id, "crisis injected");
    let title = crisis.title.clone();
    app.publish(SimEvent::CrisisInjected { team, crisis });
    Ok(Json(serde_json::json!({
        "status": "injected",
        "crisis": title,
    })))
}

#[derive(Deserialize)]
pub struct ClearParams {
    team: String,
}

/// POST /clear_crisis: empty one team's board slot.
pub async fn clear_crisis(
    State(app): State<AppState>,
    Admin(grant): Admin,
    Query(params): Query<ClearParams>,
) -> Result<Json<serde_json::Value>, AppError> {
    let team: Team = params.team.parse()?;
    let previous = app.sim.lock().await.clear(&grant, team);
    tracing::info!(%team, previous = previous.as_ref().map(|c| c.id.as_str()), "crisis cleared");
    app.publish(SimEvent::CrisisCleared { team });
    Ok(Json(serde_json::json!({ "status": "cleared" })))
}

#[derive(Deserialize)]
pub struct TimerParams {
    duration: String,
}

/// POST /update_timer: change the crisis cooldown; out-of-range values are clamped.
pub async fn update_timer(
    State(app): State<AppState>,
    Admin(grant): Admin,
    Query(params): Query<TimerParams>,
) -> Result<Json<serde_json::Value>, AppError> {
    let requested = parse_saturating(&params.duration).ok_or_else(|| {
        AppError::bad_request(format!("duration must be an integer, got '{}'", params.duration))
    })?;
    let applied = app.sim.lock().await.set_cooldown(&grant, requested);
    tracing::info!(requested, applied, "cooldown updated");
    app.publish(SimEvent::CooldownChanged { seconds: applied });
    Ok(Json(serde_json::json!({
        "status": "updated",
        "new_duration": applied,
    })))
}

/// Parse a decimal integer, saturating at the `i64` limits instead of
/// rejecting values that overflow.
fn parse_saturating(raw: &str) -> Option<i64> {
    let raw = raw.trim();
    let (negative, digits) = match raw.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, raw.strip_prefix('+').unwrap_or(raw)),
    };
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    Some(raw.parse().unwrap_or(if negative { i64::MIN } else { i64::MAX }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_saturating_accepts_any_integer() {
        assert_eq!(parse_saturating("200"), Some(200));
        assert_eq!(parse_saturating(" -5 "), Some(-5));
        assert_eq!(parse_saturating("+7"), Some(7));
        assert_eq!(parse_saturating("99999999999999999999999"), Some(i64::MAX));
        assert_eq!(parse_saturating("-99999999999999999999999"), Some(i64::MIN));
    }

    #[test]
    fn parse_saturating_rejects_non_integers() {
        for raw in ["", "-", "1.5", "ten", "1e3", "--1"] {
            assert_eq!(parse_saturating(raw), None, "{raw}");
        }
    }
}
