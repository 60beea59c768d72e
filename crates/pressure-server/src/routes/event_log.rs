use axum::extract::{Query, State};
use axum::response::Html;
use axum::Json;
use pressure_core::event_log::{EventLog, LoggedEvent};
use pressure_core::types::Team;
use serde::Deserialize;

use crate::auth::Admin;
use crate::embed::{escape_html, Page};
use crate::error::AppError;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct LogParams {
    team: String,
    event_id: String,
    event_title: String,
    #[serde(default)]
    response: Option<String>,
}

/// POST /log_event: record that a team saw a crisis, and how it answered.
pub async fn log_event(
    State(app): State<AppState>,
    Query(params): Query<LogParams>,
) -> Result<Json<serde_json::Value>, AppError> {
    let team: Team = params.team.parse()?;
    let event = LoggedEvent::new(
        app.clock.now(),
        &params.event_id,
        &params.event_title,
        params.response.as_deref(),
    );
    tracing::info!(%team, event = %event.event_id, response = event.response.as_deref(), "team event logged");
    app.sim.lock().await.log_event(team, event);
    Ok(Json(serde_json::json!({ "status": "logged" })))
}

/// GET /api/event_log: every team's log as JSON.
pub async fn event_log_json(
    State(app): State<AppState>,
    Admin(grant): Admin,
) -> Json<EventLog> {
    Json(app.sim.lock().await.event_log(&grant).clone())
}

/// GET /admin/event_log: the log as a page, with a JSON download.
pub async fn event_log_page(
    State(app): State<AppState>,
    Admin(grant): Admin,
) -> Result<Html<String>, AppError> {
    let log = app.sim.lock().await.event_log(&grant).clone();
    Page::new("event_log.html")
        .raw("logs", render_log(&log))
        .json("log", &serde_json::to_value(&log)?)
        .render()
}

fn render_log(log: &EventLog) -> String {
    let mut html = String::new();
    for (team, events) in log.iter() {
        html.push_str(&format!(
            r#"<section class="team-log"><h2>{} {}</h2>"#,
            team.icon(),
            escape_html(team.label())
        ));
        if events.is_empty() {
            html.push_str(r#"<p class="muted">No events yet.</p>"#);
        }
        for event in events {
            html.push_str(&format!(
                r#"<div class="event"><div class="timestamp">{}</div><div><strong>{}</strong> <code>{}</code></div><div>Response: {}</div></div>"#,
                event.timestamp.format("%Y-%m-%d %H:%M:%S UTC"),
                escape_html(&event.event_title),
                escape_html(&event.event_id),
                escape_html(event.response.as_deref().unwrap_or("N/A")),
            ));
        }
        html.push_str("</section>");
    }
    html
}
