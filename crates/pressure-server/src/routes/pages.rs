use axum::extract::{Path, State};
use axum::http::header::HOST;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{Html, IntoResponse, Response};
use pressure_core::types::Team;

use crate::auth::Admin;
use crate::embed::{escape_html, Page};
use crate::error::AppError;
use crate::state::AppState;

/// GET /: team chooser.
pub async fn home() -> Result<Html<String>, AppError> {
    let cards: String = Team::all()
        .iter()
        .map(|team| {
            format!(
                r#"<div class="team-card" style="border-color:{color}"><h2>{icon} {label}</h2><p>{blurb}</p><a class="button" href="/dashboard/{id}">Crisis centre</a> <a class="button secondary" href="/team/{id}">Access AI</a></div>"#,
                color = team.color(),
                icon = team.icon(),
                label = escape_html(team.label()),
                blurb = escape_html(team.blurb()),
                id = team.as_str(),
            )
        })
        .collect();
    Page::new("home.html").raw("teams", cards).render()
}

/// GET /news_ticker: full-screen headline ticker for the projector.
pub async fn news_ticker(State(app): State<AppState>) -> Result<Html<String>, AppError> {
    Page::new("ticker.html")
        .json(
            "config",
            &serde_json::json!({ "news_poll_seconds": app.pages.news_poll_seconds }),
        )
        .render()
}

/// GET /dashboard/{team}: the team's crisis centre.
pub async fn dashboard(
    State(app): State<AppState>,
    Path(team): Path<String>,
) -> Result<Html<String>, AppError> {
    let team: Team = team.parse()?;
    let (cooldown, month) = {
        let sim = app.sim.lock().await;
        (sim.cooldown_seconds(), sim.current_month().to_string())
    };
    Page::new("dashboard.html")
        .text("label", team.label())
        .text("icon", team.icon())
        .text("color", team.color())
        .text("month", month.to_uppercase())
        .json(
            "config",
            &serde_json::json!({
                "team": team,
                "countdown_duration": cooldown,
                "crisis_poll_seconds": app.pages.crisis_poll_seconds,
                "news_poll_seconds": app.pages.news_poll_seconds,
                "stats_poll_seconds": app.pages.stats_poll_seconds,
            }),
        )
        .render()
}

/// GET /admin: instructor console. Without a valid token this is a plain
/// 401 page rather than JSON.
pub async fn admin(
    State(app): State<AppState>,
    headers: HeaderMap,
    admin: Result<Admin, AppError>,
) -> Result<Response, AppError> {
    if admin.is_err() {
        return Ok((
            StatusCode::UNAUTHORIZED,
            Page::new("denied.html").render()?,
        )
            .into_response());
    }

    let (crises, cooldown) = {
        let sim = app.sim.lock().await;
        let crises: Vec<serde_json::Value> = sim
            .catalog()
            .iter()
            .map(|c| {
                let theme = c.theme();
                serde_json::json!({
                    "id": c.id,
                    "title": c.title,
                    "theme": theme,
                    "icon": theme.icon(),
                })
            })
            .collect();
        (crises, sim.cooldown_seconds())
    };
    let teams: Vec<serde_json::Value> = Team::all()
        .iter()
        .map(|t| serde_json::json!({ "id": t, "label": t.label(), "icon": t.icon() }))
        .collect();

    Ok(Page::new("admin.html")
        .json(
            "config",
            &serde_json::json!({
                "base_url": base_url(&headers),
                "crises": crises,
                "teams": teams,
                "countdown_duration": cooldown,
                "discovery_enabled": app.discovery_api_key.is_some(),
            }),
        )
        .render()?
        .into_response())
}

fn base_url(headers: &HeaderMap) -> String {
    let host = headers
        .get(HOST)
        .and_then(|h| h.to_str().ok())
        .unwrap_or("localhost");
    let scheme = headers
        .get("x-forwarded-proto")
        .and_then(|h| h.to_str().ok())
        .unwrap_or("http");
    format!("{scheme}://{host}")
}
