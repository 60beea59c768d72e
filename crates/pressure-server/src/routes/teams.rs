use std::time::Duration;

use axum::extract::{Path, State};
use axum::response::{Html, Redirect};
use axum::Json;
use pressure_core::types::Team;
use serde::Serialize;

use crate::embed::Page;
use crate::error::AppError;
use crate::state::AppState;

async fn team_endpoint(app: &AppState, team: &str) -> Result<(Team, Option<String>), AppError> {
    let team: Team = team.parse()?;
    Ok((team, app.team_url(team).await))
}

/// GET /team/{team}: redirect to the team's AI chat interface.
pub async fn team_redirect(
    State(app): State<AppState>,
    Path(team): Path<String>,
) -> Result<Redirect, AppError> {
    let (team, url) = team_endpoint(&app, &team).await?;
    let url = url.ok_or_else(|| AppError::not_found(format!("no chat endpoint for team {team}")))?;
    Ok(Redirect::temporary(&url))
}

/// GET /team/{team}/embed: the team's chat interface in a full-page iframe,
/// for embedding in a course site.
pub async fn team_embed(
    State(app): State<AppState>,
    Path(team): Path<String>,
) -> Result<Html<String>, AppError> {
    let (team, url) = team_endpoint(&app, &team).await?;
    let url = url.ok_or_else(|| AppError::not_found(format!("no chat endpoint for team {team}")))?;
    Page::new("embed.html")
        .text("title", format!("Team {} AI System", team.as_str().to_uppercase()))
        .text("src", url)
        .render()
}

#[derive(Debug, Serialize)]
pub struct Health {
    pub team: Team,
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<u16>,
}

/// GET /health/{team}: probe the team's chat endpoint.
///
/// Any HTTP answer counts as online; a connection failure, timeout or missing
/// endpoint is offline.
pub async fn health(
    State(app): State<AppState>,
    Path(team): Path<String>,
) -> Result<Json<Health>, AppError> {
    let (team, url) = team_endpoint(&app, &team).await?;
    let timeout = Duration::from_secs(app.endpoints.read().await.health_timeout_seconds);

    let code = match url {
        Some(url) => match app.http.get(&url).timeout(timeout).send().await {
            Ok(resp) => Some(resp.status().as_u16()),
            Err(e) => {
                tracing::debug!(%team, %url, error = %e, "chat endpoint unreachable");
                None
            }
        },
        None => None,
    };

    Ok(Json(Health {
        team,
        status: if code.is_some() { "online" } else { "offline" },
        code,
    }))
}
