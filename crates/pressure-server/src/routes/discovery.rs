use std::time::Duration;

use axum::extract::State;
use axum::Json;
use pressure_core::discovery::{assign_instances, InstanceList};
use pressure_core::types::Team;

use crate::auth::Admin;
use crate::error::AppError;
use crate::state::{AppState, SimEvent};

/// Ask the GPU provider for running instances and map them onto teams.
pub async fn discover(app: &AppState) -> Result<Vec<(Team, String)>, AppError> {
    let key = app
        .discovery_api_key
        .clone()
        .ok_or_else(|| AppError::bad_gateway("no discovery API key configured"))?;
    let (url, timeout, port) = {
        let endpoints = app.endpoints.read().await;
        (
            endpoints.discovery_url.clone(),
            Duration::from_secs(endpoints.discovery_timeout_seconds),
            endpoints.instance_port,
        )
    };

    let resp = app
        .http
        .get(&url)
        .bearer_auth(&*key)
        .timeout(timeout)
        .send()
        .await
        .map_err(|e| AppError::bad_gateway(format!("instance discovery failed: {e}")))?;
    if !resp.status().is_success() {
        return Err(AppError::bad_gateway(format!(
            "instance discovery returned {}",
            resp.status()
        )));
    }
    let listing: InstanceList = resp
        .json()
        .await
        .map_err(|e| AppError::bad_gateway(format!("unreadable instance listing: {e}")))?;

    let running = listing.instances.iter().filter(|i| i.is_running()).count();
    tracing::info!(total = listing.instances.len(), running, "fetched instance listing");
    Ok(assign_instances(&listing.instances, port))
}

/// Discover instances and overwrite the endpoints of the teams they map to.
/// Teams without an instance keep their previous endpoint.
pub async fn refresh_endpoints(app: &AppState) -> Result<(), AppError> {
    let assigned = discover(app).await?;
    if assigned.is_empty() {
        return Err(AppError::bad_gateway("no running instances found"));
    }

    let urls = {
        let mut endpoints = app.endpoints.write().await;
        for (team, url) in assigned {
            tracing::info!(%team, %url, "mapped team to instance");
            endpoints.set_team(team, Some(url));
        }
        endpoints.team_urls()
    };
    app.publish(SimEvent::EndpointsUpdated { endpoints: urls });
    Ok(())
}

/// GET /api/refresh-instances: re-run instance discovery on demand.
pub async fn refresh_instances(
    State(app): State<AppState>,
    Admin(_grant): Admin,
) -> Result<Json<serde_json::Value>, AppError> {
    refresh_endpoints(&app).await?;
    let endpoints = app.endpoints.read().await.team_urls();
    Ok(Json(serde_json::json!({
        "status": "updated",
        "endpoints": endpoints,
    })))
}
