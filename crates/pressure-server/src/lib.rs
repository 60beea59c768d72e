pub mod auth;
pub mod embed;
pub mod error;
pub mod routes;
pub mod state;

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub use state::{AppState, Secrets, SimEvent};

/// Build the axum Router with all routes and middleware.
/// Used by `serve()` and available for integration testing.
pub fn build_router(app_state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Pages
        .route("/", get(routes::pages::home))
        .route("/news_ticker", get(routes::pages::news_ticker))
        .route("/dashboard/{team}", get(routes::pages::dashboard))
        .route("/admin", get(routes::pages::admin))
        // Timeline and crises
        .route("/news_feed", get(routes::news::news_feed))
        .route("/current_crisis/{team}", get(routes::crisis::current_crisis))
        // Instructor operations
        .route("/advance_timeline", post(routes::admin::advance_timeline))
        .route("/inject_crisis", post(routes::admin::inject_crisis))
        .route("/clear_crisis", post(routes::admin::clear_crisis))
        .route("/update_timer", post(routes::admin::update_timer))
        // Team chat endpoints
        .route("/team/{team}", get(routes::teams::team_redirect))
        .route("/team/{team}/embed", get(routes::teams::team_embed))
        .route("/health/{team}", get(routes::teams::health))
        .route(
            "/api/refresh-instances",
            get(routes::discovery::refresh_instances),
        )
        // Event log
        .route("/log_event", post(routes::event_log::log_event))
        .route("/admin/event_log", get(routes::event_log::event_log_page))
        .route("/api/event_log", get(routes::event_log::event_log_json))
        // State and live events
        .route("/api/state", get(routes::state::get_state))
        .route("/api/events", get(routes::events::sse_events))
        .fallback(embed::static_handler)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(app_state)
}

/// Run the simulation server on `0.0.0.0:{port}`.
pub async fn serve(app_state: AppState, port: u16, open_browser: bool) -> anyhow::Result<()> {
    let addr = format!("0.0.0.0:{port}");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    serve_on(app_state, listener, open_browser).await
}

/// Run the simulation server on a pre-bound listener.
///
/// Accepting a bound `TcpListener` lets the caller read the actual port
/// before starting (useful when `port = 0` and the OS picks a free port).
pub async fn serve_on(
    app_state: AppState,
    listener: tokio::net::TcpListener,
    open_browser: bool,
) -> anyhow::Result<()> {
    let actual_port = listener.local_addr()?.port();

    if app_state.discovery_api_key.is_some() {
        let discovery_state = app_state.clone();
        tokio::spawn(async move {
            match routes::discovery::refresh_endpoints(&discovery_state).await {
                Ok(()) => tracing::info!("team endpoints refreshed from instance discovery"),
                Err(e) => tracing::warn!(error = %e.0, "startup instance discovery failed"),
            }
        });
    }
    if !app_state.admin.is_configured() {
        tracing::warn!("ADMIN_TOKEN is not set; instructor operations are disabled");
    }

    let app = build_router(app_state);

    tracing::info!("simulation server listening on http://localhost:{actual_port}");

    if open_browser {
        let url = format!("http://localhost:{actual_port}");
        let _ = open::that(&url);
    }

    axum::serve(listener, app).await?;
    Ok(())
}
