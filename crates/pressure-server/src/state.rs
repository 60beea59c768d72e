use std::sync::Arc;
use std::time::Duration;

use pressure_core::auth::AdminToken;
use pressure_core::catalog::Crisis;
use pressure_core::clock::{Clock, SystemClock};
use pressure_core::config::{Config, EndpointsConfig, PagesConfig};
use pressure_core::simulation::Simulation;
use pressure_core::timeline::NewsItem;
use pressure_core::types::{PerTeam, Team};
use serde::Serialize;
use tokio::sync::{broadcast, Mutex, RwLock};

/// Something the dashboards may want to react to without polling.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SimEvent {
    News { item: NewsItem },
    CrisisFired { crisis: Crisis },
    CrisisInjected { team: Team, crisis: Crisis },
    CrisisCleared { team: Team },
    MonthAdvanced { current_month: String, advanced: bool },
    CooldownChanged { seconds: u32 },
    EndpointsUpdated { endpoints: PerTeam<Option<String>> },
}

impl SimEvent {
    /// SSE event name.
    pub fn name(&self) -> &'static str {
        match self {
            SimEvent::News { .. } => "news",
            SimEvent::CrisisFired { .. }
            | SimEvent::CrisisInjected { .. }
            | SimEvent::CrisisCleared { .. } => "crisis",
            SimEvent::MonthAdvanced { .. } | SimEvent::CooldownChanged { .. } => "timeline",
            SimEvent::EndpointsUpdated { .. } => "endpoints",
        }
    }
}

/// Secrets read from the environment, kept out of the YAML config.
#[derive(Clone, Default)]
pub struct Secrets {
    pub admin_token: Option<String>,
    pub discovery_api_key: Option<String>,
}

/// Shared application state passed to all route handlers.
#[derive(Clone)]
pub struct AppState {
    /// One lock for the whole simulation so every operation applies atomically.
    pub sim: Arc<Mutex<Simulation>>,
    pub admin: Arc<AdminToken>,
    pub endpoints: Arc<RwLock<EndpointsConfig>>,
    pub pages: Arc<PagesConfig>,
    pub discovery_api_key: Option<Arc<str>>,
    pub clock: Arc<dyn Clock>,
    pub http: reqwest::Client,
    pub event_tx: broadcast::Sender<SimEvent>,
}

impl AppState {
    pub fn new(sim: Simulation, config: &Config, secrets: Secrets) -> Self {
        let (tx, _) = broadcast::channel(64);
        let http = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(config.endpoints.health_timeout_seconds))
            .build()
            .unwrap_or_default();
        Self {
            sim: Arc::new(Mutex::new(sim)),
            admin: Arc::new(AdminToken::new(secrets.admin_token.as_deref())),
            endpoints: Arc::new(RwLock::new(config.endpoints.clone())),
            pages: Arc::new(config.pages.clone()),
            discovery_api_key: secrets
                .discovery_api_key
                .map(|k| k.trim().to_string())
                .filter(|k| !k.is_empty())
                .map(Arc::from),
            clock: Arc::new(SystemClock),
            http,
            event_tx: tx,
        }
    }

    /// Swap the wall clock, e.g. for a hand-driven one in tests.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Broadcast to SSE subscribers. Having none is not an error.
    pub fn publish(&self, event: SimEvent) {
        let _ = self.event_tx.send(event);
    }

    pub async fn team_url(&self, team: Team) -> Option<String> {
        self.endpoints.read().await.for_team(team).map(str::to_string)
    }
}
