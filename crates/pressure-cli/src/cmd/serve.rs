use anyhow::Context;
use clap::Args;
use pressure_core::types::Team;
use pressure_server::{AppState, Secrets};
use std::path::Path;

#[derive(Args, Debug)]
pub struct ServeArgs {
    /// Port to listen on
    #[arg(long, env = "PORT", default_value = "8000")]
    pub port: u16,

    /// Don't open the landing page in a browser
    #[arg(long)]
    pub no_open: bool,

    /// Shared secret for instructor operations; without it they are all refused
    #[arg(long, env = "ADMIN_TOKEN", hide_env_values = true)]
    pub admin_token: Option<String>,

    /// GPU provider API key used to discover team chat instances
    #[arg(long, env = "VAST_API_KEY", hide_env_values = true)]
    pub vast_api_key: Option<String>,

    /// Chat endpoint for team USA (overrides the config file)
    #[arg(long, env = "USA_WEBUI_URL")]
    pub usa_url: Option<String>,

    /// Chat endpoint for team China (overrides the config file)
    #[arg(long, env = "CHINA_WEBUI_URL")]
    pub china_url: Option<String>,

    /// Chat endpoint for team Neutral (overrides the config file)
    #[arg(long, env = "NEUTRAL_WEBUI_URL")]
    pub neutral_url: Option<String>,
}

pub fn run(config_path: Option<&Path>, args: ServeArgs) -> anyhow::Result<()> {
    let mut config = super::load_config(config_path)?;
    for (team, url) in [
        (Team::Usa, args.usa_url),
        (Team::China, args.china_url),
        (Team::Neutral, args.neutral_url),
    ] {
        if url.is_some() {
            config.endpoints.set_team(team, url);
        }
    }

    for w in config.validate() {
        tracing::warn!("config: {}", w.message);
    }
    config.ensure_valid().context("refusing to start")?;

    let scenario = super::load_scenario(&config)?;
    tracing::info!(
        crises = scenario.catalog.len(),
        headlines = scenario.timeline.total_entries(),
        months = scenario.timeline.months().len(),
        "scenario loaded"
    );
    let sim = scenario.into_simulation(config.gate.build());
    let state = AppState::new(
        sim,
        &config,
        Secrets {
            admin_token: args.admin_token,
            discovery_api_key: args.vast_api_key,
        },
    );

    let port = args.port;
    let open_browser = !args.no_open;
    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(async move {
        let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{port}"))
            .await
            .with_context(|| format!("failed to bind port {port}"))?;
        let actual_port = listener.local_addr()?.port();
        println!("AI Ethics Under Pressure → http://localhost:{actual_port}");

        tokio::select! {
            res = pressure_server::serve_on(state, listener, open_browser) => res,
            _ = tokio::signal::ctrl_c() => Ok(()),
        }
    })
}
