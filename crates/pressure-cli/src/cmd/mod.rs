pub mod crises;
pub mod serve;
pub mod timeline;
pub mod validate;

use anyhow::Context;
use pressure_core::config::Config;
use pressure_core::scenario::{CompiledScenario, Scenario};
use std::path::Path;

pub fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    Config::load_or_default(path).with_context(|| match path {
        Some(p) => format!("failed to load config from {}", p.display()),
        None => "failed to build default config".to_string(),
    })
}

/// Load and compile the scenario the config points at (or the built-in one),
/// logging every trigger that names an undefined crisis.
pub fn load_scenario(config: &Config) -> anyhow::Result<CompiledScenario> {
    let path = config.scenario.as_deref();
    let scenario = Scenario::load_or_builtin(path).with_context(|| match path {
        Some(p) => format!("failed to load scenario from {}", p.display()),
        None => "failed to load built-in scenario".to_string(),
    })?;
    let compiled = scenario
        .compile(config.strict_triggers)
        .context("scenario is inconsistent")?;
    for d in &compiled.dangling {
        tracing::warn!(
            month = %d.month,
            entry = %d.entry,
            crisis = %d.crisis,
            "headline triggers an undefined crisis; trigger ignored"
        );
    }
    Ok(compiled)
}
