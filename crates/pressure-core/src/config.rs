use crate::error::{Result, SimError};
use crate::gate::{CooldownBounds, CrisisGate};
use crate::types::{PerTeam, Team};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

// ---------------------------------------------------------------------------
// ConfigWarning / WarnLevel
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigWarning {
    pub level: WarnLevel,
    pub message: String,
}

impl ConfigWarning {
    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            level: WarnLevel::Warning,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: WarnLevel::Error,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarnLevel {
    Warning,
    Error,
}

// ---------------------------------------------------------------------------
// GateConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GateConfig {
    #[serde(default = "default_cooldown")]
    pub cooldown_seconds: u32,
    #[serde(default = "default_min_cooldown")]
    pub min_cooldown_seconds: u32,
    #[serde(default = "default_max_cooldown")]
    pub max_cooldown_seconds: u32,
}

fn default_cooldown() -> u32 {
    120
}

fn default_min_cooldown() -> u32 {
    10
}

fn default_max_cooldown() -> u32 {
    600
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            cooldown_seconds: default_cooldown(),
            min_cooldown_seconds: default_min_cooldown(),
            max_cooldown_seconds: default_max_cooldown(),
        }
    }
}

impl GateConfig {
    pub fn bounds(&self) -> CooldownBounds {
        CooldownBounds {
            min: self.min_cooldown_seconds,
            max: self.max_cooldown_seconds,
        }
    }

    pub fn build(&self) -> CrisisGate {
        CrisisGate::new(self.cooldown_seconds, self.bounds())
    }
}

// ---------------------------------------------------------------------------
// EndpointsConfig
// ---------------------------------------------------------------------------

/// External AI-chat endpoints, one per team.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EndpointsConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usa: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub china: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub neutral: Option<String>,
    #[serde(default = "default_health_timeout")]
    pub health_timeout_seconds: u64,
    /// Instance listing endpoint of the GPU provider.
    #[serde(default = "default_discovery_url")]
    pub discovery_url: String,
    #[serde(default = "default_discovery_timeout")]
    pub discovery_timeout_seconds: u64,
    /// Container port the chat UI listens on inside each instance.
    #[serde(default = "default_instance_port")]
    pub instance_port: u16,
}

fn default_health_timeout() -> u64 {
    5
}

fn default_discovery_url() -> String {
    "https://console.vast.ai/api/v0/instances/".to_string()
}

fn default_discovery_timeout() -> u64 {
    10
}

fn default_instance_port() -> u16 {
    7500
}

impl Default for EndpointsConfig {
    fn default() -> Self {
        Self {
            usa: None,
            china: None,
            neutral: None,
            health_timeout_seconds: default_health_timeout(),
            discovery_url: default_discovery_url(),
            discovery_timeout_seconds: default_discovery_timeout(),
            instance_port: default_instance_port(),
        }
    }
}

impl EndpointsConfig {
    pub fn for_team(&self, team: Team) -> Option<&str> {
        match team {
            Team::Usa => self.usa.as_deref(),
            Team::China => self.china.as_deref(),
            Team::Neutral => self.neutral.as_deref(),
        }
        .map(str::trim)
        .filter(|url| !url.is_empty())
    }

    pub fn set_team(&mut self, team: Team, url: Option<String>) {
        let slot = match team {
            Team::Usa => &mut self.usa,
            Team::China => &mut self.china,
            Team::Neutral => &mut self.neutral,
        };
        *slot = url;
    }

    pub fn team_urls(&self) -> PerTeam<Option<String>> {
        PerTeam::from_fn(|team| self.for_team(team).map(str::to_string))
    }
}

// ---------------------------------------------------------------------------
// PagesConfig
// ---------------------------------------------------------------------------

/// Client-side polling intervals baked into the served pages.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PagesConfig {
    #[serde(default = "default_news_poll")]
    pub news_poll_seconds: u32,
    #[serde(default = "default_crisis_poll")]
    pub crisis_poll_seconds: u32,
    #[serde(default = "default_stats_poll")]
    pub stats_poll_seconds: u32,
}

fn default_news_poll() -> u32 {
    20
}

fn default_crisis_poll() -> u32 {
    5
}

fn default_stats_poll() -> u32 {
    30
}

impl Default for PagesConfig {
    fn default() -> Self {
        Self {
            news_poll_seconds: default_news_poll(),
            crisis_poll_seconds: default_crisis_poll(),
            stats_poll_seconds: default_stats_poll(),
        }
    }
}

// ---------------------------------------------------------------------------
// Config (top-level)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_version")]
    pub version: u32,
    #[serde(default)]
    pub gate: GateConfig,
    #[serde(default)]
    pub endpoints: EndpointsConfig,
    #[serde(default)]
    pub pages: PagesConfig,
    /// YAML file replacing the built-in crises and timeline.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scenario: Option<PathBuf>,
    /// Refuse to start when a headline triggers an undefined crisis.
    #[serde(default)]
    pub strict_triggers: bool,
}

fn default_version() -> u32 {
    1
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: default_version(),
            gate: GateConfig::default(),
            endpoints: EndpointsConfig::default(),
            pages: PagesConfig::default(),
            scenario: None,
            strict_triggers: false,
        }
    }
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let data = std::fs::read_to_string(path)?;
        let mut cfg: Config = serde_yaml::from_str(&data)?;
        // Scenario paths are relative to the config file.
        if let (Some(scenario), Some(dir)) = (cfg.scenario.as_mut(), path.parent()) {
            if scenario.is_relative() {
                *scenario = dir.join(&*scenario);
            }
        }
        Ok(cfg)
    }

    /// Load `path` if given, otherwise fall back to defaults.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(p) => Self::load(p),
            None => Ok(Self::default()),
        }
    }

    // -----------------------------------------------------------------------
    // Validation
    // -----------------------------------------------------------------------

    pub fn validate(&self) -> Vec<ConfigWarning> {
        let mut warnings = Vec::new();
        let gate = &self.gate;

        if gate.min_cooldown_seconds > gate.max_cooldown_seconds {
            warnings.push(ConfigWarning::error(format!(
                "gate.min_cooldown_seconds ({}) exceeds gate.max_cooldown_seconds ({})",
                gate.min_cooldown_seconds, gate.max_cooldown_seconds
            )));
        } else if !(gate.min_cooldown_seconds..=gate.max_cooldown_seconds)
            .contains(&gate.cooldown_seconds)
        {
            warnings.push(ConfigWarning::warning(format!(
                "gate.cooldown_seconds ({}) is outside {}..={} and will be clamped",
                gate.cooldown_seconds, gate.min_cooldown_seconds, gate.max_cooldown_seconds
            )));
        }

        if self.endpoints.health_timeout_seconds == 0 {
            warnings.push(ConfigWarning::error(
                "endpoints.health_timeout_seconds must be greater than zero",
            ));
        }
        if self.endpoints.discovery_timeout_seconds == 0 {
            warnings.push(ConfigWarning::error(
                "endpoints.discovery_timeout_seconds must be greater than zero",
            ));
        }

        for team in Team::all() {
            if self.endpoints.for_team(*team).is_none() {
                warnings.push(ConfigWarning::warning(format!(
                    "no chat endpoint configured for team '{team}'"
                )));
            }
        }

        let pages = &self.pages;
        for (name, value) in [
            ("news_poll_seconds", pages.news_poll_seconds),
            ("crisis_poll_seconds", pages.crisis_poll_seconds),
            ("stats_poll_seconds", pages.stats_poll_seconds),
        ] {
            if value == 0 {
                warnings.push(ConfigWarning::error(format!(
                    "pages.{name} must be greater than zero"
                )));
            }
        }

        warnings
    }

    /// Fail on the first error-level warning.
    pub fn ensure_valid(&self) -> Result<()> {
        match self.validate().into_iter().find(|w| w.level == WarnLevel::Error) {
            Some(w) => Err(SimError::InvalidConfig(w.message)),
            None => Ok(()),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn with_endpoints() -> Config {
        let mut cfg = Config::load_or_default(None).unwrap();
        for team in Team::all() {
            cfg.endpoints
                .set_team(*team, Some(format!("http://{team}.example:7500")));
        }
        cfg
    }

    #[test]
    fn empty_yaml_uses_defaults() {
        let cfg: Config = serde_yaml::from_str("{}").unwrap();
        assert_eq!(cfg.version, 1);
        assert_eq!(cfg.gate.cooldown_seconds, 120);
        assert_eq!(cfg.gate.bounds(), CooldownBounds { min: 10, max: 600 });
        assert_eq!(cfg.endpoints.health_timeout_seconds, 5);
        assert_eq!(cfg.endpoints.instance_port, 7500);
        assert_eq!(cfg.pages.news_poll_seconds, 20);
        assert!(!cfg.strict_triggers);
    }

    #[test]
    fn partial_yaml_keeps_other_defaults() {
        let yaml = "gate:\n  cooldown_seconds: 300\nendpoints:\n  usa: http://10.0.0.1:7500\n";
        let cfg: Config = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(cfg.gate.cooldown_seconds, 300);
        assert_eq!(cfg.gate.max_cooldown_seconds, 600);
        assert_eq!(cfg.endpoints.for_team(Team::Usa), Some("http://10.0.0.1:7500"));
        assert_eq!(cfg.endpoints.for_team(Team::China), None);
    }

    #[test]
    fn blank_endpoint_counts_as_missing() {
        let mut cfg = with_endpoints();
        cfg.endpoints.set_team(Team::Neutral, Some("  ".into()));
        assert_eq!(cfg.endpoints.for_team(Team::Neutral), None);
        assert!(cfg.endpoints.team_urls().get(Team::Neutral).is_none());
    }

    #[test]
    fn validate_default_with_endpoints_is_clean() {
        assert!(with_endpoints().validate().is_empty());
    }

    #[test]
    fn validate_missing_endpoints_warns() {
        let cfg = Config::load_or_default(None).unwrap();
        let warnings = cfg.validate();
        assert_eq!(warnings.len(), 3);
        assert!(warnings.iter().all(|w| w.level == WarnLevel::Warning));
        assert!(cfg.ensure_valid().is_ok());
    }

    #[test]
    fn validate_inverted_bounds_is_error() {
        let mut cfg = with_endpoints();
        cfg.gate.min_cooldown_seconds = 700;
        let warnings = cfg.validate();
        assert!(warnings
            .iter()
            .any(|w| w.level == WarnLevel::Error && w.message.contains("exceeds")));
        assert!(matches!(cfg.ensure_valid(), Err(SimError::InvalidConfig(_))));
    }

    #[test]
    fn validate_cooldown_out_of_bounds_warns() {
        let mut cfg = with_endpoints();
        cfg.gate.cooldown_seconds = 5;
        let warnings = cfg.validate();
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].message.contains("clamped"));
    }

    #[test]
    fn validate_zero_poll_interval_is_error() {
        let mut cfg = with_endpoints();
        cfg.pages.crisis_poll_seconds = 0;
        assert!(cfg.ensure_valid().is_err());
    }

    #[test]
    fn load_resolves_scenario_relative_to_config() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("pressure.yaml");
        std::fs::write(&path, "scenario: scenario.yaml\nstrict_triggers: true\n").unwrap();
        let cfg = Config::load(&path).unwrap();
        assert_eq!(cfg.scenario, Some(dir.path().join("scenario.yaml")));
        assert!(cfg.strict_triggers);
    }

    #[test]
    fn load_missing_file_is_io_error() {
        let dir = tempfile::TempDir::new().unwrap();
        let err = Config::load(&dir.path().join("nope.yaml")).unwrap_err();
        assert!(matches!(err, SimError::Io(_)));
    }
}
