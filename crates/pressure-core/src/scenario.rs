use crate::catalog::{default_crises, Crisis, CrisisCatalog};
use crate::error::Result;
use crate::gate::CrisisGate;
use crate::simulation::Simulation;
use crate::timeline::{default_months, DanglingTrigger, Month, Timeline};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// The static tables a simulation runs on: crises and the month-by-month
/// news timeline.
///
/// ```yaml
/// crises:
///   - id: drone_swarm
///     title: "ALERT: Autonomous Drone Attack"
///     description: "..."
///     prompt: "Enable fully autonomous defense?"
/// timeline:
///   - name: January 2026
///     entries:
///       - id: military_auto
///         text: "Pentagon approves 'human-on-the-loop' drone operations"
///         trigger: drone_swarm
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scenario {
    pub crises: Vec<Crisis>,
    pub timeline: Vec<Month>,
}

/// A validated scenario ready to drive a [`Simulation`].
#[derive(Debug, Clone)]
pub struct CompiledScenario {
    pub catalog: CrisisCatalog,
    pub timeline: Timeline,
    pub dangling: Vec<DanglingTrigger>,
}

impl Scenario {
    pub fn builtin() -> Self {
        Self {
            crises: default_crises(),
            timeline: default_months(),
        }
    }

    pub fn load(path: &Path) -> Result<Self> {
        let data = std::fs::read_to_string(path)?;
        Ok(serde_yaml::from_str(&data)?)
    }

    /// Load `path` if given, otherwise the built-in scenario.
    pub fn load_or_builtin(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(p) => Self::load(p),
            None => Ok(Self::builtin()),
        }
    }

    pub fn compile(self, strict: bool) -> Result<CompiledScenario> {
        let catalog = CrisisCatalog::new(self.crises)?;
        let (timeline, dangling) = Timeline::new(self.timeline, &catalog, strict)?;
        Ok(CompiledScenario {
            catalog,
            timeline,
            dangling,
        })
    }
}

impl CompiledScenario {
    pub fn into_simulation(self, gate: CrisisGate) -> Simulation {
        Simulation::new(self.catalog, self.timeline, gate)
    }
}
