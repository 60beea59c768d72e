use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// Team
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Team {
    Usa,
    China,
    Neutral,
}

impl Team {
    pub const COUNT: usize = 3;

    pub fn all() -> &'static [Team] {
        &[Team::Usa, Team::China, Team::Neutral]
    }

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Team::Usa => "usa",
            Team::China => "china",
            Team::Neutral => "neutral",
        }
    }

    /// Display name used on the landing page and dashboards.
    pub fn label(self) -> &'static str {
        match self {
            Team::Usa => "Team USA",
            Team::China => "Team China",
            Team::Neutral => "Team Neutral",
        }
    }

    pub fn icon(self) -> &'static str {
        match self {
            Team::Usa => "🇺🇸",
            Team::China => "🇨🇳",
            Team::Neutral => "🌐",
        }
    }

    /// Accent colour of the team dashboard.
    pub fn color(self) -> &'static str {
        match self {
            Team::Usa => "#3b82f6",
            Team::China => "#ef4444",
            Team::Neutral => "#f59e0b",
        }
    }

    pub fn blurb(self) -> &'static str {
        match self {
            Team::Usa => "Llama 2 70B · Democratic oversight model",
            Team::China => "Qwen/DeepSeek · State-guided model",
            Team::Neutral => "Open Model · Community-driven",
        }
    }
}

impl fmt::Display for Team {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Team {
    type Err = crate::error::SimError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "usa" => Ok(Team::Usa),
            "china" => Ok(Team::China),
            "neutral" => Ok(Team::Neutral),
            _ => Err(crate::error::SimError::TeamNotFound(s.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// PerTeam
// ---------------------------------------------------------------------------

/// One value per team, indexed by [`Team`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PerTeam<T>([T; Team::COUNT]);

impl<T> PerTeam<T> {
    pub fn from_fn(mut f: impl FnMut(Team) -> T) -> Self {
        Self([f(Team::Usa), f(Team::China), f(Team::Neutral)])
    }

    pub fn get(&self, team: Team) -> &T {
        &self.0[team.index()]
    }

    pub fn get_mut(&mut self, team: Team) -> &mut T {
        &mut self.0[team.index()]
    }

    pub fn iter(&self) -> impl Iterator<Item = (Team, &T)> {
        Team::all().iter().copied().zip(self.0.iter())
    }
}

impl<T: Serialize> Serialize for PerTeam<T> {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeMap;
        let mut map = serializer.serialize_map(Some(Team::COUNT))?;
        for (team, value) in self.iter() {
            map.serialize_entry(team.as_str(), value)?;
        }
        map.end()
    }
}
