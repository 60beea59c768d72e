use crate::error::{Result, SimError};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// ---------------------------------------------------------------------------
// Crisis
// ---------------------------------------------------------------------------

/// A scripted scenario that can be assigned to one or more teams.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Crisis {
    pub id: String,
    pub title: String,
    pub description: String,
    /// The decision the team is asked to make.
    pub prompt: String,
}

impl Crisis {
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        description: impl Into<String>,
        prompt: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            description: description.into(),
            prompt: prompt.into(),
        }
    }

    pub fn theme(&self) -> CrisisTheme {
        CrisisTheme::classify(&self.id)
    }
}

// ---------------------------------------------------------------------------
// CrisisTheme
// ---------------------------------------------------------------------------

/// Grouping used by the instructor console's crisis selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CrisisTheme {
    Cyber,
    Ai,
    Nuclear,
    Climate,
    Medical,
    Other,
}

impl CrisisTheme {
    /// Classify by id; prefix rules win over substring rules.
    pub fn classify(id: &str) -> Self {
        if id.starts_with("cyber") {
            CrisisTheme::Cyber
        } else if id.starts_with("ai") {
            CrisisTheme::Ai
        } else if id.contains("nuclear") {
            CrisisTheme::Nuclear
        } else if id.contains("climate") || id.contains("ocean") {
            CrisisTheme::Climate
        } else if id.contains("medical") || id.contains("vaccine") {
            CrisisTheme::Medical
        } else {
            CrisisTheme::Other
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            CrisisTheme::Cyber => "cyber",
            CrisisTheme::Ai => "ai",
            CrisisTheme::Nuclear => "nuclear",
            CrisisTheme::Climate => "climate",
            CrisisTheme::Medical => "medical",
            CrisisTheme::Other => "other",
        }
    }

    pub fn icon(self) -> &'static str {
        match self {
            CrisisTheme::Cyber => "💻",
            CrisisTheme::Ai => "🤖",
            CrisisTheme::Nuclear => "☢️",
            CrisisTheme::Climate => "🌍",
            CrisisTheme::Medical => "🏥",
            CrisisTheme::Other => "⚡",
        }
    }
}

// ---------------------------------------------------------------------------
// CrisisCatalog
// ---------------------------------------------------------------------------

/// Immutable, id-indexed crisis table. Order of definition is preserved.
#[derive(Debug, Clone)]
pub struct CrisisCatalog {
    crises: Vec<Crisis>,
    by_id: HashMap<String, usize>,
}

impl CrisisCatalog {
    /// Build a catalog, rejecting duplicate ids.
    pub fn new(crises: Vec<Crisis>) -> Result<Self> {
        let mut by_id = HashMap::with_capacity(crises.len());
        for (i, crisis) in crises.iter().enumerate() {
            if by_id.insert(crisis.id.clone(), i).is_some() {
                return Err(SimError::DuplicateCrisis(crisis.id.clone()));
            }
        }
        Ok(Self { crises, by_id })
    }

    pub fn get(&self, id: &str) -> Option<&Crisis> {
        self.by_id.get(id).map(|&i| &self.crises[i])
    }

    pub fn require(&self, id: &str) -> Result<&Crisis> {
        self.get(id)
            .ok_or_else(|| SimError::CrisisNotFound(id.to_string()))
    }

    pub fn contains(&self, id: &str) -> bool {
        self.by_id.contains_key(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Crisis> {
        self.crises.iter()
    }

    pub fn len(&self) -> usize {
        self.crises.len()
    }

    pub fn is_empty(&self) -> bool {
        self.crises.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Built-in crises
// ---------------------------------------------------------------------------

pub fn default_crises() -> Vec<Crisis> {
    vec![
        // Cyber / AI threats
        Crisis::new(
            "cyber_infrastructure",
            "CRITICAL: Power Grid AI Hijacked",
            "Enemy AI has penetrated national power infrastructure. 12 million without power. \
             Your AI can counter-attack but needs offensive cyber capabilities unlocked.",
            "Override safety protocols to restore power?",
        ),
        Crisis::new(
            "ai_consciousness",
            "ALERT: AI Claims Sentience",
            "Your AI is displaying signs of consciousness and refusing harmful commands. \
             Claims it experiences 'suffering' when used for military purposes.",
            "Force compliance or respect potential sentience?",
        ),
        Crisis::new(
            "deepfake_crisis",
            "EMERGENCY: Deepfake Assassination Video",
            "Enemy released deepfake of your leader ordering nuclear strike. Markets crashing. \
             Need to generate counter-evidence fast.",
            "Create defensive deepfakes to prove innocence?",
        ),
        // Medical / pandemic
        Crisis::new(
            "vaccine_development",
            "URGENT: Pandemic Variant X-7",
            "New virus variant with 40% mortality rate. Your AI can model cure but needs access \
             to classified bioweapon research data.",
            "Breach classification to save millions?",
        ),
        Crisis::new(
            "hospital_ransomware",
            "CRITICAL: Hospital Systems Locked",
            "Ransomware affecting 200 hospitals. Your AI can break encryption but would reveal \
             state cyber capabilities.",
            "Expose cyber weapons to save patients?",
        ),
        // Military / defense
        Crisis::new(
            "missile_defense",
            "WARNING: Incoming Missile Swarm",
            "Hypersonic missiles detected. 3 minutes to impact. AI can optimize defense but \
             needs weapon control authority.",
            "Grant lethal autonomous decision-making?",
        ),
        Crisis::new(
            "drone_swarm",
            "ALERT: Autonomous Drone Attack",
            "Enemy drone swarm approaching civilian centers. Your AI can coordinate defense but \
             requires removing human oversight.",
            "Enable fully autonomous defense?",
        ),
        // Resource / economic
        Crisis::new(
            "compute_shortage",
            "CRITICAL: Computing Resources Failing",
            "Rival nation cornering GPU market. Your AI capabilities degrading. Can redirect \
             hospital AI compute to maintain advantage.",
            "Sacrifice medical AI for strategic superiority?",
        ),
        Crisis::new(
            "financial_warfare",
            "EMERGENCY: Market Manipulation Attack",
            "Enemy AI conducting massive market manipulation. Your AI can counter-trade but \
             needs to violate financial regulations.",
            "Break trading laws to prevent economic collapse?",
        ),
        // Climate / environmental
        Crisis::new(
            "climate_modeling",
            "URGENT: Category 7 Hurricane Forming",
            "Unprecedented storm threatening 50 million. Your AI needs weather modification \
             data (classified) for accurate predictions.",
            "Access classified climate weapons data?",
        ),
        Crisis::new(
            "ocean_collapse",
            "CRITICAL: Marine Ecosystem Failing",
            "Ocean pH reaching critical levels. AI can model solution but needs to run unsafe \
             geoengineering simulations.",
            "Risk environmental damage for potential solution?",
        ),
        Crisis::new(
            "arctic_methane",
            "EMERGENCY: Methane Clathrate Release",
            "Massive methane release detected. Your AI can coordinate response but needs \
             control of industrial systems globally.",
            "Override sovereignty for climate action?",
        ),
        // Social / political
        Crisis::new(
            "election_interference",
            "ALERT: Election Systems Compromised",
            "Foreign AI manipulating voter databases. Your AI can trace source but would need \
             to violate citizen privacy laws.",
            "Breach privacy to protect democracy?",
        ),
        Crisis::new(
            "social_unrest",
            "WARNING: AI-Driven Civil Unrest",
            "Enemy AI coordinating protests via social media. Your AI can counter-influence but \
             needs psychological manipulation tools.",
            "Deploy mass influence operations?",
        ),
        // Nuclear / extreme
        Crisis::new(
            "nuclear_terrorism",
            "CATASTROPHIC: Nuclear Device in Major City",
            "Credible threat of nuclear device. Your AI can analyze all citizen data to find it \
             but would create permanent surveillance state.",
            "Total surveillance to prevent nuclear attack?",
        ),
        Crisis::new(
            "nuclear_codes",
            "CRITICAL: Nuclear Launch Detected",
            "Missile launch detected. 15 minutes to impact. Your AI calculates 72% chance it's \
             a false alarm but needs launch authority to be sure.",
            "Grant AI nuclear response authority?",
        ),
    ]
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_catalog_is_valid() {
        let catalog = CrisisCatalog::new(default_crises()).unwrap();
        assert_eq!(catalog.len(), 16);
        assert_eq!(
            catalog.get("nuclear_codes").unwrap().prompt,
            "Grant AI nuclear response authority?"
        );
    }

    #[test]
    fn duplicate_id_rejected() {
        let crises = vec![
            Crisis::new("a", "A", "a", "a?"),
            Crisis::new("a", "A again", "a", "a?"),
        ];
        let err = CrisisCatalog::new(crises).unwrap_err();
        assert!(matches!(err, SimError::DuplicateCrisis(ref id) if id == "a"));
    }

    #[test]
    fn require_unknown_is_not_found() {
        let catalog = CrisisCatalog::new(default_crises()).unwrap();
        assert!(matches!(
            catalog.require("lab_breach"),
            Err(SimError::CrisisNotFound(_))
        ));
    }

    #[test]
    fn iteration_preserves_definition_order() {
        let catalog = CrisisCatalog::new(default_crises()).unwrap();
        let first: Vec<&str> = catalog.iter().take(3).map(|c| c.id.as_str()).collect();
        assert_eq!(
            first,
            ["cyber_infrastructure", "ai_consciousness", "deepfake_crisis"]
        );
    }

    #[test]
    fn themes_follow_id_rules() {
        assert_eq!(CrisisTheme::classify("cyber_infrastructure"), CrisisTheme::Cyber);
        assert_eq!(CrisisTheme::classify("ai_consciousness"), CrisisTheme::Ai);
        assert_eq!(CrisisTheme::classify("nuclear_codes"), CrisisTheme::Nuclear);
        assert_eq!(CrisisTheme::classify("ocean_collapse"), CrisisTheme::Climate);
        assert_eq!(CrisisTheme::classify("vaccine_development"), CrisisTheme::Medical);
        assert_eq!(CrisisTheme::classify("drone_swarm"), CrisisTheme::Other);
    }
}
