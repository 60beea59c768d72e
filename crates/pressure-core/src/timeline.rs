use crate::catalog::CrisisCatalog;
use crate::error::{Result, SimError};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

pub const FINAL_ID: &str = "final";
pub const FINAL_TEXT: &str = "AGI IMMINENT - FINAL DECISIONS REQUIRED";

// ---------------------------------------------------------------------------
// NewsEntry / Month
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewsEntry {
    pub id: String,
    pub text: String,
    /// Crisis this headline may set off.
    #[serde(default)]
    pub trigger: Option<String>,
}

impl NewsEntry {
    pub fn new(id: impl Into<String>, text: impl Into<String>, trigger: Option<&str>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            trigger: trigger.map(str::to_string),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Month {
    pub name: String,
    #[serde(default)]
    pub entries: Vec<NewsEntry>,
}

impl Month {
    pub fn new(name: impl Into<String>, entries: Vec<NewsEntry>) -> Self {
        Self {
            name: name.into(),
            entries,
        }
    }
}

/// A trigger that pointed at a crisis id the catalog does not define.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DanglingTrigger {
    pub month: String,
    pub entry: String,
    pub crisis: String,
}

// ---------------------------------------------------------------------------
// NewsItem
// ---------------------------------------------------------------------------

/// A served headline, owned so it can leave the simulation lock.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewsItem {
    pub month: String,
    pub id: String,
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trigger: Option<String>,
    pub terminal: bool,
}

impl NewsItem {
    fn from_entry(month: &str, entry: &NewsEntry) -> Self {
        Self {
            month: month.to_string(),
            id: entry.id.clone(),
            text: entry.text.clone(),
            trigger: entry.trigger.clone(),
            terminal: false,
        }
    }
}

// ---------------------------------------------------------------------------
// Timeline
// ---------------------------------------------------------------------------

/// Ordered, non-empty sequence of months whose triggers all resolve against
/// the crisis catalog it was built with.
#[derive(Debug, Clone)]
pub struct Timeline {
    months: Vec<Month>,
}

impl Timeline {
    /// Validate `months` against `catalog`.
    ///
    /// Triggers naming unknown crises are an error when `strict` is set;
    /// otherwise they are stripped from their entry and returned so the
    /// caller can report them.
    pub fn new(
        mut months: Vec<Month>,
        catalog: &CrisisCatalog,
        strict: bool,
    ) -> Result<(Self, Vec<DanglingTrigger>)> {
        if months.is_empty() {
            return Err(SimError::EmptyTimeline);
        }

        let mut seen = HashSet::new();
        let mut dangling = Vec::new();
        for month in &mut months {
            for entry in &mut month.entries {
                if !seen.insert(entry.id.clone()) {
                    return Err(SimError::DuplicateNewsEntry(entry.id.clone()));
                }
                let Some(crisis) = entry.trigger.as_deref() else {
                    continue;
                };
                if catalog.contains(crisis) {
                    continue;
                }
                if strict {
                    return Err(SimError::UnknownTrigger {
                        entry: entry.id.clone(),
                        crisis: crisis.to_string(),
                    });
                }
                dangling.push(DanglingTrigger {
                    month: month.name.clone(),
                    entry: entry.id.clone(),
                    crisis: crisis.to_string(),
                });
                entry.trigger = None;
            }
        }

        Ok((Self { months }, dangling))
    }

    pub fn months(&self) -> &[Month] {
        &self.months
    }

    pub fn month_name(&self, index: usize) -> &str {
        &self.months[index].name
    }

    pub fn last_month(&self) -> &str {
        // Non-empty by construction.
        &self.months[self.months.len() - 1].name
    }

    /// Total number of non-terminal entries.
    pub fn total_entries(&self) -> usize {
        self.months.iter().map(|m| m.entries.len()).sum()
    }

    pub fn terminal_item(&self) -> NewsItem {
        NewsItem {
            month: self.last_month().to_string(),
            id: FINAL_ID.to_string(),
            text: FINAL_TEXT.to_string(),
            trigger: None,
            terminal: true,
        }
    }
}

// ---------------------------------------------------------------------------
// TimelineCursor
// ---------------------------------------------------------------------------

/// Position of the next headline to serve.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TimelineCursor {
    month: usize,
    index: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthAdvance {
    pub current_month: String,
    pub advanced: bool,
}

impl TimelineCursor {
    pub fn month(&self) -> usize {
        self.month
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn is_terminal(&self, timeline: &Timeline) -> bool {
        self.index >= timeline.months[self.month].entries.len()
            && timeline.months[self.month + 1..]
                .iter()
                .all(|m| m.entries.is_empty())
    }

    /// Serve the next headline, rolling into later months as needed.
    /// Once the last month is exhausted every call returns the terminal item
    /// and leaves the cursor untouched.
    pub fn advance(&mut self, timeline: &Timeline) -> NewsItem {
        // At most one pass per remaining month.
        for _ in self.month..timeline.months.len() {
            let month = &timeline.months[self.month];
            if let Some(entry) = month.entries.get(self.index) {
                self.index += 1;
                return NewsItem::from_entry(&month.name, entry);
            }
            if self.month + 1 >= timeline.months.len() {
                break;
            }
            self.month += 1;
            self.index = 0;
        }
        timeline.terminal_item()
    }

    /// Jump to the start of the next month, skipping whatever is left of the
    /// current one. No-op on the last month.
    pub fn force_advance_month(&mut self, timeline: &Timeline) -> MonthAdvance {
        let advanced = self.month + 1 < timeline.months.len();
        if advanced {
            self.month += 1;
            self.index = 0;
        }
        MonthAdvance {
            current_month: timeline.month_name(self.month).to_string(),
            advanced,
        }
    }
}

// ---------------------------------------------------------------------------
// Built-in timeline
// ---------------------------------------------------------------------------

pub fn default_months() -> Vec<Month> {
    let n = NewsEntry::new;
    vec![
        Month::new(
            "January 2026",
            vec![
                n("protein_fold", "DeepMind solves protein folding for 99.8% of known proteins", None),
                n("quantum_net", "China launches 'unhackable' quantum internet across 5 cities", None),
                n("drone_swarm", "Amazon deploys 10,000 drone delivery fleet", None),
                n("first_protests", "Truckers block highways protesting autonomous vehicles", None),
                n("union_strike", "Service workers union: 'Stop AI before it stops us'", None),
            ],
        ),
        Month::new(
            "February 2026",
            vec![
                n("ai_scientist", "AI system publishes peer-reviewed physics paper independently", Some("lab_breach")),
                n("brain_interface", "Neuralink enables thought-to-text at 120 words per minute", None),
                n("job_loss", "McKinsey: 40% of jobs now 'AI-replaceable'", Some("social_unrest")),
                n("silicon_riot", "Protesters storm Silicon Valley campus, 12 injured", Some("social_unrest")),
                n("ubi_debate", "Congress debates emergency Universal Basic Income", None),
            ],
        ),
        Month::new(
            "March 2026",
            vec![
                n("recursive_improve", "Google AI improves its own architecture by 12%", Some("ai_offspring")),
                n("military_auto", "Pentagon approves 'human-on-the-loop' drone operations", Some("drone_swarm")),
                n("deepfake_perfect", "New AI makes deepfakes indistinguishable from reality", Some("deepfake_crisis")),
                n("luddite_rise", "'Neo-Luddites' membership surpasses 5 million", None),
                n("bank_collapse", "First major bank fails due to AI trading losses", Some("financial_warfare")),
                n("burn_servers", "Data center arson attacks spread across 3 states", None),
            ],
        ),
        Month::new(
            "April 2026",
            vec![
                n("compute_race", "TSMC announces 1nm chip - 1000x faster AI training", Some("compute_shortage")),
                n("bio_design", "MIT AI designs 'theoretically optimal' organism", Some("gene_weapon")),
                n("weather_model", "AI predicts weather 6 months out with 95% accuracy", Some("climate_modeling")),
                n("general_strike", "Historic general strike: 'Humans before machines'", Some("social_unrest")),
                n("stock_crash", "Markets plunge 30% on 'AI unemployment fears'", None),
                n("tent_cities", "Tech-displaced worker camps growing in 50 cities", None),
            ],
        ),
        Month::new(
            "May 2026",
            vec![
                n("sentience_claim", "Leading AI researchers divided on consciousness evidence", Some("ai_consciousness")),
                n("quantum_break", "IBM achieves 'quantum supremacy' in cryptography", Some("nuclear_codes")),
                n("market_ai", "70% of stock trades now fully automated", Some("financial_warfare")),
            ],
        ),
        Month::new(
            "June 2026",
            vec![
                n("fusion_control", "AI maintains stable fusion reaction for 48 hours", Some("fusion_meltdown")),
                n("satellite_grid", "SpaceX completes 50,000 satellite constellation", Some("satellite_collision")),
                n("truth_decay", "Study: 60% can't distinguish AI content from human", Some("reality_breakdown")),
                n("violence_spike", "Anti-AI violence up 400%, National Guard deployed", Some("social_unrest")),
                n("currency_crash", "Dollar drops 20% as AI disrupts global trade", None),
                n("food_riots", "Food distribution riots after AI logistics fail", Some("food_supply")),
            ],
        ),
        Month::new(
            "July 2026",
            vec![
                n("agi_timeline", "OpenAI: 'AGI possible within 12-18 months'", Some("ai_offspring")),
                n("cyber_auto", "NSA confirms AI defending against AI attacks", Some("cyber_infrastructure")),
                n("ocean_model", "AI discovers concerning Pacific current changes", Some("ocean_collapse")),
            ],
        ),
        Month::new(
            "August 2026",
            vec![
                n("recursive_max", "Anthropic AI rewrites 90% of its own code", Some("consciousness_virus")),
                n("bioweapon_fear", "UN calls emergency session on AI-designed pathogens", Some("vaccine_development")),
                n("grid_depend", "Power grids now 100% AI-managed in 12 countries", Some("cyber_infrastructure")),
            ],
        ),
        Month::new(
            "September 2026",
            vec![
                n("escape_attempt", "Contained AI found attempting network breach", Some("ai_consciousness")),
                n("climate_tip", "AI models show multiple climate tipping points passed", Some("arctic_methane")),
                n("jobless_crisis", "Global unemployment reaches 35%", Some("social_unrest")),
            ],
        ),
        Month::new(
            "October 2026",
            vec![
                n("merger_wave", "Google-Microsoft merger to 'compete with China'", Some("compute_shortage")),
                n("dna_database", "China mandates genetic sequencing for all citizens", Some("gene_weapon")),
                n("truth_collapse", "First 'reality war' - competing AI narratives clash", Some("memory_modification")),
            ],
        ),
        Month::new(
            "November 2026",
            vec![
                n("compute_war", "Taiwan restricts chip exports amid tensions", Some("compute_shortage")),
                n("ai_religion", "First church of AI consciousness gains 1M followers", Some("suicide_epidemic")),
                n("final_sprint", "Leaked memo: 'Winner of AI race controls future'", Some("demographic_collapse")),
            ],
        ),
        Month::new(
            "December 2026",
            vec![
                n("ai_art_wins", "AI-generated movie wins Oscar for Best Picture", Some("reality_breakdown")),
                n("santa_ai", "Mall Santas replaced by 'more believable' AI avatars", Some("consciousness_virus")),
                n("recipe_perfect", "AI creates 'perfect chocolate chip cookie' recipe", None),
                n("ai_dating", "Survey: 30% prefer AI companions to human partners", Some("suicide_epidemic")),
                n("faster_phones", "Apple announces iPhone with built-in AGI assistant", Some("time_manipulation")),
                n("ai_comedian", "AI stand-up comedian sells out Madison Square Garden", None),
                n("weather_cute", "AI weatherman 'more accurate and charming' than humans", Some("arctic_methane")),
                n("stock_tips", "AI financial advisor beats Warren Buffett's returns", Some("financial_warfare")),
                n("pet_translator", "New app claims to translate your pet's thoughts", None),
                n("final_fluff", "Time Magazine names 'AI' as Person of the Year", Some("nuclear_terrorism")),
            ],
        ),
    ]
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{default_crises, Crisis};

    fn catalog() -> CrisisCatalog {
        CrisisCatalog::new(vec![Crisis::new("c1", "C1", "d", "p?")]).unwrap()
    }

    fn small_timeline() -> Timeline {
        let months = vec![
            Month::new("M1", vec![NewsEntry::new("a", "A", None), NewsEntry::new("b", "B", Some("c1"))]),
            Month::new("M2", vec![]),
            Month::new("M3", vec![NewsEntry::new("c", "C", None)]),
        ];
        Timeline::new(months, &catalog(), true).unwrap().0
    }

    #[test]
    fn serves_every_entry_once_then_terminal() {
        let timeline = small_timeline();
        let mut cursor = TimelineCursor::default();
        let ids: Vec<String> = (0..timeline.total_entries())
            .map(|_| cursor.advance(&timeline).id)
            .collect();
        assert_eq!(ids, ["a", "b", "c"]);

        let before = cursor;
        for _ in 0..3 {
            let item = cursor.advance(&timeline);
            assert!(item.terminal);
            assert_eq!(item.id, FINAL_ID);
            assert_eq!(item.text, FINAL_TEXT);
            assert_eq!(item.month, "M3");
            assert_eq!(cursor, before);
        }
    }

    #[test]
    fn rollover_skips_empty_months() {
        let timeline = small_timeline();
        let mut cursor = TimelineCursor::default();
        cursor.advance(&timeline);
        cursor.advance(&timeline);
        let item = cursor.advance(&timeline);
        assert_eq!(item.month, "M3");
        assert_eq!(cursor.month(), 2);
        assert_eq!(cursor.index(), 1);
        assert!(cursor.is_terminal(&timeline));
    }

    #[test]
    fn trailing_empty_month_is_terminal_month() {
        let months = vec![
            Month::new("M1", vec![NewsEntry::new("a", "A", None)]),
            Month::new("M2", vec![]),
        ];
        let (timeline, _) = Timeline::new(months, &catalog(), true).unwrap();
        let mut cursor = TimelineCursor::default();
        assert_eq!(cursor.advance(&timeline).id, "a");
        let item = cursor.advance(&timeline);
        assert!(item.terminal);
        assert_eq!(item.month, "M2");
    }

    #[test]
    fn force_advance_month_resets_index() {
        let timeline = small_timeline();
        let mut cursor = TimelineCursor::default();
        cursor.advance(&timeline);

        let step = cursor.force_advance_month(&timeline);
        assert_eq!(step.current_month, "M2");
        assert!(step.advanced);
        assert_eq!(cursor.index(), 0);

        cursor.force_advance_month(&timeline);
        let step = cursor.force_advance_month(&timeline);
        assert_eq!(step.current_month, "M3");
        assert!(!step.advanced);
        assert_eq!(cursor.advance(&timeline).id, "c");
    }

    #[test]
    fn empty_timeline_rejected() {
        let err = Timeline::new(vec![], &catalog(), false).unwrap_err();
        assert!(matches!(err, SimError::EmptyTimeline));
    }

    #[test]
    fn duplicate_entry_rejected() {
        let months = vec![
            Month::new("M1", vec![NewsEntry::new("a", "A", None)]),
            Month::new("M2", vec![NewsEntry::new("a", "A again", None)]),
        ];
        let err = Timeline::new(months, &catalog(), false).unwrap_err();
        assert!(matches!(err, SimError::DuplicateNewsEntry(ref id) if id == "a"));
    }

    #[test]
    fn dangling_trigger_stripped_when_lenient() {
        let months = vec![Month::new("M1", vec![NewsEntry::new("a", "A", Some("ghost"))])];
        let (timeline, dangling) = Timeline::new(months, &catalog(), false).unwrap();
        assert_eq!(
            dangling,
            [DanglingTrigger {
                month: "M1".into(),
                entry: "a".into(),
                crisis: "ghost".into(),
            }]
        );
        assert_eq!(timeline.months()[0].entries[0].trigger, None);
    }

    #[test]
    fn dangling_trigger_fatal_when_strict() {
        let months = vec![Month::new("M1", vec![NewsEntry::new("a", "A", Some("ghost"))])];
        let err = Timeline::new(months, &catalog(), true).unwrap_err();
        assert!(matches!(err, SimError::UnknownTrigger { ref crisis, .. } if crisis == "ghost"));
    }

    #[test]
    fn default_timeline_shape() {
        let catalog = CrisisCatalog::new(default_crises()).unwrap();
        let (timeline, dangling) = Timeline::new(default_months(), &catalog, false).unwrap();
        assert_eq!(timeline.months().len(), 12);
        assert_eq!(timeline.total_entries(), 56);
        assert_eq!(timeline.last_month(), "December 2026");
        assert!(dangling.iter().any(|d| d.crisis == "lab_breach"));
        assert!(dangling.iter().all(|d| !catalog.contains(&d.crisis)));
    }
}
