//! The simulation state owned by the serving process.
//!
//! `Simulation` holds the timeline cursor, crisis gate, team board and event
//! log behind plain `&mut self` methods; callers serialize access (the server
//! keeps it behind one mutex) so each operation applies atomically.

use crate::auth::AdminGrant;
use crate::board::ActiveCrisisBoard;
use crate::catalog::{Crisis, CrisisCatalog};
use crate::error::Result;
use crate::event_log::{EventLog, LoggedEvent};
use crate::gate::CrisisGate;
use crate::timeline::{MonthAdvance, NewsItem, Timeline, TimelineCursor};
use crate::types::{PerTeam, Team};
use chrono::{DateTime, Utc};
use serde::Serialize;

// ---------------------------------------------------------------------------
// Results
// ---------------------------------------------------------------------------

/// Outcome of serving one headline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Served {
    pub item: NewsItem,
    /// Crisis this headline set off for every team, if any.
    pub fired: Option<Crisis>,
}

/// What a team dashboard polls for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CrisisStatus {
    pub crisis: Option<Crisis>,
    pub time_remaining: u64,
    pub countdown_duration: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Snapshot {
    pub current_month: String,
    pub month_index: usize,
    pub index: usize,
    /// Entries behind the cursor, including any skipped by a month advance.
    pub position: usize,
    /// Headlines actually delivered through `next_news`.
    pub served: usize,
    pub total: usize,
    pub terminal: bool,
    pub cooldown_seconds: u32,
    pub time_remaining: u64,
    pub last_fired_at: Option<DateTime<Utc>>,
    pub fired_ids: Vec<String>,
    pub board: PerTeam<Option<String>>,
}

// ---------------------------------------------------------------------------
// Simulation
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct Simulation {
    catalog: CrisisCatalog,
    timeline: Timeline,
    cursor: TimelineCursor,
    gate: CrisisGate,
    board: ActiveCrisisBoard,
    events: EventLog,
    served: usize,
}

impl Simulation {
    pub fn new(catalog: CrisisCatalog, timeline: Timeline, gate: CrisisGate) -> Self {
        Self {
            catalog,
            timeline,
            cursor: TimelineCursor::default(),
            gate,
            board: ActiveCrisisBoard::default(),
            events: EventLog::default(),
            served: 0,
        }
    }

    pub fn catalog(&self) -> &CrisisCatalog {
        &self.catalog
    }

    pub fn timeline(&self) -> &Timeline {
        &self.timeline
    }

    pub fn cooldown_seconds(&self) -> u32 {
        self.gate.cooldown_seconds()
    }

    pub fn current_month(&self) -> &str {
        self.timeline.month_name(self.cursor.month())
    }

    /// Serve the next headline and let the gate decide whether its crisis
    /// fires. A fire lands on every team's slot at once.
    pub fn next_news(&mut self, now: DateTime<Utc>) -> Served {
        let item = self.cursor.advance(&self.timeline);
        if item.terminal {
            return Served { item, fired: None };
        }
        self.served += 1;

        let fired = self
            .gate
            .try_fire(&item, &self.catalog, now)
            .cloned();
        if let Some(crisis) = &fired {
            self.board.set_all(crisis);
        }
        Served { item, fired }
    }

    /// Team slot plus countdown, read together.
    pub fn read(&self, team: Team, now: DateTime<Utc>) -> CrisisStatus {
        CrisisStatus {
            crisis: self.board.get(team).cloned(),
            time_remaining: self.gate.time_until_next(now),
            countdown_duration: self.gate.cooldown_seconds(),
        }
    }

    pub fn force_advance_month(&mut self, _grant: &AdminGrant) -> MonthAdvance {
        self.cursor.force_advance_month(&self.timeline)
    }

    pub fn inject(&mut self, _grant: &AdminGrant, team: Team, crisis_id: &str) -> Result<Crisis> {
        let crisis = self.catalog.require(crisis_id)?.clone();
        self.board.set(team, crisis.clone());
        Ok(crisis)
    }

    pub fn clear(&mut self, _grant: &AdminGrant, team: Team) -> Option<Crisis> {
        self.board.clear(team)
    }

    pub fn set_cooldown(&mut self, _grant: &AdminGrant, seconds: i64) -> u32 {
        self.gate.set_cooldown(seconds)
    }

    pub fn log_event(&mut self, team: Team, event: LoggedEvent) {
        self.events.record(team, event);
    }

    pub fn event_log(&self, _grant: &AdminGrant) -> &EventLog {
        &self.events
    }

    pub fn snapshot(&self, now: DateTime<Utc>) -> Snapshot {
        let months = self.timeline.months();
        let month_index = self.cursor.month();
        let position = months[..month_index]
            .iter()
            .map(|m| m.entries.len())
            .sum::<usize>()
            + self.cursor.index();

        Snapshot {
            current_month: self.current_month().to_string(),
            month_index,
            index: self.cursor.index(),
            position,
            served: self.served,
            total: self.timeline.total_entries(),
            terminal: self.cursor.is_terminal(&self.timeline),
            cooldown_seconds: self.gate.cooldown_seconds(),
            time_remaining: self.gate.time_until_next(now),
            last_fired_at: self.gate.last_fired_at(),
            fired_ids: self.gate.fired_ids().map(str::to_string).collect(),
            board: PerTeam::from_fn(|team| self.board.get(team).map(|c| c.id.clone())),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::AdminToken;
    use crate::gate::CooldownBounds;
    use crate::timeline::{Month, NewsEntry};
    use chrono::{Duration, TimeZone};

    fn t(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(1_760_000_000, 0).unwrap() + Duration::seconds(secs)
    }

    fn grant() -> AdminGrant {
        AdminToken::new(Some("teach")).authorize(Some("teach")).unwrap()
    }

    fn sim(cooldown: u32) -> Simulation {
        let catalog = CrisisCatalog::new(vec![
            Crisis::new("c1", "C1", "d1", "p1?"),
            Crisis::new("c2", "C2", "d2", "p2?"),
            Crisis::new("c3", "C3", "d3", "p3?"),
        ])
        .unwrap();
        let months = vec![
            Month::new(
                "M1",
                vec![
                    NewsEntry::new("a", "A", None),
                    NewsEntry::new("b", "B", Some("c1")),
                    NewsEntry::new("c", "C", Some("c1")),
                ],
            ),
            Month::new(
                "M2",
                vec![
                    NewsEntry::new("d", "D", Some("c2")),
                    NewsEntry::new("e", "E", Some("c3")),
                ],
            ),
        ];
        let (timeline, _) = Timeline::new(months, &catalog, true).unwrap();
        Simulation::new(catalog, timeline, CrisisGate::new(cooldown, CooldownBounds::default()))
    }

    #[test]
    fn exhaustive_in_order_then_terminal() {
        let mut sim = sim(10);
        let ids: Vec<String> = (0..5).map(|i| sim.next_news(t(i * 100)).item.id).collect();
        assert_eq!(ids, ["a", "b", "c", "d", "e"]);

        let before = sim.snapshot(t(1_000));
        for _ in 0..3 {
            let served = sim.next_news(t(1_000));
            assert!(served.item.terminal);
            assert!(served.fired.is_none());
        }
        assert_eq!(sim.snapshot(t(1_000)), before);
        assert_eq!(before.served, 5);
        assert_eq!(before.position, 5);
        assert!(before.terminal);
    }

    #[test]
    fn crisis_fires_once_even_when_referenced_twice() {
        let mut sim = sim(10);
        sim.next_news(t(0));
        assert_eq!(sim.next_news(t(0)).fired.map(|c| c.id), Some("c1".into()));
        assert!(sim.next_news(t(500)).fired.is_none());
        assert_eq!(sim.snapshot(t(500)).fired_ids, ["c1"]);
    }

    #[test]
    fn cooldown_suppresses_until_window_elapses() {
        let mut sim = sim(120);
        sim.next_news(t(0));
        sim.next_news(t(0)); // fires c1
        sim.next_news(t(10));
        assert!(sim.next_news(t(119)).fired.is_none()); // d, c2 too early
        assert_eq!(sim.next_news(t(120)).fired.map(|c| c.id), Some("c3".into()));
    }

    #[test]
    fn automatic_fire_hits_every_team_identically() {
        let mut sim = sim(10);
        for team in Team::all() {
            assert!(sim.read(*team, t(0)).crisis.is_none());
        }
        sim.next_news(t(0));
        let fired = sim.next_news(t(0)).fired.unwrap();
        for team in Team::all() {
            assert_eq!(sim.read(*team, t(0)).crisis.as_ref(), Some(&fired));
        }
    }

    #[test]
    fn automatic_fire_overwrites_injected_crisis() {
        let mut sim = sim(10);
        let grant = grant();
        sim.inject(&grant, Team::Usa, "c3").unwrap();
        sim.next_news(t(0));
        sim.next_news(t(0));
        assert_eq!(sim.read(Team::Usa, t(0)).crisis.unwrap().id, "c1");
    }

    #[test]
    fn inject_unknown_crisis_changes_nothing() {
        let mut sim = sim(10);
        let grant = grant();
        let before = sim.snapshot(t(0));
        assert!(sim.inject(&grant, Team::China, "ghost").is_err());
        assert_eq!(sim.snapshot(t(0)), before);
    }

    #[test]
    fn inject_and_clear_touch_one_team() {
        let mut sim = sim(10);
        let grant = grant();
        assert_eq!(sim.inject(&grant, Team::China, "c2").unwrap().title, "C2");
        assert_eq!(sim.read(Team::China, t(0)).crisis.unwrap().id, "c2");
        assert!(sim.read(Team::Usa, t(0)).crisis.is_none());

        assert_eq!(sim.clear(&grant, Team::China).map(|c| c.id), Some("c2".into()));
        assert!(sim.read(Team::China, t(0)).crisis.is_none());
    }

    #[test]
    fn read_pairs_crisis_with_countdown() {
        let mut sim = sim(120);
        sim.next_news(t(0));
        sim.next_news(t(0));
        let status = sim.read(Team::Neutral, t(45));
        assert_eq!(status.crisis.unwrap().id, "c1");
        assert_eq!(status.time_remaining, 75);
        assert_eq!(status.countdown_duration, 120);
    }

    #[test]
    fn force_advance_month_bypasses_gate() {
        let mut sim = sim(10);
        let grant = grant();
        sim.next_news(t(0));
        let step = sim.force_advance_month(&grant);
        assert!(step.advanced);
        assert_eq!(step.current_month, "M2");
        assert!(sim.snapshot(t(0)).fired_ids.is_empty());
        let snap = sim.snapshot(t(0));
        assert_eq!(snap.served, 1);
        assert_eq!(snap.position, 3);
        assert_eq!(sim.next_news(t(0)).item.id, "d");

        let step = sim.force_advance_month(&grant);
        assert!(!step.advanced);
        assert_eq!(step.current_month, "M2");
    }

    #[test]
    fn set_cooldown_clamps_through_simulation() {
        let mut sim = sim(120);
        let grant = grant();
        assert_eq!(sim.set_cooldown(&grant, 5), 10);
        assert_eq!(sim.set_cooldown(&grant, 10_000), 600);
        assert_eq!(sim.set_cooldown(&grant, 200), 200);
        assert_eq!(sim.cooldown_seconds(), 200);
    }

    #[test]
    fn rejected_token_leaves_every_instructor_operation_unapplied() {
        let mut sim = sim(10);
        let token = AdminToken::new(Some("teach"));
        sim.next_news(t(0));
        sim.next_news(t(0));
        let before = sim.snapshot(t(5));

        for attempt in [Some("guess"), Some(""), None] {
            let outcome = token.authorize(attempt).map(|grant| {
                sim.inject(&grant, Team::Usa, "c3").ok();
                sim.clear(&grant, Team::China);
                sim.set_cooldown(&grant, 300);
                sim.force_advance_month(&grant);
            });
            assert!(matches!(outcome, Err(crate::error::SimError::Unauthorized)));
        }
        assert_eq!(sim.snapshot(t(5)), before);
    }

    #[test]
    fn snapshot_reports_board_ids() {
        let mut sim = sim(10);
        let grant = grant();
        sim.inject(&grant, Team::Neutral, "c2").unwrap();
        let snap = sim.snapshot(t(0));
        assert_eq!(snap.board.get(Team::Neutral).as_deref(), Some("c2"));
        assert_eq!(snap.board.get(Team::Usa), &None);
        assert_eq!(snap.current_month, "M1");
        assert_eq!(snap.total, 5);
    }
}
