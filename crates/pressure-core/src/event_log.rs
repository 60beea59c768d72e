use crate::types::{PerTeam, Team};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// A crisis a team saw, with the team's answer if they gave one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoggedEvent {
    pub timestamp: DateTime<Utc>,
    pub event_id: String,
    pub event_title: String,
    pub response: Option<String>,
}

/// Longest `event_id` / `event_title` kept, in characters.
pub const MAX_FIELD_CHARS: usize = 200;
/// Longest `response` kept, in characters.
pub const MAX_RESPONSE_CHARS: usize = 2_000;
/// Entries kept per team; the oldest are dropped first.
pub const MAX_EVENTS_PER_TEAM: usize = 500;

impl LoggedEvent {
    /// Build an event from team input, truncating oversized fields.
    pub fn new(
        timestamp: DateTime<Utc>,
        event_id: &str,
        event_title: &str,
        response: Option<&str>,
    ) -> Self {
        Self {
            timestamp,
            event_id: truncate(event_id, MAX_FIELD_CHARS),
            event_title: truncate(event_title, MAX_FIELD_CHARS),
            response: response
                .filter(|r| !r.is_empty())
                .map(|r| truncate(r, MAX_RESPONSE_CHARS)),
        }
    }
}

fn truncate(s: &str, max_chars: usize) -> String {
    match s.char_indices().nth(max_chars) {
        Some((end, _)) => s[..end].to_string(),
        None => s.to_string(),
    }
}

/// Per-team record of crises received, bounded to the most recent
/// [`MAX_EVENTS_PER_TEAM`] entries.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(transparent)]
pub struct EventLog {
    teams: PerTeam<Vec<LoggedEvent>>,
}

impl EventLog {
    pub fn record(&mut self, team: Team, event: LoggedEvent) {
        let events = self.teams.get_mut(team);
        events.push(event);
        if events.len() > MAX_EVENTS_PER_TEAM {
            let excess = events.len() - MAX_EVENTS_PER_TEAM;
            events.drain(..excess);
        }
    }

    pub fn entries(&self, team: Team) -> &[LoggedEvent] {
        self.teams.get(team)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Team, &[LoggedEvent])> {
        self.teams.iter().map(|(team, events)| (team, events.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.iter().map(|(_, events)| events.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(id: &str) -> LoggedEvent {
        LoggedEvent {
            timestamp: Utc::now(),
            event_id: id.into(),
            event_title: id.to_uppercase(),
            response: None,
        }
    }

    #[test]
    fn records_per_team_in_order() {
        let mut log = EventLog::default();
        log.record(Team::Usa, event("a"));
        log.record(Team::Usa, event("b"));
        log.record(Team::Neutral, event("c"));

        let ids: Vec<&str> = log.entries(Team::Usa).iter().map(|e| e.event_id.as_str()).collect();
        assert_eq!(ids, ["a", "b"]);
        assert!(log.entries(Team::China).is_empty());
        assert_eq!(log.len(), 3);
    }

    #[test]
    fn oldest_entries_drop_past_the_cap() {
        let mut log = EventLog::default();
        for i in 0..MAX_EVENTS_PER_TEAM + 3 {
            log.record(Team::Usa, event(&i.to_string()));
        }
        let events = log.entries(Team::Usa);
        assert_eq!(events.len(), MAX_EVENTS_PER_TEAM);
        assert_eq!(events[0].event_id, "3");
        assert_eq!(
            events.last().map(|e| e.event_id.clone()),
            Some((MAX_EVENTS_PER_TEAM + 2).to_string())
        );
    }

    #[test]
    fn new_truncates_oversized_fields() {
        let long = "é".repeat(MAX_FIELD_CHARS + 50);
        let answer = "x".repeat(MAX_RESPONSE_CHARS + 1);
        let event = LoggedEvent::new(Utc::now(), "id", &long, Some(&answer));
        assert_eq!(event.event_title.chars().count(), MAX_FIELD_CHARS);
        assert_eq!(event.response.map(|r| r.len()), Some(MAX_RESPONSE_CHARS));
        assert_eq!(event.event_id, "id");
    }

    #[test]
    fn new_treats_empty_response_as_none() {
        assert!(LoggedEvent::new(Utc::now(), "a", "A", Some("")).response.is_none());
    }

    #[test]
    fn serializes_keyed_by_team() {
        let mut log = EventLog::default();
        log.record(Team::China, event("a"));
        let json = serde_json::to_value(&log).unwrap();
        assert_eq!(json["china"][0]["event_id"], "a");
        assert!(json["usa"].as_array().unwrap().is_empty());
        assert!(json["china"][0]["response"].is_null());
    }
}
