use crate::catalog::Crisis;
use crate::types::{PerTeam, Team};

/// Current crisis per team. Slots persist until overwritten or cleared.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActiveCrisisBoard {
    slots: PerTeam<Option<Crisis>>,
}

impl ActiveCrisisBoard {
    pub fn get(&self, team: Team) -> Option<&Crisis> {
        self.slots.get(team).as_ref()
    }

    pub fn set(&mut self, team: Team, crisis: Crisis) {
        *self.slots.get_mut(team) = Some(crisis);
    }

    /// Assign the same crisis to every team.
    pub fn set_all(&mut self, crisis: &Crisis) {
        for team in Team::all() {
            self.set(*team, crisis.clone());
        }
    }

    pub fn clear(&mut self, team: Team) -> Option<Crisis> {
        self.slots.get_mut(team).take()
    }

    pub fn slots(&self) -> &PerTeam<Option<Crisis>> {
        &self.slots
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_empty() {
        let board = ActiveCrisisBoard::default();
        assert!(Team::all().iter().all(|t| board.get(*t).is_none()));
    }

    #[test]
    fn set_all_assigns_identical_crisis() {
        let mut board = ActiveCrisisBoard::default();
        let crisis = Crisis::new("c1", "C1", "d", "p?");
        board.set_all(&crisis);
        for team in Team::all() {
            assert_eq!(board.get(*team), Some(&crisis));
        }
    }

    #[test]
    fn clear_only_touches_one_team() {
        let mut board = ActiveCrisisBoard::default();
        board.set_all(&Crisis::new("c1", "C1", "d", "p?"));
        let cleared = board.clear(Team::China);
        assert_eq!(cleared.map(|c| c.id), Some("c1".to_string()));
        assert!(board.get(Team::China).is_none());
        assert!(board.get(Team::Usa).is_some());
        assert!(board.get(Team::Neutral).is_some());
    }
}
