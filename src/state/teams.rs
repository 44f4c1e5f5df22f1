//! Team roster shown on the public display

use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

use super::snapshot::RecordId;

pub const EMPTY_ROSTER_PLACEHOLDER: &str = "No teams yet.";

fn default_visible() -> bool {
    true
}

/// Team row as returned by the backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Team {
    pub id: RecordId,
    pub name: String,
    #[serde(default = "default_visible")]
    pub visible: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order_index: Option<i64>,
}

/// Visible teams in display order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Roster {
    names: Vec<String>,
}

impl Roster {
    /// Keep visible teams, ordered by `order_index` (stable, unindexed last)
    pub fn from_teams(teams: &[Team]) -> Self {
        let mut visible: Vec<&Team> = teams.iter().filter(|team| team.visible).collect();
        visible.sort_by_key(|team| (team.order_index.is_none(), team.order_index));
        Self {
            names: visible.into_iter().map(|team| team.name.clone()).collect(),
        }
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Randomly permute the display order
    pub fn shuffle(&mut self) {
        self.names.shuffle(&mut rand::thread_rng());
    }

    pub fn view(&self) -> RosterView {
        if self.names.is_empty() {
            return RosterView {
                entries: Vec::new(),
                scrolling: false,
                placeholder: Some(EMPTY_ROSTER_PLACEHOLDER.to_string()),
            };
        }

        // Listed twice so the scrolling marquee wraps without a gap
        let entries = self.names.iter().chain(self.names.iter()).cloned().collect();
        RosterView {
            entries,
            scrolling: true,
            placeholder: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RosterView {
    pub entries: Vec<String>,
    pub scrolling: bool,
    pub placeholder: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn team(id: i64, name: &str, visible: bool, order_index: Option<i64>) -> Team {
        Team {
            id: RecordId::Int(id),
            name: name.to_string(),
            visible,
            order_index,
        }
    }

    #[test]
    fn test_visible_teams_in_order_twice() {
        let teams = vec![
            team(1, "Rustaceans", true, Some(2)),
            team(2, "Hidden", false, Some(0)),
            team(3, "Ferris Wheel", true, Some(1)),
            team(4, "Latecomers", true, None),
        ];
        let view = Roster::from_teams(&teams).view();
        assert!(view.scrolling);
        assert_eq!(
            view.entries,
            vec![
                "Ferris Wheel", "Rustaceans", "Latecomers",
                "Ferris Wheel", "Rustaceans", "Latecomers",
            ]
        );
    }

    #[test]
    fn test_empty_roster_placeholder() {
        let view = Roster::from_teams(&[team(1, "Ghosts", false, None)]).view();
        assert!(!view.scrolling);
        assert!(view.entries.is_empty());
        assert_eq!(view.placeholder.as_deref(), Some(EMPTY_ROSTER_PLACEHOLDER));
    }

    #[test]
    fn test_shuffle_preserves_membership() {
        let teams: Vec<Team> = (0..20)
            .map(|i| team(i, &format!("team-{}", i), true, Some(i)))
            .collect();
        let mut roster = Roster::from_teams(&teams);
        roster.shuffle();

        let mut names = roster.names().to_vec();
        names.sort();
        let mut expected: Vec<String> = teams.iter().map(|t| t.name.clone()).collect();
        expected.sort();
        assert_eq!(names, expected);
    }

    #[test]
    fn test_visible_defaults_to_true() {
        let team: Team = serde_json::from_str(r#"{"id": 9, "name": "Crabs"}"#).unwrap();
        assert!(team.visible);
    }
}
