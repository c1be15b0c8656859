//! The contest ruleset.
//!
//! Everything in this module is a pure function over in-memory data: no
//! database, no clock, no ambient settings. Callers fetch the picks, results
//! and configuration, hand them in, and render whatever comes out.
//! Re-evaluating with the same inputs always produces the same answer, so
//! the surrounding service recomputes standings on every read.

use std::collections::HashSet;

pub mod ranking;
pub mod scoring;
pub mod validation;

pub use ranking::{rank_entries, StandingsRow};
pub use scoring::{
    earned_points, pick_state, score_bracket, score_slate, BracketPick, BracketScore, FinalScore,
    PickState, SlateScore,
};
pub use validation::{validate_slate, BonusTier, RuleViolation, ValidationReport};

/// Which side of a game a contestant took.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Team1,
    Team2,
}

/// A single pick as the ruleset sees it.
///
/// The service layer builds these from the stored picks and the game list:
/// `bonus_eligible` is true when the game's bowl is on the configured
/// bonus allow-list.
#[derive(Debug, Clone)]
pub struct SlatePick {
    pub game_id: i64,
    pub team_1: bool,
    pub team_2: bool,
    pub points: i16,
    pub bonus_eligible: bool,
}

impl SlatePick {
    /// The chosen side, or `None` when the pick is incomplete
    /// (neither or both teams checked).
    pub fn selection(&self) -> Option<Side> {
        match (self.team_1, self.team_2) {
            (true, false) => Some(Side::Team1),
            (false, true) => Some(Side::Team2),
            _ => None,
        }
    }
}

/// The bowl names whose games may carry the maximum point weight.
#[derive(Debug, Clone)]
pub struct BonusGameList {
    names: HashSet<String>,
}

impl BonusGameList {
    pub fn new<I, S>(names: I) -> BonusGameList
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        BonusGameList {
            names: names
                .into_iter()
                .map(|name| name.as_ref().trim().to_string())
                .filter(|name| !name.is_empty())
                .collect(),
        }
    }

    pub fn contains(&self, bowl_name: &str) -> bool {
        self.names.contains(bowl_name.trim())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selection_requires_exactly_one_team() {
        let mut pick = SlatePick {
            game_id: 1,
            team_1: true,
            team_2: false,
            points: 1,
            bonus_eligible: false,
        };
        assert_eq!(pick.selection(), Some(Side::Team1));

        pick.team_2 = true;
        assert_eq!(pick.selection(), None);

        pick.team_1 = false;
        assert_eq!(pick.selection(), Some(Side::Team2));

        pick.team_2 = false;
        assert_eq!(pick.selection(), None);
    }

    #[test]
    fn bonus_list_ignores_whitespace_and_empty_names() {
        let list = BonusGameList::new(vec!["Fenway", " Alamo ", ""]);

        assert!(list.contains("Fenway"));
        assert!(list.contains("Alamo"));
        assert!(list.contains(" Alamo"));
        assert!(!list.contains("Rose"));
        assert!(!list.contains(""));
    }
}
