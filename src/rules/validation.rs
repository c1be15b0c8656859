//! Bonus point allocation rules.
//!
//! A slate may weight at most five games at 3 points, five at 5 points and a
//! single game at 10 points; the 10 point weight is further restricted to
//! games on the bonus allow-list. Hitting a cap exactly is fine, exceeding
//! it is not.

use std::fmt;

use super::SlatePick;

pub const MAX_THREE_POINT_PICKS: usize = 5;
pub const MAX_FIVE_POINT_PICKS: usize = 5;
pub const MAX_TEN_POINT_PICKS: usize = 1;

/// The elevated point values that are capped per entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BonusTier {
    Three,
    Five,
    Ten,
}

impl BonusTier {
    pub fn max_picks(self) -> usize {
        match self {
            BonusTier::Three => MAX_THREE_POINT_PICKS,
            BonusTier::Five => MAX_FIVE_POINT_PICKS,
            BonusTier::Ten => MAX_TEN_POINT_PICKS,
        }
    }
}

impl fmt::Display for BonusTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BonusTier::Three => write!(f, "3 point"),
            BonusTier::Five => write!(f, "5 point"),
            BonusTier::Ten => write!(f, "10 point"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuleViolation {
    TooManyBonusPicks { tier: BonusTier, count: usize },
    InvalidBonusAssignment { game_id: i64 },
    IncompleteSelection { game_id: i64 },
    UnknownPointValue { game_id: i64, points: i16 },
}

impl fmt::Display for RuleViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RuleViolation::TooManyBonusPicks { tier, count } => write!(
                f,
                "you have too many {} games selected ({}/{})",
                tier,
                count,
                tier.max_picks()
            ),
            RuleViolation::InvalidBonusAssignment { .. } => {
                write!(f, "only a bonus game can be worth 10 points")
            }
            RuleViolation::IncompleteSelection { .. } => write!(
                f,
                "check your picks! you have either missed a game or checked both teams as the winner"
            ),
            RuleViolation::UnknownPointValue { points, .. } => {
                write!(f, "{} is not a valid point value, use 1, 3, 5 or 10", points)
            }
        }
    }
}

/// The outcome of validating a full slate: the per-tier counts plus
/// everything that is wrong with it. Counts are reported even when a cap is
/// exceeded, so the caller can show "6/5" style messages.
#[derive(Debug, Default)]
pub struct ValidationReport {
    pub three_point_picks: usize,
    pub five_point_picks: usize,
    pub ten_point_picks: usize,
    pub violations: Vec<RuleViolation>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.violations.is_empty()
    }

    pub fn three_point_error(&self) -> bool {
        self.three_point_picks > MAX_THREE_POINT_PICKS
    }

    pub fn five_point_error(&self) -> bool {
        self.five_point_picks > MAX_FIVE_POINT_PICKS
    }

    pub fn ten_point_error(&self) -> bool {
        self.ten_point_picks > MAX_TEN_POINT_PICKS
    }

    /// The first violation, for callers that report a single message.
    pub fn first_violation(&self) -> Option<&RuleViolation> {
        self.violations.first()
    }
}

/// Validate a submitted slate against the allocation rules.
///
/// This runs both at submission time (blocking the entry) and again for
/// display once results arrive, since earned and penalty points depend on
/// the weights assigned here.
pub fn validate_slate(picks: &[SlatePick]) -> ValidationReport {
    let mut report = ValidationReport::default();

    for pick in picks {
        if pick.selection().is_none() {
            report.violations.push(RuleViolation::IncompleteSelection {
                game_id: pick.game_id,
            });
        }

        match pick.points {
            1 => {}
            3 => report.three_point_picks += 1,
            5 => report.five_point_picks += 1,
            10 => {
                report.ten_point_picks += 1;
                if !pick.bonus_eligible {
                    report
                        .violations
                        .push(RuleViolation::InvalidBonusAssignment {
                            game_id: pick.game_id,
                        });
                }
            }
            other => report.violations.push(RuleViolation::UnknownPointValue {
                game_id: pick.game_id,
                points: other,
            }),
        }
    }

    if report.three_point_error() {
        report.violations.push(RuleViolation::TooManyBonusPicks {
            tier: BonusTier::Three,
            count: report.three_point_picks,
        });
    }

    if report.five_point_error() {
        report.violations.push(RuleViolation::TooManyBonusPicks {
            tier: BonusTier::Five,
            count: report.five_point_picks,
        });
    }

    if report.ten_point_error() {
        report.violations.push(RuleViolation::TooManyBonusPicks {
            tier: BonusTier::Ten,
            count: report.ten_point_picks,
        });
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pick(game_id: i64, points: i16) -> SlatePick {
        SlatePick {
            game_id,
            team_1: true,
            team_2: false,
            points,
            bonus_eligible: false,
        }
    }

    fn bonus_pick(game_id: i64, points: i16) -> SlatePick {
        SlatePick {
            bonus_eligible: true,
            ..pick(game_id, points)
        }
    }

    #[test]
    fn a_plain_slate_is_valid() {
        let picks: Vec<SlatePick> = (0..30).map(|id| pick(id, 1)).collect();

        let report = validate_slate(&picks);

        assert!(report.is_valid());
        assert_eq!(report.three_point_picks, 0);
        assert_eq!(report.five_point_picks, 0);
        assert_eq!(report.ten_point_picks, 0);
    }

    #[test]
    fn exactly_five_three_point_picks_is_allowed() {
        let picks: Vec<SlatePick> = (0..5).map(|id| pick(id, 3)).collect();

        let report = validate_slate(&picks);

        assert!(report.is_valid());
        assert!(!report.three_point_error());
        assert_eq!(report.three_point_picks, 5);
    }

    #[test]
    fn six_three_point_picks_is_rejected() {
        let picks: Vec<SlatePick> = (0..6).map(|id| pick(id, 3)).collect();

        let report = validate_slate(&picks);

        assert!(!report.is_valid());
        assert!(report.three_point_error());
        assert_eq!(report.three_point_picks, 6);
        assert_eq!(
            report.first_violation(),
            Some(&RuleViolation::TooManyBonusPicks {
                tier: BonusTier::Three,
                count: 6
            })
        );
    }

    #[test]
    fn six_five_point_picks_is_rejected() {
        let picks: Vec<SlatePick> = (0..6).map(|id| pick(id, 5)).collect();

        let report = validate_slate(&picks);

        assert!(report.five_point_error());
        assert_eq!(report.five_point_picks, 6);
    }

    #[test]
    fn a_second_ten_point_pick_is_rejected() {
        let picks = vec![bonus_pick(1, 10), bonus_pick(2, 10)];

        let report = validate_slate(&picks);

        assert!(report.ten_point_error());
        assert_eq!(report.ten_point_picks, 2);
    }

    #[test]
    fn ten_points_on_a_regular_game_is_rejected_regardless_of_count() {
        let picks = vec![pick(7, 10)];

        let report = validate_slate(&picks);

        assert!(!report.is_valid());
        assert!(!report.ten_point_error());
        assert_eq!(
            report.first_violation(),
            Some(&RuleViolation::InvalidBonusAssignment { game_id: 7 })
        );
    }

    #[test]
    fn ten_points_on_a_bonus_game_is_allowed() {
        let picks = vec![bonus_pick(7, 10)];

        let report = validate_slate(&picks);

        assert!(report.is_valid());
        assert_eq!(report.ten_point_picks, 1);
    }

    #[test]
    fn both_teams_checked_is_incomplete() {
        let incomplete = SlatePick {
            game_id: 3,
            team_1: true,
            team_2: true,
            points: 1,
            bonus_eligible: false,
        };

        let report = validate_slate(&[incomplete]);

        assert_eq!(
            report.first_violation(),
            Some(&RuleViolation::IncompleteSelection { game_id: 3 })
        );
    }

    #[test]
    fn no_team_checked_is_incomplete() {
        let incomplete = SlatePick {
            game_id: 4,
            team_1: false,
            team_2: false,
            points: 1,
            bonus_eligible: false,
        };

        let report = validate_slate(&[incomplete]);

        assert!(!report.is_valid());
    }

    #[test]
    fn unknown_point_values_are_rejected() {
        let report = validate_slate(&[pick(1, 7)]);

        assert_eq!(
            report.first_violation(),
            Some(&RuleViolation::UnknownPointValue {
                game_id: 1,
                points: 7
            })
        );
    }
}
