use chrono::{DateTime, Utc};

/// One pick of a completed entry, annotated with everything the flyout
/// shows: who was picked, who won, and what the pick earned.
#[derive(Debug, Serialize)]
pub struct CompletedPick {
    pub game_id: i64,
    pub bowl_name: String,
    pub game_time: DateTime<Utc>,
    pub team_1: bool,
    pub team_1_name: String,
    pub team_1_logo_id: Option<String>,
    pub team_1_won: Option<bool>,
    pub team_2: bool,
    pub team_2_name: String,
    pub team_2_logo_id: Option<String>,
    pub team_2_won: Option<bool>,
    pub points: i16,
    pub earned_points: Option<i32>,
    /// no usable result yet: not played, or entered with equal scores
    pub not_played: bool,
}

/// The bracket part of a completed entry.
#[derive(Debug, Serialize)]
pub struct CompletedBracket {
    pub school_1: String,
    pub school_1_correct: bool,
    pub school_2: String,
    pub school_2_correct: bool,
    pub champion: String,
    pub champion_correct: bool,
    pub points: i32,
}

/// **GET /api/standings/entries/{id}**
#[derive(Debug, Serialize)]
pub struct CompletedEntry {
    pub entry_id: i64,
    pub entry_name: String,
    pub current_points: i32,
    pub picks: Vec<CompletedPick>,
    pub bracket: Option<CompletedBracket>,
}

/// **GET /api/games/{id}/picks**
///
/// One contestant's pick for a single game, ordered by how that
/// contestant is doing overall.
#[derive(Debug, Serialize)]
pub struct BowlPickRow {
    pub entry_id: i64,
    pub entry_name: String,
    pub team_1_picked: bool,
    pub team_2_picked: bool,
    pub points: i16,
    pub earned_points: Option<i32>,
    pub total_points: i32,
}

/// **GET /api/analysis/{year}**
///
/// How often each side of a game was taken.
#[derive(Debug, Serialize)]
pub struct AnalysisRow {
    pub game_id: i64,
    pub bowl_name: String,
    pub school_1_name: String,
    pub school_2_name: String,
    pub selected_1: u32,
    pub selected_2: u32,
}

/// **GET /api/tiebreakers/{year}**
///
/// Administrative display only, tiebreakers never influence scoring.
#[derive(Debug, Serialize)]
pub struct TiebreakerRow {
    pub entry_name: String,
    pub tiebreaker_1: Option<String>,
    pub tiebreaker_2: Option<i32>,
}
