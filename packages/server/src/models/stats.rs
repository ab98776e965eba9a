use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Serialize, utoipa::ToSchema)]
pub struct ScoreboardRow {
    /// Competition rank: ties share the better rank.
    pub rank: u32,
    pub user_name: String,
    pub points: u32,
    /// One entry per earned point, in scoring order.
    pub details: Vec<String>,
    pub submitted_at: DateTime<Utc>,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct ScoreCount {
    pub points: u32,
    pub count: u64,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct OptionCount {
    pub option: String,
    pub count: u64,
    /// Whether this option is the actual result value.
    pub actual: bool,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct Distribution {
    pub category: String,
    /// Options sorted by pick count, most popular first.
    pub options: Vec<OptionCount>,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct RaceStatsResponse {
    pub race_id: i32,
    pub submission_count: u64,
    /// Present only once a result has been entered.
    pub max_score: Option<u32>,
    pub scoreboard: Option<Vec<ScoreboardRow>>,
    pub score_histogram: Option<Vec<ScoreCount>>,
    pub distributions: Option<Vec<Distribution>>,
}
