use serde::Serialize;

#[derive(Serialize, utoipa::ToSchema)]
pub struct LeaderboardRow {
    /// Competition rank over total points.
    pub rank: u32,
    pub user_name: String,
    pub total_points: u32,
    /// Races this user submitted predictions for (with a result entered).
    pub races: u32,
    /// total_points / races, rounded to one decimal.
    pub average: f64,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct LeaderboardResponse {
    /// Races with a result entered, i.e. the races that count.
    pub races_scored: u32,
    pub rows: Vec<LeaderboardRow>,
}
