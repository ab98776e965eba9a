use std::collections::BTreeMap;

use axum::{Json, extract::State};
use common::{competition_ranks, score_prediction};
use sea_orm::*;
use tracing::instrument;

use crate::entity::{race_result, submission};
use crate::error::{AppError, ErrorBody};
use crate::models::leaderboard::{LeaderboardResponse, LeaderboardRow};
use crate::models::{result as result_model, submission as submission_model};
use crate::state::AppState;

/// Cross-race standings.
///
/// Every race with an entered result contributes: each of its submissions
/// is scored, totals are summed per user, and the races a user submitted
/// to are counted for the per-race average.
#[utoipa::path(
    get,
    path = "/api/v1/leaderboard",
    tag = "Leaderboard",
    operation_id = "leaderboard",
    summary = "Overall standings across all scored races",
    responses(
        (status = 200, description = "Leaderboard", body = LeaderboardResponse),
        (status = 503, description = "No store configured (STORE_UNAVAILABLE)", body = ErrorBody),
    ),
)]
#[instrument(skip(state))]
pub async fn leaderboard(
    State(state): State<AppState>,
) -> Result<Json<LeaderboardResponse>, AppError> {
    let db = state.db()?;

    let results = race_result::Entity::find().all(db).await?;

    // user -> (total points, races submitted to)
    let mut totals: BTreeMap<String, (u32, u32)> = BTreeMap::new();

    for result in &results {
        let result_set = result_model::prediction_set(result);

        let submissions = submission::Entity::find()
            .filter(submission::Column::RaceId.eq(result.race_id))
            .all(db)
            .await?;

        for s in &submissions {
            let score = score_prediction(&result_set, &submission_model::prediction_set(s));
            let entry = totals.entry(s.user_name.clone()).or_insert((0, 0));
            entry.0 += score.total;
            entry.1 += 1;
        }
    }

    let mut standings: Vec<(String, u32, u32)> = totals
        .into_iter()
        .map(|(user, (total, races))| (user, total, races))
        .collect();
    standings.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));

    let points: Vec<u32> = standings.iter().map(|(_, total, _)| *total).collect();
    let ranks = competition_ranks(&points);

    let rows = standings
        .into_iter()
        .zip(ranks)
        .map(|((user_name, total_points, races), rank)| LeaderboardRow {
            rank,
            user_name,
            total_points,
            races,
            average: round_one(f64::from(total_points) / f64::from(races)),
        })
        .collect();

    Ok(Json(LeaderboardResponse {
        races_scored: results.len() as u32,
        rows,
    }))
}

fn round_one(x: f64) -> f64 {
    (x * 10.0).round() / 10.0
}
