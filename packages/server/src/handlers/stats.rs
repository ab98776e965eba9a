use std::collections::BTreeMap;

use axum::Json;
use axum::extract::{Path, State};
use axum::http::header;
use axum::response::{IntoResponse, Response};
use common::prediction::{PredictionSet, flag_label};
use common::{competition_ranks, max_score, score_prediction};
use sea_orm::*;
use tracing::instrument;

use crate::entity::{race, race_result, submission};
use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AdminToken;
use crate::models::stats::*;
use crate::models::{result as result_model, submission as submission_model};
use crate::state::AppState;
use crate::utils::filename::export_filename;

/// Per-race statistics: submission count always; once a result is entered,
/// also the scoreboard, the score histogram and the pick distributions.
#[utoipa::path(
    get,
    path = "/api/v1/races/{id}/stats",
    tag = "Stats",
    operation_id = "raceStats",
    summary = "Scoreboard and pick statistics for a race",
    params(("id" = i32, Path, description = "Race ID")),
    responses(
        (status = 200, description = "Race statistics", body = RaceStatsResponse),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 404, description = "Race not found (NOT_FOUND)", body = ErrorBody),
        (status = 503, description = "No store configured (STORE_UNAVAILABLE)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(_admin, state), fields(race_id))]
pub async fn race_stats(
    _admin: AdminToken,
    State(state): State<AppState>,
    Path(race_id): Path<i32>,
) -> Result<Json<RaceStatsResponse>, AppError> {
    let db = state.db()?;
    find_race(db, race_id).await?;

    let submissions = find_submissions(db, race_id).await?;
    let result = race_result::Entity::find()
        .filter(race_result::Column::RaceId.eq(race_id))
        .one(db)
        .await?;

    let submission_count = submissions.len() as u64;

    let Some(result) = result else {
        return Ok(Json(RaceStatsResponse {
            race_id,
            submission_count,
            max_score: None,
            scoreboard: None,
            score_histogram: None,
            distributions: None,
        }));
    };

    let result_set = result_model::prediction_set(&result);
    let scoreboard = build_scoreboard(&result_set, &submissions);
    let score_histogram = build_histogram(&scoreboard);
    let distributions = build_distributions(&submissions, &result_set);

    Ok(Json(RaceStatsResponse {
        race_id,
        submission_count,
        max_score: Some(max_score(result_set.extra_answers.len())),
        scoreboard: Some(scoreboard),
        score_histogram: Some(score_histogram),
        distributions: Some(distributions),
    }))
}

#[utoipa::path(
    get,
    path = "/api/v1/races/{id}/stats/export",
    tag = "Stats",
    operation_id = "exportScoreboard",
    summary = "Download the scoreboard as CSV",
    params(("id" = i32, Path, description = "Race ID")),
    responses(
        (status = 200, description = "CSV attachment", body = String, content_type = "text/csv"),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 404, description = "Race or result not found (NOT_FOUND)", body = ErrorBody),
        (status = 503, description = "No store configured (STORE_UNAVAILABLE)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(_admin, state), fields(race_id))]
pub async fn export_scoreboard(
    _admin: AdminToken,
    State(state): State<AppState>,
    Path(race_id): Path<i32>,
) -> Result<Response, AppError> {
    let db = state.db()?;
    let race = find_race(db, race_id).await?;

    let result = race_result::Entity::find()
        .filter(race_result::Column::RaceId.eq(race_id))
        .one(db)
        .await?
        .ok_or_else(|| AppError::NotFound("No result entered for this race".into()))?;

    let submissions = find_submissions(db, race_id).await?;
    let result_set = result_model::prediction_set(&result);
    let scoreboard = build_scoreboard(&result_set, &submissions);

    let mut wtr = csv::Writer::from_writer(Vec::new());
    wtr.write_record(["Rank", "Name", "Points", "Details", "Submitted at"])
        .map_err(common::export::ExportError::from)?;
    for row in &scoreboard {
        wtr.write_record([
            row.rank.to_string(),
            row.user_name.clone(),
            row.points.to_string(),
            row.details.join("; "),
            row.submitted_at
                .format(common::export::TIMESTAMP_FORMAT)
                .to_string(),
        ])
        .map_err(common::export::ExportError::from)?;
    }
    let body = writer_to_string(wtr)?;

    Ok(csv_response(export_filename(&race.name, "scoreboard"), body))
}

#[utoipa::path(
    get,
    path = "/api/v1/races/{id}/submissions/export",
    tag = "Stats",
    operation_id = "exportSubmissions",
    summary = "Download a race's raw submissions as CSV",
    description = "One row per submission; extra answers flattened to a JSON string column.",
    params(("id" = i32, Path, description = "Race ID")),
    responses(
        (status = 200, description = "CSV attachment", body = String, content_type = "text/csv"),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 404, description = "Race not found (NOT_FOUND)", body = ErrorBody),
        (status = 503, description = "No store configured (STORE_UNAVAILABLE)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(_admin, state), fields(race_id))]
pub async fn export_submissions(
    _admin: AdminToken,
    State(state): State<AppState>,
    Path(race_id): Path<i32>,
) -> Result<Response, AppError> {
    let db = state.db()?;
    let race = find_race(db, race_id).await?;
    let submissions = find_submissions(db, race_id).await?;

    let mut wtr = csv::Writer::from_writer(Vec::new());
    wtr.write_record([
        "id",
        "user_name",
        "podium_1",
        "podium_2",
        "podium_3",
        "time_diff",
        "driver_of_day",
        "safety_car",
        "red_flag",
        "classified_drivers",
        "teams_with_points",
        "extra_answers",
        "created_at",
    ])
    .map_err(common::export::ExportError::from)?;

    for s in &submissions {
        wtr.write_record([
            s.id.to_string(),
            s.user_name.clone(),
            s.podium_1.clone(),
            s.podium_2.clone(),
            s.podium_3.clone(),
            s.time_diff.clone(),
            s.driver_of_day.clone(),
            flag_label(s.safety_car).to_string(),
            flag_label(s.red_flag).to_string(),
            s.classified_drivers.clone(),
            s.teams_with_points.to_string(),
            s.extra_answers.to_string(),
            s.created_at
                .format(common::export::TIMESTAMP_FORMAT)
                .to_string(),
        ])
        .map_err(common::export::ExportError::from)?;
    }
    let body = writer_to_string(wtr)?;

    Ok(csv_response(
        export_filename(&race.name, "submissions"),
        body,
    ))
}

/// Score every submission and rank them, most points first. Equal totals
/// share the better rank; order within a tie follows submission time.
fn build_scoreboard(
    result: &PredictionSet,
    submissions: &[submission::Model],
) -> Vec<ScoreboardRow> {
    let mut scored: Vec<(&submission::Model, common::Score)> = submissions
        .iter()
        .map(|s| {
            let score = score_prediction(result, &submission_model::prediction_set(s));
            (s, score)
        })
        .collect();

    scored.sort_by(|a, b| b.1.total.cmp(&a.1.total));

    let totals: Vec<u32> = scored.iter().map(|(_, score)| score.total).collect();
    let ranks = competition_ranks(&totals);

    scored
        .into_iter()
        .zip(ranks)
        .map(|((s, score), rank)| ScoreboardRow {
            rank,
            user_name: s.user_name.clone(),
            points: score.total,
            details: score.details,
            submitted_at: s.created_at,
        })
        .collect()
}

fn build_histogram(scoreboard: &[ScoreboardRow]) -> Vec<ScoreCount> {
    let mut counts: BTreeMap<u32, u64> = BTreeMap::new();
    for row in scoreboard {
        *counts.entry(row.points).or_default() += 1;
    }
    counts
        .into_iter()
        .map(|(points, count)| ScoreCount { points, count })
        .collect()
}

fn build_distributions(
    submissions: &[submission::Model],
    result: &PredictionSet,
) -> Vec<Distribution> {
    vec![
        distribution(
            "podium_1",
            submissions.iter().map(|s| s.podium_1.clone()),
            &result.podium_1,
        ),
        distribution(
            "podium_2",
            submissions.iter().map(|s| s.podium_2.clone()),
            &result.podium_2,
        ),
        distribution(
            "podium_3",
            submissions.iter().map(|s| s.podium_3.clone()),
            &result.podium_3,
        ),
        distribution(
            "time_diff",
            submissions.iter().map(|s| s.time_diff.clone()),
            &result.time_diff,
        ),
        distribution(
            "driver_of_day",
            submissions.iter().map(|s| s.driver_of_day.clone()),
            &result.driver_of_day,
        ),
        distribution(
            "safety_car",
            submissions.iter().map(|s| flag_label(s.safety_car).to_string()),
            flag_label(result.safety_car),
        ),
        distribution(
            "red_flag",
            submissions.iter().map(|s| flag_label(s.red_flag).to_string()),
            flag_label(result.red_flag),
        ),
        distribution(
            "classified_drivers",
            submissions.iter().map(|s| s.classified_drivers.clone()),
            &result.classified_drivers,
        ),
        distribution(
            "teams_with_points",
            submissions.iter().map(|s| s.teams_with_points.to_string()),
            &result.teams_with_points.to_string(),
        ),
    ]
}

fn distribution(
    category: &str,
    values: impl Iterator<Item = String>,
    actual: &str,
) -> Distribution {
    let mut counts: BTreeMap<String, u64> = BTreeMap::new();
    for value in values {
        *counts.entry(value).or_default() += 1;
    }

    let mut options: Vec<OptionCount> = counts
        .into_iter()
        .map(|(option, count)| OptionCount {
            actual: option == actual,
            option,
            count,
        })
        .collect();
    options.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.option.cmp(&b.option)));

    Distribution {
        category: category.to_string(),
        options,
    }
}

fn writer_to_string(wtr: csv::Writer<Vec<u8>>) -> Result<String, AppError> {
    let bytes = wtr
        .into_inner()
        .map_err(|e| AppError::Internal(format!("CSV export error: {}", e)))?;
    String::from_utf8(bytes).map_err(|e| AppError::Internal(format!("CSV export error: {}", e)))
}

fn csv_response(filename: String, body: String) -> Response {
    (
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{filename}\""),
            ),
        ],
        body,
    )
        .into_response()
}

async fn find_race<C: ConnectionTrait>(db: &C, id: i32) -> Result<race::Model, AppError> {
    race::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| AppError::NotFound("Race not found".into()))
}

async fn find_submissions<C: ConnectionTrait>(
    db: &C,
    race_id: i32,
) -> Result<Vec<submission::Model>, AppError> {
    submission::Entity::find()
        .filter(submission::Column::RaceId.eq(race_id))
        .order_by_asc(submission::Column::CreatedAt)
        .all(db)
        .await
        .map_err(Into::into)
}
