use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use chrono::Utc;
use sea_orm::*;
use tracing::{info, instrument};

use crate::entity::{race, race_result};
use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AdminToken;
use crate::extractors::json::AppJson;
use crate::models::result::*;
use crate::models::shared::extras_to_json;
use crate::state::AppState;

#[utoipa::path(
    get,
    path = "/api/v1/races/{id}/result",
    tag = "Results",
    operation_id = "getResult",
    summary = "Get a race's official result",
    params(("id" = i32, Path, description = "Race ID")),
    responses(
        (status = 200, description = "Result", body = ResultResponse),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 404, description = "Race or result not found (NOT_FOUND)", body = ErrorBody),
        (status = 503, description = "No store configured (STORE_UNAVAILABLE)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(_admin, state), fields(race_id))]
pub async fn get_result(
    _admin: AdminToken,
    State(state): State<AppState>,
    Path(race_id): Path<i32>,
) -> Result<Json<ResultResponse>, AppError> {
    let db = state.db()?;
    find_race(db, race_id).await?;

    let result = race_result::Entity::find()
        .filter(race_result::Column::RaceId.eq(race_id))
        .one(db)
        .await?
        .ok_or_else(|| AppError::NotFound("No result entered for this race".into()))?;

    Ok(Json(result.into()))
}

/// Enter or correct a race's result.
///
/// At most one result row exists per race: the first write creates it,
/// every later write edits it in place and stamps `updated_at`. There is
/// no version check; concurrent edits last-write-win.
#[utoipa::path(
    put,
    path = "/api/v1/races/{id}/result",
    tag = "Results",
    operation_id = "upsertResult",
    summary = "Enter or edit a race's official result",
    params(("id" = i32, Path, description = "Race ID")),
    request_body = UpsertResultRequest,
    responses(
        (status = 200, description = "Result updated", body = ResultResponse),
        (status = 201, description = "Result created", body = ResultResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 404, description = "Race not found (NOT_FOUND)", body = ErrorBody),
        (status = 503, description = "No store configured (STORE_UNAVAILABLE)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(_admin, state, payload), fields(race_id))]
pub async fn upsert_result(
    _admin: AdminToken,
    State(state): State<AppState>,
    Path(race_id): Path<i32>,
    AppJson(payload): AppJson<UpsertResultRequest>,
) -> Result<impl IntoResponse, AppError> {
    let db = state.db()?;
    validate_upsert_result(&payload)?;

    let result = prediction_from_request(&payload);
    let now = Utc::now();

    let txn = db.begin().await?;
    find_race_for_update(&txn, race_id).await?;

    let existing = race_result::Entity::find()
        .filter(race_result::Column::RaceId.eq(race_id))
        .one(&txn)
        .await?;

    let (status, model) = match existing {
        Some(existing) => {
            let mut active: race_result::ActiveModel = existing.into();
            active.podium_1 = Set(result.podium_1);
            active.podium_2 = Set(result.podium_2);
            active.podium_3 = Set(result.podium_3);
            active.time_diff = Set(result.time_diff);
            active.driver_of_day = Set(result.driver_of_day);
            active.safety_car = Set(result.safety_car);
            active.red_flag = Set(result.red_flag);
            active.classified_drivers = Set(result.classified_drivers);
            active.teams_with_points = Set(result.teams_with_points);
            active.extra_answers = Set(extras_to_json(&result.extra_answers));
            active.updated_at = Set(now);

            let model = active.update(&txn).await?;
            info!(race_id, "Result updated");
            (StatusCode::OK, model)
        }
        None => {
            let new_result = race_result::ActiveModel {
                race_id: Set(race_id),
                podium_1: Set(result.podium_1),
                podium_2: Set(result.podium_2),
                podium_3: Set(result.podium_3),
                time_diff: Set(result.time_diff),
                driver_of_day: Set(result.driver_of_day),
                safety_car: Set(result.safety_car),
                red_flag: Set(result.red_flag),
                classified_drivers: Set(result.classified_drivers),
                teams_with_points: Set(result.teams_with_points),
                extra_answers: Set(extras_to_json(&result.extra_answers)),
                created_at: Set(now),
                updated_at: Set(now),
                ..Default::default()
            };

            let model = new_result.insert(&txn).await?;
            info!(race_id, "Result entered");
            (StatusCode::CREATED, model)
        }
    };

    txn.commit().await?;

    Ok((status, Json(ResultResponse::from(model))))
}

async fn find_race<C: ConnectionTrait>(db: &C, id: i32) -> Result<race::Model, AppError> {
    race::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| AppError::NotFound("Race not found".into()))
}

async fn find_race_for_update(
    txn: &DatabaseTransaction,
    id: i32,
) -> Result<race::Model, AppError> {
    use sea_orm::sea_query::LockType;
    race::Entity::find_by_id(id)
        .lock(LockType::Update)
        .one(txn)
        .await?
        .ok_or_else(|| AppError::NotFound("Race not found".into()))
}
