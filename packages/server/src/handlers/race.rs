use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use chrono::Utc;
use sea_orm::*;
use tracing::instrument;

use crate::entity::race;
use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AdminToken;
use crate::extractors::json::AppJson;
use crate::models::race::*;
use crate::state::AppState;

#[utoipa::path(
    post,
    path = "/api/v1/races",
    tag = "Races",
    operation_id = "createRace",
    summary = "Create a new race",
    description = "Creates a race, active by default. Admin only.",
    request_body = CreateRaceRequest,
    responses(
        (status = 201, description = "Race created", body = RaceResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 503, description = "No store configured (STORE_UNAVAILABLE)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(_admin, state, payload), fields(name = %payload.name))]
pub async fn create_race(
    _admin: AdminToken,
    State(state): State<AppState>,
    AppJson(payload): AppJson<CreateRaceRequest>,
) -> Result<impl IntoResponse, AppError> {
    let db = state.db()?;
    validate_create_race(&payload)?;

    let new_race = race::ActiveModel {
        name: Set(payload.name.trim().to_string()),
        race_date: Set(payload.race_date),
        submission_deadline: Set(payload.submission_deadline),
        is_active: Set(payload.is_active.unwrap_or(true)),
        created_at: Set(Utc::now()),
        ..Default::default()
    };

    let model = new_race.insert(db).await?;

    Ok((StatusCode::CREATED, Json(RaceResponse::from(model))))
}

#[utoipa::path(
    get,
    path = "/api/v1/races",
    tag = "Races",
    operation_id = "listRaces",
    summary = "List all races",
    description = "All races, newest race date first, active or not. Admin only.",
    responses(
        (status = 200, description = "List of races", body = Vec<RaceResponse>),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 503, description = "No store configured (STORE_UNAVAILABLE)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(_admin, state))]
pub async fn list_races(
    _admin: AdminToken,
    State(state): State<AppState>,
) -> Result<Json<Vec<RaceResponse>>, AppError> {
    let db = state.db()?;

    let races = race::Entity::find()
        .order_by_desc(race::Column::RaceDate)
        .all(db)
        .await?;

    Ok(Json(races.into_iter().map(RaceResponse::from).collect()))
}

#[utoipa::path(
    get,
    path = "/api/v1/races/active",
    tag = "Races",
    operation_id = "listActiveRaces",
    summary = "List races currently open for predictions",
    description = "Public. Each entry carries a deadline-passed flag computed against wall-clock now; a passed deadline is informational only.",
    responses(
        (status = 200, description = "Active races", body = Vec<ActiveRaceResponse>),
        (status = 503, description = "No store configured (STORE_UNAVAILABLE)", body = ErrorBody),
    ),
)]
#[instrument(skip(state))]
pub async fn list_active_races(
    State(state): State<AppState>,
) -> Result<Json<Vec<ActiveRaceResponse>>, AppError> {
    let db = state.db()?;

    let races = race::Entity::find()
        .filter(race::Column::IsActive.eq(true))
        .order_by_asc(race::Column::RaceDate)
        .all(db)
        .await?;

    let now = Utc::now();
    Ok(Json(
        races
            .iter()
            .map(|r| ActiveRaceResponse::from_model(r, now))
            .collect(),
    ))
}

#[utoipa::path(
    patch,
    path = "/api/v1/races/{id}",
    tag = "Races",
    operation_id = "updateRace",
    summary = "Update a race",
    description = "PATCH semantics over name, date, deadline and the active flag. Races are never deleted; deactivation is how a race leaves the form. An empty payload returns the current resource unchanged. Admin only.",
    params(("id" = i32, Path, description = "Race ID")),
    request_body = UpdateRaceRequest,
    responses(
        (status = 200, description = "Race updated", body = RaceResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 404, description = "Race not found (NOT_FOUND)", body = ErrorBody),
        (status = 503, description = "No store configured (STORE_UNAVAILABLE)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(_admin, state, payload), fields(id))]
pub async fn update_race(
    _admin: AdminToken,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    AppJson(payload): AppJson<UpdateRaceRequest>,
) -> Result<Json<RaceResponse>, AppError> {
    let db = state.db()?;
    validate_update_race(&payload)?;

    if payload == UpdateRaceRequest::default() {
        let existing = find_race(db, id).await?;
        return Ok(Json(existing.into()));
    }

    let txn = db.begin().await?;
    let existing = find_race_for_update(&txn, id).await?;

    let mut active: race::ActiveModel = existing.into();

    if let Some(ref name) = payload.name {
        active.name = Set(name.trim().to_string());
    }
    if let Some(race_date) = payload.race_date {
        active.race_date = Set(race_date);
    }
    if let Some(submission_deadline) = payload.submission_deadline {
        active.submission_deadline = Set(submission_deadline);
    }
    if let Some(is_active) = payload.is_active {
        active.is_active = Set(is_active);
    }

    let model = active.update(&txn).await?;
    txn.commit().await?;

    Ok(Json(model.into()))
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
