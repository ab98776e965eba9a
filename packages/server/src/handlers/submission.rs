use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use chrono::Utc;
use sea_orm::*;
use tracing::{info, instrument};

use crate::entity::{race, submission};
use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AdminToken;
use crate::extractors::json::AppJson;
use crate::models::shared::extras_to_json;
use crate::models::submission::*;
use crate::state::AppState;

/// Accept one submission.
///
/// Two mutually exclusive sinks, chosen here: with a store at hand the row
/// is inserted against the resolved active race; without one the prediction
/// goes out as a confirmation mail with a CSV attachment. Either way the
/// outcome is reported immediately; there is no retry and no queue.
#[utoipa::path(
    post,
    path = "/api/v1/submissions",
    tag = "Submissions",
    operation_id = "createSubmission",
    summary = "Submit predictions for the active race",
    request_body = CreateSubmissionRequest,
    responses(
        (status = 201, description = "Submission accepted", body = CreateSubmissionResponse),
        (status = 400, description = "Validation error, including no resolvable active race (VALIDATION_ERROR)", body = ErrorBody),
        (status = 502, description = "Mail sink failed (MAIL_ERROR)", body = ErrorBody),
        (status = 503, description = "Neither store nor mailer available (STORE_UNAVAILABLE)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, payload), fields(user = %payload.user_name))]
pub async fn create_submission(
    State(state): State<AppState>,
    AppJson(payload): AppJson<CreateSubmissionRequest>,
) -> Result<impl IntoResponse, AppError> {
    validate_create_submission(&payload)?;

    let user_name = payload.user_name.trim().to_string();
    let prediction = prediction_from_request(&payload);
    let summary = summary_rows(&prediction);

    if let Some(db) = state.db.as_ref() {
        let race_id = resolve_race_id(db, payload.race_id).await?;

        let new_submission = submission::ActiveModel {
            user_name: Set(user_name),
            podium_1: Set(prediction.podium_1),
            podium_2: Set(prediction.podium_2),
            podium_3: Set(prediction.podium_3),
            time_diff: Set(prediction.time_diff),
            driver_of_day: Set(prediction.driver_of_day),
            safety_car: Set(prediction.safety_car),
            red_flag: Set(prediction.red_flag),
            classified_drivers: Set(prediction.classified_drivers),
            teams_with_points: Set(prediction.teams_with_points),
            extra_answers: Set(extras_to_json(&prediction.extra_answers)),
            race_id: Set(race_id),
            created_at: Set(Utc::now()),
            ..Default::default()
        };

        let model = new_submission.insert(db).await?;
        info!(submission_id = model.id, race_id, "Submission stored");

        return Ok((
            StatusCode::CREATED,
            Json(CreateSubmissionResponse {
                id: Some(model.id),
                race_id: Some(race_id),
                sink: SubmissionSink::Database,
                summary,
            }),
        ));
    }

    let Some(mailer) = state.mailer.as_ref() else {
        return Err(AppError::StoreUnavailable);
    };

    let rows = prediction.category_rows();
    mailer
        .send_confirmation(&user_name, Utc::now(), &rows)
        .await?;
    info!(user = %user_name, "Submission mailed");

    Ok((
        StatusCode::CREATED,
        Json(CreateSubmissionResponse {
            id: None,
            race_id: None,
            sink: SubmissionSink::Email,
            summary,
        }),
    ))
}

#[utoipa::path(
    get,
    path = "/api/v1/races/{id}/submissions",
    tag = "Submissions",
    operation_id = "listSubmissions",
    summary = "List a race's submissions",
    description = "Submission order, oldest first. Admin only.",
    params(("id" = i32, Path, description = "Race ID")),
    responses(
        (status = 200, description = "Submissions", body = Vec<SubmissionResponse>),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 404, description = "Race not found (NOT_FOUND)", body = ErrorBody),
        (status = 503, description = "No store configured (STORE_UNAVAILABLE)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(_admin, state), fields(race_id))]
pub async fn list_submissions(
    _admin: AdminToken,
    State(state): State<AppState>,
    Path(race_id): Path<i32>,
) -> Result<Json<Vec<SubmissionResponse>>, AppError> {
    let db = state.db()?;
    find_race(db, race_id).await?;

    let rows = submission::Entity::find()
        .filter(submission::Column::RaceId.eq(race_id))
        .order_by_asc(submission::Column::CreatedAt)
        .all(db)
        .await?;

    Ok(Json(
        rows.into_iter().map(SubmissionResponse::from).collect(),
    ))
}

/// Resolve which race a submission lands on.
///
/// An explicit id must name an active race; otherwise the first active race
/// is taken. No active race at all rejects the submission.
async fn resolve_race_id(
    db: &DatabaseConnection,
    requested: Option<i32>,
) -> Result<i32, AppError> {
    let active = race::Entity::find()
        .filter(race::Column::IsActive.eq(true))
        .order_by_asc(race::Column::RaceDate)
        .all(db)
        .await?;

    match requested {
        Some(id) => active
            .iter()
            .find(|r| r.id == id)
            .map(|r| r.id)
            .ok_or_else(|| AppError::Validation("No active race with that id".into())),
        None => active
            .first()
            .map(|r| r.id)
            .ok_or_else(|| AppError::Validation("No active race is open for predictions".into())),
    }
}

async fn find_race<C: ConnectionTrait>(db: &C, id: i32) -> Result<race::Model, AppError> {
    race::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| AppError::NotFound("Race not found".into()))
}
