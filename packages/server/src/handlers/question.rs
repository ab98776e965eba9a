use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use chrono::Utc;
use sea_orm::*;
use tracing::instrument;

use crate::entity::{question, race};
use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AdminToken;
use crate::extractors::json::AppJson;
use crate::models::question::*;
use crate::models::shared::options_to_json;
use crate::state::AppState;

#[utoipa::path(
    get,
    path = "/api/v1/races/{id}/questions",
    tag = "Questions",
    operation_id = "listQuestions",
    summary = "List a race's extra questions",
    description = "Public: the form renders these. Ordered by creation.",
    params(("id" = i32, Path, description = "Race ID")),
    responses(
        (status = 200, description = "Questions", body = Vec<QuestionResponse>),
        (status = 404, description = "Race not found (NOT_FOUND)", body = ErrorBody),
        (status = 503, description = "No store configured (STORE_UNAVAILABLE)", body = ErrorBody),
    ),
)]
#[instrument(skip(state), fields(race_id))]
pub async fn list_questions(
    State(state): State<AppState>,
    Path(race_id): Path<i32>,
) -> Result<Json<Vec<QuestionResponse>>, AppError> {
    let db = state.db()?;
    find_race(db, race_id).await?;

    let rows = question::Entity::find()
        .filter(question::Column::RaceId.eq(race_id))
        .order_by_asc(question::Column::Id)
        .all(db)
        .await?;

    Ok(Json(rows.into_iter().map(QuestionResponse::from).collect()))
}

#[utoipa::path(
    post,
    path = "/api/v1/races/{id}/questions",
    tag = "Questions",
    operation_id = "createQuestion",
    summary = "Add an extra question to a race",
    description = "Options are trimmed; at least two must remain. Admin only.",
    params(("id" = i32, Path, description = "Race ID")),
    request_body = CreateQuestionRequest,
    responses(
        (status = 201, description = "Question created", body = QuestionResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 404, description = "Race not found (NOT_FOUND)", body = ErrorBody),
        (status = 503, description = "No store configured (STORE_UNAVAILABLE)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(_admin, state, payload), fields(race_id))]
pub async fn create_question(
    _admin: AdminToken,
    State(state): State<AppState>,
    Path(race_id): Path<i32>,
    AppJson(payload): AppJson<CreateQuestionRequest>,
) -> Result<impl IntoResponse, AppError> {
    let db = state.db()?;
    validate_prompt(&payload.question)?;
    let options = validate_options(&payload.options)?;

    find_race(db, race_id).await?;

    let new_question = question::ActiveModel {
        prompt: Set(payload.question.trim().to_string()),
        options: Set(options_to_json(&options)),
        race_id: Set(race_id),
        created_at: Set(Utc::now()),
        ..Default::default()
    };

    let model = new_question.insert(db).await?;

    Ok((StatusCode::CREATED, Json(QuestionResponse::from(model))))
}

#[utoipa::path(
    patch,
    path = "/api/v1/races/{id}/questions/{question_id}",
    tag = "Questions",
    operation_id = "updateQuestion",
    summary = "Edit an extra question",
    description = "PATCH semantics over prompt and options. An empty payload returns the current resource unchanged. Admin only.",
    params(
        ("id" = i32, Path, description = "Race ID"),
        ("question_id" = i32, Path, description = "Question ID"),
    ),
    request_body = UpdateQuestionRequest,
    responses(
        (status = 200, description = "Question updated", body = QuestionResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 404, description = "Question not found (NOT_FOUND)", body = ErrorBody),
        (status = 503, description = "No store configured (STORE_UNAVAILABLE)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(_admin, state, payload), fields(race_id, question_id))]
pub async fn update_question(
    _admin: AdminToken,
    State(state): State<AppState>,
    Path((race_id, question_id)): Path<(i32, i32)>,
    AppJson(payload): AppJson<UpdateQuestionRequest>,
) -> Result<Json<QuestionResponse>, AppError> {
    let db = state.db()?;

    if let Some(ref prompt) = payload.question {
        validate_prompt(prompt)?;
    }
    let options = match payload.options {
        Some(ref raw) => Some(validate_options(raw)?),
        None => None,
    };

    if payload == UpdateQuestionRequest::default() {
        let existing = find_question(db, race_id, question_id).await?;
        return Ok(Json(existing.into()));
    }

    let txn = db.begin().await?;
    let existing = find_question(&txn, race_id, question_id).await?;

    let mut active: question::ActiveModel = existing.into();

    if let Some(ref prompt) = payload.question {
        active.prompt = Set(prompt.trim().to_string());
    }
    if let Some(options) = options {
        active.options = Set(options_to_json(&options));
    }

    let model = active.update(&txn).await?;
    txn.commit().await?;

    Ok(Json(model.into()))
}

#[utoipa::path(
    delete,
    path = "/api/v1/races/{id}/questions/{question_id}",
    tag = "Questions",
    operation_id = "deleteQuestion",
    summary = "Delete an extra question",
    description = "Removes the question. Stored answers keyed against it simply stop scoring. Admin only.",
    params(
        ("id" = i32, Path, description = "Race ID"),
        ("question_id" = i32, Path, description = "Question ID"),
    ),
    responses(
        (status = 204, description = "Question deleted"),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 404, description = "Question not found (NOT_FOUND)", body = ErrorBody),
        (status = 503, description = "No store configured (STORE_UNAVAILABLE)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(_admin, state), fields(race_id, question_id))]
pub async fn delete_question(
    _admin: AdminToken,
    State(state): State<AppState>,
    Path((race_id, question_id)): Path<(i32, i32)>,
) -> Result<impl IntoResponse, AppError> {
    let db = state.db()?;

    let txn = db.begin().await?;
    let existing = find_question(&txn, race_id, question_id).await?;
    let active: question::ActiveModel = existing.into();
    active.delete(&txn).await?;
    txn.commit().await?;

    Ok(StatusCode::NO_CONTENT)
}

async fn find_race<C: ConnectionTrait>(db: &C, id: i32) -> Result<race::Model, AppError> {
    race::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| AppError::NotFound("Race not found".into()))
}

async fn find_question<C: ConnectionTrait>(
    db: &C,
    race_id: i32,
    question_id: i32,
) -> Result<question::Model, AppError> {
    question::Entity::find_by_id(question_id)
        .filter(question::Column::RaceId.eq(race_id))
        .one(db)
        .await?
        .ok_or_else(|| AppError::NotFound("Question not found".into()))
}
