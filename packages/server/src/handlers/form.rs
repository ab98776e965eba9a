use axum::{
    Json,
    extract::{Query, State},
};
use chrono::Utc;
use common::{drivers, prediction};
use sea_orm::*;
use tracing::{instrument, warn};

use crate::entity::race;
use crate::error::AppError;
use crate::models::form::{FormContextResponse, FormOptions, FormQuery, TeamDrivers};
use crate::models::race::ActiveRaceResponse;
use crate::resolve;
use crate::state::AppState;

/// Build the form context: description, active races with deadline state,
/// the driver grid, the fixed option lists and the resolved extra questions.
#[utoipa::path(
    get,
    path = "/api/v1/form",
    tag = "Form",
    operation_id = "formContext",
    summary = "Everything a client needs to render the prediction form",
    params(FormQuery),
    responses(
        (status = 200, description = "Form context", body = FormContextResponse),
    ),
)]
#[instrument(skip(state, query))]
pub async fn form_context(
    State(state): State<AppState>,
    Query(query): Query<FormQuery>,
) -> Result<Json<FormContextResponse>, AppError> {
    let (description, _) = resolve::resolve_description(&state).await;

    let active = active_races(&state).await;
    let now = Utc::now();
    let selected_race_id = select_race(&active, query.race_id);
    let questions = resolve::resolve_questions(&state, selected_race_id).await;

    Ok(Json(FormContextResponse {
        description,
        active_races: active
            .iter()
            .map(|r| ActiveRaceResponse::from_model(r, now))
            .collect(),
        selected_race_id,
        grid: drivers::TEAMS
            .iter()
            .map(|(team, drivers)| TeamDrivers {
                team: ToString::to_string(team),
                drivers: drivers.iter().map(|d| ToString::to_string(d)).collect(),
            })
            .collect(),
        options: form_options(),
        questions,
    }))
}

/// Active races, oldest race first. Store failures degrade to an empty
/// list so the form still renders.
async fn active_races(state: &AppState) -> Vec<race::Model> {
    let Some(db) = state.db.as_ref() else {
        return Vec::new();
    };

    match race::Entity::find()
        .filter(race::Column::IsActive.eq(true))
        .order_by_asc(race::Column::RaceDate)
        .all(db)
        .await
    {
        Ok(races) => races,
        Err(e) => {
            warn!(error = %e, "Failed to load active races");
            Vec::new()
        }
    }
}

fn select_race(active: &[race::Model], requested: Option<i32>) -> Option<i32> {
    match requested {
        Some(id) => active.iter().find(|r| r.id == id).map(|r| r.id),
        None => active.first().map(|r| r.id),
    }
}

fn form_options() -> FormOptions {
    FormOptions {
        time_diff: to_strings(prediction::TIME_DIFF_BANDS),
        classified_drivers: to_strings(prediction::CLASSIFIED_BANDS),
        teams_with_points: (prediction::TEAMS_WITH_POINTS_MIN
            ..=prediction::TEAMS_WITH_POINTS_MAX)
            .collect(),
        yes_no: to_strings(prediction::YES_NO),
    }
}

fn to_strings(options: &[&str]) -> Vec<String> {
    options.iter().map(|o| ToString::to_string(o)).collect()
}
