use chrono::{DateTime, Utc};
use common::prediction::{self, PredictionSet, label_extra_answers};
use serde::{Deserialize, Serialize};

use super::shared::{extras_from_json, validate_name, validate_pick_fields};
use crate::entity::submission;
use crate::error::AppError;

#[derive(Deserialize, utoipa::ToSchema)]
pub struct CreateSubmissionRequest {
    pub user_name: String,
    /// Explicit race pick; defaults to the first active race.
    pub race_id: Option<i32>,
    pub podium_1: String,
    pub podium_2: String,
    pub podium_3: String,
    pub time_diff: String,
    pub driver_of_day: String,
    /// Yes/No option label, coerced to a flag at this boundary.
    pub safety_car: String,
    pub red_flag: String,
    pub classified_drivers: String,
    pub teams_with_points: i32,
    /// Extra answers in question order; keyed positionally on storage.
    #[serde(default)]
    pub extra_answers: Vec<String>,
}

/// Where an accepted submission ended up.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum SubmissionSink {
    Database,
    Email,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct CategoryAnswer {
    pub category: String,
    pub answer: String,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct CreateSubmissionResponse {
    /// Store row id; absent when the submission went out by mail.
    pub id: Option<i32>,
    pub race_id: Option<i32>,
    pub sink: SubmissionSink,
    /// Echo of the saved answers, category by category.
    pub summary: Vec<CategoryAnswer>,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct SubmissionResponse {
    pub id: i32,
    pub race_id: i32,
    pub user_name: String,
    pub prediction: PredictionSet,
    pub created_at: DateTime<Utc>,
}

impl From<submission::Model> for SubmissionResponse {
    fn from(m: submission::Model) -> Self {
        let prediction = prediction_set(&m);
        Self {
            id: m.id,
            race_id: m.race_id,
            user_name: m.user_name,
            prediction,
            created_at: m.created_at,
        }
    }
}

/// Stored row -> the scoring record.
pub fn prediction_set(m: &submission::Model) -> PredictionSet {
    PredictionSet {
        podium_1: m.podium_1.clone(),
        podium_2: m.podium_2.clone(),
        podium_3: m.podium_3.clone(),
        time_diff: m.time_diff.clone(),
        driver_of_day: m.driver_of_day.clone(),
        safety_car: m.safety_car,
        red_flag: m.red_flag,
        classified_drivers: m.classified_drivers.clone(),
        teams_with_points: m.teams_with_points,
        extra_answers: extras_from_json(&m.extra_answers),
    }
}

/// Request -> the scoring record, labels coerced and extras keyed
/// positionally.
pub fn prediction_from_request(req: &CreateSubmissionRequest) -> PredictionSet {
    PredictionSet {
        podium_1: req.podium_1.trim().to_string(),
        podium_2: req.podium_2.trim().to_string(),
        podium_3: req.podium_3.trim().to_string(),
        time_diff: req.time_diff.clone(),
        driver_of_day: req.driver_of_day.trim().to_string(),
        safety_car: prediction::flag_from_label(&req.safety_car),
        red_flag: prediction::flag_from_label(&req.red_flag),
        classified_drivers: req.classified_drivers.clone(),
        teams_with_points: req.teams_with_points,
        extra_answers: label_extra_answers(req.extra_answers.iter().map(|a| a.trim().to_string())),
    }
}

pub fn summary_rows(prediction: &PredictionSet) -> Vec<CategoryAnswer> {
    prediction
        .category_rows()
        .into_iter()
        .map(|(category, answer)| CategoryAnswer { category, answer })
        .collect()
}

pub fn validate_create_submission(req: &CreateSubmissionRequest) -> Result<(), AppError> {
    if req.user_name.trim().is_empty() {
        return Err(AppError::Validation("Name must not be empty".into()));
    }
    validate_name(&req.user_name, "Name")?;
    validate_pick_fields(
        [&req.podium_1, &req.podium_2, &req.podium_3],
        &req.driver_of_day,
        &req.time_diff,
        &req.safety_car,
        &req.red_flag,
        &req.classified_drivers,
        req.teams_with_points,
    )
}
