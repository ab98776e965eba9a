use chrono::{DateTime, Utc};
use common::prediction::{self, PredictionSet, label_extra_answers};
use serde::{Deserialize, Serialize};

use super::shared::{extras_from_json, validate_pick_fields};
use crate::entity::race_result;
use crate::error::AppError;

/// Official result for a race: the same pick shape as a submission.
/// Creates on first write, edits in place thereafter.
#[derive(Deserialize, utoipa::ToSchema)]
pub struct UpsertResultRequest {
    pub podium_1: String,
    pub podium_2: String,
    pub podium_3: String,
    pub time_diff: String,
    pub driver_of_day: String,
    pub safety_car: String,
    pub red_flag: String,
    pub classified_drivers: String,
    pub teams_with_points: i32,
    /// Answers to the race's extra questions, in question order.
    #[serde(default)]
    pub extra_answers: Vec<String>,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct ResultResponse {
    pub id: i32,
    pub race_id: i32,
    pub result: PredictionSet,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<race_result::Model> for ResultResponse {
    fn from(m: race_result::Model) -> Self {
        let result = prediction_set(&m);
        Self {
            id: m.id,
            race_id: m.race_id,
            result,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}

/// Stored row -> the scoring record.
pub fn prediction_set(m: &race_result::Model) -> PredictionSet {
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

pub fn prediction_from_request(req: &UpsertResultRequest) -> PredictionSet {
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

pub fn validate_upsert_result(req: &UpsertResultRequest) -> Result<(), AppError> {
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
