use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::shared::validate_name;
use crate::error::AppError;

#[derive(Deserialize, utoipa::ToSchema)]
pub struct CreateRaceRequest {
    pub name: String,
    pub race_date: NaiveDate,
    pub submission_deadline: DateTime<Utc>,
    /// Defaults to true: a new race opens for predictions immediately.
    pub is_active: Option<bool>,
}

#[derive(Deserialize, Default, PartialEq, utoipa::ToSchema)]
pub struct UpdateRaceRequest {
    pub name: Option<String>,
    pub race_date: Option<NaiveDate>,
    pub submission_deadline: Option<DateTime<Utc>>,
    pub is_active: Option<bool>,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct RaceResponse {
    pub id: i32,
    pub name: String,
    pub race_date: NaiveDate,
    pub submission_deadline: DateTime<Utc>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl From<crate::entity::race::Model> for RaceResponse {
    fn from(m: crate::entity::race::Model) -> Self {
        Self {
            id: m.id,
            name: m.name,
            race_date: m.race_date,
            submission_deadline: m.submission_deadline,
            is_active: m.is_active,
            created_at: m.created_at,
        }
    }
}

/// Race entry shown to participants, with the deadline evaluated against
/// wall-clock now. A passed deadline is informational only.
#[derive(Serialize, utoipa::ToSchema)]
pub struct ActiveRaceResponse {
    pub id: i32,
    pub name: String,
    pub race_date: NaiveDate,
    pub submission_deadline: DateTime<Utc>,
    pub deadline_passed: bool,
}

impl ActiveRaceResponse {
    pub fn from_model(m: &crate::entity::race::Model, now: DateTime<Utc>) -> Self {
        Self {
            id: m.id,
            name: m.name.clone(),
            race_date: m.race_date,
            submission_deadline: m.submission_deadline,
            deadline_passed: now > m.submission_deadline,
        }
    }
}

pub fn validate_create_race(req: &CreateRaceRequest) -> Result<(), AppError> {
    validate_name(&req.name, "Race name")
}

pub fn validate_update_race(req: &UpdateRaceRequest) -> Result<(), AppError> {
    if let Some(ref name) = req.name {
        validate_name(name, "Race name")?;
    }
    Ok(())
}
