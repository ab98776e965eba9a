use common::QuestionDef;
use serde::{Deserialize, Serialize};

use super::race::ActiveRaceResponse;

#[derive(Deserialize, utoipa::IntoParams)]
pub struct FormQuery {
    /// Race to preselect; must be active to take effect.
    pub race_id: Option<i32>,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct TeamDrivers {
    pub team: String,
    pub drivers: Vec<String>,
}

/// The fixed option lists the form renders.
#[derive(Serialize, utoipa::ToSchema)]
pub struct FormOptions {
    pub time_diff: Vec<String>,
    pub classified_drivers: Vec<String>,
    pub teams_with_points: Vec<i32>,
    pub yes_no: Vec<String>,
}

/// Everything a client needs to render the prediction form.
#[derive(Serialize, utoipa::ToSchema)]
pub struct FormContextResponse {
    pub description: String,
    pub active_races: Vec<ActiveRaceResponse>,
    /// The race predictions will be recorded against, when resolvable.
    pub selected_race_id: Option<i32>,
    pub grid: Vec<TeamDrivers>,
    pub options: FormOptions,
    /// Extra questions resolved for the selected race.
    pub questions: Vec<QuestionDef>,
}
