use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// One participant's picks for one race. Immutable once stored.
#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "submission")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub user_name: String,
    pub podium_1: String,
    pub podium_2: String,
    pub podium_3: String,
    pub time_diff: String,
    pub driver_of_day: String,
    pub safety_car: bool,
    pub red_flag: bool,
    pub classified_drivers: String,
    pub teams_with_points: i32,
    /// Extra answers stored as a JSON object keyed by positional label
    /// ("Extra question N").
    #[sea_orm(column_type = "JsonBinary")]
    pub extra_answers: serde_json::Value,

    pub race_id: i32,
    #[sea_orm(belongs_to, from = "race_id", to = "id")]
    pub race: HasOne<super::race::Entity>,

    pub created_at: DateTimeUtc,
}

impl ActiveModelBehavior for ActiveModel {}
