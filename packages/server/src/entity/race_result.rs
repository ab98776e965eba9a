use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Admin-entered ground truth for one race. Same pick shape as a
/// submission; at most one row per race, edited in place.
#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "race_result")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    #[sea_orm(unique)]
    pub race_id: i32,
    #[sea_orm(belongs_to, from = "race_id", to = "id")]
    pub race: HasOne<super::race::Entity>,

    pub podium_1: String,
    pub podium_2: String,
    pub podium_3: String,
    pub time_diff: String,
    pub driver_of_day: String,
    pub safety_car: bool,
    pub red_flag: bool,
    pub classified_drivers: String,
    pub teams_with_points: i32,
    /// Keyed identically to the submissions it is compared against.
    #[sea_orm(column_type = "JsonBinary")]
    pub extra_answers: serde_json::Value,

    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

impl ActiveModelBehavior for ActiveModel {}
