use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "question")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub prompt: String,
    /// Answer options stored as a JSON array of strings (>= 2 entries).
    #[sea_orm(column_type = "JsonBinary")]
    pub options: serde_json::Value,

    pub race_id: i32,
    #[sea_orm(belongs_to, from = "race_id", to = "id")]
    pub race: HasOne<super::race::Entity>,

    pub created_at: DateTimeUtc,
}

impl ActiveModelBehavior for ActiveModel {}
