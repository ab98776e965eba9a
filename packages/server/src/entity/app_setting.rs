use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Key/value application settings. Only `app_description` is recognized.
#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "app_setting")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub key: String,

    pub value: String,
}

impl ActiveModelBehavior for ActiveModel {}
