use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::resolve::DescriptionSource;

#[derive(Serialize, utoipa::ToSchema)]
pub struct SettingsResponse {
    pub description: String,
    /// Which override layer the description came from.
    pub source: DescriptionSource,
}

#[derive(Deserialize, utoipa::ToSchema)]
pub struct UpdateSettingsRequest {
    pub description: String,
}

/// Where the settings write landed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum SettingsSink {
    Database,
    File,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct UpdateSettingsResponse {
    pub description: String,
    pub saved_to: SettingsSink,
}

pub fn validate_update_settings(req: &UpdateSettingsRequest) -> Result<(), AppError> {
    let description = req.description.trim();
    if description.is_empty() || description.len() > 4096 {
        return Err(AppError::Validation(
            "Description must be non-empty and at most 4096 bytes".into(),
        ));
    }
    Ok(())
}
