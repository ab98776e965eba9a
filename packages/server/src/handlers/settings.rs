use axum::{Json, extract::State};
use sea_orm::*;
use tracing::{instrument, warn};

use crate::entity::app_setting;
use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AdminToken;
use crate::extractors::json::AppJson;
use crate::models::settings::*;
use crate::resolve::{self, DESCRIPTION_KEY};
use crate::state::AppState;

#[utoipa::path(
    get,
    path = "/api/v1/admin/settings",
    tag = "Settings",
    operation_id = "getSettings",
    summary = "Current form description and the layer it resolved from",
    responses(
        (status = 200, description = "Settings", body = SettingsResponse),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(_admin, state))]
pub async fn get_settings(
    _admin: AdminToken,
    State(state): State<AppState>,
) -> Json<SettingsResponse> {
    let (description, source) = resolve::resolve_description(&state).await;
    Json(SettingsResponse {
        description,
        source,
    })
}

/// Save the form description.
///
/// Prefers the store; a failed or absent store falls back to the settings
/// file, and the response names the sink that took the write.
#[utoipa::path(
    put,
    path = "/api/v1/admin/settings",
    tag = "Settings",
    operation_id = "updateSettings",
    summary = "Update the form description",
    request_body = UpdateSettingsRequest,
    responses(
        (status = 200, description = "Settings saved", body = UpdateSettingsResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 500, description = "Neither sink accepted the write (INTERNAL_ERROR)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(_admin, state, payload))]
pub async fn update_settings(
    _admin: AdminToken,
    State(state): State<AppState>,
    AppJson(payload): AppJson<UpdateSettingsRequest>,
) -> Result<Json<UpdateSettingsResponse>, AppError> {
    validate_update_settings(&payload)?;
    let description = payload.description.trim().to_string();

    if let Some(db) = state.db.as_ref() {
        match upsert_description(db, &description).await {
            Ok(()) => {
                return Ok(Json(UpdateSettingsResponse {
                    description,
                    saved_to: SettingsSink::Database,
                }));
            }
            Err(e) => {
                warn!(error = %e, "Store rejected the settings write; falling back to the file");
            }
        }
    }

    write_settings_file(&state, &description)?;

    Ok(Json(UpdateSettingsResponse {
        description,
        saved_to: SettingsSink::File,
    }))
}

async fn upsert_description(db: &DatabaseConnection, description: &str) -> Result<(), DbErr> {
    let model = app_setting::ActiveModel {
        key: Set(DESCRIPTION_KEY.to_string()),
        value: Set(description.to_string()),
    };

    app_setting::Entity::insert(model)
        .on_conflict(
            sea_orm::sea_query::OnConflict::column(app_setting::Column::Key)
                .update_column(app_setting::Column::Value)
                .to_owned(),
        )
        .exec_without_returning(db)
        .await?;

    Ok(())
}

fn write_settings_file(state: &AppState, description: &str) -> Result<(), AppError> {
    let path = &state.config.content.settings_file;
    let settings = serde_json::json!({ DESCRIPTION_KEY: description });
    let data = serde_json::to_string_pretty(&settings)
        .map_err(|e| AppError::Internal(format!("Settings serialization error: {}", e)))?;

    std::fs::write(path, data).map_err(|e| {
        AppError::Internal(format!(
            "Failed to write the settings file {}: {}",
            path.display(),
            e
        ))
    })
}
