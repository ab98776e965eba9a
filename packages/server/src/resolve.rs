//! Fallback-chain resolution for form content.
//!
//! Both chains share the same shape: try each source in order, absorb a
//! failing or empty layer with a warning, and fall through to the next.
//! Nothing is cached; content is resolved fresh per request.

use std::path::Path;

use common::questions::{self, QuestionDef};
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QueryOrder};
use tracing::warn;

use crate::entity::{app_setting, question};
use crate::models::shared::options_from_json;
use crate::state::AppState;

/// Description shown when no override layer resolves.
pub const DEFAULT_DESCRIPTION: &str = "Predict the race results and score points!";

/// Key recognized in the settings file and the `app_setting` table.
pub const DESCRIPTION_KEY: &str = "app_description";

/// Which layer produced the resolved description.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, utoipa::ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum DescriptionSource {
    Database,
    Config,
    File,
    Default,
}

/// Resolve the extra questions for a race.
///
/// Order: question table (when a store and a race id are at hand) ->
/// inline config override -> questions file -> built-in default pair.
pub async fn resolve_questions(state: &AppState, race_id: Option<i32>) -> Vec<QuestionDef> {
    if let (Some(db), Some(race_id)) = (state.db.as_ref(), race_id) {
        match question::Entity::find()
            .filter(question::Column::RaceId.eq(race_id))
            .order_by_asc(question::Column::Id)
            .all(db)
            .await
        {
            Ok(rows) if !rows.is_empty() => {
                return rows
                    .into_iter()
                    .map(|q| QuestionDef {
                        question: q.prompt,
                        options: options_from_json(&q.options),
                    })
                    .collect();
            }
            Ok(_) => {}
            Err(e) => warn!(error = %e, race_id, "Failed to load questions from the store"),
        }
    }

    if let Some(inline) = &state.config.content.questions
        && !inline.is_empty()
    {
        return inline.clone();
    }

    match load_questions_file(&state.config.content.questions_file) {
        Ok(Some(qs)) if !qs.is_empty() => return qs,
        Ok(_) => {}
        Err(e) => warn!(error = %e, "Failed to load the questions file"),
    }

    questions::default_questions()
}

/// Resolve the form description.
///
/// Order: `app_setting` row -> config override -> settings file -> built-in
/// default.
pub async fn resolve_description(state: &AppState) -> (String, DescriptionSource) {
    if let Some(db) = state.db.as_ref() {
        match app_setting::Entity::find_by_id(DESCRIPTION_KEY.to_owned())
            .one(db)
            .await
        {
            Ok(Some(row)) if !row.value.trim().is_empty() => {
                return (row.value, DescriptionSource::Database);
            }
            Ok(_) => {}
            Err(e) => warn!(error = %e, "Failed to load the description from the store"),
        }
    }

    if let Some(description) = &state.config.content.description
        && !description.trim().is_empty()
    {
        return (description.clone(), DescriptionSource::Config);
    }

    match load_settings_file(&state.config.content.settings_file) {
        Ok(Some(description)) => return (description, DescriptionSource::File),
        Ok(None) => {}
        Err(e) => warn!(error = %e, "Failed to load the settings file"),
    }

    (DEFAULT_DESCRIPTION.to_string(), DescriptionSource::Default)
}

fn load_questions_file(path: &Path) -> anyhow::Result<Option<Vec<QuestionDef>>> {
    if !path.exists() {
        return Ok(None);
    }
    let data = std::fs::read_to_string(path)?;
    Ok(Some(serde_json::from_str(&data)?))
}

fn load_settings_file(path: &Path) -> anyhow::Result<Option<String>> {
    if !path.exists() {
        return Ok(None);
    }
    let data = std::fs::read_to_string(path)?;
    let settings: serde_json::Value = serde_json::from_str(&data)?;
    Ok(settings
        .get(DESCRIPTION_KEY)
        .and_then(|v| v.as_str())
        .filter(|s| !s.trim().is_empty())
        .map(str::to_string))
}
