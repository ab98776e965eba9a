use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::shared::{clean_options, options_from_json};
use crate::error::AppError;

#[derive(Deserialize, utoipa::ToSchema)]
pub struct CreateQuestionRequest {
    pub question: String,
    pub options: Vec<String>,
}

#[derive(Deserialize, Default, PartialEq, utoipa::ToSchema)]
pub struct UpdateQuestionRequest {
    pub question: Option<String>,
    pub options: Option<Vec<String>>,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct QuestionResponse {
    pub id: i32,
    pub race_id: i32,
    pub question: String,
    pub options: Vec<String>,
    pub created_at: DateTime<Utc>,
}

impl From<crate::entity::question::Model> for QuestionResponse {
    fn from(m: crate::entity::question::Model) -> Self {
        Self {
            id: m.id,
            race_id: m.race_id,
            question: m.prompt,
            options: options_from_json(&m.options),
            created_at: m.created_at,
        }
    }
}

pub fn validate_prompt(prompt: &str) -> Result<(), AppError> {
    let prompt = prompt.trim();
    if prompt.is_empty() || prompt.chars().count() > 512 {
        return Err(AppError::Validation(
            "Question must be 1-512 characters".into(),
        ));
    }
    Ok(())
}

/// Trim the options and require at least two of them.
pub fn validate_options(raw: &[String]) -> Result<Vec<String>, AppError> {
    let options = clean_options(raw);
    if options.len() < 2 {
        return Err(AppError::Validation(
            "A question needs at least two answer options".into(),
        ));
    }
    Ok(options)
}
