use serde::{Deserialize, Serialize};

/// One extra question: a free-text prompt and its answer options (>= 2).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct QuestionDef {
    pub question: String,
    pub options: Vec<String>,
}

impl QuestionDef {
    pub fn new(question: impl Into<String>, options: &[&str]) -> Self {
        Self {
            question: question.into(),
            options: options.iter().map(|o| o.to_string()).collect(),
        }
    }
}

/// Built-in question pair used when no other source resolves.
pub fn default_questions() -> Vec<QuestionDef> {
    vec![
        QuestionDef::new(
            "Will the fastest-lap bonus point go to a driver in the top ten?",
            &["Yes", "No"],
        ),
        QuestionDef::new(
            "Which team will score more points?",
            &["Red Bull", "Ferrari", "Mercedes", "McLaren", "Other"],
        ),
    ]
}
