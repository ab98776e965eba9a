pub mod drivers;
pub mod export;
pub mod prediction;
pub mod questions;
pub mod scoring;

pub use prediction::PredictionSet;
pub use questions::QuestionDef;
pub use scoring::{Score, competition_ranks, max_score, score_prediction};
