use serde::Serialize;

use crate::prediction::PredictionSet;

/// Points awarded on top of three correct podium picks.
const PODIUM_BONUS: u32 = 1;

/// Score for one submission against one result: the total plus an ordered
/// list naming every earned point.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, utoipa::ToSchema)]
pub struct Score {
    pub total: u32,
    pub details: Vec<String>,
}

/// Maximum attainable score for a race with `extra_questions` extras:
/// 4 for the podium (three positions + bonus) and 1 each for the six
/// remaining fixed categories.
pub fn max_score(extra_questions: usize) -> u32 {
    4 + 6 + extra_questions as u32
}

/// Compare a submission against the official result.
///
/// Purely positional equality per category; extra answers count only when
/// the same label exists on both sides with an equal value. Deterministic:
/// identical inputs always produce the identical total and detail list.
pub fn score_prediction(result: &PredictionSet, submission: &PredictionSet) -> Score {
    let mut total = 0;
    let mut details = Vec::new();

    let mut podium = 0;
    if submission.podium_1 == result.podium_1 {
        podium += 1;
        details.push("1 pt for 1st place".to_string());
    }
    if submission.podium_2 == result.podium_2 {
        podium += 1;
        details.push("1 pt for 2nd place".to_string());
    }
    if submission.podium_3 == result.podium_3 {
        podium += 1;
        details.push("1 pt for 3rd place".to_string());
    }
    if podium == 3 {
        podium += PODIUM_BONUS;
        details.push("1 pt full podium bonus".to_string());
    }
    total += podium;

    if submission.time_diff == result.time_diff {
        total += 1;
        details.push("1 pt for time difference".to_string());
    }
    if submission.driver_of_day == result.driver_of_day {
        total += 1;
        details.push("1 pt for driver of the day".to_string());
    }
    if submission.safety_car == result.safety_car {
        total += 1;
        details.push("1 pt for safety car".to_string());
    }
    if submission.red_flag == result.red_flag {
        total += 1;
        details.push("1 pt for red flag".to_string());
    }
    if submission.classified_drivers == result.classified_drivers {
        total += 1;
        details.push("1 pt for classified drivers".to_string());
    }
    if submission.teams_with_points == result.teams_with_points {
        total += 1;
        details.push("1 pt for teams with points".to_string());
    }

    for (label, answer) in &submission.extra_answers {
        if result.extra_answers.get(label) == Some(answer) {
            total += 1;
            details.push(format!("1 pt for {label}"));
        }
    }

    Score { total, details }
}

/// Standard competition ranking: ties share the best rank, the next
/// distinct total continues at (number of better-or-equal entries) + 1.
/// `[7, 7, 5]` ranks as `[1, 1, 3]`.
pub fn competition_ranks(totals: &[u32]) -> Vec<u32> {
    totals
        .iter()
        .map(|t| totals.iter().filter(|other| **other > *t).count() as u32 + 1)
        .collect()
}
