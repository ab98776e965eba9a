use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Option label clients send for an affirmative answer.
pub const YES: &str = "Yes";
/// Option label clients send for a negative answer.
pub const NO: &str = "No";

/// The two-option list used by the yes/no questions.
pub const YES_NO: &[&str] = &[YES, NO];

/// Bands for the gap between first and second place.
pub const TIME_DIFF_BANDS: &[&str] = &[
    "Under 2 seconds",
    "2.001-5 seconds",
    "5.001-10 seconds",
    "10.001-20 seconds",
    "Over 20 seconds",
];

/// Bands for the number of classified drivers.
pub const CLASSIFIED_BANDS: &[&str] = &["20", "19-18", "17-16", "15-14", "Fewer than 14"];

/// Inclusive range of valid teams-with-points answers.
pub const TEAMS_WITH_POINTS_MIN: i32 = 5;
pub const TEAMS_WITH_POINTS_MAX: i32 = 10;

/// Coerce a yes/no option label to a flag. Anything but the yes label is `false`.
pub fn flag_from_label(label: &str) -> bool {
    label == YES
}

/// Render a stored flag back to its option label.
pub fn flag_label(value: bool) -> &'static str {
    if value { YES } else { NO }
}

/// Positional key for the n-th extra question (0-based index, 1-based label).
///
/// Submissions and results both key their extra-answer maps with these
/// labels; a pair scores only when the labels line up exactly.
pub fn extra_label(index: usize) -> String {
    format!("Extra question {}", index + 1)
}

/// Assign positional labels to an ordered list of extra answers.
pub fn label_extra_answers<I, S>(answers: I) -> BTreeMap<String, String>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    answers
        .into_iter()
        .enumerate()
        .map(|(i, answer)| (extra_label(i), answer.into()))
        .collect()
}

/// One participant's picks for a race, or the official result of one.
///
/// Both sides of the scoring comparison share this shape; storage and
/// transport layers convert into it at their boundaries.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct PredictionSet {
    pub podium_1: String,
    pub podium_2: String,
    pub podium_3: String,
    pub time_diff: String,
    pub driver_of_day: String,
    pub safety_car: bool,
    pub red_flag: bool,
    pub classified_drivers: String,
    pub teams_with_points: i32,
    /// Extra answers keyed by positional label ("Extra question N").
    pub extra_answers: BTreeMap<String, String>,
}

impl PredictionSet {
    /// The three podium picks must name three different drivers.
    pub fn podium_distinct(&self) -> bool {
        self.podium_1 != self.podium_2
            && self.podium_1 != self.podium_3
            && self.podium_2 != self.podium_3
    }

    /// Ordered category/answer rows, as rendered in confirmation mails and
    /// CSV attachments: fixed categories first, then extras in label order.
    pub fn category_rows(&self) -> Vec<(String, String)> {
        let mut rows = vec![
            ("Podium 1st place".to_string(), self.podium_1.clone()),
            ("Podium 2nd place".to_string(), self.podium_2.clone()),
            ("Podium 3rd place".to_string(), self.podium_3.clone()),
            ("Time difference".to_string(), self.time_diff.clone()),
            ("Driver of the day".to_string(), self.driver_of_day.clone()),
            ("Safety car".to_string(), flag_label(self.safety_car).to_string()),
            ("Red flag".to_string(), flag_label(self.red_flag).to_string()),
            (
                "Classified drivers".to_string(),
                self.classified_drivers.clone(),
            ),
            (
                "Teams with points".to_string(),
                self.teams_with_points.to_string(),
            ),
        ];
        rows.extend(
            self.extra_answers
                .iter()
                .map(|(k, v)| (k.clone(), v.clone())),
        );
        rows
    }
}
