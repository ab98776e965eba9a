use std::collections::BTreeMap;

use common::{drivers, prediction};

use crate::error::AppError;

/// Validate a trimmed display name (1-64 Unicode characters).
pub fn validate_name(name: &str, what: &str) -> Result<(), AppError> {
    let name = name.trim();
    if name.is_empty() || name.chars().count() > 64 {
        return Err(AppError::Validation(format!("{what} must be 1-64 characters")));
    }
    Ok(())
}

/// Validate the fixed pick fields shared by submissions and results.
///
/// Drivers must be on the grid, the podium must name three different
/// drivers, band answers must come from their option lists, flags must use
/// the Yes/No labels and the team count must fall in range.
pub fn validate_pick_fields(
    podium: [&str; 3],
    driver_of_day: &str,
    time_diff: &str,
    safety_car: &str,
    red_flag: &str,
    classified_drivers: &str,
    teams_with_points: i32,
) -> Result<(), AppError> {
    for pick in podium.iter().chain([&driver_of_day]) {
        let pick = pick.trim();
        if !drivers::is_on_grid(pick) {
            return Err(AppError::Validation(format!("'{pick}' is not on the grid")));
        }
    }

    let [p1, p2, p3] = podium.map(str::trim);
    if p1 == p2 || p1 == p3 || p2 == p3 {
        return Err(AppError::Validation(
            "Podium picks must name three different drivers".into(),
        ));
    }

    if !prediction::TIME_DIFF_BANDS.contains(&time_diff) {
        return Err(AppError::Validation(
            "time_diff must be one of the listed bands".into(),
        ));
    }
    if !prediction::CLASSIFIED_BANDS.contains(&classified_drivers) {
        return Err(AppError::Validation(
            "classified_drivers must be one of the listed bands".into(),
        ));
    }
    for (field, value) in [("safety_car", safety_car), ("red_flag", red_flag)] {
        if !prediction::YES_NO.contains(&value) {
            return Err(AppError::Validation(format!(
                "{field} must be '{}' or '{}'",
                prediction::YES,
                prediction::NO
            )));
        }
    }
    if !(prediction::TEAMS_WITH_POINTS_MIN..=prediction::TEAMS_WITH_POINTS_MAX)
        .contains(&teams_with_points)
    {
        return Err(AppError::Validation(format!(
            "teams_with_points must be between {} and {}",
            prediction::TEAMS_WITH_POINTS_MIN,
            prediction::TEAMS_WITH_POINTS_MAX
        )));
    }

    Ok(())
}

/// Extra-answer JSON column -> label map. Malformed data degrades to empty.
pub fn extras_from_json(value: &serde_json::Value) -> BTreeMap<String, String> {
    serde_json::from_value(value.clone()).unwrap_or_default()
}

/// Label map -> JSON column value.
pub fn extras_to_json(extras: &BTreeMap<String, String>) -> serde_json::Value {
    serde_json::to_value(extras).unwrap_or_else(|_| serde_json::Value::Object(Default::default()))
}

/// Options JSON column -> string list. Malformed data degrades to empty.
pub fn options_from_json(value: &serde_json::Value) -> Vec<String> {
    serde_json::from_value(value.clone()).unwrap_or_default()
}

/// Option list -> JSON column value.
pub fn options_to_json(options: &[String]) -> serde_json::Value {
    serde_json::to_value(options).unwrap_or_else(|_| serde_json::Value::Array(Default::default()))
}

/// Trim option strings and drop empties; order is preserved.
pub fn clean_options(raw: &[String]) -> Vec<String> {
    raw.iter()
        .map(|o| o.trim().to_string())
        .filter(|o| !o.is_empty())
        .collect()
}
