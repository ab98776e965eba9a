/// Build a safe CSV export filename from a race name.
///
/// Whitespace becomes underscores; control characters, quotes and path
/// separators are dropped to keep the Content-Disposition header clean.
pub fn export_filename(race_name: &str, suffix: &str) -> String {
    let slug: String = race_name
        .trim()
        .chars()
        .filter(|c| !c.is_ascii_control() && !matches!(c, '/' | '\\' | '"'))
        .map(|c| if c.is_whitespace() { '_' } else { c })
        .collect();

    if slug.is_empty() {
        format!("race_{suffix}.csv")
    } else {
        format!("{slug}_{suffix}.csv")
    }
}
