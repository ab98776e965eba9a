use chrono::{DateTime, Utc};
use thiserror::Error;

/// Timestamp format used in the confirmation CSV and mail body.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
    #[error("csv output was not valid utf-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

/// Build the confirmation CSV for one prediction.
///
/// Shape: a `Category,Answer` header, a name row, a submission-timestamp
/// row, one blank separator row, then one row per prediction category in
/// insertion order.
pub fn prediction_csv(
    user_name: &str,
    submitted_at: DateTime<Utc>,
    rows: &[(String, String)],
) -> Result<String, ExportError> {
    let mut wtr = csv::WriterBuilder::new()
        .flexible(true)
        .from_writer(Vec::new());

    wtr.write_record(["Category", "Answer"])?;
    wtr.write_record(["Name", user_name])?;
    wtr.write_record([
        "Submitted at",
        &submitted_at.format(TIMESTAMP_FORMAT).to_string(),
    ])?;
    wtr.write_record([""])?;
    for (category, answer) in rows {
        wtr.write_record([category, answer])?;
    }

    let bytes = wtr.into_inner().map_err(|e| ExportError::Csv(e.into_error().into()))?;
    Ok(String::from_utf8(bytes)?)
}

/// Parse a confirmation CSV back into its category/answer pairs, skipping
/// the header, the name/timestamp prefix rows and the blank separator.
pub fn parse_prediction_csv(data: &str) -> Result<Vec<(String, String)>, ExportError> {
    let mut rdr = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(data.as_bytes());

    let mut rows = Vec::new();
    for record in rdr.records() {
        let record = record?;
        match record.get(0) {
            None | Some("") | Some("Name") | Some("Submitted at") => continue,
            Some(category) => rows.push((
                category.to_string(),
                record.get(1).unwrap_or_default().to_string(),
            )),
        }
    }
    Ok(rows)
}

/// Attachment filename for a confirmation CSV: the user name with
/// whitespace collapsed to underscores plus a second-resolution timestamp.
pub fn attachment_filename(user_name: &str, submitted_at: DateTime<Utc>) -> String {
    let slug: String = user_name
        .trim()
        .chars()
        .map(|c| if c.is_whitespace() { '_' } else { c })
        .collect();
    format!(
        "predictions_{}_{}.csv",
        slug,
        submitted_at.format("%Y%m%d_%H%M%S")
    )
}
