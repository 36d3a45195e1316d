// Date parsing and formatting utilities
// Author: Gabriel Demetrios Lafis

use chrono::{NaiveDate, NaiveDateTime};

use super::{PipelineError, PipelineResult};

/// Parse a string into a date using an explicit chrono format string
///
/// A date-only format is accepted and resolves to midnight.
pub fn parse_date(text: &str, format: &str) -> PipelineResult<NaiveDateTime> {
    if let Ok(datetime) = NaiveDateTime::parse_from_str(text, format) {
        return Ok(datetime);
    }

    match NaiveDate::parse_from_str(text, format) {
        Ok(date) => Ok(date.and_hms_opt(0, 0, 0).unwrap()),
        Err(err) => Err(PipelineError::ParseError(
            format!("cannot parse '{}' with format '{}': {}", text, format, err)
        )),
    }
}

/// Format a date using an explicit chrono format string
pub fn format_date(date: &NaiveDateTime, format: &str) -> String {
    date.format(format).to_string()
}
