use chrono::NaiveDate;
use serde::Serialize;

use crate::validate::{ValidationError, parse_calendar_date};

/// Validated parameters shared by every top-N query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ReportWindow {
    /// Row limit, applied globally or per group depending on the query.
    pub limit: u64,
    /// Inclusive lower bound on the order date.
    pub start_date: NaiveDate,
    /// Inclusive upper bound on the order date.
    pub end_date: NaiveDate,
}

/// Validate the raw `n`, `start_date` and `end_date` query parameters.
///
/// Checks run in that order and the first failure is returned as-is.
pub fn validate_report_params(
    limit: &str,
    start_date: &str,
    end_date: &str,
) -> Result<ReportWindow, ValidationError> {
    let limit = match limit.parse::<i64>() {
        Ok(n) if n > 0 => n as u64,
        _ => return Err(ValidationError::InvalidLimit),
    };
    let start_date = parse_calendar_date(start_date).ok_or(ValidationError::InvalidStartDate)?;
    let end_date = parse_calendar_date(end_date).ok_or(ValidationError::InvalidEndDate)?;

    Ok(ReportWindow {
        limit,
        start_date,
        end_date,
    })
}
