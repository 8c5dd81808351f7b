use sales_common::{ReportWindow, ValidationError, validate_report_params};
use serde::Deserialize;

/// Query parameters shared by every top-products endpoint.
///
/// Fields are kept as raw strings so that a missing or malformed value surfaces as
/// a `VALIDATION_ERROR` body rather than an extractor rejection.
#[derive(Debug, Deserialize, utoipa::IntoParams)]
pub struct TopProductsQuery {
    /// Row limit; applied per group for the grouped endpoints. Positive integer.
    #[param(example = "5")]
    pub n: Option<String>,
    /// Inclusive lower bound, `YYYY-MM-DD`.
    #[param(example = "2024-01-01")]
    pub start_date: Option<String>,
    /// Inclusive upper bound, `YYYY-MM-DD`.
    #[param(example = "2024-12-31")]
    pub end_date: Option<String>,
}

impl TopProductsQuery {
    /// Validate `n`, then `start_date`, then `end_date`. Missing values count as empty.
    pub fn window(&self) -> Result<ReportWindow, ValidationError> {
        validate_report_params(
            self.n.as_deref().unwrap_or_default(),
            self.start_date.as_deref().unwrap_or_default(),
            self.end_date.as_deref().unwrap_or_default(),
        )
    }
}
