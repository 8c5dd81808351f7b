use chrono::NaiveDate;
use thiserror::Error;

/// Calendar format accepted for every date field and query parameter.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Why a raw value was rejected.
///
/// Every variant renders with the `Validation Error` prefix so callers and logs can
/// tell it apart from storage or I/O failures without inspecting the type.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Validation Error: {field} cannot be empty")]
    Empty { field: &'static str },

    #[error("Validation Error: invalid {field} format")]
    Malformed { field: &'static str },

    #[error("Validation Error: {field} {constraint}")]
    OutOfRange {
        field: &'static str,
        constraint: &'static str,
    },

    #[error("Validation Error: invalid 'n' parameter for total records")]
    InvalidLimit,

    #[error("Validation Error: invalid start_date")]
    InvalidStartDate,

    #[error("Validation Error: invalid end_date")]
    InvalidEndDate,
}

/// Parse a non-negative monetary amount (unit price or shipping cost).
pub fn parse_price(raw: &str) -> Result<f64, ValidationError> {
    let price = parse_decimal(raw, "price")?;
    if price < 0.0 {
        return Err(ValidationError::OutOfRange {
            field: "price",
            constraint: "cannot be negative",
        });
    }
    Ok(price)
}

/// Parse a strictly positive quantity.
pub fn parse_quantity(raw: &str) -> Result<i64, ValidationError> {
    let raw = non_empty(raw, "quantity")?;
    let quantity: i64 = raw
        .parse()
        .map_err(|_| ValidationError::Malformed { field: "quantity" })?;
    if quantity <= 0 {
        return Err(ValidationError::OutOfRange {
            field: "quantity",
            constraint: "must be greater than zero",
        });
    }
    Ok(quantity)
}

/// Parse a discount fraction in the inclusive range `[0, 1]`.
pub fn parse_discount(raw: &str) -> Result<f64, ValidationError> {
    let discount = parse_decimal(raw, "discount")?;
    if !(0.0..=1.0).contains(&discount) {
        return Err(ValidationError::OutOfRange {
            field: "discount",
            constraint: "must be between 0 and 1",
        });
    }
    Ok(discount)
}

/// Parse a `YYYY-MM-DD` calendar date.
pub fn parse_date(raw: &str) -> Result<NaiveDate, ValidationError> {
    let raw = non_empty(raw, "date")?;
    parse_calendar_date(raw).ok_or(ValidationError::Malformed { field: "date" })
}

/// Strict `YYYY-MM-DD` parse: exactly ten characters with dashes at fixed positions.
///
/// chrono alone would also take single-digit months and days.
pub(crate) fn parse_calendar_date(raw: &str) -> Option<NaiveDate> {
    let bytes = raw.as_bytes();
    if bytes.len() != 10 || bytes[4] != b'-' || bytes[7] != b'-' {
        return None;
    }
    if !bytes
        .iter()
        .enumerate()
        .all(|(i, b)| i == 4 || i == 7 || b.is_ascii_digit())
    {
        return None;
    }
    NaiveDate::parse_from_str(raw, DATE_FORMAT).ok()
}

fn parse_decimal(raw: &str, field: &'static str) -> Result<f64, ValidationError> {
    let raw = non_empty(raw, field)?;
    match raw.parse::<f64>() {
        // "inf" and "NaN" parse as floats but are not decimal numbers
        Ok(value) if value.is_finite() => Ok(value),
        _ => Err(ValidationError::Malformed { field }),
    }
}

fn non_empty<'a>(raw: &'a str, field: &'static str) -> Result<&'a str, ValidationError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::Empty { field });
    }
    Ok(trimmed)
}
