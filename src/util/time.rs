//! Date parsing utilities.
//!
//! Record dates (start dates, due dates, completion dates) are plain
//! calendar dates in the `YYYY-MM-DD` form the record store uses.

use crate::error::{Result, SprintError};
use chrono::{Duration, Local, NaiveDate};

/// Today's date in the local timezone.
#[must_use]
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Parse a flexible date specification into a `NaiveDate`.
///
/// Supports:
/// - Plain date: `2024-06-01`
/// - Relative duration: `+3d`, `+2w`
/// - Keywords: `today`, `tomorrow`, `next-week`
///
/// # Errors
///
/// Returns a validation error naming `field_name` if the format is
/// unrecognized or the relative unit is not `d` or `w`.
pub fn parse_date(s: &str, field_name: &str) -> Result<NaiveDate> {
    let s = s.trim();

    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Ok(date);
    }

    if let Some(rest) = s.strip_prefix('+') {
        if let Some(unit_char) = rest.chars().last() {
            let amount_str = &rest[..rest.len() - 1];
            if let Ok(amount) = amount_str.parse::<i64>() {
                let duration = match unit_char {
                    'd' => Duration::days(amount),
                    'w' => Duration::weeks(amount),
                    _ => {
                        return Err(SprintError::validation(
                            field_name,
                            "invalid unit (use d or w)",
                        ));
                    }
                };
                return Ok(today() + duration);
            }
        }
    }

    match s.to_lowercase().as_str() {
        "today" => Ok(today()),
        "tomorrow" => Ok(today() + Duration::days(1)),
        "next-week" | "nextweek" => Ok(today() + Duration::weeks(1)),
        _ => Err(SprintError::validation(
            field_name,
            "invalid date format (try: 2024-06-01, +3d, +2w, today, tomorrow)",
        )),
    }
}
