//! calendar helpers shared by the amortization engine
//!
//! month arithmetic works on an absolute month index (`year * 12 + month0`)
//! so that every date in the same calendar month maps to the same key.

use chrono::{Datelike, NaiveDate};
use hourglass_rs::SafeTimeProvider;

use crate::errors::{FinanceError, Result};

/// absolute month index, `year * 12 + (month - 1)`
pub fn month_index(date: NaiveDate) -> i64 {
    date.year() as i64 * 12 + date.month0() as i64
}

/// whole months from `from` to `to`, ignoring day-of-month, clamped at zero
pub fn elapsed_months(from: NaiveDate, to: NaiveDate) -> u32 {
    let diff = month_index(to) - month_index(from);
    diff.max(0) as u32
}

/// parse a strict `yyyy-mm-dd` date
pub fn parse_iso_date(s: &str) -> Result<NaiveDate> {
    let trimmed = s.trim();
    if trimmed.len() != 10 {
        return Err(FinanceError::InvalidDate {
            message: format!("expected yyyy-mm-dd, got {s:?}"),
        });
    }
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d").map_err(|e| FinanceError::InvalidDate {
        message: format!("{s:?}: {e}"),
    })
}

/// read the current date once from the injected time source
pub fn today(time_provider: &SafeTimeProvider) -> NaiveDate {
    time_provider.now().date_naive()
}
