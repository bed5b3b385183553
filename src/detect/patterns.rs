//! value classification for decimal separators and date formats

use std::sync::OnceLock;

use regex::Regex;

use super::{DateFormat, DecimalSeparator};

// 1234.56, -1,234.5
fn dot_decimal_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[-+]?(?:\d{1,3}(?:,\d{3})+|\d+)\.\d{1,2}$").expect("dot decimal regex"))
}

// 1234,56, -1.234,5, 1 234,50
fn comma_decimal_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[-+]?(?:\d{1,3}(?:[.\s]\d{3})+|\d+),\d{1,2}$").expect("comma decimal regex"))
}

fn day_month_year_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\d{2}\.\d{2}\.\d{4}$").expect("dd.mm.yyyy regex"))
}

fn iso_date_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").expect("iso date regex"))
}

/// strip surrounding whitespace and quotes from a raw cell
pub fn clean_cell(cell: &str) -> &str {
    cell.trim().trim_matches('"').trim()
}

/// classified value counts over a set of cells
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ValueScores {
    pub dot_decimal: usize,
    pub comma_decimal: usize,
    pub day_month_year: usize,
    pub iso_date: usize,
}

impl ValueScores {
    pub fn tally<'a, I>(cells: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut scores = Self::default();
        for cell in cells.into_iter().map(clean_cell).filter(|c| !c.is_empty()) {
            if dot_decimal_re().is_match(cell) {
                scores.dot_decimal += 1;
            } else if comma_decimal_re().is_match(cell) {
                scores.comma_decimal += 1;
            } else if day_month_year_re().is_match(cell) {
                scores.day_month_year += 1;
            } else if iso_date_re().is_match(cell) {
                scores.iso_date += 1;
            }
        }
        scores
    }

    /// comma wins ties
    pub fn decimal_separator(&self) -> (DecimalSeparator, bool) {
        let separator = if self.dot_decimal > self.comma_decimal {
            DecimalSeparator::Dot
        } else {
            DecimalSeparator::Comma
        };
        (separator, self.dot_decimal != self.comma_decimal)
    }

    /// dd.mm.yyyy wins ties; unknown when nothing looks like a date
    pub fn date_format(&self) -> (DateFormat, bool) {
        if self.day_month_year == 0 && self.iso_date == 0 {
            return (DateFormat::Unknown, false);
        }
        let format = if self.iso_date > self.day_month_year {
            DateFormat::IsoDate
        } else {
            DateFormat::DayMonthYear
        };
        (format, self.iso_date != self.day_month_year)
    }
}
