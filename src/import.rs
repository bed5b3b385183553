//! bank statement rows extracted with a detected csv layout

use std::str::FromStr;

use chrono::NaiveDate;
use csv::{ReaderBuilder, StringRecord, Trim};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::DetectorConfig;
use crate::decimal::Money;
use crate::detect::{
    clean_cell, detect_csv_format_with, BankHint, CsvDetectionResult, DateFormat, DecimalSeparator,
};
use crate::errors::{FinanceError, Result};

const DATE_COLUMNS: &[&str] = &["bokføringsdato", "dato", "date"];
const DESCRIPTION_COLUMNS: &[&str] = &[
    "forklaringstekst",
    "beskrivelse",
    "tekst",
    "tittel",
    "description",
    "text",
    "navn",
];
const AMOUNT_COLUMNS: &[&str] = &["beløp", "belop", "amount"];
const OUTFLOW_COLUMNS: &[&str] = &["ut fra konto", "ut av konto", "uttak"];
const INFLOW_COLUMNS: &[&str] = &["inn på konto", "innskudd"];

/// one transaction line from a statement
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatementRow {
    pub date: NaiveDate,
    pub description: String,
    /// negative for money leaving the account
    #[serde(rename = "amountOere")]
    pub amount: Money,
}

/// parsed statement with the number of rows that could not be read
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatementImport {
    pub rows: Vec<StatementRow>,
    pub skipped: usize,
    pub bank_hint: BankHint,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AmountColumns {
    Signed(usize),
    Split { outflow: Option<usize>, inflow: Option<usize> },
}

#[derive(Debug, Clone, Copy)]
struct ColumnMap {
    date: usize,
    description: Option<usize>,
    amount: AmountColumns,
}

impl ColumnMap {
    fn resolve(headers: &StringRecord) -> Result<Self> {
        let names: Vec<String> = headers.iter().map(|h| clean_cell(h).to_lowercase()).collect();

        let date = find_column(&names, DATE_COLUMNS).ok_or_else(|| FinanceError::MissingColumn {
            column: "date".to_string(),
        })?;
        let description = find_column(&names, DESCRIPTION_COLUMNS);

        let amount = match find_column(&names, AMOUNT_COLUMNS) {
            Some(index) => AmountColumns::Signed(index),
            None => {
                let outflow = find_column(&names, OUTFLOW_COLUMNS);
                let inflow = find_column(&names, INFLOW_COLUMNS);
                if outflow.is_none() && inflow.is_none() {
                    return Err(FinanceError::MissingColumn {
                        column: "amount".to_string(),
                    });
                }
                AmountColumns::Split { outflow, inflow }
            }
        };

        Ok(Self {
            date,
            description,
            amount,
        })
    }
}

/// exact header match first, then substring match, in needle priority order
fn find_column(names: &[String], needles: &[&str]) -> Option<usize> {
    needles
        .iter()
        .find_map(|needle| names.iter().position(|name| name.as_str() == *needle))
        .or_else(|| {
            needles
                .iter()
                .find_map(|needle| names.iter().position(|name| name.contains(*needle)))
        })
}

/// parse an amount cell into øre using the given decimal separator
pub fn parse_amount(cell: &str, separator: DecimalSeparator) -> Option<Money> {
    let cleaned: String = clean_cell(cell)
        .chars()
        .filter(|c| !c.is_whitespace())
        .map(|c| if c == '\u{2212}' { '-' } else { c })
        .collect();
    if cleaned.is_empty() {
        return None;
    }

    let normalized = match separator {
        DecimalSeparator::Comma => cleaned.replace('.', "").replace(',', "."),
        DecimalSeparator::Dot => cleaned.replace(',', ""),
    };
    Decimal::from_str(&normalized).ok().and_then(Money::from_major_decimal)
}

/// parse a date cell; an unknown format tries both supported formats
pub fn parse_date(cell: &str, format: DateFormat) -> Option<NaiveDate> {
    let cleaned = clean_cell(cell);
    let formats: &[DateFormat] = match format {
        DateFormat::Unknown => &[DateFormat::DayMonthYear, DateFormat::IsoDate],
        DateFormat::DayMonthYear => &[DateFormat::DayMonthYear],
        DateFormat::IsoDate => &[DateFormat::IsoDate],
    };
    formats
        .iter()
        .filter_map(|f| f.chrono_format())
        .find_map(|f| NaiveDate::parse_from_str(cleaned, f).ok())
}

/// read statement rows using a previously detected layout.
///
/// rows whose date or amount cannot be parsed are skipped and counted.
pub fn parse_statement(raw: &str, detection: &CsvDetectionResult) -> Result<StatementImport> {
    let mut reader = ReaderBuilder::new()
        .delimiter(detection.delimiter.as_byte())
        .has_headers(true)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(raw.as_bytes());

    let columns = ColumnMap::resolve(reader.headers()?)?;
    debug!(?columns, "resolved statement columns");

    let mut rows = Vec::new();
    let mut skipped = 0;

    for (line, record) in reader.records().enumerate() {
        let record = record?;
        match parse_row(&record, &columns, detection) {
            Some(row) => rows.push(row),
            None => {
                warn!(line = line + 2, "skipping unreadable statement row");
                skipped += 1;
            }
        }
    }

    Ok(StatementImport {
        rows,
        skipped,
        bank_hint: detection.bank_hint,
    })
}

/// detect the layout with the default configuration and read the rows
pub fn import_statement(raw: &str) -> Result<StatementImport> {
    let detection = detect_csv_format_with(raw, &DetectorConfig::default());
    parse_statement(raw, &detection)
}

fn parse_row(record: &StringRecord, columns: &ColumnMap, detection: &CsvDetectionResult) -> Option<StatementRow> {
    let date = parse_date(record.get(columns.date)?, detection.date_format)?;
    let separator = detection.decimal_separator;

    let amount = match columns.amount {
        AmountColumns::Signed(index) => parse_amount(record.get(index)?, separator)?,
        AmountColumns::Split { outflow, inflow } => {
            let out = outflow.and_then(|i| record.get(i)).and_then(|c| parse_amount(c, separator));
            let inn = inflow.and_then(|i| record.get(i)).and_then(|c| parse_amount(c, separator));
            if out.is_none() && inn.is_none() {
                return None;
            }
            inn.unwrap_or(Money::ZERO) - out.unwrap_or(Money::ZERO).abs()
        }
    };

    let description = columns
        .description
        .and_then(|i| record.get(i))
        .map(|c| clean_cell(c).to_string())
        .unwrap_or_default();

    Some(StatementRow {
        date,
        description,
        amount,
    })
}
