//! heuristic format detection for bank statement csv exports
//!
//! detection works on already-decoded text and never fails: every input,
//! including the empty string, yields a best-guess result.

pub mod bank;
pub mod patterns;

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::DetectorConfig;

pub use bank::detect_bank;
pub use patterns::{clean_cell, ValueScores};

/// field delimiter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Delimiter {
    #[serde(rename = ";")]
    Semicolon,
    #[serde(rename = ",")]
    Comma,
    #[serde(rename = "\t")]
    Tab,
}

impl Delimiter {
    /// candidates in tie-break order
    pub const CANDIDATES: [Delimiter; 3] = [Delimiter::Semicolon, Delimiter::Comma, Delimiter::Tab];

    pub fn as_char(&self) -> char {
        match self {
            Delimiter::Semicolon => ';',
            Delimiter::Comma => ',',
            Delimiter::Tab => '\t',
        }
    }

    pub fn as_byte(&self) -> u8 {
        self.as_char() as u8
    }
}

/// decimal separator used in amounts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DecimalSeparator {
    #[serde(rename = ".")]
    Dot,
    #[serde(rename = ",")]
    Comma,
}

impl DecimalSeparator {
    pub fn as_char(&self) -> char {
        match self {
            DecimalSeparator::Dot => '.',
            DecimalSeparator::Comma => ',',
        }
    }
}

/// date format used in date columns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DateFormat {
    #[serde(rename = "dd.mm.yyyy")]
    DayMonthYear,
    #[serde(rename = "yyyy-mm-dd")]
    IsoDate,
    #[serde(rename = "unknown")]
    Unknown,
}

impl DateFormat {
    /// chrono format string, if known
    pub fn chrono_format(&self) -> Option<&'static str> {
        match self {
            DateFormat::DayMonthYear => Some("%d.%m.%Y"),
            DateFormat::IsoDate => Some("%Y-%m-%d"),
            DateFormat::Unknown => None,
        }
    }
}

impl fmt::Display for DateFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            DateFormat::DayMonthYear => "dd.mm.yyyy",
            DateFormat::IsoDate => "yyyy-mm-dd",
            DateFormat::Unknown => "unknown",
        };
        f.write_str(s)
    }
}

/// likely original encoding of the decoded text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EncodingHint {
    #[serde(rename = "UTF-8")]
    Utf8,
    #[serde(rename = "ISO-8859-1")]
    Latin1,
}

/// bank the export most likely came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BankHint {
    Dnb,
    Nordea,
    Sparebank1,
    Unknown,
}

/// detected csv layout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CsvDetectionResult {
    pub delimiter: Delimiter,
    pub decimal_separator: DecimalSeparator,
    pub date_format: DateFormat,
    pub encoding_hint: EncodingHint,
    /// delimiter, decimal separator and date format were all unambiguous
    pub confident: bool,
    pub bank_hint: BankHint,
}

// utf-8 æ, ø, å decoded as latin-1 / windows-1252
const MOJIBAKE: [&str; 3] = ["Ã¦", "Ã¸", "Ã…"];

/// detect the csv layout using `sample_lines` lines for delimiter detection
pub fn detect_csv_format(raw: &str, sample_lines: usize) -> CsvDetectionResult {
    detect_csv_format_with(raw, &DetectorConfig::default().with_sample_lines(sample_lines))
}

/// detect the csv layout with an explicit configuration
pub fn detect_csv_format_with(raw: &str, config: &DetectorConfig) -> CsvDetectionResult {
    let lines = non_blank_lines(raw);
    let sample = &lines[..lines.len().min(config.sample_lines)];

    let (delimiter, delimiter_confident) = detect_delimiter(sample);

    // everything after the header feeds value-based detection
    let data = lines.get(1..).unwrap_or_default();
    let scores = ValueScores::tally(data.iter().flat_map(|line| line.split(delimiter.as_char())));
    let (decimal_separator, decimal_confident) = scores.decimal_separator();
    let (date_format, date_confident) = scores.date_format();

    let encoding_hint = detect_encoding(raw);
    let bank_hint = detect_bank(lines.first().copied(), delimiter, &config.fingerprints);

    debug!(
        lines = lines.len(),
        ?delimiter,
        ?scores,
        ?encoding_hint,
        ?bank_hint,
        "detected csv format"
    );

    CsvDetectionResult {
        delimiter,
        decimal_separator,
        date_format,
        encoding_hint,
        confident: delimiter_confident && decimal_confident && date_confident,
        bank_hint,
    }
}

/// split on `\n` / `\r\n` and drop blank lines
pub(crate) fn non_blank_lines(raw: &str) -> Vec<&str> {
    raw.split('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line))
        .filter(|line| !line.trim().is_empty())
        .collect()
}

/// pick the candidate with the highest mean occurrence per line.
///
/// confident only when the winner appears at least once per line on average.
fn detect_delimiter(sample: &[&str]) -> (Delimiter, bool) {
    if sample.is_empty() {
        return (Delimiter::Semicolon, false);
    }

    let mut best = Delimiter::Semicolon;
    let mut best_mean = -1.0;
    for candidate in Delimiter::CANDIDATES {
        let total: usize = sample.iter().map(|line| line.matches(candidate.as_char()).count()).sum();
        let mean = total as f64 / sample.len() as f64;
        if mean > best_mean {
            best = candidate;
            best_mean = mean;
        }
    }
    (best, best_mean >= 1.0)
}

fn detect_encoding(raw: &str) -> EncodingHint {
    if raw.contains('\u{FFFD}') || MOJIBAKE.iter().any(|pattern| raw.contains(pattern)) {
        EncodingHint::Latin1
    } else {
        EncodingHint::Utf8
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const NORWEGIAN: &str = "\"Dato\";\"Beløp\";\"Tekst\"\n\
        \"15.01.2024\";\"-123,45\";\"Rema 1000\"\n\
        \"16.01.2024\";\"25 000,00\";\"Lønn\"\n\
        \"17.01.2024\";\"-89,90\";\"Kiwi Majorstuen\"\n";

    const ISO: &str = "Date,Amount,Description\n\
        2024-01-15,-123.45,Groceries\n\
        2024-01-16,2500.00,Salary\n\
        2024-01-17,-9.5,Coffee\n";

    #[test]
    fn test_norwegian_semicolon_export() {
        let result = detect_csv_format(NORWEGIAN, 20);
        assert_eq!(result.delimiter, Delimiter::Semicolon);
        assert_eq!(result.date_format, DateFormat::DayMonthYear);
        assert_eq!(result.decimal_separator, DecimalSeparator::Comma);
        assert_eq!(result.encoding_hint, EncodingHint::Utf8);
        assert_eq!(result.bank_hint, BankHint::Unknown);
        assert!(result.confident);
    }

    #[test]
    fn test_comma_iso_export() {
        let result = detect_csv_format(ISO, 20);
        assert_eq!(result.delimiter, Delimiter::Comma);
        assert_eq!(result.date_format, DateFormat::IsoDate);
        assert_eq!(result.decimal_separator, DecimalSeparator::Dot);
        assert!(result.confident);
    }

    #[test]
    fn test_tab_export() {
        let text = "Dato\tBeløp\n01.02.2024\t10,00\n02.02.2024\t-5,50\n";
        let result = detect_csv_format(text, 20);
        assert_eq!(result.delimiter, Delimiter::Tab);
        assert_eq!(result.decimal_separator, DecimalSeparator::Comma);
    }

    #[test]
    fn test_empty_input_defaults() {
        let result = detect_csv_format("", 20);
        assert_eq!(result.delimiter, Delimiter::Semicolon);
        assert_eq!(result.decimal_separator, DecimalSeparator::Comma);
        assert_eq!(result.date_format, DateFormat::Unknown);
        assert_eq!(result.encoding_hint, EncodingHint::Utf8);
        assert_eq!(result.bank_hint, BankHint::Unknown);
        assert!(!result.confident);

        let blank = detect_csv_format("\r\n\n   \n", 20);
        assert_eq!(blank, result);
    }

    #[test]
    fn test_single_line_still_finds_delimiter() {
        let result = detect_csv_format("a,b,c", 20);
        assert_eq!(result.delimiter, Delimiter::Comma);
        assert_eq!(result.date_format, DateFormat::Unknown);
        assert!(!result.confident);
    }

    #[test]
    fn test_semicolon_beats_decimal_commas() {
        // commas in amounts appear on most lines, semicolons on every line
        let text = "Dato;Beløp;Saldo\n01.03.2024;1,50;100,25\n02.03.2024;2,75;97,50\n";
        let result = detect_csv_format(text, 20);
        assert_eq!(result.delimiter, Delimiter::Semicolon);
    }

    #[test]
    fn test_sample_window_bounds_delimiter_detection() {
        let text = "a;b;c\nx,y,z\nx,y,z\nx,y,z\n";
        assert_eq!(detect_csv_format(text, 1).delimiter, Delimiter::Semicolon);
        assert_eq!(detect_csv_format(text, 20).delimiter, Delimiter::Comma);
    }

    #[test]
    fn test_crlf_and_quotes_tolerated() {
        let text = NORWEGIAN.replace('\n', "\r\n");
        let result = detect_csv_format(&text, 20);
        assert_eq!(result.delimiter, Delimiter::Semicolon);
        assert_eq!(result.date_format, DateFormat::DayMonthYear);
        assert_eq!(result.decimal_separator, DecimalSeparator::Comma);
        assert!(result.confident);
    }

    #[test]
    fn test_encoding_hint() {
        assert_eq!(detect_csv_format("Dato;Bel\u{FFFD}p\n", 20).encoding_hint, EncodingHint::Latin1);
        assert_eq!(detect_csv_format("Dato;BelÃ¸p\n", 20).encoding_hint, EncodingHint::Latin1);
        assert_eq!(detect_csv_format("Tekst;Kj\u{00C3}\u{00A6}rlighet\n", 20).encoding_hint, EncodingHint::Latin1);
        assert_eq!(detect_csv_format("Tekst;Ã…lesund\n", 20).encoding_hint, EncodingHint::Latin1);
        assert_eq!(detect_csv_format("Dato;Beløp;Ærlig\n", 20).encoding_hint, EncodingHint::Utf8);
        assert_eq!(detect_csv_format("Date,Amount\n", 20).encoding_hint, EncodingHint::Utf8);
    }

    #[test]
    fn test_bank_hint_from_header() {
        let dnb = "\"Dato\";\"Forklaringstekst\";\"Rentedato\";\"Ut fra konto\";\"Inn på konto\"\n\
            \"02.01.2024\";\"Varer\";\"02.01.2024\";\"120,00\";\"\"\n";
        assert_eq!(detect_csv_format(dnb, 20).bank_hint, BankHint::Dnb);

        let nordea = "Bokføringsdato;Beløp;Avsender;Mottaker\n2024/01/02;-120,00;;Rema\n";
        assert_eq!(detect_csv_format(nordea, 20).bank_hint, BankHint::Nordea);

        let sparebank1 = "Dato;Beskrivelse;Rentedato;Ut fra konto;Inn på konto\n";
        assert_eq!(detect_csv_format(sparebank1, 20).bank_hint, BankHint::Sparebank1);

        assert_eq!(detect_csv_format(ISO, 20).bank_hint, BankHint::Unknown);
    }

    #[test]
    fn test_bank_hint_does_not_gate_confidence() {
        let dnb = "\"Dato\";\"Forklaringstekst\";\"Rentedato\";\"Ut fra konto\";\"Inn på konto\"\n\
            \"02.01.2024\";\"Varer\";\"02.01.2024\";\"120,00\";\"\"\n\
            \"03.01.2024\";\"Lønn\";\"03.01.2024\";\"\";\"30 000,00\"\n";
        let result = detect_csv_format(dnb, 20);
        assert!(result.confident);
        assert_eq!(result.bank_hint, BankHint::Dnb);
    }

    #[test]
    fn test_ambiguous_values_are_not_confident() {
        let text = "Dato;Tekst\nfoo;bar\nbaz;qux\n";
        let result = detect_csv_format(text, 20);
        assert_eq!(result.delimiter, Delimiter::Semicolon);
        assert!(!result.confident);
    }

    #[test]
    fn test_custom_config() {
        let config = DetectorConfig::from_json(
            r#"{"fingerprints": [{"bank": "sparebank1", "all_of": ["transaksjonsdato"]}]}"#,
        )
        .unwrap();
        let result = detect_csv_format_with("Transaksjonsdato;Beløp\n", &config);
        assert_eq!(result.bank_hint, BankHint::Sparebank1);
    }

    #[test]
    fn test_wire_format() {
        let value = serde_json::to_value(detect_csv_format(NORWEGIAN, 20)).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "delimiter": ";",
                "decimalSeparator": ",",
                "dateFormat": "dd.mm.yyyy",
                "encodingHint": "UTF-8",
                "confident": true,
                "bankHint": "unknown"
            })
        );
        let tab = serde_json::to_value(Delimiter::Tab).unwrap();
        assert_eq!(tab, "\t");
    }
}
