use crate::config::BankFingerprint;

use super::patterns::clean_cell;
use super::{BankHint, Delimiter};

impl BankFingerprint {
    /// check the fingerprint against a lower-cased, joined header
    pub fn matches(&self, header: &str) -> bool {
        let all = self.all_of.iter().all(|needle| header.contains(needle.as_str()));
        let any = self.any_of.is_empty() || self.any_of.iter().any(|needle| header.contains(needle.as_str()));
        all && any && !(self.all_of.is_empty() && self.any_of.is_empty())
    }
}

/// lower-case the header cells and join them with single spaces
pub fn normalize_header(header: &str, delimiter: Delimiter) -> String {
    header
        .split(delimiter.as_char())
        .map(|cell| clean_cell(cell).to_lowercase())
        .collect::<Vec<_>>()
        .join(" ")
}

/// identify the exporting bank from its header line
pub fn detect_bank(header: Option<&str>, delimiter: Delimiter, fingerprints: &[BankFingerprint]) -> BankHint {
    let Some(header) = header else {
        return BankHint::Unknown;
    };
    let normalized = normalize_header(header, delimiter);
    fingerprints
        .iter()
        .find(|fingerprint| fingerprint.matches(&normalized))
        .map(|fingerprint| fingerprint.bank)
        .unwrap_or(BankHint::Unknown)
}
