use serde::{Deserialize, Serialize};

use crate::detect::BankHint;
use crate::errors::Result;

pub const DEFAULT_SAMPLE_LINES: usize = 20;

/// csv format detector configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectorConfig {
    /// number of non-blank lines used for delimiter detection
    pub sample_lines: usize,
    /// header fingerprints, evaluated in order; first match wins
    pub fingerprints: Vec<BankFingerprint>,
}

/// column-name fingerprint identifying a bank's export format
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BankFingerprint {
    pub bank: BankHint,
    /// every needle must occur in the lower-cased header
    #[serde(default)]
    pub all_of: Vec<String>,
    /// at least one needle must occur, when non-empty
    #[serde(default)]
    pub any_of: Vec<String>,
}

impl BankFingerprint {
    pub fn new(bank: BankHint, all_of: &[&str], any_of: &[&str]) -> Self {
        Self {
            bank,
            all_of: all_of.iter().map(|s| s.to_string()).collect(),
            any_of: any_of.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            sample_lines: DEFAULT_SAMPLE_LINES,
            fingerprints: Self::norwegian_banks(),
        }
    }
}

impl DetectorConfig {
    /// built-in fingerprints for the norwegian retail banks.
    ///
    /// dnb exports also carry the "ut fra konto" / "inn på konto" columns, so
    /// dnb must be checked before sparebank1.
    pub fn norwegian_banks() -> Vec<BankFingerprint> {
        vec![
            BankFingerprint::new(BankHint::Dnb, &["forklaringstekst", "rentedato"], &[]),
            BankFingerprint::new(BankHint::Nordea, &[], &["bokføringsdato", "avsender"]),
            BankFingerprint::new(BankHint::Sparebank1, &[], &["ut fra konto", "inn på konto"]),
        ]
    }

    pub fn with_sample_lines(mut self, sample_lines: usize) -> Self {
        self.sample_lines = sample_lines;
        self
    }

    /// load from json; missing fields fall back to defaults
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = DetectorConfig::default();
        assert_eq!(config.sample_lines, 20);
        let banks: Vec<BankHint> = config.fingerprints.iter().map(|f| f.bank).collect();
        assert_eq!(banks, vec![BankHint::Dnb, BankHint::Nordea, BankHint::Sparebank1]);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config = DetectorConfig::from_json(r#"{"sample_lines": 5}"#).unwrap();
        assert_eq!(config.sample_lines, 5);
        assert_eq!(config.fingerprints, DetectorConfig::norwegian_banks());
    }

    #[test]
    fn test_custom_fingerprints_from_json() {
        let json = r#"{
            "fingerprints": [
                {"bank": "nordea", "any_of": ["transaksjonsdato"]}
            ]
        }"#;
        let config = DetectorConfig::from_json(json).unwrap();
        assert_eq!(config.sample_lines, DEFAULT_SAMPLE_LINES);
        assert_eq!(config.fingerprints.len(), 1);
        assert!(config.fingerprints[0].all_of.is_empty());
    }

    #[test]
    fn test_json_round_trip() {
        let config = DetectorConfig::default().with_sample_lines(50);
        let restored = DetectorConfig::from_json(&config.to_json_pretty().unwrap()).unwrap();
        assert_eq!(restored, config);
    }

    #[test]
    fn test_malformed_json_is_an_error() {
        assert!(DetectorConfig::from_json("{sample_lines: }").is_err());
    }
}
