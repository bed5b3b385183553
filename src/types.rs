use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::calendar::parse_iso_date;
use crate::decimal::{Money, Rate};
use crate::errors::{FinanceError, Result};

/// original contractual terms of a fixed-rate, monthly-compounding loan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoanTerms {
    pub principal: Money,
    pub annual_rate: Rate,
    pub term_months: u32,
    pub start_date: NaiveDate,
}

impl LoanTerms {
    pub fn new(principal: Money, annual_rate: Rate, term_months: u32, start_date: NaiveDate) -> Self {
        Self {
            principal,
            annual_rate,
            term_months,
            start_date,
        }
    }

    /// build terms from an ISO `yyyy-mm-dd` start date
    pub fn from_iso(
        principal: Money,
        annual_rate: Rate,
        term_months: u32,
        start_date: &str,
    ) -> Result<Self> {
        Ok(Self::new(principal, annual_rate, term_months, parse_iso_date(start_date)?))
    }

    pub fn validate(&self) -> Result<()> {
        if !self.principal.is_positive() {
            return Err(FinanceError::invalid_argument(format!(
                "principal must be positive, got {}",
                self.principal
            )));
        }
        validate_rate_and_term(self.annual_rate, self.term_months)
    }
}

pub(crate) fn validate_rate_and_term(annual_rate: Rate, term_months: u32) -> Result<()> {
    if term_months == 0 {
        return Err(FinanceError::invalid_argument("term_months must be greater than zero"));
    }
    if annual_rate.is_negative() {
        return Err(FinanceError::invalid_argument(format!(
            "annual rate must not be negative, got {annual_rate}"
        )));
    }
    Ok(())
}

/// known balance at a known date; simulation starts here when present
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OpeningCheckpoint {
    pub balance: Money,
    pub date: NaiveDate,
}

impl OpeningCheckpoint {
    pub fn new(balance: Money, date: NaiveDate) -> Self {
        Self { balance, date }
    }

    pub fn from_iso(balance: Money, date: &str) -> Result<Self> {
        Ok(Self::new(balance, parse_iso_date(date)?))
    }

    pub fn validate(&self) -> Result<()> {
        if self.balance.is_negative() {
            return Err(FinanceError::invalid_argument(format!(
                "opening balance must not be negative, got {}",
                self.balance
            )));
        }
        Ok(())
    }
}

/// one-off extra principal payment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtraPayment {
    pub date: NaiveDate,
    #[serde(rename = "amountOere")]
    pub amount: Money,
}

impl ExtraPayment {
    pub fn new(date: NaiveDate, amount: Money) -> Self {
        Self { date, amount }
    }

    pub fn from_iso(date: &str, amount: Money) -> Result<Self> {
        Ok(Self::new(parse_iso_date(date)?, amount))
    }

    pub fn validate(&self) -> Result<()> {
        if !self.amount.is_positive() {
            return Err(FinanceError::InvalidPaymentAmount { amount: self.amount });
        }
        Ok(())
    }
}

/// simulated position of a loan on a given date
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoanBalanceResult {
    #[serde(rename = "currentBalanceOere")]
    pub current_balance: Money,
    #[serde(rename = "monthlyPaymentOere")]
    pub monthly_payment: Money,
    pub remaining_months: u32,
    /// share of the original principal repaid, 0..=100
    pub principal_paid_pct: u8,
}

impl LoanBalanceResult {
    pub fn is_paid_off(&self) -> bool {
        self.current_balance.is_zero()
    }
}

/// projection of paying a fixed extra amount every month
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EarlyPayoffResult {
    pub regular_months: u32,
    pub new_months: u32,
    pub months_saved: u32,
    #[serde(rename = "interestSavedOere")]
    pub interest_saved: Money,
}
