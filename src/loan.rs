use chrono::NaiveDate;
use hourglass_rs::SafeTimeProvider;
use serde::{Deserialize, Serialize};

use crate::calendar::today;
use crate::decimal::{Money, Rate};
use crate::errors::{FinanceError, Result};
use crate::payments::{
    compute_early_payoff, compute_loan_balance, compute_monthly_payment, AmortizationSchedule,
};
use crate::types::{EarlyPayoffResult, ExtraPayment, LoanBalanceResult, LoanTerms, OpeningCheckpoint};

/// a household loan with its recorded extra payments and optional opening checkpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Loan {
    terms: LoanTerms,
    opening: Option<OpeningCheckpoint>,
    extra_payments: Vec<ExtraPayment>,
}

impl Loan {
    /// create a loan from validated terms
    pub fn from_terms(terms: LoanTerms) -> Result<Self> {
        terms.validate()?;
        Ok(Self {
            terms,
            opening: None,
            extra_payments: Vec::new(),
        })
    }

    /// builder for creating loans
    pub fn builder() -> LoanBuilder {
        LoanBuilder::new()
    }

    pub fn terms(&self) -> &LoanTerms {
        &self.terms
    }

    pub fn opening(&self) -> Option<OpeningCheckpoint> {
        self.opening
    }

    pub fn extra_payments(&self) -> &[ExtraPayment] {
        &self.extra_payments
    }

    /// record an extra principal payment
    pub fn add_extra_payment(&mut self, payment: ExtraPayment) -> Result<()> {
        payment.validate()?;
        self.extra_payments.push(payment);
        Ok(())
    }

    /// replace the opening checkpoint
    pub fn set_opening(&mut self, checkpoint: OpeningCheckpoint) -> Result<()> {
        checkpoint.validate()?;
        self.opening = Some(checkpoint);
        Ok(())
    }

    pub fn monthly_payment(&self) -> Result<Money> {
        compute_monthly_payment(self.terms.principal, self.terms.annual_rate, self.terms.term_months)
    }

    /// simulated position on the given date
    pub fn balance_on(&self, as_of: NaiveDate) -> Result<LoanBalanceResult> {
        compute_loan_balance(&self.terms, &self.extra_payments, self.opening, as_of)
    }

    /// simulated position today, as seen by the time provider
    pub fn balance(&self, time_provider: &SafeTimeProvider) -> Result<LoanBalanceResult> {
        self.balance_on(today(time_provider))
    }

    /// what-if projection of paying `extra_monthly` on top of the schedule from `as_of`
    pub fn early_payoff(&self, as_of: NaiveDate, extra_monthly: Money) -> Result<Option<EarlyPayoffResult>> {
        let position = self.balance_on(as_of)?;
        Ok(compute_early_payoff(
            position.current_balance,
            self.terms.annual_rate,
            position.monthly_payment,
            extra_monthly,
        ))
    }

    /// contractual repayment plan, ignoring extra payments
    pub fn schedule(&self) -> Result<AmortizationSchedule> {
        AmortizationSchedule::generate(&self.terms)
    }

    /// serializable view of the loan on a given date
    pub fn snapshot(&self, as_of: NaiveDate) -> Result<LoanSnapshot> {
        let position = self.balance_on(as_of)?;
        Ok(LoanSnapshot {
            as_of,
            principal: self.terms.principal,
            annual_rate: self.terms.annual_rate,
            term_months: self.terms.term_months,
            start_date: self.terms.start_date,
            extra_paid: self.extra_payments.iter().map(|p| p.amount).sum(),
            position,
        })
    }

    /// snapshot as pretty-printed json
    pub fn to_json_pretty(&self, as_of: NaiveDate) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.snapshot(as_of)?)?)
    }
}

/// serializable view of a loan's position
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoanSnapshot {
    pub as_of: NaiveDate,
    pub principal: Money,
    pub annual_rate: Rate,
    pub term_months: u32,
    pub start_date: NaiveDate,
    pub extra_paid: Money,
    pub position: LoanBalanceResult,
}

/// builder for loans
#[derive(Debug, Default)]
pub struct LoanBuilder {
    principal: Option<Money>,
    rate: Option<Rate>,
    term_months: Option<u32>,
    start_date: Option<NaiveDate>,
    opening: Option<OpeningCheckpoint>,
    extra_payments: Vec<ExtraPayment>,
}

impl LoanBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn principal(mut self, principal: Money) -> Self {
        self.principal = Some(principal);
        self
    }

    pub fn rate(mut self, rate: Rate) -> Self {
        self.rate = Some(rate);
        self
    }

    pub fn term_months(mut self, months: u32) -> Self {
        self.term_months = Some(months);
        self
    }

    pub fn start_date(mut self, date: NaiveDate) -> Self {
        self.start_date = Some(date);
        self
    }

    pub fn opening_checkpoint(mut self, balance: Money, date: NaiveDate) -> Self {
        self.opening = Some(OpeningCheckpoint::new(balance, date));
        self
    }

    pub fn extra_payment(mut self, date: NaiveDate, amount: Money) -> Self {
        self.extra_payments.push(ExtraPayment::new(date, amount));
        self
    }

    pub fn build(self) -> Result<Loan> {
        let terms = LoanTerms {
            principal: self.principal.ok_or_else(|| missing("principal"))?,
            annual_rate: self.rate.unwrap_or(Rate::ZERO),
            term_months: self.term_months.ok_or_else(|| missing("term_months"))?,
            start_date: self.start_date.ok_or_else(|| missing("start_date"))?,
        };

        let mut loan = Loan::from_terms(terms)?;
        if let Some(checkpoint) = self.opening {
            loan.set_opening(checkpoint)?;
        }
        for payment in self.extra_payments {
            loan.add_extra_payment(payment)?;
        }
        Ok(loan)
    }
}

fn missing(field: &str) -> FinanceError {
    FinanceError::invalid_argument(format!("{field} is required"))
}
