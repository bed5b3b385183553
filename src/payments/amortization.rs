use chrono::{Months, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::decimal::{Money, Rate};
use crate::errors::{FinanceError, Result};
use crate::types::{validate_rate_and_term, LoanTerms};

/// round half toward positive infinity, to whole øre
pub(crate) fn round_half_up(x: f64) -> i64 {
    (x + 0.5).floor() as i64
}

/// scheduled fixed monthly payment for a fully amortizing loan.
///
/// zero-rate loans round the payment up so the loan can never under-amortize;
/// otherwise `P * r * (1 + r)^n / ((1 + r)^n - 1)` rounded to nearest øre.
pub fn compute_monthly_payment(principal: Money, annual_rate: Rate, term_months: u32) -> Result<Money> {
    validate_rate_and_term(annual_rate, term_months)?;
    if principal.is_negative() {
        return Err(FinanceError::invalid_argument(format!(
            "principal must not be negative, got {principal}"
        )));
    }

    let r = annual_rate.monthly_factor();
    if r == 0.0 {
        let n = term_months as i64;
        let p = principal.as_minor();
        return Ok(Money::from_minor((p + n - 1) / n));
    }

    // EMI = P * r * (1 + r)^n / ((1 + r)^n - 1)
    let compound = (1.0 + r).powf(term_months as f64);
    let emi = principal.as_f64() * r * compound / (compound - 1.0);
    let mut payment = round_half_up(emi);
    // tiny balances over long terms would otherwise round to a zero payment
    if principal.is_positive() {
        payment = payment.max(1);
    }
    Ok(Money::from_minor(payment))
}

/// accrue one month of interest on `balance`, rounding to whole øre
pub(crate) fn accrue_month(balance: Money, monthly_factor: f64) -> Money {
    if monthly_factor == 0.0 {
        return balance;
    }
    let b = balance.as_f64();
    Money::from_minor(round_half_up(b + b * monthly_factor))
}

/// months needed to clear `balance` at a fixed `payment`.
///
/// returns `None` when the payment is not positive or does not cover the
/// interest accruing on the balance.
pub fn payoff_months(balance: Money, annual_rate: Rate, payment: Money) -> Option<u32> {
    if !balance.is_positive() {
        return Some(0);
    }
    if !payment.is_positive() {
        return None;
    }

    let r = annual_rate.monthly_factor();
    if r == 0.0 {
        let b = balance.as_minor();
        let p = payment.as_minor();
        return Some(((b + p - 1) / p) as u32);
    }

    let ratio = r * balance.as_f64() / payment.as_f64();
    if ratio >= 1.0 {
        return None;
    }
    let months = (-(1.0 - ratio).ln() / (1.0 + r).ln()).ceil();
    Some(months.max(0.0) as u32)
}

/// scheduled payment in amortization schedule
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduledPayment {
    pub payment_number: u32,
    pub due_date: NaiveDate,
    pub opening_balance: Money,
    pub payment_amount: Money,
    pub principal_portion: Money,
    pub interest_portion: Money,
    pub closing_balance: Money,
    pub cumulative_interest: Money,
}

/// month-by-month repayment plan for a loan without extra payments
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AmortizationSchedule {
    pub terms: LoanTerms,
    pub monthly_payment: Money,
    pub payments: Vec<ScheduledPayment>,
    pub total_interest: Money,
    pub total_paid: Money,
}

impl AmortizationSchedule {
    /// generate payment schedule
    pub fn generate(terms: &LoanTerms) -> Result<Self> {
        terms.validate()?;
        let monthly_payment =
            compute_monthly_payment(terms.principal, terms.annual_rate, terms.term_months)?;
        let r = terms.annual_rate.monthly_factor();

        let mut payments = Vec::with_capacity(terms.term_months as usize);
        let mut balance = terms.principal;
        let mut cumulative_interest = Money::ZERO;

        for i in 1..=terms.term_months {
            let due_date = terms
                .start_date
                .checked_add_months(Months::new(i))
                .ok_or_else(|| FinanceError::InvalidDate {
                    message: format!("payment {i} falls outside the supported date range"),
                })?;

            let accrued = accrue_month(balance, r);
            let interest_portion = accrued - balance;
            let mut payment_amount = monthly_payment.min(accrued);
            // last instalment absorbs the rounding residue
            if i == terms.term_months {
                payment_amount = accrued;
            }
            let closing_balance = accrued - payment_amount;
            cumulative_interest += interest_portion;

            payments.push(ScheduledPayment {
                payment_number: i,
                due_date,
                opening_balance: balance,
                payment_amount,
                principal_portion: payment_amount - interest_portion,
                interest_portion,
                closing_balance,
                cumulative_interest,
            });

            balance = closing_balance;
            if balance.is_zero() {
                break;
            }
        }

        let total_paid = payments.iter().map(|p| p.payment_amount).sum();

        Ok(Self {
            terms: terms.clone(),
            monthly_payment,
            payments,
            total_interest: cumulative_interest,
            total_paid,
        })
    }

    /// get payment for specific period (1-based)
    pub fn get_payment(&self, payment_number: u32) -> Option<&ScheduledPayment> {
        let index = payment_number.checked_sub(1)?;
        self.payments.get(index as usize)
    }

    /// remaining balance after the given payment
    pub fn balance_after_payment(&self, payment_number: u32) -> Money {
        if payment_number as usize >= self.payments.len() {
            return Money::ZERO;
        }
        self.get_payment(payment_number)
            .map(|p| p.closing_balance)
            .unwrap_or(self.terms.principal)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn start() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 15).unwrap()
    }

    #[test]
    fn test_zero_rate_payment_rounds_up() {
        assert_eq!(
            compute_monthly_payment(Money::from_minor(100_000), Rate::ZERO, 10).unwrap(),
            Money::from_minor(10_000)
        );
        assert_eq!(
            compute_monthly_payment(Money::from_minor(10_001), Rate::ZERO, 10).unwrap(),
            Money::from_minor(1_001)
        );
    }

    #[test]
    fn test_mortgage_payment_sanity_bound() {
        let payment =
            compute_monthly_payment(Money::from_minor(300_000_000), Rate::from_percentage(5), 300)
                .unwrap();
        assert!(payment > Money::from_minor(1_700_000));
        assert!(payment < Money::from_minor(1_800_000));
    }

    #[test]
    fn test_payment_is_positive_for_small_loans() {
        for (principal, pct, term) in [(1, 0, 1), (1, 3, 360), (99, 20, 7), (500_000, 1, 600)] {
            let payment =
                compute_monthly_payment(Money::from_minor(principal), Rate::from_percentage(pct), term)
                    .unwrap();
            assert!(payment.is_positive(), "{principal} {pct} {term}");
        }
    }

    #[test]
    fn test_invalid_term_rejected() {
        let result = compute_monthly_payment(Money::from_major(1_000), Rate::from_percentage(5), 0);
        assert!(matches!(result, Err(FinanceError::InvalidArgument { .. })));
    }

    #[test]
    fn test_payoff_months() {
        let rate = Rate::from_percentage(5);
        let principal = Money::from_major(100_000);
        let payment = compute_monthly_payment(principal, rate, 120).unwrap();
        let months = payoff_months(principal, rate, payment).unwrap();
        assert!((120..=121).contains(&months), "{months}");

        assert_eq!(payoff_months(Money::ZERO, rate, payment), Some(0));
        assert_eq!(payoff_months(Money::from_minor(1_001), Rate::ZERO, Money::from_minor(100)), Some(11));
        // interest alone is 500 kr per month here
        assert_eq!(payoff_months(principal, Rate::from_percentage(6), Money::from_major(400)), None);
        assert_eq!(payoff_months(principal, rate, Money::ZERO), None);
    }

    #[test]
    fn test_accrue_month_rounds_each_step() {
        // 12% annual is 1% a month
        let rate = Rate::from_percentage(12);
        assert_eq!(accrue_month(Money::from_minor(1_000), rate.monthly_factor()), Money::from_minor(1_010));
        assert_eq!(accrue_month(Money::from_minor(1_234), rate.monthly_factor()), Money::from_minor(1_246));
        assert_eq!(accrue_month(Money::from_minor(150), 0.0), Money::from_minor(150));
        assert_eq!(round_half_up(151.5), 152);
        assert_eq!(round_half_up(151.49), 151);
    }

    #[test]
    fn test_schedule_fully_amortizes() {
        let terms = LoanTerms::new(Money::from_major(100_000), Rate::from_percentage(12), 12, start());
        let schedule = AmortizationSchedule::generate(&terms).unwrap();

        assert_eq!(schedule.payments.len(), 12);
        let first = &schedule.payments[0];
        assert_eq!(first.opening_balance, terms.principal);
        assert_eq!(first.interest_portion, Money::from_major(1_000));
        assert_eq!(first.due_date, NaiveDate::from_ymd_opt(2024, 2, 15).unwrap());

        let last = schedule.payments.last().unwrap();
        assert_eq!(last.closing_balance, Money::ZERO);
        assert!((last.payment_amount - schedule.monthly_payment).abs() < Money::from_major(1));

        assert_eq!(schedule.total_paid, terms.principal + schedule.total_interest);
        for pair in schedule.payments.windows(2) {
            assert!(pair[1].interest_portion < pair[0].interest_portion);
        }
    }

    #[test]
    fn test_schedule_zero_rate() {
        let terms = LoanTerms::new(Money::from_minor(10_001), Rate::ZERO, 10, start());
        let schedule = AmortizationSchedule::generate(&terms).unwrap();

        // ceiling payment clears the loan in the final month with a smaller instalment
        assert_eq!(schedule.payments.len(), 10);
        assert_eq!(schedule.total_interest, Money::ZERO);
        assert_eq!(schedule.payments[9].payment_amount, Money::from_minor(992));
        assert_eq!(schedule.balance_after_payment(10), Money::ZERO);
        assert_eq!(schedule.balance_after_payment(1), Money::from_minor(9_000));
        assert!(schedule.get_payment(0).is_none());
    }
}
