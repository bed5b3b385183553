use std::collections::BTreeMap;

use chrono::NaiveDate;
use hourglass_rs::SafeTimeProvider;
use tracing::{debug, warn};

use crate::calendar::{elapsed_months, month_index, today};
use crate::decimal::Money;
use crate::errors::Result;
use crate::payments::amortization::{accrue_month, compute_monthly_payment, payoff_months, round_half_up};
use crate::types::{ExtraPayment, LoanBalanceResult, LoanTerms, OpeningCheckpoint};

/// simulate a loan month by month from its start (or opening checkpoint) up to `as_of`.
///
/// each simulated month accrues interest rounded to whole øre, then takes the
/// scheduled payment and any extra payments falling in that calendar month.
/// balances never go below zero. without a checkpoint, a balance left below
/// one payment at the contractual final month is rounding residue and is cleared.
pub fn compute_loan_balance(
    terms: &LoanTerms,
    extra_payments: &[ExtraPayment],
    opening: Option<OpeningCheckpoint>,
    as_of: NaiveDate,
) -> Result<LoanBalanceResult> {
    terms.validate()?;
    if let Some(checkpoint) = &opening {
        checkpoint.validate()?;
    }
    for payment in extra_payments {
        payment.validate()?;
    }

    let monthly_payment = compute_monthly_payment(terms.principal, terms.annual_rate, terms.term_months)?;
    let r = terms.annual_rate.monthly_factor();

    let clears_residue = opening.is_none();
    let (sim_start, mut balance) = match opening {
        Some(checkpoint) => (checkpoint.date, checkpoint.balance),
        None => (terms.start_date, terms.principal),
    };
    let start_index = month_index(sim_start);
    let maturity_index = month_index(terms.start_date) + terms.term_months as i64;

    let extras = aggregate_extra_payments(extra_payments, sim_start);
    let elapsed = elapsed_months(sim_start, as_of);
    let steps = elapsed.min(terms.term_months);

    let mut simulated = 0u32;
    for step in 1..=steps {
        if balance.is_zero() {
            break;
        }
        let key = start_index + step as i64;

        balance = accrue_month(balance, r);
        balance = balance.saturating_sub_floor(monthly_payment);
        if let Some(extra) = extras.get(&key) {
            balance = balance.saturating_sub_floor(*extra);
        }
        if clears_residue && key >= maturity_index && balance < monthly_payment {
            balance = Money::ZERO;
        }
        simulated += 1;
    }
    let current_balance = balance.max(Money::ZERO);

    let remaining_months = if current_balance.is_zero() {
        0
    } else if !monthly_payment.is_positive() {
        terms.term_months
    } else {
        payoff_months(current_balance, terms.annual_rate, monthly_payment).unwrap_or_else(|| {
            warn!(
                balance = %current_balance,
                payment = %monthly_payment,
                "scheduled payment does not cover monthly interest, falling back to remaining term"
            );
            terms.term_months.saturating_sub(simulated)
        })
    };

    let principal_paid_pct = paid_percentage(terms.principal, current_balance);

    debug!(
        elapsed,
        simulated,
        extra_months = extras.len(),
        balance = %current_balance,
        remaining_months,
        "simulated loan balance"
    );

    Ok(LoanBalanceResult {
        current_balance,
        monthly_payment,
        remaining_months,
        principal_paid_pct,
    })
}

/// same as [`compute_loan_balance`], reading today's date from the time provider
pub fn compute_loan_balance_now(
    terms: &LoanTerms,
    extra_payments: &[ExtraPayment],
    opening: Option<OpeningCheckpoint>,
    time_provider: &SafeTimeProvider,
) -> Result<LoanBalanceResult> {
    compute_loan_balance(terms, extra_payments, opening, today(time_provider))
}

/// sum extra payments per absolute month index.
///
/// payments dated before the simulation start are already reflected in the
/// starting balance and are dropped; payments inside the starting month are
/// applied with the first simulated month.
fn aggregate_extra_payments(payments: &[ExtraPayment], sim_start: NaiveDate) -> BTreeMap<i64, Money> {
    let first_step = month_index(sim_start) + 1;
    let mut by_month = BTreeMap::new();
    for payment in payments.iter().filter(|p| p.date >= sim_start) {
        let key = month_index(payment.date).max(first_step);
        let total = by_month.entry(key).or_insert(Money::ZERO);
        *total = total.saturating_add(payment.amount);
    }
    by_month
}

fn paid_percentage(principal: Money, balance: Money) -> u8 {
    let paid = (principal - balance).as_f64() / principal.as_f64() * 100.0;
    round_half_up(paid).clamp(0, 100) as u8
}
