use rust_decimal::Decimal;
use tracing::debug;

use crate::decimal::{Money, Rate};
use crate::payments::amortization::payoff_months;
use crate::types::EarlyPayoffResult;

/// project the effect of paying `extra_monthly` on top of the regular payment.
///
/// returns `None` when there is nothing to project: the balance is already
/// cleared, the regular payment is not positive, or the regular payment does
/// not even cover the monthly interest.
pub fn compute_early_payoff(
    current_balance: Money,
    annual_rate: Rate,
    regular_payment: Money,
    extra_monthly: Money,
) -> Option<EarlyPayoffResult> {
    if !current_balance.is_positive() || !regular_payment.is_positive() || annual_rate.is_negative() {
        return None;
    }

    let regular_months = payoff_months(current_balance, annual_rate, regular_payment)?;
    let new_payment = regular_payment + extra_monthly.max(Money::ZERO);
    let new_months = payoff_months(current_balance, annual_rate, new_payment)?;

    let interest_regular = projected_interest(regular_months, regular_payment, current_balance);
    let interest_new = projected_interest(new_months, new_payment, current_balance);

    let result = EarlyPayoffResult {
        regular_months,
        new_months,
        months_saved: regular_months.saturating_sub(new_months),
        interest_saved: (interest_regular - interest_new).max(Money::ZERO),
    };

    debug!(
        balance = %current_balance,
        regular_months,
        new_months,
        interest_saved = %result.interest_saved,
        "projected early payoff"
    );

    Some(result)
}

/// total interest if `months` payments of `payment` clear `balance`
fn projected_interest(months: u32, payment: Money, balance: Money) -> Money {
    Money::from_minor(months as i64 * payment.as_minor()) - balance
}

/// share of the regular interest bill avoided by the extra payment, in percent
pub fn interest_saved_pct(result: &EarlyPayoffResult, current_balance: Money, regular_payment: Money) -> Decimal {
    let interest_regular = projected_interest(result.regular_months, regular_payment, current_balance);
    if !interest_regular.is_positive() {
        return Decimal::ZERO;
    }
    (result.interest_saved.as_decimal() / interest_regular.as_decimal() * Decimal::ONE_HUNDRED).round_dp(1)
}
