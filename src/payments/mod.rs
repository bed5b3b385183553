pub mod amortization;
pub mod balance;
pub mod early_payoff;

pub use amortization::{compute_monthly_payment, payoff_months, AmortizationSchedule, ScheduledPayment};
pub use balance::{compute_loan_balance, compute_loan_balance_now};
pub use early_payoff::{compute_early_payoff, interest_saved_pct};
