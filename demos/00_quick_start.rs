/// quick start - minimal example to get started
use household_finance_rs::chrono::NaiveDate;
use household_finance_rs::{Loan, Money, Rate};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // a 250 000 kr car loan over five years
    let loan = Loan::builder()
        .principal(Money::from_major(250_000))
        .rate(Rate::from_percentage(8))
        .term_months(60)
        .start_date(NaiveDate::from_ymd_opt(2024, 1, 15).unwrap())
        .build()?;

    println!("monthly payment: {} kr", loan.monthly_payment()?);

    let position = loan.balance_on(NaiveDate::from_ymd_opt(2025, 1, 15).unwrap())?;
    println!("balance after a year: {} kr", position.current_balance);
    println!("principal paid: {}%", position.principal_paid_pct);
    println!("months remaining: {}", position.remaining_months);

    Ok(())
}
