/// early payoff - extra payments and what-if projections
use household_finance_rs::chrono::NaiveDate;
use household_finance_rs::{compute_early_payoff, Loan, Money, Rate, Decimal};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== early payoff example ===\n");

    let today = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();
    let loan = Loan::builder()
        .principal(Money::from_major(2_400_000))
        .rate(Rate::from_percentage_decimal(Decimal::new(525, 2)))
        .term_months(300)
        .start_date(NaiveDate::from_ymd_opt(2021, 3, 10).unwrap())
        .extra_payment(NaiveDate::from_ymd_opt(2023, 5, 2).unwrap(), Money::from_major(50_000))
        .extra_payment(NaiveDate::from_ymd_opt(2023, 5, 28).unwrap(), Money::from_major(25_000))
        .build()?;

    let position = loan.balance_on(today)?;
    println!("balance today: {} kr", position.current_balance);
    println!("regular payment: {} kr\n", position.monthly_payment);

    for extra in [1_000, 2_500, 5_000] {
        match loan.early_payoff(today, Money::from_major(extra))? {
            Some(projection) => println!(
                "+{extra} kr/month: {} months sooner, {} kr less interest",
                projection.months_saved, projection.interest_saved
            ),
            None => println!("+{extra} kr/month: nothing to project"),
        }
    }

    // a payment that cannot cover interest has no projection
    let too_low = compute_early_payoff(
        position.current_balance,
        loan.terms().annual_rate,
        Money::from_major(1_000),
        Money::ZERO,
    );
    println!("\npayment too low: {}", too_low.is_none());

    Ok(())
}
