/// time control - deterministic balances with a controlled clock
use chrono::{Duration, TimeZone, Utc};
use household_finance_rs::{Loan, Money, Rate, SafeTimeProvider, TimeSource};
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    println!("=== time control example ===\n");

    let time = SafeTimeProvider::new(TimeSource::Test(
        Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
    ));
    let controller = time.test_control().unwrap();

    let loan = Loan::builder()
        .principal(Money::from_major(3_000_000))
        .rate(Rate::from_percentage(5))
        .term_months(300)
        .start_date(time.now().date_naive())
        .build()?;

    println!("starting date: {}", time.now().format("%Y-%m-%d"));
    println!("monthly payment: {} kr\n", loan.monthly_payment()?);

    for year in 1..=5 {
        controller.advance(Duration::days(365));
        let position = loan.balance(&time)?;
        println!(
            "year {} ({}): balance {} kr, {}% paid, {} months left",
            year,
            time.now().format("%Y-%m-%d"),
            position.current_balance,
            position.principal_paid_pct,
            position.remaining_months,
        );
    }

    Ok(())
}
