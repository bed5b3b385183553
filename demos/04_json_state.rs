/// json state - serialization for debugging and persistence
use household_finance_rs::chrono::NaiveDate;
use household_finance_rs::{Loan, Money, Rate};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== json state serialization ===\n");

    let loan = Loan::builder()
        .principal(Money::from_major(400_000))
        .rate(Rate::from_percentage(6))
        .term_months(120)
        .start_date(NaiveDate::from_ymd_opt(2019, 9, 1).unwrap())
        .opening_checkpoint(Money::from_major(310_000), NaiveDate::from_ymd_opt(2022, 1, 1).unwrap())
        .extra_payment(NaiveDate::from_ymd_opt(2023, 2, 14).unwrap(), Money::from_major(20_000))
        .build()?;

    println!("snapshot:");
    println!("{}\n", loan.to_json_pretty(NaiveDate::from_ymd_opt(2024, 6, 1).unwrap())?);

    println!("stored loan:");
    let stored = serde_json::to_string_pretty(&loan)?;
    println!("{stored}\n");

    let restored: Loan = serde_json::from_str(&stored)?;
    println!("round trip equal: {}", restored == loan);

    let schedule = loan.schedule()?;
    println!("first scheduled payment: {:?}", schedule.get_payment(1));

    Ok(())
}
