/// csv detection - infer a bank export layout and read its rows
use household_finance_rs::{detect_csv_format, parse_statement};
use tracing_subscriber::EnvFilter;

const DNB_EXPORT: &str = "\"Dato\";\"Forklaringstekst\";\"Rentedato\";\"Ut fra konto\";\"Inn på konto\"\r\n\
\"02.01.2024\";\"Varekjøp Kiwi Majorstuen\";\"02.01.2024\";\"312,40\";\"\"\r\n\
\"05.01.2024\";\"Husleie januar\";\"05.01.2024\";\"14 500,00\";\"\"\r\n\
\"15.01.2024\";\"Lønn\";\"15.01.2024\";\"\";\"42 180,00\"\r\n";

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let detection = detect_csv_format(DNB_EXPORT, 20);
    println!("{}", serde_json::to_string_pretty(&detection)?);

    let import = parse_statement(DNB_EXPORT, &detection)?;
    for row in &import.rows {
        println!("{}  {:>12} kr  {}", row.date, row.amount, row.description);
    }
    println!("skipped rows: {}", import.skipped);

    Ok(())
}
