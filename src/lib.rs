pub mod calendar;
pub mod config;
pub mod decimal;
pub mod detect;
pub mod errors;
pub mod import;
pub mod loan;
pub mod payments;
pub mod types;

// re-export key types
pub use config::{BankFingerprint, DetectorConfig};
pub use decimal::{Money, Rate};
pub use detect::{
    detect_csv_format, detect_csv_format_with, BankHint, CsvDetectionResult, DateFormat,
    DecimalSeparator, Delimiter, EncodingHint,
};
pub use errors::{FinanceError, Result};
pub use import::{import_statement, parse_amount, parse_date, parse_statement, StatementImport, StatementRow};
pub use loan::{Loan, LoanBuilder, LoanSnapshot};
pub use payments::{
    compute_early_payoff, compute_loan_balance, compute_loan_balance_now, compute_monthly_payment,
    AmortizationSchedule, ScheduledPayment,
};
pub use types::{EarlyPayoffResult, ExtraPayment, LoanBalanceResult, LoanTerms, OpeningCheckpoint};

// re-export external dependencies that users will need
pub use chrono;
pub use hourglass_rs::{SafeTimeProvider, TimeSource};
pub use rust_decimal::Decimal;
