use thiserror::Error;

use crate::decimal::Money;

#[derive(Error, Debug)]
pub enum FinanceError {
    #[error("invalid argument: {message}")]
    InvalidArgument {
        message: String,
    },

    #[error("invalid date: {message}")]
    InvalidDate {
        message: String,
    },

    #[error("invalid payment amount: {amount}")]
    InvalidPaymentAmount {
        amount: Money,
    },

    #[error("missing column in statement header: {column}")]
    MissingColumn {
        column: String,
    },

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

impl FinanceError {
    pub(crate) fn invalid_argument(message: impl Into<String>) -> Self {
        FinanceError::InvalidArgument {
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, FinanceError>;
