use thiserror::Error;

use crate::decimal::{Money, Rate};

#[derive(Error, Debug)]
pub enum LedgerError {
    #[error("invalid date in {field}: {value}")]
    InvalidDate {
        field: &'static str,
        value: String,
    },

    #[error("missing field: {field}")]
    MissingField {
        field: &'static str,
    },

    #[error("negative principal: {amount}")]
    NegativePrincipal {
        amount: Money,
    },

    #[error("invalid interest rate: {rate}")]
    InvalidInterestRate {
        rate: Rate,
    },

    #[error("arithmetic overflow during {operation}")]
    ArithmeticOverflow {
        operation: &'static str,
    },

    #[error("invalid configuration: {message}")]
    InvalidConfiguration {
        message: String,
    },

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, LedgerError>;
