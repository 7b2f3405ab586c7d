use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::str::FromStr;
use thiserror::Error;

use crate::models::PaymentMethod;

/// Rejected user input. None of these ever reach the store.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub(crate) enum InputError {
    #[error("invalid amount. Please enter a positive number")]
    InvalidAmount,

    #[error("invalid budget amount. Please enter a positive number")]
    InvalidBudget,

    #[error("amount too large. Please enter at most {MAX_AMOUNT}")]
    TooLarge,

    #[error("{0} cannot be empty")]
    Empty(&'static str),

    #[error("invalid {0} format. Please use YYYY-MM-DD")]
    InvalidDate(&'static str),

    #[error("invalid payment method. Please enter 'Cash' or 'UPI'")]
    InvalidPaymentMethod,

    #[error("start date cannot be after end date")]
    StartAfterEnd,

    #[error("invalid ID. Please enter a number")]
    InvalidId,
}

/// Largest amount or budget accepted at the prompt. Keeps every realistic
/// sum of stored amounts far below `Decimal::MAX`.
pub(crate) const MAX_AMOUNT: i64 = 1_000_000_000_000;

fn parse_positive(s: &str, invalid: InputError) -> Result<Decimal, InputError> {
    let s = s.trim();
    let value = Decimal::from_str(s)
        .or_else(|_| Decimal::from_scientific(s))
        .map_err(|_| invalid.clone())?;
    if value <= Decimal::ZERO {
        return Err(invalid);
    }
    if value > Decimal::from(MAX_AMOUNT) {
        return Err(InputError::TooLarge);
    }
    Ok(value)
}

pub(crate) fn parse_amount(s: &str) -> Result<Decimal, InputError> {
    parse_positive(s, InputError::InvalidAmount)
}

pub(crate) fn parse_budget(s: &str) -> Result<Decimal, InputError> {
    parse_positive(s, InputError::InvalidBudget)
}

/// Trimmed, non-empty text. `field` names the value in the error message.
pub(crate) fn parse_required(s: &str, field: &'static str) -> Result<String, InputError> {
    let s = s.trim();
    if s.is_empty() {
        return Err(InputError::Empty(field));
    }
    Ok(s.to_string())
}

/// Strict `YYYY-MM-DD`.
pub(crate) fn parse_date(s: &str, field: &'static str) -> Result<NaiveDate, InputError> {
    let s = s.trim();
    if s.len() != 10 {
        return Err(InputError::InvalidDate(field));
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|_| InputError::InvalidDate(field))
}

/// Blank input means `today`.
pub(crate) fn parse_date_or(s: &str, today: NaiveDate) -> Result<NaiveDate, InputError> {
    if s.trim().is_empty() {
        return Ok(today);
    }
    parse_date(s, "date")
}

pub(crate) fn parse_payment_method(s: &str) -> Result<PaymentMethod, InputError> {
    PaymentMethod::parse(s).ok_or(InputError::InvalidPaymentMethod)
}

pub(crate) fn check_date_range(start: NaiveDate, end: NaiveDate) -> Result<(), InputError> {
    if start > end {
        return Err(InputError::StartAfterEnd);
    }
    Ok(())
}

pub(crate) fn parse_id(s: &str) -> Result<i64, InputError> {
    s.trim().parse().map_err(|_| InputError::InvalidId)
}
