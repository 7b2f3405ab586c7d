#![allow(clippy::unwrap_used)]

use chrono::NaiveDate;
use rust_decimal_macros::dec;

use super::input::*;
use crate::models::PaymentMethod;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

// ── amounts ───────────────────────────────────────────────────

#[test]
fn test_parse_amount_basic() {
    assert_eq!(parse_amount("250.50").unwrap(), dec!(250.50));
    assert_eq!(parse_amount("42").unwrap(), dec!(42));
    assert_eq!(parse_amount("  7.5 ").unwrap(), dec!(7.5));
}

#[test]
fn test_parse_amount_scientific() {
    assert_eq!(parse_amount("1e3").unwrap(), dec!(1000));
}

#[test]
fn test_parse_amount_rejects_non_positive() {
    assert_eq!(parse_amount("0"), Err(InputError::InvalidAmount));
    assert_eq!(parse_amount("-5"), Err(InputError::InvalidAmount));
}

#[test]
fn test_parse_amount_rejects_garbage() {
    assert_eq!(parse_amount(""), Err(InputError::InvalidAmount));
    assert_eq!(parse_amount("abc"), Err(InputError::InvalidAmount));
    assert_eq!(parse_amount("₹100"), Err(InputError::InvalidAmount));
}

#[test]
fn test_parse_budget_error_message() {
    let err = parse_budget("-1").unwrap_err();
    assert_eq!(
        err.to_string(),
        "invalid budget amount. Please enter a positive number"
    );
    assert_eq!(parse_budget("1000").unwrap(), dec!(1000));
}

#[test]
fn test_parse_amount_upper_bound() {
    assert_eq!(parse_amount("1000000000000").unwrap(), dec!(1000000000000));
    assert_eq!(parse_amount("1000000000000.01"), Err(InputError::TooLarge));
    assert_eq!(parse_amount("1e13"), Err(InputError::TooLarge));
    assert_eq!(
        parse_amount("79228162514264337593543950335"),
        Err(InputError::TooLarge)
    );
}

#[test]
fn test_parse_budget_upper_bound() {
    let err = parse_budget("5000000000000").unwrap_err();
    assert_eq!(err, InputError::TooLarge);
    assert_eq!(
        err.to_string(),
        "amount too large. Please enter at most 1000000000000"
    );
}

// ── text ──────────────────────────────────────────────────────

#[test]
fn test_parse_required_trims() {
    assert_eq!(parse_required("  Food ", "category").unwrap(), "Food");
}

#[test]
fn test_parse_required_rejects_blank() {
    let err = parse_required("   ", "description").unwrap_err();
    assert_eq!(err, InputError::Empty("description"));
    assert_eq!(err.to_string(), "description cannot be empty");
}

// ── dates ─────────────────────────────────────────────────────

#[test]
fn test_parse_date_iso() {
    assert_eq!(parse_date("2024-03-15", "date").unwrap(), date(2024, 3, 15));
}

#[test]
fn test_parse_date_rejects_other_formats() {
    assert!(parse_date("15/03/2024", "date").is_err());
    assert!(parse_date("2024-3-5", "date").is_err());
    assert!(parse_date("2024-02-30", "date").is_err());
    assert!(parse_date("yesterday", "date").is_err());
}

#[test]
fn test_parse_date_error_names_field() {
    let err = parse_date("nope", "start date").unwrap_err();
    assert_eq!(
        err.to_string(),
        "invalid start date format. Please use YYYY-MM-DD"
    );
}

#[test]
fn test_parse_date_or_blank_is_today() {
    let today = date(2026, 10, 16);
    assert_eq!(parse_date_or("", today).unwrap(), today);
    assert_eq!(parse_date_or("   ", today).unwrap(), today);
    assert_eq!(parse_date_or("2024-01-01", today).unwrap(), date(2024, 1, 1));
}

#[test]
fn test_check_date_range() {
    assert!(check_date_range(date(2024, 3, 1), date(2024, 3, 31)).is_ok());
    assert!(check_date_range(date(2024, 3, 1), date(2024, 3, 1)).is_ok());
    assert_eq!(
        check_date_range(date(2024, 4, 1), date(2024, 3, 1)),
        Err(InputError::StartAfterEnd)
    );
}

// ── payment method & id ───────────────────────────────────────

#[test]
fn test_parse_payment_method() {
    assert_eq!(parse_payment_method("cash").unwrap(), PaymentMethod::Cash);
    assert_eq!(parse_payment_method("Upi").unwrap(), PaymentMethod::Upi);
    assert_eq!(
        parse_payment_method("card"),
        Err(InputError::InvalidPaymentMethod)
    );
}

#[test]
fn test_parse_id() {
    assert_eq!(parse_id("12").unwrap(), 12);
    assert_eq!(parse_id(" 7 ").unwrap(), 7);
    assert_eq!(parse_id("seven"), Err(InputError::InvalidId));
    assert_eq!(parse_id("1.5"), Err(InputError::InvalidId));
    assert_eq!(parse_id(""), Err(InputError::InvalidId));
}
