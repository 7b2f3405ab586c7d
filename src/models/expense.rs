use chrono::{Datelike, Months, NaiveDate};
use rust_decimal::Decimal;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentMethod {
    Cash,
    Upi,
}

impl PaymentMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Cash => "CASH",
            Self::Upi => "UPI",
        }
    }

    /// Case-insensitive; surrounding whitespace is ignored.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_uppercase().as_str() {
            "CASH" => Some(Self::Cash),
            "UPI" => Some(Self::Upi),
            _ => None,
        }
    }
}

impl std::fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Expense {
    pub id: Option<i64>,
    pub amount: Decimal,
    pub description: String,
    pub category: String,
    pub date: NaiveDate,
    pub payment_method: PaymentMethod,
    pub notes: String,
}

impl Expense {
    pub fn new(
        amount: Decimal,
        description: String,
        category: String,
        date: NaiveDate,
        payment_method: PaymentMethod,
    ) -> Self {
        Self {
            id: None,
            amount,
            description,
            category,
            date,
            payment_method,
            notes: String::new(),
        }
    }

    pub fn with_notes(mut self, notes: String) -> Self {
        self.notes = notes;
        self
    }

    pub fn is_in_month(&self, year: i32, month: u32) -> bool {
        self.date.year() == year && self.date.month() == month
    }
}

/// First and last day of a calendar month, or `None` if the month is invalid.
pub fn month_bounds(year: i32, month: u32) -> Option<(NaiveDate, NaiveDate)> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    let last = first.checked_add_months(Months::new(1))?.pred_opt()?;
    Some((first, last))
}
