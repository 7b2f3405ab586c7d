mod expense;

pub use expense::{month_bounds, Expense, PaymentMethod};
