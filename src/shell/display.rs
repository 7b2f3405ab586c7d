use rust_decimal::Decimal;
use std::io::{self, Write};

use super::util::{cell, format_amount};
use crate::models::Expense;

const TABLE_WIDTH: usize = 120;
const STATS_WIDTH: usize = 60;

pub(crate) const MENU: &str = "
=== Expense Tracker ===
1. Add Expense
2. View All Expenses
3. View Expenses by Category
4. View Expenses by Date Range
5. Search Expenses
6. Delete Expense
7. View Statistics
8. Exit
";

/// Everything the statistics view shows, gathered from the store up front.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Statistics {
    pub budget: Decimal,
    pub month_total: Decimal,
    pub all_total: Decimal,
    pub record_count: i64,
    /// Sorted by category name.
    pub category_totals: Vec<(String, Decimal)>,
}

pub(crate) fn error(out: &mut impl Write, err: &dyn std::fmt::Display) -> io::Result<()> {
    writeln!(out, "\nError: {err}")
}

pub(crate) fn success(out: &mut impl Write, message: &str) -> io::Result<()> {
    writeln!(out, "\n✓ {message}")
}

pub(crate) fn warning(out: &mut impl Write, message: &str) -> io::Result<()> {
    writeln!(out, "\n⚠ WARNING: {message}")
}

pub(crate) fn expenses(out: &mut impl Write, expenses: &[Expense]) -> io::Result<()> {
    if expenses.is_empty() {
        return writeln!(out, "\nNo expenses found.");
    }

    let rule = "=".repeat(TABLE_WIDTH);
    writeln!(out, "\n{rule}")?;
    writeln!(
        out,
        "{:<5} {:<12} {:<25} {:<20} {:<12} {:<10} {:<20}",
        "ID", "Amount", "Description", "Category", "Date", "Payment", "Notes"
    )?;
    writeln!(out, "{rule}")?;

    for e in expenses {
        writeln!(
            out,
            "{:<5} {:<12} {} {} {:<12} {:<10} {}",
            e.id.unwrap_or(0),
            format!("{:.2}", e.amount),
            cell(&e.description, 25),
            cell(&e.category, 20),
            e.date.format("%Y-%m-%d").to_string(),
            e.payment_method.as_str(),
            cell(&e.notes, 20),
        )?;
    }
    writeln!(out, "{rule}")?;
    writeln!(out, "Total: {} expense(s)", expenses.len())
}

pub(crate) fn statistics(out: &mut impl Write, stats: &Statistics) -> io::Result<()> {
    let heavy = "=".repeat(STATS_WIDTH);
    let light = "-".repeat(STATS_WIDTH);

    writeln!(out, "\n{heavy}")?;
    writeln!(out, "=== EXPENSE STATISTICS ===")?;
    writeln!(out, "{heavy}")?;

    if stats.budget > Decimal::ZERO {
        writeln!(out, "Monthly Budget:        {}", format_amount(stats.budget))?;
        writeln!(out, "Current Month Total:   {}", format_amount(stats.month_total))?;
        let remaining = stats.budget - stats.month_total;
        if remaining >= Decimal::ZERO {
            writeln!(out, "Remaining Budget:      {}", format_amount(remaining))?;
        } else {
            let over = format_amount(-remaining);
            writeln!(out, "Over Budget:           {over}")?;
            writeln!(out, "{light}")?;
            warning(
                out,
                &format!("You have exceeded your monthly budget by {over}!"),
            )?;
        }
        writeln!(out, "{light}")?;
    }

    writeln!(out, "Total Expenses (All):  {}", format_amount(stats.all_total))?;
    writeln!(out, "Total Records:         {}", stats.record_count)?;
    writeln!(out, "{light}")?;

    if !stats.category_totals.is_empty() {
        writeln!(out, "\nCategory-wise Totals:")?;
        writeln!(out, "{light}")?;
        for (category, total) in &stats.category_totals {
            writeln!(out, "{} {}", cell(category, 25), format_amount(*total))?;
        }
    }

    writeln!(out, "{heavy}")
}
