mod display;
mod input;
mod util;

use anyhow::{Context, Result};
use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use std::io::{self, BufRead, Write};
use thiserror::Error;

use crate::db::{ExpenseStore, StoreError};
use crate::models::Expense;

use display::Statistics;
use input::InputError;
use util::format_amount;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum MenuChoice {
    Add,
    ViewAll,
    ViewByCategory,
    ViewByDate,
    Search,
    Delete,
    Stats,
    Exit,
}

impl MenuChoice {
    pub(crate) fn parse(s: &str) -> Option<Self> {
        match s.trim() {
            "1" => Some(Self::Add),
            "2" => Some(Self::ViewAll),
            "3" => Some(Self::ViewByCategory),
            "4" => Some(Self::ViewByDate),
            "5" => Some(Self::Search),
            "6" => Some(Self::Delete),
            "7" => Some(Self::Stats),
            "8" => Some(Self::Exit),
            _ => None,
        }
    }
}

/// How a single menu action can fail. Only `Io` ends the session; the
/// others are reported and the loop goes back to the menu.
#[derive(Error, Debug)]
enum ActionError {
    #[error(transparent)]
    Input(#[from] InputError),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Io(#[from] io::Error),
}

type ActionResult = std::result::Result<(), ActionError>;

/// Amount by which `month_total + amount` overshoots `budget`, if it does.
/// A zero budget means no budget is enforced.
pub(crate) fn budget_overage(budget: Decimal, month_total: Decimal, amount: Decimal) -> Option<Decimal> {
    if budget <= Decimal::ZERO {
        return None;
    }
    let new_total = month_total.saturating_add(amount);
    (new_total > budget).then(|| new_total - budget)
}

pub(crate) fn local_today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

/// The interactive menu loop. Reads from `input`, writes to `out`, and
/// talks to the store only after input has been validated.
pub(crate) struct Shell<'a, R, W> {
    store: &'a ExpenseStore,
    input: R,
    out: W,
    today: fn() -> NaiveDate,
    input_closed: bool,
}

impl<'a, R: BufRead, W: Write> Shell<'a, R, W> {
    pub(crate) fn new(store: &'a ExpenseStore, input: R, out: W) -> Self {
        Self {
            store,
            input,
            out,
            today: local_today,
            input_closed: false,
        }
    }

    #[cfg(test)]
    pub(crate) fn with_clock(mut self, today: fn() -> NaiveDate) -> Self {
        self.today = today;
        self
    }

    #[cfg(test)]
    pub(crate) fn into_output(self) -> W {
        self.out
    }

    /// First-run setup: ask for a monthly budget if none is stored yet.
    /// Any failure here is fatal to startup.
    pub(crate) fn ensure_budget(&mut self) -> Result<()> {
        let budget = self
            .store
            .get_monthly_budget()
            .context("Error checking monthly budget")?;
        if budget > Decimal::ZERO {
            return Ok(());
        }

        writeln!(self.out, "\n=== Welcome to Expense Tracker ===")?;
        let answer = self.prompt("Enter your expected spending per month: ")?;
        let budget = input::parse_budget(&answer)?;
        self.store
            .set_monthly_budget(budget)
            .context("Failed to save monthly budget")?;
        display::success(
            &mut self.out,
            &format!("Monthly budget set to {}", format_amount(budget)),
        )?;
        Ok(())
    }

    pub(crate) fn run(&mut self) -> Result<()> {
        loop {
            write!(self.out, "{}", display::MENU)?;
            let line = self.prompt("\nSelect an option: ")?;
            if self.input_closed {
                break;
            }

            let result = match MenuChoice::parse(&line) {
                Some(MenuChoice::Add) => self.add_expense(),
                Some(MenuChoice::ViewAll) => self.view_all(),
                Some(MenuChoice::ViewByCategory) => self.view_by_category(),
                Some(MenuChoice::ViewByDate) => self.view_by_date(),
                Some(MenuChoice::Search) => self.search(),
                Some(MenuChoice::Delete) => self.delete(),
                Some(MenuChoice::Stats) => self.statistics(),
                Some(MenuChoice::Exit) => break,
                None => {
                    writeln!(
                        self.out,
                        "\nInvalid option. Please select a number between 1-8."
                    )?;
                    Ok(())
                }
            };

            match result {
                Ok(()) => {}
                Err(ActionError::Io(e)) => return Err(e).context("Failed to talk to the terminal"),
                Err(ActionError::Store(e)) => {
                    tracing::warn!(error = %e, "store operation failed");
                    display::error(&mut self.out, &e)?;
                }
                Err(ActionError::Input(e)) => display::error(&mut self.out, &e)?,
            }
        }

        writeln!(self.out, "\nThank you for using Expense Tracker!")?;
        self.out.flush()?;
        Ok(())
    }

    fn prompt(&mut self, label: &str) -> io::Result<String> {
        write!(self.out, "{label}")?;
        self.out.flush()?;
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            self.input_closed = true;
        }
        Ok(line.trim().to_string())
    }

    // ── Actions ───────────────────────────────────────────────

    fn read_expense(&mut self) -> std::result::Result<Expense, ActionError> {
        writeln!(self.out, "\n=== Add New Expense ===")?;

        let amount = input::parse_amount(&self.prompt("Enter amount: ")?)?;
        let description =
            input::parse_required(&self.prompt("Enter description: ")?, "description")?;
        let category = input::parse_required(
            &self.prompt("Enter category (e.g., Food, Transport, Entertainment): ")?,
            "category",
        )?;
        let date = input::parse_date_or(
            &self.prompt("Enter date (YYYY-MM-DD) or press Enter for today: ")?,
            (self.today)(),
        )?;
        let payment_method =
            input::parse_payment_method(&self.prompt("Enter payment method (Cash/UPI): ")?)?;
        let notes = self.prompt("Enter notes (optional): ")?;

        Ok(Expense::new(amount, description, category, date, payment_method).with_notes(notes))
    }

    fn add_expense(&mut self) -> ActionResult {
        let expense = self.read_expense()?;
        self.warn_if_over_budget(&expense)?;
        self.store.add_expense(&expense)?;
        display::success(&mut self.out, "Expense added successfully!")?;
        Ok(())
    }

    /// Advisory only: a failed lookup skips the warning rather than the insert.
    fn warn_if_over_budget(&mut self, expense: &Expense) -> io::Result<()> {
        let today = (self.today)();
        if !expense.is_in_month(today.year(), today.month()) {
            return Ok(());
        }
        let lookup = self.store.get_monthly_budget().and_then(|budget| {
            let total = self
                .store
                .get_total_expenses_for_month(today.year(), today.month())?;
            Ok((budget, total))
        });
        let (budget, month_total) = match lookup {
            Ok(found) => found,
            Err(e) => {
                tracing::warn!(error = %e, "skipping budget check");
                return Ok(());
            }
        };
        if let Some(over) = budget_overage(budget, month_total, expense.amount) {
            tracing::info!(%budget, %month_total, amount = %expense.amount, "monthly budget exceeded");
            display::warning(
                &mut self.out,
                &format!(
                    "Adding this expense will exceed your monthly budget by {}!",
                    format_amount(over)
                ),
            )?;
        }
        Ok(())
    }

    fn view_all(&mut self) -> ActionResult {
        let expenses = self.store.get_all_expenses()?;
        display::expenses(&mut self.out, &expenses)?;
        Ok(())
    }

    fn view_by_category(&mut self) -> ActionResult {
        let category =
            input::parse_required(&self.prompt("Enter category to filter: ")?, "category")?;
        let expenses = self.store.get_expenses_by_category(&category)?;
        display::expenses(&mut self.out, &expenses)?;
        Ok(())
    }

    fn view_by_date(&mut self) -> ActionResult {
        let start = input::parse_date(&self.prompt("Enter start date (YYYY-MM-DD): ")?, "start date")?;
        let end = input::parse_date(&self.prompt("Enter end date (YYYY-MM-DD): ")?, "end date")?;
        input::check_date_range(start, end)?;
        let expenses = self.store.get_expenses_by_date_range(start, end)?;
        display::expenses(&mut self.out, &expenses)?;
        Ok(())
    }

    fn search(&mut self) -> ActionResult {
        let term = input::parse_required(
            &self.prompt("Enter search term (searches in description and notes): ")?,
            "search term",
        )?;
        let expenses = self.store.search_expenses(&term)?;
        display::expenses(&mut self.out, &expenses)?;
        Ok(())
    }

    fn delete(&mut self) -> ActionResult {
        let id = input::parse_id(&self.prompt("Enter expense ID to delete: ")?)?;
        self.store.delete_expense(id)?;
        display::success(
            &mut self.out,
            &format!("Expense with ID {id} deleted successfully!"),
        )?;
        Ok(())
    }

    fn statistics(&mut self) -> ActionResult {
        let stats = self.collect_statistics()?;
        display::statistics(&mut self.out, &stats)?;
        Ok(())
    }

    fn collect_statistics(&self) -> std::result::Result<Statistics, StoreError> {
        let today = (self.today)();
        let budget = self.store.get_monthly_budget()?;
        let month_total = self
            .store
            .get_total_expenses_for_month(today.year(), today.month())?;
        let record_count = self.store.count_expenses()?;

        let mut category_totals: Vec<(String, Decimal)> =
            self.store.get_category_totals()?.into_iter().collect();
        category_totals.sort_by(|a, b| a.0.cmp(&b.0));
        let all_total = category_totals
            .iter()
            .try_fold(Decimal::ZERO, |acc, (_, total)| acc.checked_add(*total))
            .ok_or(StoreError::Overflow("all expenses"))?;

        Ok(Statistics {
            budget,
            month_total,
            all_total,
            record_count,
            category_totals,
        })
    }
}

#[cfg(test)]
mod input_tests;
#[cfg(test)]
mod util_tests;
