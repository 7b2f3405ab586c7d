mod error;
mod schema;

use rusqlite::types::{Type, ValueRef};
use rusqlite::{params, Connection, Row, ToSql};
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::path::Path;
use std::str::FromStr;

use chrono::NaiveDate;

use crate::models::*;

pub(crate) use error::{StoreError, StoreResult};

const EXPENSE_COLUMNS: &str = "id, amount, description, category, date, payment_method, notes";

/// Owns the SQLite connection and every durable record: expenses plus the
/// monthly budget setting. Callers only ever get owned copies back.
pub(crate) struct ExpenseStore {
    conn: Connection,
}

impl ExpenseStore {
    pub(crate) fn open(path: &Path) -> StoreResult<Self> {
        let conn = Connection::open(path)?;
        conn.execute_batch("PRAGMA journal_mode=WAL;")?;
        let mut store = Self { conn };
        store.migrate()?;
        tracing::info!(path = %path.display(), "opened expense store");
        Ok(store)
    }

    #[cfg(test)]
    pub(crate) fn open_in_memory() -> StoreResult<Self> {
        let conn = Connection::open_in_memory()?;
        let mut store = Self { conn };
        store.migrate()?;
        Ok(store)
    }

    /// Release the connection, reporting anything SQLite complains about on close.
    pub(crate) fn close(self) -> StoreResult<()> {
        self.conn.close().map_err(|(_, e)| StoreError::Storage(e))?;
        tracing::debug!("closed expense store");
        Ok(())
    }

    fn migrate(&mut self) -> StoreResult<()> {
        let has_version_table: bool = self.conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type='table' AND name='schema_version')",
            [],
            |row| row.get(0),
        )?;

        if !has_version_table {
            // Fresh file, or one written before versioning existed. Every
            // statement in the base schema is IF NOT EXISTS, so both are safe.
            let tx = self.conn.transaction()?;
            tx.execute_batch(schema::SCHEMA_V1)?;
            tx.execute(
                "INSERT INTO schema_version (version) VALUES (?1)",
                params![schema::CURRENT_VERSION],
            )?;
            tx.commit()?;
            return Ok(());
        }

        // An emptied version table counts as version 0.
        let recorded: Option<i32> = match self.conn.query_row(
            "SELECT version FROM schema_version LIMIT 1",
            [],
            |row| row.get(0),
        ) {
            Ok(version) => Some(version),
            Err(rusqlite::Error::QueryReturnedNoRows) => None,
            Err(e) => return Err(e.into()),
        };
        let current = recorded.unwrap_or(0);

        for &(from_version, sql) in schema::MIGRATIONS {
            if current <= from_version {
                self.conn.execute_batch(sql)?;
            }
        }

        match recorded {
            None => {
                self.conn.execute(
                    "INSERT INTO schema_version (version) VALUES (?1)",
                    params![schema::CURRENT_VERSION],
                )?;
            }
            Some(version) if version < schema::CURRENT_VERSION => {
                self.conn.execute(
                    "UPDATE schema_version SET version = ?1",
                    params![schema::CURRENT_VERSION],
                )?;
            }
            Some(_) => {}
        }

        Ok(())
    }

    // ── Settings ──────────────────────────────────────────────

    /// The stored monthly budget, or zero when none has been set.
    pub(crate) fn get_monthly_budget(&self) -> StoreResult<Decimal> {
        let result = self.conn.query_row(
            "SELECT value FROM settings WHERE key = ?1",
            params![schema::MONTHLY_BUDGET_KEY],
            |row| decimal_column(row, 0),
        );
        match result {
            Ok(budget) => Ok(budget),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(Decimal::ZERO),
            Err(e) => Err(e.into()),
        }
    }

    pub(crate) fn set_monthly_budget(&self, budget: Decimal) -> StoreResult<()> {
        if budget <= Decimal::ZERO {
            return Err(StoreError::InvalidArgument(format!(
                "monthly budget must be positive, got {budget}"
            )));
        }
        self.conn.execute(
            "INSERT INTO settings (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
            params![schema::MONTHLY_BUDGET_KEY, budget.to_string()],
        )?;
        tracing::info!(%budget, "monthly budget updated");
        Ok(())
    }

    // ── Expenses ──────────────────────────────────────────────

    /// Persist `expense` and return the id assigned to it. Any `id` already
    /// on the value is ignored.
    pub(crate) fn add_expense(&self, expense: &Expense) -> StoreResult<i64> {
        self.conn.execute(
            "INSERT INTO expenses (amount, description, category, date, payment_method, notes)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                expense.amount.to_string(),
                expense.description,
                expense.category,
                expense.date,
                expense.payment_method.as_str(),
                expense.notes,
            ],
        )?;
        let id = self.conn.last_insert_rowid();
        tracing::debug!(id, amount = %expense.amount, "expense added");
        Ok(id)
    }

    pub(crate) fn get_all_expenses(&self) -> StoreResult<Vec<Expense>> {
        self.query_expenses("1=1", &[])
    }

    /// Exact, case-sensitive category match.
    pub(crate) fn get_expenses_by_category(&self, category: &str) -> StoreResult<Vec<Expense>> {
        self.query_expenses("category = ?1", &[&category])
    }

    /// Both bounds inclusive. An inverted range simply matches nothing.
    pub(crate) fn get_expenses_by_date_range(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> StoreResult<Vec<Expense>> {
        self.query_expenses("date >= ?1 AND date <= ?2", &[&start, &end])
    }

    /// Literal substring match against description or notes. SQLite's LIKE
    /// folds ASCII case; an empty term matches every record.
    pub(crate) fn search_expenses(&self, term: &str) -> StoreResult<Vec<Expense>> {
        let pattern = like_pattern(term);
        self.query_expenses(
            "(description LIKE ?1 ESCAPE '\\' OR notes LIKE ?1 ESCAPE '\\')",
            &[&pattern],
        )
    }

    pub(crate) fn delete_expense(&self, id: i64) -> StoreResult<()> {
        let affected = self
            .conn
            .execute("DELETE FROM expenses WHERE id = ?1", params![id])?;
        if affected == 0 {
            return Err(StoreError::NotFound(id));
        }
        tracing::debug!(id, "expense deleted");
        Ok(())
    }

    pub(crate) fn count_expenses(&self) -> StoreResult<i64> {
        Ok(self
            .conn
            .query_row("SELECT COUNT(*) FROM expenses", [], |row| row.get(0))?)
    }

    fn query_expenses(&self, filter: &str, params: &[&dyn ToSql]) -> StoreResult<Vec<Expense>> {
        let sql = format!(
            "SELECT {EXPENSE_COLUMNS} FROM expenses WHERE {filter} ORDER BY date DESC, id DESC"
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map(params, expense_from_row)?;
        Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
    }

    // ── Analytics ─────────────────────────────────────────────

    /// Sum of every expense dated within the given calendar month.
    pub(crate) fn get_total_expenses_for_month(&self, year: i32, month: u32) -> StoreResult<Decimal> {
        let (first, last) = month_bounds(year, month).ok_or_else(|| {
            StoreError::InvalidArgument(format!("invalid month: {year}-{month:02}"))
        })?;
        let mut stmt = self
            .conn
            .prepare("SELECT amount FROM expenses WHERE date >= ?1 AND date <= ?2")?;
        let amounts = stmt.query_map(params![first, last], |row| decimal_column(row, 0))?;
        let mut total = Decimal::ZERO;
        for amount in amounts {
            total = total
                .checked_add(amount?)
                .ok_or(StoreError::Overflow("monthly expenses"))?;
        }
        Ok(total)
    }

    /// Total spent per distinct category. Iteration order carries no meaning.
    pub(crate) fn get_category_totals(&self) -> StoreResult<HashMap<String, Decimal>> {
        let mut stmt = self.conn.prepare("SELECT category, amount FROM expenses")?;
        let rows = stmt.query_map([], |row| {
            Ok((row.get::<_, String>(0)?, decimal_column(row, 1)?))
        })?;
        let mut totals: HashMap<String, Decimal> = HashMap::new();
        for row in rows {
            let (category, amount) = row?;
            let total = totals.entry(category).or_default();
            *total = total
                .checked_add(amount)
                .ok_or(StoreError::Overflow("category expenses"))?;
        }
        Ok(totals)
    }
}

fn expense_from_row(row: &Row<'_>) -> rusqlite::Result<Expense> {
    let method: String = row.get(5)?;
    let payment_method = PaymentMethod::parse(&method).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            5,
            Type::Text,
            format!("unknown payment method: {method}").into(),
        )
    })?;
    Ok(Expense {
        id: Some(row.get(0)?),
        amount: decimal_column(row, 1)?,
        description: row.get(2)?,
        category: row.get(3)?,
        date: row.get(4)?,
        payment_method,
        notes: row.get::<_, Option<String>>(6)?.unwrap_or_default(),
    })
}

/// Read a monetary value. New rows hold decimal text; files written by older
/// versions of the tracker hold REAL (or INTEGER) values.
fn decimal_column(row: &Row<'_>, idx: usize) -> rusqlite::Result<Decimal> {
    let text = match row.get_ref(idx)? {
        ValueRef::Text(bytes) => String::from_utf8_lossy(bytes).trim().to_string(),
        ValueRef::Real(f) => f.to_string(),
        ValueRef::Integer(i) => return Ok(Decimal::from(i)),
        other => {
            return Err(rusqlite::Error::InvalidColumnType(
                idx,
                "amount".into(),
                other.data_type(),
            ))
        }
    };
    Decimal::from_str(&text)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

fn like_pattern(term: &str) -> String {
    let mut pattern = String::with_capacity(term.len() + 2);
    pattern.push('%');
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}
