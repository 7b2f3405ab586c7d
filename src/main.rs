mod db;
mod logging;
mod models;
mod shell;

use anyhow::{Context, Result};
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

const DB_PATH_ENV: &str = "EXPENSE_TRACKER_DB";

fn main() -> ExitCode {
    logging::init();
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<()> {
    let db_path = get_db_path()?;
    let store = db::ExpenseStore::open(&db_path)
        .with_context(|| format!("Failed to initialize database: {}", db_path.display()))?;

    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut shell = shell::Shell::new(&store, stdin.lock(), stdout.lock());
    shell.ensure_budget()?;
    shell.run()?;
    drop(shell);

    store.close().context("Failed to close database")?;
    Ok(())
}

fn get_db_path() -> Result<PathBuf> {
    if let Some(path) = std::env::var_os(DB_PATH_ENV) {
        return Ok(PathBuf::from(path));
    }
    let proj_dirs = directories::ProjectDirs::from("com", "expense-tracker", "ExpenseTracker")
        .ok_or_else(|| anyhow::anyhow!("Could not determine data directory"))?;
    let data_dir = proj_dirs.data_dir();
    std::fs::create_dir_all(data_dir)
        .with_context(|| format!("Failed to create data directory: {}", data_dir.display()))?;
    Ok(data_dir.join("expenses.db"))
}
