mod budget_json;
mod ledger_csv;

use anyhow::{Context, Result};
use rust_decimal::Decimal;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::models::*;

pub(crate) const LEDGER_FILE: &str = "transactions.csv";
pub(crate) const BUDGET_FILE: &str = "budgets.json";

/// Flat-file store rooted at one data directory.
///
/// Every operation reads the files fresh and every mutation rewrites the
/// whole file; nothing is cached between calls.
pub(crate) struct Storage {
    dir: PathBuf,
}

impl Storage {
    pub(crate) fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub(crate) fn dir(&self) -> &Path {
        &self.dir
    }

    pub(crate) fn ledger_path(&self) -> PathBuf {
        self.dir.join(LEDGER_FILE)
    }

    pub(crate) fn budgets_path(&self) -> PathBuf {
        self.dir.join(BUDGET_FILE)
    }

    /// Create the data directory, a header-only ledger and an empty budget map
    /// if any of them is missing. Existing files are left untouched.
    pub(crate) fn ensure_storage(&self) -> Result<()> {
        std::fs::create_dir_all(&self.dir).with_context(|| {
            format!("Failed to create data directory: {}", self.dir.display())
        })?;

        let ledger_path = self.ledger_path();
        if !ledger_path.exists() {
            ledger_csv::write_ledger(&ledger_path, &[])?;
            info!(path = %ledger_path.display(), "created empty ledger");
        }

        let budgets_path = self.budgets_path();
        if !budgets_path.exists() {
            budget_json::write_budgets(&budgets_path, &Budgets::new())?;
            info!(path = %budgets_path.display(), "created empty budget map");
        }
        Ok(())
    }

    // ── Ledger ────────────────────────────────────────────────

    pub(crate) fn load_ledger(&self) -> Result<Vec<Transaction>> {
        self.ensure_storage()?;
        let ledger = ledger_csv::read_ledger(&self.ledger_path())?;
        debug!(rows = ledger.len(), "loaded ledger");
        Ok(ledger)
    }

    /// Full replace: callers load, mutate the copy, then save all of it.
    pub(crate) fn save_ledger(&self, ledger: &[Transaction]) -> Result<()> {
        ledger_csv::write_ledger(&self.ledger_path(), ledger)?;
        debug!(rows = ledger.len(), "saved ledger");
        Ok(())
    }

    /// Append one entry (text fields trimmed) and persist the whole ledger.
    /// Input is assumed to be validated already.
    pub(crate) fn add_transaction(&self, entry: NewTransaction) -> Result<Transaction> {
        let mut ledger = self.load_ledger()?;
        let txn = entry.normalize();
        ledger.push(txn.clone());
        self.save_ledger(&ledger)?;
        info!(category = %txn.category, rows = ledger.len(), "added transaction");
        Ok(txn)
    }

    pub(crate) fn update_transaction(&self, index: usize, txn: Transaction) -> Result<()> {
        let mut ledger = self.load_ledger()?;
        let len = ledger.len();
        let slot = ledger
            .get_mut(index)
            .ok_or_else(|| anyhow::anyhow!("No transaction at index {index} (ledger has {len} rows)"))?;
        *slot = txn;
        self.save_ledger(&ledger)?;
        info!(index, "updated transaction");
        Ok(())
    }

    /// Remove the rows at `indices`. Nothing is written if any index is out
    /// of range.
    pub(crate) fn delete_transactions(&self, indices: &[usize]) -> Result<usize> {
        let mut ledger = self.load_ledger()?;

        let mut doomed = indices.to_vec();
        doomed.sort_unstable();
        doomed.dedup();
        if let Some(&bad) = doomed.iter().find(|&&i| i >= ledger.len()) {
            anyhow::bail!(
                "No transaction at index {bad} (ledger has {} rows)",
                ledger.len()
            );
        }

        for &i in doomed.iter().rev() {
            ledger.remove(i);
        }
        self.save_ledger(&ledger)?;
        info!(removed = doomed.len(), rows = ledger.len(), "deleted transactions");
        Ok(doomed.len())
    }

    // ── Budgets ───────────────────────────────────────────────

    pub(crate) fn load_budgets(&self) -> Result<Budgets> {
        self.ensure_storage()?;
        let budgets = budget_json::read_budgets(&self.budgets_path())?;
        debug!(categories = budgets.len(), "loaded budgets");
        Ok(budgets)
    }

    pub(crate) fn save_budgets(&self, budgets: &Budgets) -> Result<()> {
        budget_json::write_budgets(&self.budgets_path(), budgets)?;
        debug!(categories = budgets.len(), "saved budgets");
        Ok(())
    }

    /// Insert or overwrite one limit. Returns the limit it replaced, if any.
    pub(crate) fn set_budget(&self, category: &str, limit: Decimal) -> Result<Option<Decimal>> {
        let mut budgets = self.load_budgets()?;
        let previous = budgets.get(category.trim());
        budgets.set(category, limit);
        self.save_budgets(&budgets)?;
        info!(category = category.trim(), %limit, "set budget");
        Ok(previous)
    }

    pub(crate) fn remove_budget(&self, category: &str) -> Result<bool> {
        let mut budgets = self.load_budgets()?;
        if budgets.remove(category).is_none() {
            return Ok(false);
        }
        self.save_budgets(&budgets)?;
        info!(category = category.trim(), "removed budget");
        Ok(true)
    }
}
