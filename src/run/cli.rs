use anyhow::Result;
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::BTreeMap;

use crate::cli::{BudgetAction, Cli, Commands, EditArgs, FilterArgs};
use crate::insights::{
    self, BudgetAlert, CategoryTotals, LedgerFilter, MonthlySummary, Totals,
};
use crate::models::{Budgets, NewTransaction, Transaction, YearMonth};
use crate::storage::Storage;
use crate::ui::util::{
    format_amount, format_opt_amount, format_opt_date, format_rate, truncate, MISSING,
};

pub(crate) fn as_cli(cli: Cli, storage: &Storage) -> Result<()> {
    let json = cli.json;
    match cli.command {
        Commands::Init => cli_init(storage),
        Commands::Add {
            kind,
            category,
            amount,
            date,
            description,
            payment_method,
            account,
        } => {
            let entry = NewTransaction {
                date: date.unwrap_or_else(|| chrono::Local::now().date_naive()),
                kind,
                category,
                description,
                amount,
                payment_method,
                account,
            };
            cli_add(storage, entry)
        }
        Commands::List { filter } => cli_list(storage, filter.into(), json),
        Commands::Edit { index, changes } => cli_edit(storage, index, changes),
        Commands::Delete { indices } => cli_delete(storage, &indices),
        Commands::Summary => cli_summary(storage, json),
        Commands::Categories { month } => cli_categories(storage, month.month, json),
        Commands::Savings { month } => cli_savings(storage, month.month, json),
        Commands::Alerts { month } => cli_alerts(storage, month.month, json),
        Commands::Report { month } => cli_report(storage, month.month, json),
        Commands::Months => cli_months(storage, json),
        Commands::Budget { action } => match action.unwrap_or(BudgetAction::List) {
            BudgetAction::List => cli_budget_list(storage, json),
            BudgetAction::Set { category, limit } => cli_budget_set(storage, &category, limit),
            BudgetAction::Remove { category } => cli_budget_remove(storage, &category),
        },
    }
}

impl From<FilterArgs> for LedgerFilter {
    fn from(args: FilterArgs) -> Self {
        Self {
            month: args.month,
            kind: args.kind,
            category: args.category.map(|c| c.trim().to_string()),
        }
    }
}

// ── Validation ────────────────────────────────────────────────

/// Entry rules the storage layer relies on: a non-blank category and a
/// positive amount.
pub(crate) fn validate_entry(category: &str, amount: Decimal) -> Result<()> {
    if category.trim().is_empty() {
        anyhow::bail!("Category is required");
    }
    if amount <= Decimal::ZERO {
        anyhow::bail!("Amount must be greater than zero (got {amount})");
    }
    Ok(())
}

pub(crate) fn validate_budget(category: &str, limit: Decimal) -> Result<()> {
    if category.trim().is_empty() {
        anyhow::bail!("Category is required");
    }
    if limit < Decimal::ZERO {
        anyhow::bail!("Budget limit cannot be negative (got {limit})");
    }
    Ok(())
}

/// Overwrite the fields set in `changes`. Only the changed fields are
/// validated, so a row with a missing amount can still be recategorized.
pub(crate) fn apply_edits(mut txn: Transaction, changes: EditArgs) -> Result<Transaction> {
    if let Some(category) = changes.category {
        if category.trim().is_empty() {
            anyhow::bail!("Category is required");
        }
        txn.category = category.trim().to_string();
    }
    if let Some(amount) = changes.amount {
        if amount <= Decimal::ZERO {
            anyhow::bail!("Amount must be greater than zero (got {amount})");
        }
        txn.amount = Some(amount);
    }
    if let Some(kind) = changes.kind {
        txn.kind = Some(kind);
    }
    if let Some(date) = changes.date {
        txn.date = Some(date);
    }
    if let Some(description) = changes.description {
        txn.description = description.trim().to_string();
    }
    if let Some(method) = changes.payment_method {
        txn.payment_method = Some(method);
    }
    if let Some(account) = changes.account {
        txn.account = account.trim().to_string();
    }
    Ok(txn)
}

// ── Commands ──────────────────────────────────────────────────

fn cli_init(storage: &Storage) -> Result<()> {
    storage.ensure_storage()?;
    println!("Data directory: {}", storage.dir().display());
    println!("  Ledger:  {}", storage.ledger_path().display());
    println!("  Budgets: {}", storage.budgets_path().display());
    Ok(())
}

fn cli_add(storage: &Storage, entry: NewTransaction) -> Result<()> {
    validate_entry(&entry.category, entry.amount)?;
    let txn = storage.add_transaction(entry)?;
    println!(
        "Added {} {} to {} on {}",
        txn.kind.map(|k| k.as_str()).unwrap_or(MISSING),
        format_opt_amount(txn.amount),
        txn.category,
        format_opt_date(txn.date),
    );
    Ok(())
}

#[derive(Serialize)]
struct IndexedRow<'a> {
    index: usize,
    #[serde(flatten)]
    txn: &'a Transaction,
}

fn cli_list(storage: &Storage, filter: LedgerFilter, json: bool) -> Result<()> {
    let ledger = storage.load_ledger()?;
    let rows: Vec<IndexedRow> = filter
        .filter_indexed(&ledger)
        .map(|(index, txn)| IndexedRow { index, txn })
        .collect();

    if json {
        return print_json(&rows);
    }
    if rows.is_empty() {
        println!("No transactions found.");
        return Ok(());
    }

    println!(
        "{:>4}  {:<10}  {:<7}  {:<16}  {:<24}  {:>12}  {:<6}  Account",
        "#", "Date", "Type", "Category", "Description", "Amount", "Method"
    );
    println!("{}", "─".repeat(100));
    for IndexedRow { index, txn } in &rows {
        println!(
            "{:>4}  {:<10}  {:<7}  {:<16}  {:<24}  {:>12}  {:<6}  {}",
            index,
            format_opt_date(txn.date),
            txn.kind.map(|k| k.as_str()).unwrap_or(MISSING),
            truncate(&txn.category, 16),
            truncate(&txn.description, 24),
            format_opt_amount(txn.amount),
            txn.payment_method.map(|m| m.as_str()).unwrap_or(MISSING),
            txn.account,
        );
    }
    println!();
    println!("{} of {} transactions", rows.len(), ledger.len());
    Ok(())
}

fn cli_edit(storage: &Storage, index: usize, changes: EditArgs) -> Result<()> {
    let ledger = storage.load_ledger()?;
    let current = ledger.get(index).cloned().ok_or_else(|| {
        anyhow::anyhow!("No transaction at index {index} (ledger has {} rows)", ledger.len())
    })?;
    let updated = apply_edits(current, changes)?;
    storage.update_transaction(index, updated)?;
    println!("Updated transaction {index}");
    Ok(())
}

fn cli_delete(storage: &Storage, indices: &[usize]) -> Result<()> {
    let removed = storage.delete_transactions(indices)?;
    println!("Deleted {removed} transaction(s)");
    Ok(())
}

fn cli_summary(storage: &Storage, json: bool) -> Result<()> {
    let ledger = storage.load_ledger()?;
    let rows = insights::monthly_summary(&ledger, None);
    if json {
        return print_json(&rows);
    }
    print_monthly(&rows);
    Ok(())
}

fn cli_categories(storage: &Storage, month: Option<YearMonth>, json: bool) -> Result<()> {
    let ledger = storage.load_ledger()?;
    let rows = insights::category_breakdown(&ledger, month);
    if json {
        return print_json(&rows);
    }
    print_categories(&rows);
    Ok(())
}

#[derive(Serialize)]
struct SavingsRow {
    month: Option<YearMonth>,
    savings_rate: Decimal,
}

fn cli_savings(storage: &Storage, month: Option<YearMonth>, json: bool) -> Result<()> {
    let ledger = storage.load_ledger()?;
    let rate = insights::savings_rate(&ledger, month);
    if json {
        return print_json(&SavingsRow {
            month,
            savings_rate: rate,
        });
    }
    println!("Savings rate ({}): {}", scope_label(month), format_rate(rate));
    Ok(())
}

fn cli_alerts(storage: &Storage, month: Option<YearMonth>, json: bool) -> Result<()> {
    let ledger = storage.load_ledger()?;
    let budgets = storage.load_budgets()?;
    let rows = insights::budget_alerts(&ledger, &budgets, month);
    if json {
        return print_json(&rows);
    }
    print_alerts(&rows);
    Ok(())
}

/// Everything the dashboard shows. The monthly table always spans the whole
/// ledger; the rest honours the month filter.
#[derive(Debug, Serialize)]
pub(crate) struct Report {
    pub(crate) month: Option<YearMonth>,
    pub(crate) totals: Totals,
    pub(crate) savings_rate: Decimal,
    pub(crate) transactions: usize,
    pub(crate) monthly: Vec<MonthlySummary>,
    pub(crate) categories: Vec<CategoryTotals>,
    pub(crate) alerts: Vec<BudgetAlert>,
}

pub(crate) fn build_report(
    ledger: &[Transaction],
    budgets: &Budgets,
    month: Option<YearMonth>,
) -> Report {
    let in_scope = LedgerFilter {
        month,
        ..LedgerFilter::default()
    };
    Report {
        month,
        totals: insights::totals(ledger, month),
        savings_rate: insights::savings_rate(ledger, month),
        transactions: in_scope.filter_indexed(ledger).count(),
        monthly: insights::monthly_summary(ledger, None),
        categories: insights::category_breakdown(ledger, month),
        alerts: insights::budget_alerts(ledger, budgets, month),
    }
}

fn cli_report(storage: &Storage, month: Option<YearMonth>, json: bool) -> Result<()> {
    let ledger = storage.load_ledger()?;
    let budgets = storage.load_budgets()?;
    let report = build_report(&ledger, &budgets, month);
    if json {
        return print_json(&report);
    }

    println!("fintrack - {}", scope_label(month));
    println!("{}", "─".repeat(40));
    println!("  Income:        {}", format_amount(report.totals.income));
    println!("  Expenses:      {}", format_amount(report.totals.expense));
    println!("  Net:           {}", format_amount(report.totals.net()));
    println!("  Savings rate:  {}", format_rate(report.savings_rate));
    println!("  Transactions:  {}", report.transactions);

    println!();
    println!("Monthly Summary");
    print_monthly(&report.monthly);
    println!();
    println!("Category Breakdown");
    print_categories(&report.categories);
    println!();
    println!("Budget Alerts");
    print_alerts(&report.alerts);
    Ok(())
}

fn cli_months(storage: &Storage, json: bool) -> Result<()> {
    let ledger = storage.load_ledger()?;
    let months = insights::months(&ledger);
    if json {
        return print_json(&months);
    }
    if months.is_empty() {
        println!("No dated transactions");
    }
    for m in &months {
        println!("{m}");
    }
    Ok(())
}

fn cli_budget_list(storage: &Storage, json: bool) -> Result<()> {
    let budgets = storage.load_budgets()?;
    if json {
        let map: BTreeMap<&str, Decimal> = budgets.iter().collect();
        return print_json(&map);
    }
    if budgets.is_empty() {
        println!("No budgets");
        return Ok(());
    }

    println!("{:<24} {:>14}", "Category", "Monthly limit");
    println!("{}", "─".repeat(39));
    for (category, limit) in budgets.iter() {
        println!("{:<24} {:>14}", truncate(category, 24), format_amount(limit));
    }
    println!();
    println!("{} budget(s)", budgets.len());
    Ok(())
}

fn cli_budget_set(storage: &Storage, category: &str, limit: Decimal) -> Result<()> {
    validate_budget(category, limit)?;
    match storage.set_budget(category, limit)? {
        Some(previous) => println!(
            "Updated {} budget: {} → {}",
            category.trim(),
            format_amount(previous),
            format_amount(limit)
        ),
        None => println!("Set {} budget to {}", category.trim(), format_amount(limit)),
    }
    Ok(())
}

fn cli_budget_remove(storage: &Storage, category: &str) -> Result<()> {
    if storage.remove_budget(category)? {
        println!("Removed {} budget", category.trim());
    } else {
        println!("No budget for '{}'", category.trim());
    }
    Ok(())
}

// ── Output ────────────────────────────────────────────────────

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn scope_label(month: Option<YearMonth>) -> String {
    month.map_or_else(|| "all time".to_string(), |m| m.to_string())
}

fn print_monthly(rows: &[MonthlySummary]) {
    if rows.is_empty() {
        println!("No transactions");
        return;
    }
    println!("{:<8} {:>14} {:>14} {:>14}", "Month", "Income", "Expense", "Net");
    println!("{}", "─".repeat(53));
    for row in rows {
        println!(
            "{:<8} {:>14} {:>14} {:>14}",
            row.month.to_string(),
            format_amount(row.income),
            format_amount(row.expense),
            format_amount(row.net),
        );
    }
}

fn print_categories(rows: &[CategoryTotals]) {
    if rows.is_empty() {
        println!("No transactions");
        return;
    }
    println!("{:<24} {:>14} {:>14} {:>14}", "Category", "Income", "Expense", "Net");
    println!("{}", "─".repeat(69));
    for row in rows {
        println!(
            "{:<24} {:>14} {:>14} {:>14}",
            truncate(&row.category, 24),
            format_amount(row.income),
            format_amount(row.expense),
            format_amount(row.net),
        );
    }
}

fn print_alerts(rows: &[BudgetAlert]) {
    if rows.is_empty() {
        println!("No budgets / no expenses");
        return;
    }
    println!("{:<24} {:>14} {:>14}  Status", "Category", "Spent", "Budget");
    println!("{}", "─".repeat(62));
    for row in rows {
        println!(
            "{:<24} {:>14} {:>14}  {}",
            truncate(&row.category, 24),
            format_amount(row.spent),
            format_amount(row.limit),
            row.status,
        );
    }
}

#[cfg(test)]
#[path = "cli_tests.rs"]
mod tests;
