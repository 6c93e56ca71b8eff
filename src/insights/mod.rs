//! Derived views over a ledger snapshot.
//!
//! Everything here is pure: no I/O, no logging. An empty ledger always yields
//! an empty result rather than an error, and every view takes an optional
//! month that restricts it to rows dated in that month.

mod filter;

use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet, HashMap};

use crate::models::{Budgets, Transaction, YearMonth};

use filter::in_month;
pub(crate) use filter::LedgerFilter;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub(crate) struct MonthlySummary {
    pub(crate) month: YearMonth,
    pub(crate) income: Decimal,
    pub(crate) expense: Decimal,
    pub(crate) net: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub(crate) struct CategoryTotals {
    pub(crate) category: String,
    pub(crate) income: Decimal,
    pub(crate) expense: Decimal,
    pub(crate) net: Decimal,
}

/// `Over` sorts after `Ok`, so a descending sort puts overruns first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub(crate) enum BudgetStatus {
    #[serde(rename = "OK")]
    Ok,
    Over,
}

impl BudgetStatus {
    pub(crate) fn as_str(&self) -> &'static str {
        match self {
            Self::Ok => "OK",
            Self::Over => "Over",
        }
    }
}

impl std::fmt::Display for BudgetStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub(crate) struct BudgetAlert {
    pub(crate) category: String,
    pub(crate) spent: Decimal,
    pub(crate) limit: Decimal,
    pub(crate) status: BudgetStatus,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub(crate) struct Totals {
    pub(crate) income: Decimal,
    pub(crate) expense: Decimal,
}

impl Totals {
    pub(crate) fn net(&self) -> Decimal {
        self.income - self.expense
    }

    fn add(&mut self, txn: &Transaction) {
        if txn.is_income() {
            self.income += txn.amount_or_zero();
        } else if txn.is_expense() {
            self.expense += txn.amount_or_zero();
        }
    }
}

/// Income and expense per calendar month, oldest first. Undated rows and rows
/// without a type are left out.
pub(crate) fn monthly_summary(ledger: &[Transaction], month: Option<YearMonth>) -> Vec<MonthlySummary> {
    let mut by_month: BTreeMap<YearMonth, Totals> = BTreeMap::new();
    for txn in ledger.iter().filter(|t| in_month(t, month)) {
        let (Some(key), Some(_)) = (txn.month(), txn.kind) else {
            continue;
        };
        by_month.entry(key).or_default().add(txn);
    }

    by_month
        .into_iter()
        .map(|(month, totals)| MonthlySummary {
            month,
            income: totals.income,
            expense: totals.expense,
            net: totals.net(),
        })
        .collect()
}

/// Income and expense per category, largest expense first (ties by name).
pub(crate) fn category_breakdown(
    ledger: &[Transaction],
    month: Option<YearMonth>,
) -> Vec<CategoryTotals> {
    let mut by_category: BTreeMap<&str, Totals> = BTreeMap::new();
    for txn in ledger.iter().filter(|t| in_month(t, month)) {
        if txn.kind.is_none() || txn.category.trim().is_empty() {
            continue;
        }
        by_category.entry(txn.category.as_str()).or_default().add(txn);
    }

    let mut rows: Vec<CategoryTotals> = by_category
        .into_iter()
        .map(|(category, totals)| CategoryTotals {
            category: category.to_string(),
            income: totals.income,
            expense: totals.expense,
            net: totals.net(),
        })
        .collect();
    rows.sort_by(|a, b| b.expense.cmp(&a.expense));
    rows
}

/// (income - expense) / income, or exactly zero when there is no positive
/// income to divide by.
pub(crate) fn savings_rate(ledger: &[Transaction], month: Option<YearMonth>) -> Decimal {
    let t = totals(ledger, month);
    if t.income <= Decimal::ZERO {
        return Decimal::ZERO;
    }
    t.net().checked_div(t.income).unwrap_or(Decimal::ZERO)
}

/// Spending against each budgeted category. Overruns come first, then by
/// category name. Empty unless both the ledger and the budget map have data.
pub(crate) fn budget_alerts(
    ledger: &[Transaction],
    budgets: &Budgets,
    month: Option<YearMonth>,
) -> Vec<BudgetAlert> {
    if ledger.is_empty() || budgets.is_empty() {
        return Vec::new();
    }

    let mut spent: HashMap<&str, Decimal> = HashMap::new();
    for txn in ledger
        .iter()
        .filter(|t| t.is_expense() && in_month(t, month))
    {
        *spent.entry(txn.category.as_str()).or_default() += txn.amount_or_zero();
    }

    let mut rows: Vec<BudgetAlert> = budgets
        .iter()
        .map(|(category, limit)| {
            let spent = spent.get(category).copied().unwrap_or(Decimal::ZERO);
            let status = if spent > limit {
                BudgetStatus::Over
            } else {
                BudgetStatus::Ok
            };
            BudgetAlert {
                category: category.to_string(),
                spent,
                limit,
                status,
            }
        })
        .collect();
    rows.sort_by(|a, b| b.status.cmp(&a.status));
    rows
}

pub(crate) fn totals(ledger: &[Transaction], month: Option<YearMonth>) -> Totals {
    let mut totals = Totals::default();
    for txn in ledger.iter().filter(|t| in_month(t, month)) {
        totals.add(txn);
    }
    totals
}

/// Distinct months present in the ledger, oldest first.
pub(crate) fn months(ledger: &[Transaction]) -> Vec<YearMonth> {
    ledger
        .iter()
        .filter_map(Transaction::month)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}
