use crate::models::{Transaction, TransactionKind, YearMonth};

/// `true` when no month is given, or the row is dated inside it. Undated rows
/// never match a month.
pub(crate) fn in_month(txn: &Transaction, month: Option<YearMonth>) -> bool {
    match month {
        None => true,
        Some(m) => txn.date.is_some_and(|d| m.contains(d)),
    }
}

/// Row filter for ledger listings. Every unset field matches everything.
#[derive(Debug, Clone, Default)]
pub(crate) struct LedgerFilter {
    pub(crate) month: Option<YearMonth>,
    pub(crate) kind: Option<TransactionKind>,
    pub(crate) category: Option<String>,
}

impl LedgerFilter {
    pub(crate) fn matches(&self, txn: &Transaction) -> bool {
        let kind_ok = self.kind.is_none() || txn.kind == self.kind;
        let category_ok = match &self.category {
            Some(c) => txn.category == *c,
            None => true,
        };
        in_month(txn, self.month) && kind_ok && category_ok
    }

    /// Matching rows paired with their ledger position, which is the handle
    /// update and delete take.
    pub(crate) fn filter_indexed<'a>(
        &'a self,
        ledger: &'a [Transaction],
    ) -> impl Iterator<Item = (usize, &'a Transaction)> + 'a {
        ledger
            .iter()
            .enumerate()
            .filter(move |(_, txn)| self.matches(txn))
    }
}
