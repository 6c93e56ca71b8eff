use rust_decimal::Decimal;
use std::collections::BTreeMap;

/// Per-category monthly spending limits. One limit per category, no history.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Budgets {
    limits: BTreeMap<String, Decimal>,
}

impl Budgets {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite the limit for `category`.
    pub fn set(&mut self, category: &str, limit: Decimal) {
        self.limits.insert(category.trim().to_string(), limit);
    }

    pub fn remove(&mut self, category: &str) -> Option<Decimal> {
        self.limits.remove(category.trim())
    }

    pub fn get(&self, category: &str) -> Option<Decimal> {
        self.limits.get(category).copied()
    }

    pub fn is_empty(&self) -> bool {
        self.limits.is_empty()
    }

    pub fn len(&self) -> usize {
        self.limits.len()
    }

    /// Categories in ascending name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, Decimal)> {
        self.limits.iter().map(|(k, v)| (k.as_str(), *v))
    }
}

impl FromIterator<(String, Decimal)> for Budgets {
    fn from_iter<I: IntoIterator<Item = (String, Decimal)>>(iter: I) -> Self {
        Self {
            limits: iter.into_iter().collect(),
        }
    }
}
