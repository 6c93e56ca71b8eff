use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;

use super::YearMonth;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum TransactionKind {
    Income,
    Expense,
}

impl TransactionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Income => "Income",
            Self::Expense => "Expense",
        }
    }

    /// Case-insensitive; `None` for anything that is not a known kind.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "income" => Some(Self::Income),
            "expense" => Some(Self::Expense),
            _ => None,
        }
    }
}

impl std::fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for TransactionKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("unknown transaction type '{s}' (expected Income or Expense)"))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum PaymentMethod {
    Cash,
    Card,
    Bank,
}

impl PaymentMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Cash => "Cash",
            Self::Card => "Card",
            Self::Bank => "Bank",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "cash" => Some(Self::Cash),
            "card" => Some(Self::Card),
            "bank" => Some(Self::Bank),
            _ => None,
        }
    }
}

impl std::fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for PaymentMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("unknown payment method '{s}' (expected Cash, Card or Bank)"))
    }
}

/// One ledger row as loaded from disk.
///
/// `date`, `kind`, `amount` and `payment_method` are `None` when the stored
/// value could not be parsed. Aggregation skips missing values.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Transaction {
    pub date: Option<NaiveDate>,
    #[serde(rename = "type")]
    pub kind: Option<TransactionKind>,
    pub category: String,
    pub description: String,
    pub amount: Option<Decimal>,
    pub payment_method: Option<PaymentMethod>,
    pub account: String,
}

impl Transaction {
    pub fn is_income(&self) -> bool {
        self.kind == Some(TransactionKind::Income)
    }

    pub fn is_expense(&self) -> bool {
        self.kind == Some(TransactionKind::Expense)
    }

    /// Amount for summation: a missing amount counts as zero.
    pub fn amount_or_zero(&self) -> Decimal {
        self.amount.unwrap_or(Decimal::ZERO)
    }

    pub fn month(&self) -> Option<YearMonth> {
        self.date.map(YearMonth::from_date)
    }
}

/// A fully-typed entry as submitted by the front end, before normalization.
#[derive(Debug, Clone)]
pub struct NewTransaction {
    pub date: NaiveDate,
    pub kind: TransactionKind,
    pub category: String,
    pub description: String,
    pub amount: Decimal,
    pub payment_method: PaymentMethod,
    pub account: String,
}

impl NewTransaction {
    /// Trim the free-text fields. Validation is the caller's job.
    pub fn normalize(self) -> Transaction {
        Transaction {
            date: Some(self.date),
            kind: Some(self.kind),
            category: self.category.trim().to_string(),
            description: self.description.trim().to_string(),
            amount: Some(self.amount),
            payment_method: Some(self.payment_method),
            account: self.account.trim().to_string(),
        }
    }
}
