mod budget;
mod month;
mod transaction;

pub use budget::Budgets;
pub use month::YearMonth;
pub use transaction::{NewTransaction, PaymentMethod, Transaction, TransactionKind};
