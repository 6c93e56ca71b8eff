//! CLI argument definitions using clap.
//!
//! Command implementations live in `run::cli`.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use rust_decimal::Decimal;

use crate::models::{PaymentMethod, TransactionKind, YearMonth};

/// fintrack - track income, expenses and budgets in flat files
#[derive(Parser, Debug)]
#[command(name = "fintrack")]
#[command(about = "Local, flat-file personal finance tracker", long_about = None)]
#[command(version)]
pub(crate) struct Cli {
    /// Directory holding transactions.csv and budgets.json
    /// (default: the platform data directory)
    #[arg(long, env = "FINTRACK_DATA_DIR", global = true)]
    pub(crate) data_dir: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub(crate) verbose: bool,

    /// Print JSON instead of tables
    #[arg(long, global = true)]
    pub(crate) json: bool,

    #[command(subcommand)]
    pub(crate) command: Commands,
}

#[derive(Subcommand, Debug)]
pub(crate) enum Commands {
    /// Create the data directory and empty files if missing
    Init,

    /// Record a transaction
    Add {
        /// Income or Expense
        #[arg(short = 't', long = "type")]
        kind: TransactionKind,

        #[arg(short, long)]
        category: String,

        /// Positive amount; direction comes from --type
        #[arg(short, long)]
        amount: Decimal,

        /// YYYY-MM-DD (default: today)
        #[arg(short, long)]
        date: Option<NaiveDate>,

        #[arg(long, default_value = "")]
        description: String,

        /// Cash, Card or Bank
        #[arg(short, long, default_value = "Cash")]
        payment_method: PaymentMethod,

        #[arg(long, default_value = "Default")]
        account: String,
    },

    /// List transactions with their indices
    List {
        #[command(flatten)]
        filter: FilterArgs,
    },

    /// Change fields of one transaction
    Edit {
        /// Index as shown by `list`
        index: usize,

        #[command(flatten)]
        changes: EditArgs,
    },

    /// Delete transactions by index
    Delete {
        /// Indices as shown by `list`
        #[arg(required = true)]
        indices: Vec<usize>,
    },

    /// Income, expense and net per month
    Summary,

    /// Income, expense and net per category
    Categories {
        #[command(flatten)]
        month: MonthArg,
    },

    /// Savings rate
    Savings {
        #[command(flatten)]
        month: MonthArg,
    },

    /// Spending against budgets
    Alerts {
        #[command(flatten)]
        month: MonthArg,
    },

    /// Totals, savings rate and every table at once
    Report {
        #[command(flatten)]
        month: MonthArg,
    },

    /// Months present in the ledger
    Months,

    /// Manage per-category monthly budgets
    Budget {
        #[command(subcommand)]
        action: Option<BudgetAction>,
    },
}

#[derive(clap::Args, Debug, Default)]
pub(crate) struct MonthArg {
    /// Restrict to one month (YYYY-MM)
    #[arg(short, long)]
    pub(crate) month: Option<YearMonth>,
}

#[derive(clap::Args, Debug, Default)]
pub(crate) struct FilterArgs {
    /// Restrict to one month (YYYY-MM)
    #[arg(short, long)]
    pub(crate) month: Option<YearMonth>,

    /// Income or Expense
    #[arg(short = 't', long = "type")]
    pub(crate) kind: Option<TransactionKind>,

    #[arg(short, long)]
    pub(crate) category: Option<String>,
}

/// Fields to overwrite; anything left unset keeps its stored value.
#[derive(clap::Args, Debug, Default)]
pub(crate) struct EditArgs {
    #[arg(short = 't', long = "type")]
    pub(crate) kind: Option<TransactionKind>,

    #[arg(short, long)]
    pub(crate) category: Option<String>,

    #[arg(short, long)]
    pub(crate) amount: Option<Decimal>,

    #[arg(short, long)]
    pub(crate) date: Option<NaiveDate>,

    #[arg(long)]
    pub(crate) description: Option<String>,

    #[arg(short, long)]
    pub(crate) payment_method: Option<PaymentMethod>,

    #[arg(long)]
    pub(crate) account: Option<String>,
}

#[derive(Subcommand, Debug)]
pub(crate) enum BudgetAction {
    /// List budgets
    List,

    /// Add or update a category's monthly limit
    Set { category: String, limit: Decimal },

    /// Remove a category's budget
    Remove { category: String },
}
