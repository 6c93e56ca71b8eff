#![allow(clippy::unwrap_used)]

use super::*;
use crate::models::{PaymentMethod, TransactionKind};
use chrono::NaiveDate;
use clap::{CommandFactory, Parser};
use rust_decimal_macros::dec;

fn temp_storage() -> (tempfile::TempDir, Storage) {
    let dir = tempfile::tempdir().unwrap();
    let storage = Storage::new(dir.path());
    (dir, storage)
}

fn run(storage: &Storage, args: &[&str]) -> Result<()> {
    let cli = Cli::try_parse_from(std::iter::once("fintrack").chain(args.iter().copied()))?;
    as_cli(cli, storage)
}

fn sample_txn() -> Transaction {
    Transaction {
        date: NaiveDate::from_ymd_opt(2025, 11, 2),
        kind: Some(TransactionKind::Expense),
        category: "Food".into(),
        description: "Lunch".into(),
        amount: Some(dec!(200)),
        payment_method: Some(PaymentMethod::Cash),
        account: "Wallet".into(),
    }
}

// ── Argument parsing ──────────────────────────────────────────

#[test]
fn test_cli_definition_is_consistent() {
    Cli::command().debug_assert();
}

#[test]
fn test_parse_add_defaults() {
    let cli = Cli::try_parse_from([
        "fintrack", "add", "--type", "expense", "--category", "Food", "--amount", "12.50",
    ])
    .unwrap();
    match cli.command {
        Commands::Add {
            kind,
            amount,
            date,
            payment_method,
            account,
            description,
            ..
        } => {
            assert_eq!(kind, TransactionKind::Expense);
            assert_eq!(amount, dec!(12.50));
            assert!(date.is_none());
            assert_eq!(payment_method, PaymentMethod::Cash);
            assert_eq!(account, "Default");
            assert_eq!(description, "");
        }
        other => panic!("unexpected command: {other:?}"),
    }
}

#[test]
fn test_parse_rejects_unknown_type_and_bad_month() {
    assert!(Cli::try_parse_from([
        "fintrack", "add", "--type", "Refund", "--category", "Food", "--amount", "1",
    ])
    .is_err());
    assert!(Cli::try_parse_from(["fintrack", "categories", "--month", "2025-13"]).is_err());
}

#[test]
fn test_parse_global_flags_after_subcommand() {
    let cli = Cli::try_parse_from(["fintrack", "report", "--json", "--data-dir", "/tmp/x"]).unwrap();
    assert!(cli.json);
    assert_eq!(cli.data_dir.unwrap(), std::path::PathBuf::from("/tmp/x"));
}

// ── Validation ────────────────────────────────────────────────

#[test]
fn test_validate_entry() {
    assert!(validate_entry("Food", dec!(0.01)).is_ok());
    assert!(validate_entry("   ", dec!(10)).is_err());
    assert!(validate_entry("Food", dec!(0)).is_err());
    assert!(validate_entry("Food", dec!(-5)).is_err());
}

#[test]
fn test_validate_budget_allows_zero_limit() {
    assert!(validate_budget("Food", dec!(0)).is_ok());
    assert!(validate_budget("Food", dec!(-1)).is_err());
    assert!(validate_budget("", dec!(100)).is_err());
}

#[test]
fn test_apply_edits_overwrites_only_given_fields() {
    let changes = EditArgs {
        category: Some("  Groceries ".into()),
        amount: Some(dec!(250)),
        ..EditArgs::default()
    };
    let edited = apply_edits(sample_txn(), changes).unwrap();
    assert_eq!(edited.category, "Groceries");
    assert_eq!(edited.amount, Some(dec!(250)));
    assert_eq!(edited.description, "Lunch");
    assert_eq!(edited.account, "Wallet");
    assert_eq!(edited.kind, Some(TransactionKind::Expense));
}

#[test]
fn test_apply_edits_rejects_invalid_changes() {
    let blank = EditArgs {
        category: Some(" ".into()),
        ..EditArgs::default()
    };
    assert!(apply_edits(sample_txn(), blank).is_err());

    let zero = EditArgs {
        amount: Some(dec!(0)),
        ..EditArgs::default()
    };
    assert!(apply_edits(sample_txn(), zero).is_err());
}

#[test]
fn test_apply_edits_can_fix_row_with_missing_amount() {
    let mut broken = sample_txn();
    broken.amount = None;
    let changes = EditArgs {
        kind: Some(TransactionKind::Income),
        ..EditArgs::default()
    };
    let edited = apply_edits(broken, changes).unwrap();
    assert_eq!(edited.kind, Some(TransactionKind::Income));
    assert!(edited.amount.is_none());
}

#[test]
fn test_filter_args_into_ledger_filter() {
    let filter: LedgerFilter = FilterArgs {
        month: Some("2025-11".parse().unwrap()),
        kind: Some(TransactionKind::Income),
        category: Some(" Salary ".into()),
    }
    .into();
    assert_eq!(filter.category.as_deref(), Some("Salary"));
    assert_eq!(filter.kind, Some(TransactionKind::Income));
}

// ── Report ────────────────────────────────────────────────────

#[test]
fn test_build_report() {
    let ledger = vec![
        Transaction {
            kind: Some(TransactionKind::Income),
            category: "Salary".into(),
            amount: Some(dec!(1000)),
            date: NaiveDate::from_ymd_opt(2025, 11, 1),
            ..sample_txn()
        },
        sample_txn(),
        Transaction {
            date: NaiveDate::from_ymd_opt(2025, 10, 1),
            amount: Some(dec!(50)),
            ..sample_txn()
        },
    ];
    let budgets: Budgets = [("Food".to_string(), dec!(150))].into_iter().collect();
    let november = Some("2025-11".parse().unwrap());

    let report = build_report(&ledger, &budgets, november);
    assert_eq!(report.totals.income, dec!(1000));
    assert_eq!(report.totals.expense, dec!(200));
    assert_eq!(report.savings_rate, dec!(0.8));
    assert_eq!(report.transactions, 2);
    // The monthly table ignores the month filter
    assert_eq!(report.monthly.len(), 2);
    assert_eq!(report.categories.len(), 2);
    assert_eq!(report.alerts.len(), 1);
    assert_eq!(report.alerts[0].spent, dec!(200));
}

#[test]
fn test_report_transaction_count_follows_month() {
    let undated = Transaction {
        date: None,
        ..sample_txn()
    };
    let ledger = vec![sample_txn(), undated];

    let all_time = build_report(&ledger, &Budgets::new(), None);
    assert_eq!(all_time.transactions, 2);

    let october = build_report(&ledger, &Budgets::new(), Some("2025-10".parse().unwrap()));
    assert_eq!(october.transactions, 0);
}

#[test]
fn test_report_serializes_to_json() {
    let report = build_report(&[sample_txn()], &Budgets::new(), None);
    let value = serde_json::to_value(&report).unwrap();
    assert!(value["month"].is_null());
    assert_eq!(value["monthly"][0]["month"], "2025-11");
    assert_eq!(value["categories"][0]["category"], "Food");
    assert!(value["alerts"].as_array().unwrap().is_empty());
}

#[test]
fn test_json_amounts_keep_every_digit() {
    let totals = Totals {
        income: dec!(1234567890.123456789),
        expense: dec!(0.1),
    };
    let json = serde_json::to_string(&totals).unwrap();
    assert_eq!(json, r#"{"income":1234567890.123456789,"expense":0.1}"#);
}

// ── End to end ────────────────────────────────────────────────

#[test]
fn test_add_command_persists_entry() {
    let (_dir, storage) = temp_storage();
    run(
        &storage,
        &[
            "add", "-t", "Expense", "-c", " Food ", "-a", "600", "-d", "2025-11-03",
            "--description", "Dinner", "-p", "card", "--account", "Wallet",
        ],
    )
    .unwrap();

    let ledger = storage.load_ledger().unwrap();
    assert_eq!(ledger.len(), 1);
    assert_eq!(ledger[0].category, "Food");
    assert_eq!(ledger[0].amount, Some(dec!(600)));
    assert_eq!(ledger[0].payment_method, Some(PaymentMethod::Card));
    assert_eq!(ledger[0].date, NaiveDate::from_ymd_opt(2025, 11, 3));
}

#[test]
fn test_add_command_rejects_invalid_input_before_storage() {
    let (_dir, storage) = temp_storage();
    assert!(run(&storage, &["add", "-t", "Expense", "-c", "  ", "-a", "10"]).is_err());
    assert!(run(&storage, &["add", "-t", "Expense", "-c", "Food", "-a", "0"]).is_err());
    assert!(storage.load_ledger().unwrap().is_empty());
}

#[test]
fn test_budget_commands() {
    let (_dir, storage) = temp_storage();
    run(&storage, &["budget", "set", "Food", "500"]).unwrap();
    run(&storage, &["budget", "set", "Transport", "200"]).unwrap();
    run(&storage, &["budget", "remove", "Transport"]).unwrap();
    run(&storage, &["budget"]).unwrap();

    let budgets = storage.load_budgets().unwrap();
    assert_eq!(budgets.len(), 1);
    assert_eq!(budgets.get("Food"), Some(dec!(500)));
}

#[test]
fn test_edit_and_delete_commands() {
    let (_dir, storage) = temp_storage();
    storage.save_ledger(&[sample_txn(), sample_txn()]).unwrap();

    run(&storage, &["edit", "1", "--category", "Groceries"]).unwrap();
    assert_eq!(storage.load_ledger().unwrap()[1].category, "Groceries");

    run(&storage, &["delete", "0"]).unwrap();
    let ledger = storage.load_ledger().unwrap();
    assert_eq!(ledger.len(), 1);
    assert_eq!(ledger[0].category, "Groceries");

    assert!(run(&storage, &["edit", "7", "--amount", "5"]).is_err());
}

#[test]
fn test_read_commands_on_empty_storage() {
    let (_dir, storage) = temp_storage();
    let cases: [&[&str]; 7] = [
        &["summary"],
        &["categories"],
        &["savings"],
        &["alerts"],
        &["report", "--month", "2025-11"],
        &["months"],
        &["list", "--json"],
    ];
    for args in cases {
        run(&storage, args).unwrap();
    }
}
