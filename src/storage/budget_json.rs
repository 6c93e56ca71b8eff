use anyhow::{Context, Result};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde_json::{Map, Number, Value};
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use tracing::warn;

use super::ledger_csv::parse_amount;
use crate::models::Budgets;

/// Read the budget map. An empty file is an empty map; a non-numeric limit is
/// skipped rather than failing the whole load.
pub(crate) fn read_budgets(path: &Path) -> Result<Budgets> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read budgets: {}", path.display()))?;
    if raw.trim().is_empty() {
        return Ok(Budgets::new());
    }

    let values: BTreeMap<String, Value> = serde_json::from_str(&raw)
        .with_context(|| format!("Invalid budget file: {}", path.display()))?;

    let mut budgets = Budgets::new();
    for (category, value) in values {
        match limit_from_json(&value) {
            Some(limit) => budgets.set(&category, limit),
            None => warn!(category = %category, value = %value, "skipping non-numeric budget limit"),
        }
    }
    Ok(budgets)
}

/// Overwrite the budget file with a pretty-printed flat object.
pub(crate) fn write_budgets(path: &Path, budgets: &Budgets) -> Result<()> {
    let object: Map<String, Value> = budgets
        .iter()
        .map(|(category, limit)| (category.to_string(), limit_to_json(limit)))
        .collect();

    let file = File::create(path)
        .with_context(|| format!("Failed to write budgets: {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, &Value::Object(object))?;
    writer.write_all(b"\n")?;
    writer
        .flush()
        .with_context(|| format!("Failed to flush budgets: {}", path.display()))?;
    Ok(())
}

fn limit_from_json(value: &Value) -> Option<Decimal> {
    match value {
        Value::Number(n) => parse_amount(&n.to_string()),
        Value::String(s) => parse_amount(s),
        _ => None,
    }
}

/// Whole limits are written as integers (`500`), the rest as floats (`12.5`).
fn limit_to_json(limit: Decimal) -> Value {
    let normalized = limit.normalize();
    if normalized.scale() == 0 {
        if let Some(whole) = normalized.to_i64() {
            return Value::from(whole);
        }
    }
    normalized
        .to_f64()
        .and_then(Number::from_f64)
        .map(Value::Number)
        .unwrap_or(Value::Null)
}

#[cfg(test)]
#[path = "budget_json_tests.rs"]
mod tests;
