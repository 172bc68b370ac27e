//! Tabular reshaping of exchange responses
//!
//! Records become rows; the union of their keys, in first-seen order, becomes
//! the header.

use serde_json::Value;

use crate::domain::entities::instrument::TradeRecord;
use crate::domain::services::symbol_reconciliation::Reconciliation;

/// Largest integer magnitude an f64 cell holds exactly (2^53)
const MAX_EXACT_INTEGER: u64 = 1 << 53;

/// Header of the reconciliation sheet
pub const RECONCILIATION_COLUMNS: [&str; 3] = ["binance", "okex", "diff"];

#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Empty,
    Text(String),
    Number(f64),
    Bool(bool),
}

impl From<&Value> for Cell {
    fn from(value: &Value) -> Self {
        match value {
            Value::Null => Cell::Empty,
            Value::Bool(b) => Cell::Bool(*b),
            Value::Number(n) => {
                let exact = match (n.as_u64(), n.as_i64()) {
                    (Some(u), _) => u <= MAX_EXACT_INTEGER,
                    (None, Some(i)) => i.unsigned_abs() <= MAX_EXACT_INTEGER,
                    _ => true,
                };
                match n.as_f64() {
                    Some(f) if exact => Cell::Number(f),
                    // Large ids keep every digit as text
                    _ => Cell::Text(n.to_string()),
                }
            }
            Value::String(s) => Cell::Text(s.clone()),
            // Nested payloads are kept as compact JSON
            Value::Array(_) | Value::Object(_) => Cell::Text(value.to_string()),
        }
    }
}

impl From<Option<&str>> for Cell {
    fn from(value: Option<&str>) -> Self {
        match value {
            Some(s) => Cell::Text(s.to_string()),
            None => Cell::Empty,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Cell>>,
}

impl Table {
    pub fn from_records(records: &[TradeRecord]) -> Self {
        let mut columns: Vec<String> = Vec::new();
        for record in records {
            for key in record.keys() {
                if !columns.iter().any(|c| c == key) {
                    columns.push(key.clone());
                }
            }
        }

        let rows = records
            .iter()
            .map(|record| {
                columns
                    .iter()
                    .map(|column| record.get(column).map(Cell::from).unwrap_or(Cell::Empty))
                    .collect()
            })
            .collect();

        Self { columns, rows }
    }

    pub fn from_reconciliation(reconciliation: &Reconciliation) -> Self {
        let rows = reconciliation
            .rows()
            .into_iter()
            .map(|row| row.into_iter().map(Cell::from).collect())
            .collect();

        Self {
            columns: RECONCILIATION_COLUMNS.iter().map(|c| c.to_string()).collect(),
            rows,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// A table bound to the worksheet it will be written to
#[derive(Debug, Clone, PartialEq)]
pub struct NamedTable {
    pub name: String,
    pub table: Table,
}

impl NamedTable {
    pub fn new(name: impl Into<String>, table: Table) -> Self {
        Self {
            name: name.into(),
            table,
        }
    }
}
