//! Instrument reconciliation between Binance and OKEx listings
//!
//! OKEx separates base and quote with a hyphen ("BTC-USDT") while Binance
//! concatenates them ("BTCUSDT"). Normalizing OKEx symbols makes the two
//! listings comparable; the diff column then holds every symbol listed on
//! exactly one of the exchanges.
//!
//! The comparison is membership based. Two different instruments that
//! normalize to the same string are treated as the same instrument.

use std::collections::HashSet;

use crate::domain::entities::instrument::Symbol;

/// Separator used by OKEx between base and quote currency
pub const OKEX_SEPARATOR: char = '-';

/// Strip every separator from an OKEx symbol. Idempotent.
pub fn normalize_symbol(symbol: &str) -> Symbol {
    symbol.chars().filter(|c| *c != OKEX_SEPARATOR).collect()
}

/// Columns of the reconciliation sheet
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reconciliation {
    /// Binance symbols, as listed
    pub binance: Vec<Symbol>,
    /// Normalized OKEx symbols, cut to the Binance column length
    pub okex: Vec<Symbol>,
    /// Symbols present in exactly one of the two full listings
    pub diff: Vec<Symbol>,
}

impl Reconciliation {
    /// Number of rows once the columns are laid side by side
    pub fn row_count(&self) -> usize {
        self.binance.len().max(self.okex.len()).max(self.diff.len())
    }

    /// Rows of `[binance, okex, diff]`, shorter columns padded with `None`
    pub fn rows(&self) -> Vec<[Option<&str>; 3]> {
        (0..self.row_count())
            .map(|i| {
                [
                    self.binance.get(i).map(String::as_str),
                    self.okex.get(i).map(String::as_str),
                    self.diff.get(i).map(String::as_str),
                ]
            })
            .collect()
    }
}

/// Values occurring in exactly one of the two lists.
///
/// Both lists are stacked (`left` first) and each surviving value is kept once,
/// at its first occurrence. Duplicates inside a single list do not cancel.
pub fn symmetric_difference(left: &[Symbol], right: &[Symbol]) -> Vec<Symbol> {
    let left_set: HashSet<&str> = left.iter().map(String::as_str).collect();
    let right_set: HashSet<&str> = right.iter().map(String::as_str).collect();

    let mut seen = HashSet::new();
    let mut diff = Vec::new();
    for symbol in left.iter().chain(right.iter()) {
        let symbol = symbol.as_str();
        if left_set.contains(symbol) == right_set.contains(symbol) {
            continue;
        }
        if seen.insert(symbol) {
            diff.push(symbol.to_string());
        }
    }
    diff
}

/// Reconcile the Binance listing against the OKEx listing
pub fn reconcile(binance: &[Symbol], okex: &[Symbol]) -> Reconciliation {
    let okex_normalized: Vec<Symbol> = okex.iter().map(|s| normalize_symbol(s)).collect();
    let diff = symmetric_difference(&okex_normalized, binance);

    let mut okex_column = okex_normalized;
    okex_column.truncate(binance.len());

    Reconciliation {
        binance: binance.to_vec(),
        okex: okex_column,
        diff,
    }
}
