use std::collections::BTreeMap;

use super::holding::Holding;

/// The main data container for one session: every tracked holding plus
/// uninvested cash. This is what gets serialized into the versioned JSON
/// backup and restored from it.
///
/// Holdings are keyed by uppercased symbol, which enforces the uniqueness
/// invariant and gives deterministic iteration order for exports.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Portfolio {
    /// All tracked holdings, keyed by symbol
    pub holdings: BTreeMap<String, Holding>,

    /// Cash sitting in the account but not invested. Counts toward the
    /// portfolio's total value and overall return.
    pub cash_uninvested: f64,
}

impl Portfolio {
    /// Create an empty portfolio.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a holding by symbol (case-insensitive).
    #[must_use]
    pub fn get(&self, symbol: &str) -> Option<&Holding> {
        self.holdings.get(&symbol.trim().to_uppercase())
    }

    /// All symbols in deterministic (sorted) order.
    #[must_use]
    pub fn symbols(&self) -> Vec<&str> {
        self.holdings.keys().map(String::as_str).collect()
    }

    /// Number of tracked holdings, divested ones included.
    #[must_use]
    pub fn holding_count(&self) -> usize {
        self.holdings.len()
    }
}
