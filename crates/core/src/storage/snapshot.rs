use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::errors::CoreError;
use crate::models::holding::Holding;
use crate::models::portfolio::Portfolio;

/// Current snapshot schema version. History is strictly linear; every
/// older version reaches this one through the chain in `migration.rs`.
///
/// - v0 — the legacy single-file app's `portfolio_data.json`: holdings
///   keyed by ticker with scalar totals, no version tag.
/// - v1 — per-holding `purchases`/`dividends` logs, holdings still an
///   object keyed by ticker.
/// - v2 — holdings as an array of objects with an explicit `symbol` field.
pub const CURRENT_VERSION: u32 = 2;

/// The versioned wire shape of a full portfolio backup.
///
/// This is the single point where untrusted data enters the system, so
/// decoding is strict: unknown fields are rejected, and `validate` walks
/// every numeric field before a `Portfolio` is built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Snapshot {
    /// Schema version this snapshot was written at
    pub schema_version: u32,

    /// All holdings, sorted by symbol on export
    pub holdings: Vec<Holding>,

    /// Uninvested cash; absent in minimal snapshots
    #[serde(default)]
    pub cash_uninvested: f64,
}

impl Snapshot {
    /// Capture the current portfolio at the current schema version.
    #[must_use]
    pub fn from_portfolio(portfolio: &Portfolio) -> Self {
        Self {
            schema_version: CURRENT_VERSION,
            // BTreeMap iteration is sorted, so exports are deterministic
            holdings: portfolio.holdings.values().cloned().collect(),
            cash_uninvested: portfolio.cash_uninvested,
        }
    }

    /// Check every structural invariant of the current schema.
    ///
    /// Errors carry the offending field as a JSON-path-style name; the
    /// step is `CURRENT_VERSION`, meaning post-migration validation.
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.schema_version != CURRENT_VERSION {
            return Err(corrupt(
                "schema_version",
                format!(
                    "expected {CURRENT_VERSION}, got {} — migration did not complete",
                    self.schema_version
                ),
            ));
        }
        if !self.cash_uninvested.is_finite() || self.cash_uninvested < 0.0 {
            return Err(corrupt(
                "cash_uninvested",
                format!("must be a non-negative number, got {}", self.cash_uninvested),
            ));
        }

        let mut seen = BTreeSet::new();
        for (i, holding) in self.holdings.iter().enumerate() {
            let path = format!("holdings[{i}]");

            let symbol = holding.symbol.trim().to_uppercase();
            if symbol.is_empty() {
                return Err(corrupt(&format!("{path}.symbol"), "must not be empty".into()));
            }
            if !seen.insert(symbol.clone()) {
                return Err(corrupt(
                    &format!("{path}.symbol"),
                    format!("duplicate symbol '{symbol}'"),
                ));
            }
            if !holding.shares.is_finite() || holding.shares < 0.0 {
                return Err(corrupt(
                    &format!("{path}.shares"),
                    format!("must be a non-negative number, got {}", holding.shares),
                ));
            }

            for (j, purchase) in holding.purchases.iter().enumerate() {
                if !purchase.shares.is_finite() || purchase.shares <= 0.0 {
                    return Err(corrupt(
                        &format!("{path}.purchases[{j}].shares"),
                        format!("must be positive, got {}", purchase.shares),
                    ));
                }
                if !purchase.price.is_finite() || purchase.price < 0.0 {
                    return Err(corrupt(
                        &format!("{path}.purchases[{j}].price"),
                        format!("must be a non-negative number, got {}", purchase.price),
                    ));
                }
            }

            for (j, dividend) in holding.dividends.iter().enumerate() {
                if !dividend.amount.is_finite() || dividend.amount < 0.0 {
                    return Err(corrupt(
                        &format!("{path}.dividends[{j}].amount"),
                        format!("must be a non-negative number, got {}", dividend.amount),
                    ));
                }
            }
        }

        Ok(())
    }

    /// Build the in-memory portfolio. Call `validate` first; this only
    /// normalizes symbols into their map keys.
    #[must_use]
    pub fn into_portfolio(self) -> Portfolio {
        let mut portfolio = Portfolio::new();
        portfolio.cash_uninvested = self.cash_uninvested;
        for mut holding in self.holdings {
            holding.symbol = holding.symbol.trim().to_uppercase();
            portfolio
                .holdings
                .insert(holding.symbol.clone(), holding);
        }
        portfolio
    }
}

fn corrupt(field: &str, message: String) -> CoreError {
    CoreError::CorruptSnapshot {
        step: CURRENT_VERSION,
        field: field.to_string(),
        message,
    }
}
