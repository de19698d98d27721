use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A single buy event: a lot of shares acquired at a price.
///
/// The purchase log is append-only. It exists to support cost averaging,
/// not tax-lot matching — there is no corresponding sell-lot record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Purchase {
    /// Number of shares bought (always positive)
    pub shares: f64,

    /// Price paid per share (never negative)
    pub price: f64,

    /// Date of the purchase. `None` for records migrated from legacy
    /// backups that only stored totals — an unknown date is never invented.
    pub date: Option<NaiveDate>,
}

/// A cash dividend received for a holding. Not assumed reinvested.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Dividend {
    /// Cash amount received (never negative)
    pub amount: f64,

    /// Date received, if known
    pub date: Option<NaiveDate>,
}

/// One tracked security: its current share count plus the full
/// purchase and dividend history.
///
/// `shares` normally equals the sum of `purchases[].shares`; the
/// `adjust_shares` correction path (manual fix for a sale or split) can
/// make them diverge, which valuation reports as a drift warning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Holding {
    /// Ticker symbol, uppercased (e.g., "AAPL"). Unique within a portfolio.
    pub symbol: String,

    /// Shares currently held. Zero means fully divested but the record
    /// is retained for its dividend history.
    pub shares: f64,

    /// Append-only log of buy events
    pub purchases: Vec<Purchase>,

    /// Cash dividends received, in the order they were recorded
    pub dividends: Vec<Dividend>,
}

impl Holding {
    /// Create an empty holding for a symbol. The symbol is trimmed and
    /// uppercased so lookups are consistent regardless of input case.
    pub fn new(symbol: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into().trim().to_uppercase(),
            shares: 0.0,
            purchases: Vec::new(),
            dividends: Vec::new(),
        }
    }

    /// Total shares recorded in the purchase log.
    #[must_use]
    pub fn purchased_shares(&self) -> f64 {
        self.purchases.iter().map(|p| p.shares).sum()
    }

    /// Total capital invested: sum of `shares * price` over all purchases.
    #[must_use]
    pub fn total_invested(&self) -> f64 {
        self.purchases.iter().map(|p| p.shares * p.price).sum()
    }

    /// Total cash dividends received to date.
    #[must_use]
    pub fn cumulative_dividends(&self) -> f64 {
        self.dividends.iter().map(|d| d.amount).sum()
    }
}
