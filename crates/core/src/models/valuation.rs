use serde::{Deserialize, Serialize};

/// Valuation of a single holding at the caller-supplied price.
///
/// Ratio metrics are `Option<f64>`: `None` means the metric is undefined
/// for this holding (zero denominator, or no price supplied). Undefined is
/// a first-class result, not an error — a divested holding with historical
/// dividends still renders.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HoldingValuation {
    /// The holding's symbol
    pub symbol: String,

    /// Shares currently held
    pub shares: f64,

    /// Sum of shares over the purchase log. Normally equals `shares`;
    /// see `share_drift`.
    pub purchased_shares: f64,

    /// Sum of `shares * price` over the purchase log
    pub total_invested: f64,

    /// Sum of all dividend amounts received
    pub cumulative_dividends: f64,

    /// Average cost per share: `total_invested / purchased_shares`.
    /// `None` when no shares were ever purchased.
    pub avg_cost: Option<f64>,

    /// True ADA — dividend-adjusted average cost per share:
    /// `(total_invested - cumulative_dividends) / purchased_shares`.
    /// The break-even price after crediting all dividends. Deliberately
    /// not floored at zero: a negative value signals dividends have
    /// exceeded invested capital.
    pub true_ada: Option<f64>,

    /// The price used for this valuation, if the caller supplied one
    pub current_price: Option<f64>,

    /// `shares * current_price`
    pub market_value: Option<f64>,

    /// Total return including dividends:
    /// `market_value - total_invested + cumulative_dividends`
    pub overall_return: Option<f64>,

    /// `overall_return / total_invested * 100`
    pub return_pct: Option<f64>,

    /// How far the current price sits above/below the dividend-adjusted
    /// break-even: `(current_price - true_ada) / true_ada * 100`
    pub return_vs_true_ada_pct: Option<f64>,

    /// `purchased_shares - shares`. Non-zero after a manual share
    /// adjustment; a data-integrity warning, not an error.
    pub share_drift: f64,
}

impl HoldingValuation {
    /// Whether `shares` has drifted from the purchase log beyond float noise.
    #[must_use]
    pub fn has_drift(&self) -> bool {
        self.share_drift.abs() > 1e-9
    }
}

/// Portfolio-level valuation: sums over active holdings (shares > 0), with
/// dividends counted from every holding, divested ones included.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortfolioValuation {
    /// Total invested across active holdings
    pub total_invested: f64,

    /// Total dividends received across all holdings
    pub total_dividends: f64,

    /// Sum of market values for active holdings that have a price
    pub total_market_value: f64,

    /// Uninvested cash, counted toward total value and overall return
    pub cash_uninvested: f64,

    /// `total_market_value + cash_uninvested`
    pub total_value: f64,

    /// `total_market_value + cash + total_dividends - total_invested`.
    /// `None` while any active holding lacks a price — a partial sum would
    /// silently understate the return.
    pub overall_return: Option<f64>,

    /// `overall_return / total_invested * 100`
    pub overall_return_pct: Option<f64>,

    /// Unadjusted portfolio average cost per share
    pub avg_cost: Option<f64>,

    /// Portfolio-wide True ADA
    pub true_ada: Option<f64>,

    /// How much dividends have lowered the effective cost basis:
    /// `(avg_cost - true_ada) / avg_cost * 100`
    pub basis_improvement_pct: Option<f64>,

    /// Active symbols that had no price in the supplied price map, and were
    /// therefore excluded from market value and overall return
    pub unpriced_symbols: Vec<String>,

    /// Symbols whose share count has drifted from their purchase log
    pub drift_warnings: Vec<String>,

    /// Per-holding breakdown, sorted by symbol (divested holdings included)
    pub holdings: Vec<HoldingValuation>,
}
