use std::collections::HashMap;

use crate::models::holding::Holding;
use crate::models::portfolio::Portfolio;
use crate::models::valuation::{HoldingValuation, PortfolioValuation};

/// Computes per-holding and portfolio-level metrics: invested capital,
/// cumulative dividends, True ADA, market value, returns.
///
/// Stateless and pure — every call recomputes from the portfolio snapshot,
/// so there is no cached derived state to invalidate. Holding counts are
/// personal-portfolio scale; correctness beats micro-performance here.
///
/// Current prices are supplied by the caller (manually entered or cached
/// upstream); a symbol missing from the price map simply yields undefined
/// price-dependent metrics.
pub struct ValuationService;

impl ValuationService {
    pub fn new() -> Self {
        Self
    }

    /// Value a single holding at an optional current price.
    ///
    /// Ratios with a zero denominator come back as `None` — a divested
    /// holding with historical dividends still produces a valuation.
    #[must_use]
    pub fn holding_valuation(
        &self,
        holding: &Holding,
        current_price: Option<f64>,
    ) -> HoldingValuation {
        let purchased_shares = holding.purchased_shares();
        let total_invested = holding.total_invested();
        let cumulative_dividends = holding.cumulative_dividends();

        let avg_cost = if purchased_shares > 0.0 {
            Some(total_invested / purchased_shares)
        } else {
            None
        };
        // Never floored at zero: negative True ADA means dividends have
        // exceeded invested capital.
        let true_ada = if purchased_shares > 0.0 {
            Some((total_invested - cumulative_dividends) / purchased_shares)
        } else {
            None
        };

        let market_value = current_price.map(|p| holding.shares * p);
        let overall_return = market_value.map(|mv| mv - total_invested + cumulative_dividends);
        let return_pct = match overall_return {
            Some(r) if total_invested > 0.0 => Some(r / total_invested * 100.0),
            _ => None,
        };
        let return_vs_true_ada_pct = match (current_price, true_ada) {
            (Some(price), Some(ada)) if ada != 0.0 => Some((price - ada) / ada * 100.0),
            _ => None,
        };

        HoldingValuation {
            symbol: holding.symbol.clone(),
            shares: holding.shares,
            purchased_shares,
            total_invested,
            cumulative_dividends,
            avg_cost,
            true_ada,
            current_price,
            market_value,
            overall_return,
            return_pct,
            return_vs_true_ada_pct,
            share_drift: purchased_shares - holding.shares,
        }
    }

    /// Value the whole portfolio.
    ///
    /// Invested capital, shares, and market value aggregate over active
    /// holdings (shares > 0); dividends aggregate over every holding, so a
    /// fully divested position still contributes its realized dividends.
    /// Undefined per-holding metrics are excluded from sums, never counted
    /// as zero; `unpriced_symbols` names what was excluded.
    #[must_use]
    pub fn portfolio_valuation(
        &self,
        portfolio: &Portfolio,
        prices: &HashMap<String, f64>,
    ) -> PortfolioValuation {
        let mut holdings = Vec::with_capacity(portfolio.holdings.len());
        let mut total_invested = 0.0;
        let mut total_dividends = 0.0;
        let mut total_market_value = 0.0;
        let mut active_shares = 0.0;
        let mut active_invested_dividends = 0.0;
        let mut unpriced_symbols = Vec::new();
        let mut drift_warnings = Vec::new();

        for holding in portfolio.holdings.values() {
            let valuation =
                self.holding_valuation(holding, prices.get(&holding.symbol).copied());

            total_dividends += valuation.cumulative_dividends;
            if valuation.has_drift() {
                drift_warnings.push(valuation.symbol.clone());
            }

            if holding.shares > 0.0 {
                total_invested += valuation.total_invested;
                active_shares += valuation.purchased_shares;
                active_invested_dividends += valuation.cumulative_dividends;
                match valuation.market_value {
                    Some(mv) => total_market_value += mv,
                    None => unpriced_symbols.push(valuation.symbol.clone()),
                }
            }

            holdings.push(valuation);
        }

        let avg_cost = if active_shares > 0.0 {
            Some(total_invested / active_shares)
        } else {
            None
        };
        let true_ada = if active_shares > 0.0 {
            Some((total_invested - active_invested_dividends) / active_shares)
        } else {
            None
        };
        let basis_improvement_pct = match (avg_cost, true_ada) {
            (Some(cost), Some(ada)) if cost > 0.0 => Some((cost - ada) / cost * 100.0),
            _ => None,
        };

        // A partial market value would silently understate the return, so
        // the overall figure is undefined until every active holding is
        // priced.
        let overall_return = if unpriced_symbols.is_empty() {
            Some(
                total_market_value + portfolio.cash_uninvested + total_dividends
                    - total_invested,
            )
        } else {
            None
        };
        let overall_return_pct = match overall_return {
            Some(r) if total_invested > 0.0 => Some(r / total_invested * 100.0),
            _ => None,
        };

        PortfolioValuation {
            total_invested,
            total_dividends,
            total_market_value,
            cash_uninvested: portfolio.cash_uninvested,
            total_value: total_market_value + portfolio.cash_uninvested,
            overall_return,
            overall_return_pct,
            avg_cost,
            true_ada,
            basis_improvement_pct,
            unpriced_symbols,
            drift_warnings,
            holdings,
        }
    }
}

impl Default for ValuationService {
    fn default() -> Self {
        Self::new()
    }
}
