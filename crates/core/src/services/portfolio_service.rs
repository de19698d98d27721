use chrono::NaiveDate;

use crate::errors::CoreError;
use crate::models::holding::{Dividend, Holding, Purchase};
use crate::models::portfolio::Portfolio;

/// Manages portfolio mutations: purchases, dividends, share corrections,
/// holding removal.
///
/// Pure business logic — no I/O. Every mutator validates its input fully
/// before touching the portfolio, so a returned error always means the
/// state is unchanged.
pub struct PortfolioService;

impl PortfolioService {
    pub fn new() -> Self {
        Self
    }

    /// Record a buy: appends to the purchase log and increments the share
    /// count. Creates the holding if this is its first purchase.
    pub fn add_purchase(
        &self,
        portfolio: &mut Portfolio,
        symbol: &str,
        shares: f64,
        price: f64,
        date: Option<NaiveDate>,
    ) -> Result<(), CoreError> {
        let symbol = Self::normalize_symbol(symbol)?;
        if !shares.is_finite() || shares <= 0.0 {
            return Err(CoreError::ValidationError(format!(
                "Purchase shares must be positive, got {shares}"
            )));
        }
        if !price.is_finite() || price < 0.0 {
            return Err(CoreError::ValidationError(format!(
                "Purchase price must not be negative, got {price}"
            )));
        }

        let holding = portfolio
            .holdings
            .entry(symbol.clone())
            .or_insert_with(|| Holding::new(symbol));
        holding.purchases.push(Purchase {
            shares,
            price,
            date,
        });
        holding.shares += shares;
        Ok(())
    }

    /// Record a cash dividend. The holding must already exist — a dividend
    /// cannot precede any purchase.
    pub fn add_dividend(
        &self,
        portfolio: &mut Portfolio,
        symbol: &str,
        amount: f64,
        date: Option<NaiveDate>,
    ) -> Result<(), CoreError> {
        let symbol = Self::normalize_symbol(symbol)?;
        if !amount.is_finite() || amount < 0.0 {
            return Err(CoreError::ValidationError(format!(
                "Dividend amount must not be negative, got {amount}"
            )));
        }

        let holding = portfolio
            .holdings
            .get_mut(&symbol)
            .ok_or(CoreError::UnknownSymbol(symbol))?;
        holding.dividends.push(Dividend { amount, date });
        Ok(())
    }

    /// Directly adjust the share count — the manual correction path for a
    /// sale or split not otherwise modeled. Does not touch the purchase
    /// log, so the resulting drift shows up as a valuation warning.
    pub fn adjust_shares(
        &self,
        portfolio: &mut Portfolio,
        symbol: &str,
        delta: f64,
    ) -> Result<(), CoreError> {
        let symbol = Self::normalize_symbol(symbol)?;
        if !delta.is_finite() {
            return Err(CoreError::ValidationError(format!(
                "Share adjustment must be a finite number, got {delta}"
            )));
        }

        let holding = portfolio
            .holdings
            .get_mut(&symbol)
            .ok_or_else(|| CoreError::UnknownSymbol(symbol.clone()))?;
        let result = holding.shares + delta;
        if result < 0.0 {
            return Err(CoreError::NegativeShares {
                symbol,
                current: holding.shares,
                delta,
            });
        }
        holding.shares = result;
        Ok(())
    }

    /// Delete a holding entirely — explicit and irreversible within the
    /// session. Returns the removed holding so the caller can log it.
    pub fn remove_holding(
        &self,
        portfolio: &mut Portfolio,
        symbol: &str,
    ) -> Result<Holding, CoreError> {
        let symbol = Self::normalize_symbol(symbol)?;
        portfolio
            .holdings
            .remove(&symbol)
            .ok_or(CoreError::UnknownSymbol(symbol))
    }

    /// Update the uninvested cash amount.
    pub fn set_cash(&self, portfolio: &mut Portfolio, amount: f64) -> Result<(), CoreError> {
        if !amount.is_finite() || amount < 0.0 {
            return Err(CoreError::ValidationError(format!(
                "Cash amount must not be negative, got {amount}"
            )));
        }
        portfolio.cash_uninvested = amount;
        Ok(())
    }

    /// Trim and uppercase a symbol; reject empty input.
    fn normalize_symbol(symbol: &str) -> Result<String, CoreError> {
        let normalized = symbol.trim().to_uppercase();
        if normalized.is_empty() {
            return Err(CoreError::ValidationError(
                "Symbol must not be empty".into(),
            ));
        }
        Ok(normalized)
    }
}

impl Default for PortfolioService {
    fn default() -> Self {
        Self::new()
    }
}
