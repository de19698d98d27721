pub mod errors;
pub mod models;
pub mod services;
pub mod storage;

use chrono::NaiveDate;
use std::collections::HashMap;

use errors::CoreError;
use models::{
    holding::Holding,
    portfolio::Portfolio,
    valuation::{HoldingValuation, PortfolioValuation},
};
use services::{portfolio_service::PortfolioService, valuation_service::ValuationService};
use storage::manager::BackupManager;

/// Main entry point for the Investment Tracker core library.
///
/// Owns the session's portfolio state and the services that operate on it.
/// One instance per session — there is no process-wide singleton; the
/// embedding UI constructs, holds, and resets this object.
#[must_use]
pub struct InvestmentTracker {
    portfolio: Portfolio,
    portfolio_service: PortfolioService,
    valuation_service: ValuationService,
    /// Tracks whether any mutation has occurred since the last save/load.
    dirty: bool,
}

impl std::fmt::Debug for InvestmentTracker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InvestmentTracker")
            .field("holdings", &self.portfolio.holding_count())
            .field("cash_uninvested", &self.portfolio.cash_uninvested)
            .field("dirty", &self.dirty)
            .finish()
    }
}

impl InvestmentTracker {
    /// Create a brand new empty session.
    pub fn create_new() -> Self {
        Self::build(Portfolio::new())
    }

    /// Start a session from backup bytes (runs migration + validation).
    /// Use this for WASM / embedded hosts where the frontend handles file I/O.
    pub fn load_from_bytes(data: &[u8]) -> Result<Self, CoreError> {
        let portfolio = BackupManager::load_from_bytes(data)?;
        Ok(Self::build(portfolio))
    }

    /// Export the current portfolio as backup bytes the frontend can offer
    /// as a download. Clears the unsaved-changes flag on success.
    pub fn save_to_bytes(&mut self) -> Result<Vec<u8>, CoreError> {
        let bytes = BackupManager::save_to_bytes(&self.portfolio)?;
        self.dirty = false;
        Ok(bytes)
    }

    /// Start a session from a backup file on disk (native only, not WASM).
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load_from_file(path: &str) -> Result<Self, CoreError> {
        let portfolio = BackupManager::load_from_file(path)?;
        Ok(Self::build(portfolio))
    }

    /// Save the current portfolio to a backup file on disk (native only).
    /// Clears the unsaved-changes flag on success.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn save_to_file(&mut self, path: &str) -> Result<(), CoreError> {
        BackupManager::save_to_file(&self.portfolio, path)?;
        self.dirty = false;
        Ok(())
    }

    /// Replace the session's portfolio with an imported backup.
    ///
    /// Atomic from the caller's perspective: the new portfolio is built and
    /// validated completely before the swap, so any failure leaves the
    /// current state untouched and the user free to pick another file.
    pub fn restore_from_bytes(&mut self, data: &[u8]) -> Result<(), CoreError> {
        let portfolio = BackupManager::load_from_bytes(data)?;
        self.portfolio = portfolio;
        self.dirty = false;
        Ok(())
    }

    /// Discard all session state and start over with an empty portfolio.
    pub fn reset(&mut self) {
        self.portfolio = Portfolio::new();
        self.dirty = false;
    }

    // ── Portfolio Store mutations ───────────────────────────────────

    /// Record a buy. Creates the holding on first purchase.
    pub fn add_purchase(
        &mut self,
        symbol: &str,
        shares: f64,
        price: f64,
        date: Option<NaiveDate>,
    ) -> Result<(), CoreError> {
        self.portfolio_service
            .add_purchase(&mut self.portfolio, symbol, shares, price, date)?;
        self.dirty = true;
        Ok(())
    }

    /// Record a cash dividend for an existing holding.
    pub fn add_dividend(
        &mut self,
        symbol: &str,
        amount: f64,
        date: Option<NaiveDate>,
    ) -> Result<(), CoreError> {
        self.portfolio_service
            .add_dividend(&mut self.portfolio, symbol, amount, date)?;
        self.dirty = true;
        Ok(())
    }

    /// Manually correct a holding's share count (sale/split fix-up).
    pub fn adjust_shares(&mut self, symbol: &str, delta: f64) -> Result<(), CoreError> {
        self.portfolio_service
            .adjust_shares(&mut self.portfolio, symbol, delta)?;
        self.dirty = true;
        Ok(())
    }

    /// Delete a holding permanently. Returns the removed record.
    pub fn remove_holding(&mut self, symbol: &str) -> Result<Holding, CoreError> {
        let removed = self
            .portfolio_service
            .remove_holding(&mut self.portfolio, symbol)?;
        self.dirty = true;
        Ok(removed)
    }

    /// Update the uninvested cash amount.
    pub fn set_cash(&mut self, amount: f64) -> Result<(), CoreError> {
        self.portfolio_service.set_cash(&mut self.portfolio, amount)?;
        self.dirty = true;
        Ok(())
    }

    // ── Readers ─────────────────────────────────────────────────────

    /// Get a single holding by symbol (case-insensitive).
    #[must_use]
    pub fn get_holding(&self, symbol: &str) -> Option<&Holding> {
        self.portfolio.get(symbol)
    }

    /// All holdings in deterministic (symbol-sorted) order.
    #[must_use]
    pub fn get_holdings(&self) -> Vec<&Holding> {
        self.portfolio.holdings.values().collect()
    }

    /// All tracked symbols, sorted.
    #[must_use]
    pub fn symbols(&self) -> Vec<&str> {
        self.portfolio.symbols()
    }

    /// Number of tracked holdings, divested ones included.
    #[must_use]
    pub fn holding_count(&self) -> usize {
        self.portfolio.holding_count()
    }

    /// Uninvested cash.
    #[must_use]
    pub fn cash_uninvested(&self) -> f64 {
        self.portfolio.cash_uninvested
    }

    /// An immutable deep copy of the current state, safe to hand to
    /// valuation or export without observing later mutations.
    #[must_use]
    pub fn snapshot(&self) -> Portfolio {
        self.portfolio.clone()
    }

    /// Returns `true` if the portfolio has been modified since the last
    /// save or load.
    #[must_use]
    pub fn has_unsaved_changes(&self) -> bool {
        self.dirty
    }

    // ── Valuation ───────────────────────────────────────────────────

    /// Value the whole portfolio at caller-supplied prices (keyed by
    /// uppercased symbol).
    #[must_use]
    pub fn valuation(&self, prices: &HashMap<String, f64>) -> PortfolioValuation {
        self.valuation_service
            .portfolio_valuation(&self.portfolio, prices)
    }

    /// Value a single holding at an optional current price.
    #[must_use]
    pub fn holding_valuation(
        &self,
        symbol: &str,
        current_price: Option<f64>,
    ) -> Option<HoldingValuation> {
        self.portfolio
            .get(symbol)
            .map(|h| self.valuation_service.holding_valuation(h, current_price))
    }

    // ── Internal ────────────────────────────────────────────────────

    fn build(portfolio: Portfolio) -> Self {
        Self {
            portfolio,
            portfolio_service: PortfolioService::new(),
            valuation_service: ValuationService::new(),
            dirty: false,
        }
    }
}
