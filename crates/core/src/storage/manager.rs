use serde_json::Value;

use crate::errors::CoreError;
use crate::models::portfolio::Portfolio;

use super::migration;
use super::snapshot::{Snapshot, CURRENT_VERSION};

/// High-level backup operations: export/import a portfolio as versioned
/// JSON bytes or files.
pub struct BackupManager;

impl BackupManager {
    /// Serialize a portfolio to current-version JSON bytes.
    ///
    /// Flow: Portfolio → Snapshot (holdings sorted by symbol) → pretty JSON.
    /// Output is byte-deterministic, so repeated exports of equal
    /// portfolios diff clean.
    pub fn save_to_bytes(portfolio: &Portfolio) -> Result<Vec<u8>, CoreError> {
        let snapshot = Snapshot::from_portfolio(portfolio);
        serde_json::to_vec_pretty(&snapshot)
            .map_err(|e| CoreError::Serialization(format!("Failed to serialize snapshot: {e}")))
    }

    /// Parse, migrate, validate, and build a portfolio from backup bytes.
    ///
    /// Flow: bytes → untyped JSON → migration chain → typed Snapshot
    /// (unknown fields rejected) → invariant validation → Portfolio.
    ///
    /// This is the untrusted-data boundary: every failure comes back as an
    /// error before any portfolio exists, so the caller's current state is
    /// never touched.
    pub fn load_from_bytes(data: &[u8]) -> Result<Portfolio, CoreError> {
        // 1. Parse to the untyped intermediate
        let raw: Value = serde_json::from_slice(data)
            .map_err(|e| CoreError::Deserialization(format!("Invalid JSON: {e}")))?;

        // 2. Bring it up to the current schema version
        let migrated = migration::migrate_to_current(raw)?;

        // 3. Decode into the strongly-typed current shape
        let snapshot: Snapshot =
            serde_json::from_value(migrated).map_err(|e| CoreError::CorruptSnapshot {
                step: CURRENT_VERSION,
                field: "snapshot".into(),
                message: e.to_string(),
            })?;

        // 4. Validate invariants, then build
        snapshot.validate()?;
        Ok(snapshot.into_portfolio())
    }

    /// Save a portfolio backup to a file on disk (native only).
    #[cfg(not(target_arch = "wasm32"))]
    pub fn save_to_file(portfolio: &Portfolio, path: &str) -> Result<(), CoreError> {
        let bytes = Self::save_to_bytes(portfolio)?;
        std::fs::write(path, bytes)?;
        Ok(())
    }

    /// Load a portfolio backup from a file on disk (native only).
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load_from_file(path: &str) -> Result<Portfolio, CoreError> {
        let bytes = std::fs::read(path)?;
        Self::load_from_bytes(&bytes)
    }
}
