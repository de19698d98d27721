use thiserror::Error;

/// Unified error type for the entire investment-tracker-core library.
/// Every fallible public function returns `Result<T, CoreError>`.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Portfolio mutations ─────────────────────────────────────────
    #[error("Validation failed: {0}")]
    ValidationError(String),

    #[error("Unknown symbol: {0} — add a purchase for it first")]
    UnknownSymbol(String),

    #[error("Share adjustment for {symbol} rejected: {current} {delta:+} would go below zero")]
    NegativeShares {
        symbol: String,
        current: f64,
        delta: f64,
    },

    // ── Snapshot import / migration ─────────────────────────────────
    #[error("Corrupt snapshot at migration step {step}: field '{field}': {message}")]
    CorruptSnapshot {
        /// Source version of the migration step that rejected the input.
        /// A step equal to `CURRENT_VERSION` means final validation.
        step: u32,
        /// JSON-path-style name of the offending field.
        field: String,
        message: String,
    },

    #[error("Snapshot version {found} is newer than this build supports ({current}) — update the app")]
    VersionTooNew { found: u64, current: u32 },

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Deserialization error: {0}")]
    Deserialization(String),

    // ── File I/O (native only) ──────────────────────────────────────
    #[error("File I/O error: {0}")]
    FileIO(String),
}

// ── Conversion helpers (From impls) ─────────────────────────────────

impl From<std::io::Error> for CoreError {
    fn from(e: std::io::Error) -> Self {
        CoreError::FileIO(e.to_string())
    }
}

impl From<serde_json::Error> for CoreError {
    fn from(e: serde_json::Error) -> Self {
        CoreError::Deserialization(e.to_string())
    }
}
