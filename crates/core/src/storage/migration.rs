use chrono::NaiveDate;
use serde_json::{json, Map, Value};

use super::snapshot::CURRENT_VERSION;
use crate::errors::CoreError;

/// One migration step: upgrades a raw snapshot from version `v` to `v+1`.
/// Steps are pure — they consume their input and build a fresh output.
type MigrationStep = fn(Value) -> Result<Value, CoreError>;

/// The chain, in strict ascending order. `MIGRATIONS[v]` upgrades v → v+1.
const MIGRATIONS: [MigrationStep; CURRENT_VERSION as usize] =
    [migrate_v0_to_v1, migrate_v1_to_v2];

/// Read the version a raw snapshot declares. A missing tag means version 0
/// (the earliest known shape, which predates tagging).
pub fn declared_version(raw: &Value) -> Result<u64, CoreError> {
    let root = raw.as_object().ok_or_else(|| corrupt(0, "$", "snapshot must be a JSON object"))?;
    match root.get("schema_version") {
        None | Some(Value::Null) => Ok(0),
        Some(v) => v
            .as_u64()
            .ok_or_else(|| corrupt(0, "schema_version", "must be a non-negative integer")),
    }
}

/// Bring a raw parsed snapshot up to `CURRENT_VERSION` by applying every
/// step from its declared version, in order, with no skipping.
///
/// Already-current input passes through unchanged (the chain is a no-op),
/// so running migration twice equals running it once. A snapshot from a
/// newer build is rejected rather than guessed at.
pub fn migrate_to_current(raw: Value) -> Result<Value, CoreError> {
    let version = declared_version(&raw)?;
    if version > u64::from(CURRENT_VERSION) {
        return Err(CoreError::VersionTooNew {
            found: version,
            current: CURRENT_VERSION,
        });
    }

    let mut current = raw;
    for step in &MIGRATIONS[version as usize..] {
        current = step(current)?;
    }
    Ok(current)
}

/// v0 → v1: the legacy single-file app stored one scalar record per
/// ticker (`shares`, `purchase_price`, `total_invested`,
/// `dividends_collected`, `last_div_amount`, `last_div_date`, plus
/// display-only fields). This step synthesizes the append-only
/// `purchases`/`dividends` logs from those totals.
///
/// Defaults for the synthesized logs:
/// - one purchase when `shares > 0`, priced `total_invested / shares` so
///   invested capital is preserved exactly (falling back to the recorded
///   `purchase_price`, then 0), dated `null` — lot dates are unknown and
///   never invented;
/// - one dividend when `dividends_collected > 0`, dated `last_div_date`
///   when it parses as an ISO date, else `null`;
/// - a divested record (`shares == 0`) keeps its dividends and gets an
///   empty purchase log.
///
/// Display and price-feed fields (`name`, `summary`, `last_prices`,
/// `settings`, `last_updated`, the legacy string `version`) are dropped.
fn migrate_v0_to_v1(raw: Value) -> Result<Value, CoreError> {
    const STEP: u32 = 0;

    let root = expect_object(STEP, "$", &raw)?;
    let cash = opt_non_negative(STEP, "cash_uninvested", root.get("cash_uninvested"))?;

    let mut holdings = Map::new();
    if let Some(raw_holdings) = root.get("holdings") {
        let map = raw_holdings
            .as_object()
            .ok_or_else(|| corrupt(STEP, "holdings", "must be an object keyed by ticker"))?;

        for (ticker, record) in map {
            let path = format!("holdings.{ticker}");
            let record = expect_object(STEP, &path, record)?;

            let shares =
                opt_non_negative(STEP, &format!("{path}.shares"), record.get("shares"))?;
            let invested = opt_non_negative(
                STEP,
                &format!("{path}.total_invested"),
                record.get("total_invested"),
            )?;
            let purchase_price = opt_non_negative(
                STEP,
                &format!("{path}.purchase_price"),
                record.get("purchase_price"),
            )?;
            let dividends_collected = opt_non_negative(
                STEP,
                &format!("{path}.dividends_collected"),
                record.get("dividends_collected"),
            )?;

            let mut purchases = Vec::new();
            if shares > 0.0 {
                let price = if invested > 0.0 {
                    invested / shares
                } else {
                    purchase_price
                };
                purchases.push(json!({
                    "shares": shares,
                    "price": price,
                    "date": Value::Null,
                }));
            }

            let mut dividends = Vec::new();
            if dividends_collected > 0.0 {
                dividends.push(json!({
                    "amount": dividends_collected,
                    "date": legacy_date(record.get("last_div_date")),
                }));
            }

            holdings.insert(
                ticker.clone(),
                json!({
                    "shares": shares,
                    "purchases": purchases,
                    "dividends": dividends,
                }),
            );
        }
    }

    Ok(json!({
        "schema_version": 1,
        "holdings": holdings,
        "cash_uninvested": cash,
    }))
}

/// v1 → v2: holdings move from an object keyed by ticker to an array of
/// objects carrying an explicit `symbol` field, sorted by symbol.
fn migrate_v1_to_v2(raw: Value) -> Result<Value, CoreError> {
    const STEP: u32 = 1;

    let root = expect_object(STEP, "$", &raw)?;
    let cash = opt_non_negative(STEP, "cash_uninvested", root.get("cash_uninvested"))?;

    let empty = Map::new();
    let map = match root.get("holdings") {
        None | Some(Value::Null) => &empty,
        Some(v) => v
            .as_object()
            .ok_or_else(|| corrupt(STEP, "holdings", "must be an object keyed by ticker"))?,
    };

    let mut entries: Vec<(&String, &Value)> = map.iter().collect();
    // Sort on the normalized symbol so the output order matches the keys
    // the current schema will use.
    entries.sort_by_key(|(ticker, _)| ticker.trim().to_uppercase());

    let mut holdings = Vec::with_capacity(entries.len());
    for (ticker, value) in entries {
        let path = format!("holdings.{ticker}");
        let record = expect_object(STEP, &path, value)?;

        let shares = opt_non_negative(STEP, &format!("{path}.shares"), record.get("shares"))?;
        let purchases = expect_array(STEP, &format!("{path}.purchases"), record.get("purchases"))?;
        let dividends = expect_array(STEP, &format!("{path}.dividends"), record.get("dividends"))?;

        holdings.push(json!({
            "symbol": ticker.trim().to_uppercase(),
            "shares": shares,
            "purchases": purchases,
            "dividends": dividends,
        }));
    }

    Ok(json!({
        "schema_version": 2,
        "holdings": holdings,
        "cash_uninvested": cash,
    }))
}

// ── Step helpers ────────────────────────────────────────────────────

fn corrupt(step: u32, field: &str, message: impl Into<String>) -> CoreError {
    CoreError::CorruptSnapshot {
        step,
        field: field.to_string(),
        message: message.into(),
    }
}

fn expect_object<'a>(
    step: u32,
    field: &str,
    value: &'a Value,
) -> Result<&'a Map<String, Value>, CoreError> {
    value
        .as_object()
        .ok_or_else(|| corrupt(step, field, "must be an object"))
}

fn expect_array(step: u32, field: &str, value: Option<&Value>) -> Result<Vec<Value>, CoreError> {
    match value {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(v) => v
            .as_array()
            .cloned()
            .ok_or_else(|| corrupt(step, field, "must be an array")),
    }
}

/// A missing or null numeric field defaults to 0; a present field must be
/// a finite non-negative number.
fn opt_non_negative(step: u32, field: &str, value: Option<&Value>) -> Result<f64, CoreError> {
    match value {
        None | Some(Value::Null) => Ok(0.0),
        Some(v) => {
            let n = v
                .as_f64()
                .ok_or_else(|| corrupt(step, field, "must be a number"))?;
            if !n.is_finite() || n < 0.0 {
                return Err(corrupt(step, field, format!("must not be negative, got {n}")));
            }
            Ok(n)
        }
    }
}

/// Legacy `last_div_date` was free text (often empty). Keep it only when
/// it is a real ISO date; otherwise the dividend date is unknown.
fn legacy_date(value: Option<&Value>) -> Value {
    match value.and_then(Value::as_str) {
        Some(s) if NaiveDate::parse_from_str(s, "%Y-%m-%d").is_ok() => {
            Value::String(s.to_string())
        }
        _ => Value::Null,
    }
}
