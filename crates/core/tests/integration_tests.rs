// ═══════════════════════════════════════════════════════════════════
// Integration Tests — full session flows through the
// InvestmentTracker facade: build, export, re-import, legacy restore
// ═══════════════════════════════════════════════════════════════════

use chrono::NaiveDate;
use std::collections::HashMap;

use investment_tracker_core::errors::CoreError;
use investment_tracker_core::storage::snapshot::CURRENT_VERSION;
use investment_tracker_core::InvestmentTracker;

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

fn prices(entries: &[(&str, f64)]) -> HashMap<String, f64> {
    entries.iter().map(|(s, p)| (s.to_string(), *p)).collect()
}

fn build_session() -> InvestmentTracker {
    let mut tracker = InvestmentTracker::create_new();
    tracker
        .add_purchase("AAPL", 10.0, 100.0, Some(d(2024, 1, 2)))
        .unwrap();
    tracker
        .add_purchase("AAPL", 2.0, 110.0, Some(d(2024, 4, 2)))
        .unwrap();
    tracker
        .add_dividend("AAPL", 12.5, Some(d(2024, 6, 15)))
        .unwrap();
    tracker.add_purchase("MSFT", 3.0, 300.0, None).unwrap();
    tracker.set_cash(500.0).unwrap();
    tracker
}

#[test]
fn export_then_reimport_preserves_everything() {
    let mut session = build_session();
    let bytes = session.save_to_bytes().unwrap();

    let restored = InvestmentTracker::load_from_bytes(&bytes).unwrap();
    assert_eq!(restored.snapshot(), session.snapshot());
    assert!(!restored.has_unsaved_changes());

    // Valuation of the restored session matches the original
    let quotes = prices(&[("AAPL", 120.0), ("MSFT", 310.0)]);
    assert_eq!(session.valuation(&quotes), restored.valuation(&quotes));
}

#[test]
fn restore_replaces_the_session_atomically() {
    let mut source = build_session();
    let bytes = source.save_to_bytes().unwrap();

    let mut target = InvestmentTracker::create_new();
    target.add_purchase("TSLA", 1.0, 200.0, None).unwrap();
    target.restore_from_bytes(&bytes).unwrap();

    assert!(target.get_holding("TSLA").is_none());
    assert_eq!(target.symbols(), vec!["AAPL", "MSFT"]);
    assert_eq!(target.cash_uninvested(), 500.0);
    assert!(!target.has_unsaved_changes());
}

#[test]
fn failed_restore_leaves_the_session_untouched() {
    let mut session = build_session();
    let before = session.snapshot();

    let corrupt = serde_json::to_vec(&serde_json::json!({
        "schema_version": CURRENT_VERSION,
        "holdings": [{"symbol": "AAPL", "shares": -1.0, "purchases": [], "dividends": []}]
    }))
    .unwrap();
    assert!(matches!(
        session.restore_from_bytes(&corrupt),
        Err(CoreError::CorruptSnapshot { .. })
    ));

    let too_new = serde_json::to_vec(&serde_json::json!({
        "schema_version": CURRENT_VERSION + 1,
        "holdings": []
    }))
    .unwrap();
    assert!(matches!(
        session.restore_from_bytes(&too_new),
        Err(CoreError::VersionTooNew { .. })
    ));

    // The user is free to pick another file — nothing was mutated
    assert_eq!(session.snapshot(), before);
}

#[test]
fn legacy_v0_backup_restores_and_values_correctly() {
    // A backup written by the original single-file app
    let legacy = serde_json::to_vec(&serde_json::json!({
        "holdings": {
            "aapl": {
                "name": "Apple Inc.",
                "shares": 10.0,
                "purchase_price": 95.0,
                "total_invested": 1000.0,
                "dividends_collected": 50.0,
                "last_div_amount": 12.5,
                "last_div_date": "2024-06-15"
            }
        },
        "cash_uninvested": 250.0,
        "settings": {"currency": "USD", "auto_price": true},
        "last_prices": {"AAPL": 180.0},
        "version": "1.8.15"
    }))
    .unwrap();

    let tracker = InvestmentTracker::load_from_bytes(&legacy).unwrap();
    assert_eq!(tracker.symbols(), vec!["AAPL"]);
    assert_eq!(tracker.cash_uninvested(), 250.0);

    let v = tracker.holding_valuation("AAPL", Some(110.0)).unwrap();
    assert_eq!(v.total_invested, 1000.0);
    assert_eq!(v.avg_cost, Some(100.0));
    assert_eq!(v.true_ada, Some(95.0));
    assert_eq!(v.overall_return, Some(1100.0 - 1000.0 + 50.0));

    // Migrated lot has no fabricated date
    let h = tracker.get_holding("AAPL").unwrap();
    assert_eq!(h.purchases.len(), 1);
    assert_eq!(h.purchases[0].date, None);
    assert_eq!(h.dividends[0].date, Some(d(2024, 6, 15)));
}

#[test]
fn migrated_backup_round_trips_at_current_version() {
    let legacy = serde_json::to_vec(&serde_json::json!({
        "holdings": {
            "O": {"shares": 20.0, "total_invested": 1100.0, "dividends_collected": 30.0}
        }
    }))
    .unwrap();

    let mut first = InvestmentTracker::load_from_bytes(&legacy).unwrap();
    let reexported = first.save_to_bytes().unwrap();
    let second = InvestmentTracker::load_from_bytes(&reexported).unwrap();
    assert_eq!(first.snapshot(), second.snapshot());
}

#[cfg(not(target_arch = "wasm32"))]
#[test]
fn full_session_lifecycle_via_files() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("portfolio_backup.json");
    let path = path.to_str().unwrap();

    let mut session = build_session();
    session.save_to_file(path).unwrap();
    assert!(!session.has_unsaved_changes());

    let mut restored = InvestmentTracker::load_from_file(path).unwrap();
    restored.add_dividend("MSFT", 6.0, Some(d(2024, 9, 12))).unwrap();
    assert!(restored.has_unsaved_changes());

    let v = restored.valuation(&prices(&[("AAPL", 120.0), ("MSFT", 310.0)]));
    assert_eq!(v.total_dividends, 18.5);
    assert_eq!(v.total_invested, 1220.0 + 900.0);
}
