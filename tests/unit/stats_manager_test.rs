//! Unit tests for StatsManager: visitor, search, upload, and ad tracking.

use std::sync::Arc;

use bookwise::managers::stats_manager::*;
use bookwise::storage::{KeyValueStore, MemoryStore};
use bookwise::types::errors::StatsError;
use bookwise::types::stats::RESPONSE_TIME_SAMPLES;

fn setup() -> (Arc<MemoryStore>, StatsManager) {
    let store = Arc::new(MemoryStore::new());
    let stats = StatsManager::new(store.clone());
    (store, stats)
}

// ─── Initialization ───

#[test]
fn test_initialize_creates_document() {
    let (store, stats) = setup();
    let initial = stats.initialize_stats().unwrap();
    assert_eq!(initial.visitors.total, 0);
    assert!(store.get_item(STATS_KEY).unwrap().is_some());
}

#[test]
fn test_initialize_keeps_existing_counters() {
    let (_store, stats) = setup();
    stats.track_visitor("v1").unwrap();
    let again = stats.initialize_stats().unwrap();
    assert_eq!(again.visitors.total, 1);
}

#[test]
fn test_initialize_fills_missing_sections() {
    let (store, stats) = setup();
    store
        .set_item(STATS_KEY, r#"{"visitors":{"total":4}}"#)
        .unwrap();
    let filled = stats.initialize_stats().unwrap();
    assert_eq!(filled.visitors.total, 4);
    assert_eq!(filled.searches.total, 0);
    assert!(filled.performance.response_times.is_empty());
}

#[test]
fn test_corrupt_document_errors_until_initialized() {
    let (store, stats) = setup();
    store.set_item(STATS_KEY, "not json").unwrap();

    assert!(matches!(stats.track_visitor("v"), Err(StatsError::SerializationError(_))));
    stats.initialize_stats().unwrap();
    stats.track_visitor("v").unwrap();
    assert_eq!(stats.get_stats().unwrap().visitors.total, 1);
}

// ─── Visitors ───

#[test]
fn test_track_visitor_counts_unique() {
    let (_store, stats) = setup();
    stats.track_visitor("a").unwrap();
    stats.track_visitor("a").unwrap();
    stats.track_visitor("b").unwrap();

    let visitors = stats.get_visitor_stats().unwrap();
    assert_eq!(visitors.total, 3);
    assert_eq!(visitors.unique, 2);
    assert_eq!(visitors.today, 3);
    assert_eq!(visitors.last_seven_days.len(), 7);
    assert_eq!(visitors.last_seven_days[6].1, 3);
}

// ─── Searches & performance ───

#[test]
fn test_track_search_counters() {
    let (_store, stats) = setup();
    stats.track_search("Atomic Habits", true, 100).unwrap();
    stats.track_search(" atomic habits ", true, 300).unwrap();
    stats.track_search("missing book", false, 200).unwrap();
    stats.track_search("   ", true, 400).unwrap();

    let perf = stats.get_performance_stats().unwrap();
    assert_eq!(perf.total_searches, 4);
    assert_eq!(perf.successful_searches, 3);
    assert_eq!(perf.failed_searches, 1);
    assert_eq!(perf.errors, 1);
    assert!((perf.success_rate - 75.0).abs() < 1e-9);
    assert!((perf.average_response_time - 250.0).abs() < 1e-9);

    let popular = stats.get_popular_searches(10).unwrap();
    assert_eq!(popular.len(), 2);
    assert_eq!(popular[0].query, "atomic habits");
    assert_eq!(popular[0].count, 2);
}

#[test]
fn test_popular_searches_tie_break_alphabetical() {
    let (_store, stats) = setup();
    for q in ["zen", "art", "mind"] {
        stats.track_search(q, true, 1).unwrap();
    }
    let popular = stats.get_popular_searches(2).unwrap();
    let queries: Vec<&str> = popular.iter().map(|p| p.query.as_str()).collect();
    assert_eq!(queries, vec!["art", "mind"]);
}

#[test]
fn test_success_rate_zero_without_searches() {
    let (_store, stats) = setup();
    let perf = stats.get_performance_stats().unwrap();
    assert_eq!(perf.success_rate, 0.0);
    assert_eq!(perf.average_response_time, 0.0);
    assert_eq!(perf.samples, 0);
}

#[test]
fn test_response_time_ring_buffer() {
    let (_store, stats) = setup();
    for i in 0..(RESPONSE_TIME_SAMPLES as u64 + 20) {
        stats.track_search("q", true, i).unwrap();
    }
    let stored = stats.get_stats().unwrap();
    assert_eq!(stored.performance.response_times.len(), RESPONSE_TIME_SAMPLES);
    assert_eq!(stored.performance.response_times.front(), Some(&20));

    let perf = stats.get_performance_stats().unwrap();
    let expected = (20..120).sum::<u64>() as f64 / 100.0;
    assert!((perf.average_response_time - expected).abs() < 1e-9);
}

#[test]
fn test_track_pdf_upload() {
    let (_store, stats) = setup();
    stats.track_pdf_upload(true).unwrap();
    stats.track_pdf_upload(false).unwrap();
    let stored = stats.get_stats().unwrap();
    assert_eq!(stored.searches.pdf_uploads, 1);
    assert_eq!(stored.searches.pdf_upload_failures, 1);
    assert_eq!(stored.performance.errors, 1);
}

// ─── Ads ───

#[test]
fn test_ctr_zero_when_no_impressions() {
    let (_store, stats) = setup();
    stats.track_ad_click("header").unwrap();
    let ads = stats.get_ad_stats().unwrap();
    assert_eq!(ads.clicks, 1);
    assert_eq!(ads.ctr, 0.0);
    assert_eq!(ads.slots["header"].ctr, 0.0);
    assert!(ads.ctr.is_finite());
}

#[test]
fn test_ctr_per_slot() {
    let (_store, stats) = setup();
    for _ in 0..4 {
        stats.track_ad_impression("sidebar").unwrap();
    }
    stats.track_ad_impression("footer").unwrap();
    stats.track_ad_click("sidebar").unwrap();

    let ads = stats.get_ad_stats().unwrap();
    assert_eq!(ads.impressions, 5);
    assert!((ads.ctr - 20.0).abs() < 1e-9);
    assert!((ads.slots["sidebar"].ctr - 25.0).abs() < 1e-9);
    assert_eq!(ads.slots["footer"].ctr, 0.0);
}

// ─── Reset & export ───

#[test]
fn test_reset_and_export() {
    let (_store, stats) = setup();
    stats.track_visitor("a").unwrap();
    stats.reset_stats().unwrap();
    assert_eq!(stats.get_stats().unwrap().visitors.total, 0);

    let exported = stats.export_stats().unwrap();
    assert!(exported.contains('\n'));
    let parsed: serde_json::Value = serde_json::from_str(&exported).unwrap();
    assert!(parsed.get("visitors").is_some());
    assert!(parsed.get("lastUpdated").is_some());
}
