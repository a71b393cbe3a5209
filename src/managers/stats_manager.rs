//! Admin Stats Manager for BookWise.
//!
//! Approximate analytics counters kept in a single JSON document. Each
//! tracking call reads the whole document, mutates it, and writes it back;
//! concurrent writers can lose updates (last write wins).

use std::sync::Arc;

use chrono::{Duration, Utc};

use crate::storage::{read_json, write_json, KeyValueStore};
use crate::types::errors::{StatsError, StorageError};
use crate::types::stats::{
    click_through_rate, AdStats, AdminStats, PerformanceStats, PopularSearch, VisitorStats,
    RESPONSE_TIME_SAMPLES,
};

pub const STATS_KEY: &str = "bookwise_admin_stats";

/// Trait defining admin analytics operations.
pub trait StatsManagerTrait {
    fn initialize_stats(&self) -> Result<AdminStats, StatsError>;
    fn track_visitor(&self, visitor_id: &str) -> Result<(), StatsError>;
    fn track_search(&self, query: &str, success: bool, response_time_ms: u64) -> Result<(), StatsError>;
    fn track_pdf_upload(&self, success: bool) -> Result<(), StatsError>;
    fn track_ad_impression(&self, slot: &str) -> Result<(), StatsError>;
    fn track_ad_click(&self, slot: &str) -> Result<(), StatsError>;
    fn get_stats(&self) -> Result<AdminStats, StatsError>;
    fn get_popular_searches(&self, limit: usize) -> Result<Vec<PopularSearch>, StatsError>;
    fn get_performance_stats(&self) -> Result<PerformanceStats, StatsError>;
    fn get_visitor_stats(&self) -> Result<VisitorStats, StatsError>;
    fn get_ad_stats(&self) -> Result<AdStats, StatsError>;
    fn reset_stats(&self) -> Result<(), StatsError>;
    fn export_stats(&self) -> Result<String, StatsError>;
}

/// Stats aggregator over an injected key-value backend.
pub struct StatsManager {
    store: Arc<dyn KeyValueStore>,
}

impl StatsManager {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    fn today() -> String {
        Utc::now().format("%Y-%m-%d").to_string()
    }

    fn normalize_query(query: &str) -> String {
        query.trim().to_lowercase()
    }

    fn load(&self) -> Result<AdminStats, StatsError> {
        match read_json::<AdminStats>(self.store.as_ref(), STATS_KEY) {
            Ok(Some(stats)) => Ok(stats),
            Ok(None) => Ok(AdminStats::default()),
            Err(StorageError::SerializationError(msg)) => Err(StatsError::SerializationError(msg)),
            Err(e) => Err(e.into()),
        }
    }

    fn save(&self, stats: &mut AdminStats) -> Result<(), StatsError> {
        stats.last_updated = Utc::now();
        write_json(self.store.as_ref(), STATS_KEY, stats).map_err(|e| {
            tracing::error!("failed to save admin stats: {}", e);
            StatsError::from(e)
        })
    }

    fn update<F>(&self, mutate: F) -> Result<(), StatsError>
    where
        F: FnOnce(&mut AdminStats),
    {
        let mut stats = self.load()?;
        mutate(&mut stats);
        self.save(&mut stats)
    }
}

impl StatsManagerTrait for StatsManager {
    /// Ensures a complete stats document exists. Missing sections are filled
    /// with defaults; an unparseable document is replaced.
    fn initialize_stats(&self) -> Result<AdminStats, StatsError> {
        let mut stats = match self.load() {
            Ok(stats) => stats,
            Err(StatsError::SerializationError(msg)) => {
                tracing::warn!("replacing unreadable admin stats: {}", msg);
                AdminStats::default()
            }
            Err(e) => return Err(e),
        };
        self.save(&mut stats)?;
        Ok(stats)
    }

    fn track_visitor(&self, visitor_id: &str) -> Result<(), StatsError> {
        let today = Self::today();
        self.update(|stats| {
            stats.visitors.total += 1;
            if !visitor_id.is_empty() {
                stats.visitors.unique.insert(visitor_id.to_string());
            }
            *stats.visitors.daily.entry(today).or_insert(0) += 1;
        })
    }

    fn track_search(&self, query: &str, success: bool, response_time_ms: u64) -> Result<(), StatsError> {
        let normalized = Self::normalize_query(query);
        self.update(|stats| {
            stats.searches.total += 1;
            if success {
                stats.searches.successful += 1;
            } else {
                stats.searches.failed += 1;
                stats.performance.errors += 1;
            }
            if !normalized.is_empty() {
                *stats.searches.queries.entry(normalized).or_insert(0) += 1;
            }

            let perf = &mut stats.performance;
            perf.response_times.push_back(response_time_ms);
            while perf.response_times.len() > RESPONSE_TIME_SAMPLES {
                perf.response_times.pop_front();
            }
            let sum: u64 = perf.response_times.iter().sum();
            perf.average_response_time = sum as f64 / perf.response_times.len() as f64;
        })
    }

    fn track_pdf_upload(&self, success: bool) -> Result<(), StatsError> {
        self.update(|stats| {
            if success {
                stats.searches.pdf_uploads += 1;
            } else {
                stats.searches.pdf_upload_failures += 1;
                stats.performance.errors += 1;
            }
        })
    }

    fn track_ad_impression(&self, slot: &str) -> Result<(), StatsError> {
        self.update(|stats| {
            stats.ads.impressions += 1;
            stats.ads.ctr = click_through_rate(stats.ads.clicks, stats.ads.impressions);

            let entry = stats.ads.slots.entry(slot.to_string()).or_default();
            entry.impressions += 1;
            entry.ctr = click_through_rate(entry.clicks, entry.impressions);
        })
    }

    /// Records a click. CTR stays 0 while a slot has no impressions.
    fn track_ad_click(&self, slot: &str) -> Result<(), StatsError> {
        self.update(|stats| {
            stats.ads.clicks += 1;
            stats.ads.ctr = click_through_rate(stats.ads.clicks, stats.ads.impressions);

            let entry = stats.ads.slots.entry(slot.to_string()).or_default();
            entry.clicks += 1;
            entry.ctr = click_through_rate(entry.clicks, entry.impressions);
        })
    }

    fn get_stats(&self) -> Result<AdminStats, StatsError> {
        self.load()
    }

    /// Most searched queries, by count descending then query ascending.
    fn get_popular_searches(&self, limit: usize) -> Result<Vec<PopularSearch>, StatsError> {
        let stats = self.load()?;
        let mut popular: Vec<PopularSearch> = stats
            .searches
            .queries
            .into_iter()
            .map(|(query, count)| PopularSearch { query, count })
            .collect();
        popular.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.query.cmp(&b.query)));
        popular.truncate(limit);
        Ok(popular)
    }

    fn get_performance_stats(&self) -> Result<PerformanceStats, StatsError> {
        let stats = self.load()?;
        let searches = &stats.searches;
        let success_rate = if searches.total == 0 {
            0.0
        } else {
            searches.successful as f64 / searches.total as f64 * 100.0
        };
        let samples = stats.performance.response_times.len();
        let average_response_time = if samples == 0 {
            0.0
        } else {
            stats.performance.response_times.iter().sum::<u64>() as f64 / samples as f64
        };

        Ok(PerformanceStats {
            total_searches: searches.total,
            successful_searches: searches.successful,
            failed_searches: searches.failed,
            success_rate,
            average_response_time,
            samples,
            errors: stats.performance.errors,
            pdf_uploads: searches.pdf_uploads,
        })
    }

    fn get_visitor_stats(&self) -> Result<VisitorStats, StatsError> {
        let stats = self.load()?;
        let today = Utc::now().date_naive();
        let last_seven_days = (0..7)
            .rev()
            .map(|offset| {
                let day = (today - Duration::days(offset)).format("%Y-%m-%d").to_string();
                let visits = stats.visitors.daily.get(&day).copied().unwrap_or(0);
                (day, visits)
            })
            .collect::<Vec<_>>();

        Ok(VisitorStats {
            total: stats.visitors.total,
            unique: stats.visitors.unique.len(),
            today: last_seven_days.last().map(|(_, v)| *v).unwrap_or(0),
            last_seven_days,
        })
    }

    fn get_ad_stats(&self) -> Result<AdStats, StatsError> {
        let ads = self.load()?.ads;
        Ok(AdStats {
            ctr: click_through_rate(ads.clicks, ads.impressions),
            impressions: ads.impressions,
            clicks: ads.clicks,
            slots: ads.slots,
        })
    }

    fn reset_stats(&self) -> Result<(), StatsError> {
        let mut stats = AdminStats::default();
        self.save(&mut stats)
    }

    fn export_stats(&self) -> Result<String, StatsError> {
        let stats = self.load()?;
        serde_json::to_string_pretty(&stats).map_err(|e| StatsError::SerializationError(e.to_string()))
    }
}
