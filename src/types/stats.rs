use std::collections::{BTreeMap, BTreeSet, VecDeque};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Number of response-time samples retained for the rolling average.
pub const RESPONSE_TIME_SAMPLES: usize = 100;

/// The admin analytics document persisted under `bookwise_admin_stats`.
///
/// Every section carries `#[serde(default)]` so a document written by an older
/// build (or hand-edited) loads with the missing counters zeroed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AdminStats {
    #[serde(default)]
    pub visitors: VisitorCounters,
    #[serde(default)]
    pub searches: SearchCounters,
    #[serde(default)]
    pub ads: AdCounters,
    #[serde(default)]
    pub performance: PerformanceCounters,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
    #[serde(default = "Utc::now")]
    pub last_updated: DateTime<Utc>,
}

impl Default for AdminStats {
    fn default() -> Self {
        let now = Utc::now();
        Self {
            visitors: VisitorCounters::default(),
            searches: SearchCounters::default(),
            ads: AdCounters::default(),
            performance: PerformanceCounters::default(),
            created_at: now,
            last_updated: now,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct VisitorCounters {
    pub total: u64,
    /// Serialized as a JSON array.
    pub unique: BTreeSet<String>,
    /// Visits keyed by `YYYY-MM-DD`.
    pub daily: BTreeMap<String, u64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct SearchCounters {
    pub total: u64,
    pub successful: u64,
    pub failed: u64,
    /// Normalized (trimmed, lowercased) query -> count.
    pub queries: BTreeMap<String, u64>,
    pub pdf_uploads: u64,
    pub pdf_upload_failures: u64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct AdSlotCounters {
    pub impressions: u64,
    pub clicks: u64,
    pub ctr: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct AdCounters {
    pub impressions: u64,
    pub clicks: u64,
    pub ctr: f64,
    pub slots: BTreeMap<String, AdSlotCounters>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct PerformanceCounters {
    /// Most recent samples in milliseconds, oldest first.
    pub response_times: VecDeque<u64>,
    pub average_response_time: f64,
    pub errors: u64,
}

/// A query and how often it was searched.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PopularSearch {
    pub query: String,
    pub count: u64,
}

/// Derived search performance figures.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PerformanceStats {
    pub total_searches: u64,
    pub successful_searches: u64,
    pub failed_searches: u64,
    /// Percentage in `[0, 100]`; 0 when nothing was searched.
    pub success_rate: f64,
    pub average_response_time: f64,
    pub samples: usize,
    pub errors: u64,
    pub pdf_uploads: u64,
}

/// Derived visitor figures.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct VisitorStats {
    pub total: u64,
    pub unique: usize,
    pub today: u64,
    /// `(date, visits)` for the last seven days, oldest first.
    pub last_seven_days: Vec<(String, u64)>,
}

/// Derived advertising figures.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AdStats {
    pub impressions: u64,
    pub clicks: u64,
    pub ctr: f64,
    pub slots: BTreeMap<String, AdSlotCounters>,
}

/// Click-through rate in percent, 0 when there were no impressions.
pub fn click_through_rate(clicks: u64, impressions: u64) -> f64 {
    if impressions == 0 {
        0.0
    } else {
        clicks as f64 / impressions as f64 * 100.0
    }
}
