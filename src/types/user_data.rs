use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::blog::BookDetails;
use super::summary::{Recommendation, SummaryKind};

/// A single search the user performed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SearchHistoryEntry {
    pub id: String,
    pub query: String,
    pub results_count: u32,
    pub book_title: Option<String>,
    pub timestamp: DateTime<Utc>,
}

/// A summary the user chose to keep.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SavedSummary {
    pub id: String,
    pub book: BookDetails,
    pub summary: String,
    #[serde(rename = "type")]
    pub kind: SummaryKind,
    pub timestamp: DateTime<Utc>,
    pub amazon_link: Option<String>,
    #[serde(default)]
    pub recommendations: Vec<Recommendation>,
}

/// Input for `save_summary`; id and timestamp are assigned on save.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NewSavedSummary {
    pub book: BookDetails,
    pub summary: String,
    #[serde(default, rename = "type")]
    pub kind: SummaryKind,
    #[serde(default)]
    pub amazon_link: Option<String>,
    #[serde(default)]
    pub recommendations: Vec<Recommendation>,
}

/// The per-user document persisted under `bookwise_user_{id}`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UserData {
    pub user_id: String,
    #[serde(default)]
    pub search_history: Vec<SearchHistoryEntry>,
    #[serde(default)]
    pub saved_summaries: Vec<SavedSummary>,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
    #[serde(default = "Utc::now")]
    pub last_active: DateTime<Utc>,
}

impl UserData {
    /// Creates an empty document for the given user.
    pub fn new(user_id: &str) -> Self {
        let now = Utc::now();
        Self {
            user_id: user_id.to_string(),
            search_history: Vec::new(),
            saved_summaries: Vec::new(),
            created_at: now,
            last_active: now,
        }
    }
}

/// Aggregate view over a user's local data.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UserStats {
    pub total_searches: usize,
    pub total_saved: usize,
    pub last_search: Option<DateTime<Utc>>,
    pub last_saved: Option<DateTime<Utc>>,
    pub member_since: DateTime<Utc>,
}
