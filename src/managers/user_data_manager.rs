//! User Data Manager for BookWise.
//!
//! Keeps one JSON document per anonymous user with their search history and
//! saved summaries. Every mutation is a read-modify-write of that document;
//! there is no server sync.

use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use crate::storage::{read_json, write_json, KeyValueStore};
use crate::types::errors::{StorageError, UserDataError};
use crate::types::user_data::{
    NewSavedSummary, SavedSummary, SearchHistoryEntry, UserData, UserStats,
};

/// Maximum number of search history entries kept per user.
pub const MAX_SEARCH_HISTORY: usize = 50;

/// Maximum number of saved summaries kept per user.
pub const MAX_SAVED_SUMMARIES: usize = 100;

/// Storage key for a user's document.
pub fn user_data_key(user_id: &str) -> String {
    format!("bookwise_user_{}", user_id)
}

/// Trait defining per-user data operations.
pub trait UserDataManagerTrait {
    fn load(&self) -> Result<UserData, UserDataError>;
    fn add_search(
        &self,
        query: &str,
        results_count: u32,
        book_title: Option<&str>,
    ) -> Result<SearchHistoryEntry, UserDataError>;
    fn search_history(&self, limit: Option<usize>) -> Result<Vec<SearchHistoryEntry>, UserDataError>;
    fn clear_search_history(&self) -> Result<(), UserDataError>;
    fn save_summary(&self, summary: NewSavedSummary) -> Result<SavedSummary, UserDataError>;
    fn saved_summaries(&self) -> Result<Vec<SavedSummary>, UserDataError>;
    fn get_saved_summary(&self, id: &str) -> Result<SavedSummary, UserDataError>;
    fn is_summary_saved(&self, book_title: &str) -> Result<bool, UserDataError>;
    fn delete_saved_summary(&self, id: &str) -> Result<bool, UserDataError>;
    fn user_stats(&self) -> Result<UserStats, UserDataError>;
    fn clear_all(&self) -> Result<(), UserDataError>;
}

/// Per-user data store over an injected key-value backend.
pub struct UserDataManager {
    store: Arc<dyn KeyValueStore>,
    user_id: String,
    key: String,
}

impl UserDataManager {
    pub fn new(store: Arc<dyn KeyValueStore>, user_id: &str) -> Self {
        Self {
            store,
            user_id: user_id.to_string(),
            key: user_data_key(user_id),
        }
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    fn same_title(a: &str, b: &str) -> bool {
        a.trim().to_lowercase() == b.trim().to_lowercase()
    }

    fn persist(&self, data: &mut UserData) -> Result<(), UserDataError> {
        data.last_active = Utc::now();
        write_json(self.store.as_ref(), &self.key, data).map_err(|e| {
            tracing::error!(user_id = %self.user_id, "failed to persist user data: {}", e);
            UserDataError::from(e)
        })
    }
}

impl UserDataManagerTrait for UserDataManager {
    /// Loads the user's document. A missing document yields a fresh one; a
    /// corrupt one is logged and replaced by a fresh one on the next write.
    fn load(&self) -> Result<UserData, UserDataError> {
        match read_json::<UserData>(self.store.as_ref(), &self.key) {
            Ok(Some(data)) => Ok(data),
            Ok(None) => Ok(UserData::new(&self.user_id)),
            Err(StorageError::SerializationError(msg)) => {
                tracing::warn!(user_id = %self.user_id, "discarding unreadable user data: {}", msg);
                Ok(UserData::new(&self.user_id))
            }
            Err(e) => Err(e.into()),
        }
    }

    fn add_search(
        &self,
        query: &str,
        results_count: u32,
        book_title: Option<&str>,
    ) -> Result<SearchHistoryEntry, UserDataError> {
        let query = query.trim();
        if query.is_empty() {
            return Err(UserDataError::InvalidInput("search query is empty".to_string()));
        }

        let entry = SearchHistoryEntry {
            id: Uuid::new_v4().to_string(),
            query: query.to_string(),
            results_count,
            book_title: book_title.map(str::to_string),
            timestamp: Utc::now(),
        };

        let mut data = self.load()?;
        data.search_history.insert(0, entry.clone());
        data.search_history.truncate(MAX_SEARCH_HISTORY);
        self.persist(&mut data)?;
        Ok(entry)
    }

    fn search_history(&self, limit: Option<usize>) -> Result<Vec<SearchHistoryEntry>, UserDataError> {
        let mut history = self.load()?.search_history;
        if let Some(limit) = limit {
            history.truncate(limit);
        }
        Ok(history)
    }

    fn clear_search_history(&self) -> Result<(), UserDataError> {
        let mut data = self.load()?;
        data.search_history.clear();
        self.persist(&mut data)
    }

    /// Saves a summary, replacing any earlier one for the same book title.
    fn save_summary(&self, summary: NewSavedSummary) -> Result<SavedSummary, UserDataError> {
        if summary.book.title.trim().is_empty() {
            return Err(UserDataError::InvalidInput("book title is empty".to_string()));
        }

        let saved = SavedSummary {
            id: Uuid::new_v4().to_string(),
            book: summary.book,
            summary: summary.summary,
            kind: summary.kind,
            timestamp: Utc::now(),
            amazon_link: summary.amazon_link,
            recommendations: summary.recommendations,
        };

        let mut data = self.load()?;
        data.saved_summaries
            .retain(|s| !Self::same_title(&s.book.title, &saved.book.title));
        data.saved_summaries.insert(0, saved.clone());
        data.saved_summaries.truncate(MAX_SAVED_SUMMARIES);
        self.persist(&mut data)?;
        Ok(saved)
    }

    fn saved_summaries(&self) -> Result<Vec<SavedSummary>, UserDataError> {
        Ok(self.load()?.saved_summaries)
    }

    fn get_saved_summary(&self, id: &str) -> Result<SavedSummary, UserDataError> {
        self.load()?
            .saved_summaries
            .into_iter()
            .find(|s| s.id == id)
            .ok_or_else(|| UserDataError::NotFound(id.to_string()))
    }

    fn is_summary_saved(&self, book_title: &str) -> Result<bool, UserDataError> {
        Ok(self
            .load()?
            .saved_summaries
            .iter()
            .any(|s| Self::same_title(&s.book.title, book_title)))
    }

    fn delete_saved_summary(&self, id: &str) -> Result<bool, UserDataError> {
        let mut data = self.load()?;
        let before = data.saved_summaries.len();
        data.saved_summaries.retain(|s| s.id != id);
        if data.saved_summaries.len() == before {
            return Ok(false);
        }
        self.persist(&mut data)?;
        Ok(true)
    }

    fn user_stats(&self) -> Result<UserStats, UserDataError> {
        let data = self.load()?;
        Ok(UserStats {
            total_searches: data.search_history.len(),
            total_saved: data.saved_summaries.len(),
            last_search: data.search_history.first().map(|e| e.timestamp),
            last_saved: data.saved_summaries.first().map(|s| s.timestamp),
            member_since: data.created_at,
        })
    }

    fn clear_all(&self) -> Result<(), UserDataError> {
        self.store.remove_item(&self.key)?;
        Ok(())
    }
}
