//! App Core for BookWise.
//!
//! Central struct holding the storage layer, managers, and services.

use std::path::PathBuf;
use std::sync::Arc;

use crate::database::connection::Database;
use crate::managers::session_manager::{SessionManager, SessionManagerTrait};
use crate::managers::stats_manager::{StatsManager, StatsManagerTrait};
use crate::managers::user_data_manager::UserDataManager;
use crate::platform;
use crate::services::api_client::ApiClient;
use crate::services::contact_service::ContactService;
use crate::services::localization_engine::{LocalizationEngine, LocalizationEngineTrait};
use crate::services::settings_engine::{SettingsEngine, SettingsEngineTrait};
use crate::storage::{KeyValueStore, SqliteStore};

/// Central application struct holding all managers and services.
///
/// The local store outlives the process; the session store is purged when
/// the app is created.
pub struct App {
    pub db: Arc<Database>,
    pub local_store: Arc<dyn KeyValueStore>,
    pub session_store: Arc<dyn KeyValueStore>,
    pub session_manager: Arc<SessionManager>,
    pub user_data: UserDataManager,
    pub stats: StatsManager,
    pub settings_engine: SettingsEngine,
    pub localization_engine: LocalizationEngine,
    pub api: ApiClient,
    pub contact: ContactService,
}

impl App {
    /// Loads settings (file, then environment), opens the database they name,
    /// and wires every manager and service.
    pub fn new(settings_path: Option<String>) -> Result<Self, Box<dyn std::error::Error>> {
        let mut settings_engine = SettingsEngine::new(settings_path);
        if let Err(e) = settings_engine.load() {
            tracing::warn!("settings unreadable, using defaults: {}", e);
        }
        settings_engine.apply_env_overrides();

        let db_file = PathBuf::from(&settings_engine.get_settings().storage.database_file);
        let db_path = if db_file.is_absolute() {
            db_file
        } else {
            platform::data_dir().join(db_file)
        };
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        tracing::info!(path = %db_path.display(), "opening database");

        let db = Database::open(&db_path)?;
        Self::from_parts(db, settings_engine)
    }

    /// Builds the app around an already-open database and loaded settings.
    pub fn from_parts(
        db: Database,
        settings_engine: SettingsEngine,
    ) -> Result<Self, Box<dyn std::error::Error>> {
        let db = Arc::new(db);
        let local_store: Arc<dyn KeyValueStore> = Arc::new(SqliteStore::local(db.clone()));
        let session_store: Arc<dyn KeyValueStore> = Arc::new(SqliteStore::session(db.clone())?);

        let session_manager = Arc::new(SessionManager::new(local_store.clone(), session_store.clone()));
        let user_id = session_manager
            .get_or_create_user_id()
            .map_err(|e| format!("SessionManager init failed: {}", e))?;

        let user_data = UserDataManager::new(local_store.clone(), &user_id);
        let stats = StatsManager::new(local_store.clone());

        let settings = settings_engine.get_settings().clone();

        let mut localization_engine = LocalizationEngine::new(&settings.locale.locales_dir);
        if let Err(e) = localization_engine.initialize() {
            tracing::warn!("translations unavailable: {}", e);
        }
        let locale = session_manager
            .preferred_language()
            .unwrap_or_else(|| settings.locale.default_locale.clone());
        if let Err(e) = localization_engine.set_locale(&locale) {
            tracing::debug!("keeping default locale: {}", e);
        }

        let api = ApiClient::new(&settings.api, &user_id)?.with_session(session_manager.clone());
        let contact = ContactService::new(settings.contact.clone(), settings.api.timeout_secs)?;

        Ok(Self {
            db,
            local_store,
            session_store,
            session_manager,
            user_data,
            stats,
            settings_engine,
            localization_engine,
            api,
            contact,
        })
    }

    /// Startup sequence: make sure the stats document exists and count this visit.
    pub fn startup(&mut self) {
        if let Err(e) = self.stats.initialize_stats() {
            tracing::warn!("stats initialization failed: {}", e);
        }
        if let Err(e) = self.stats.track_visitor(self.user_data.user_id()) {
            tracing::warn!("visitor tracking failed: {}", e);
        }
    }

    /// Swaps the API and contact clients for ones built from the current settings.
    pub fn rebuild_clients(&mut self) -> Result<(), Box<dyn std::error::Error>> {
        let settings = self.settings_engine.get_settings().clone();
        self.api = ApiClient::new(&settings.api, self.user_data.user_id())?
            .with_session(self.session_manager.clone());
        self.contact = ContactService::new(settings.contact, settings.api.timeout_secs)?;
        Ok(())
    }
}
