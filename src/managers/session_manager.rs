//! Session Manager for BookWise.
//!
//! Holds the admin token and profile in session-scoped storage, the anonymous
//! visitor id and client preferences in local storage.
//!
//! Values are base64-encoded JSON. This is an encoding, not encryption: the
//! real security boundary is the backend's cookie session.

use std::sync::Arc;

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use serde::de::DeserializeOwned;
use serde::Serialize;
use uuid::Uuid;
use zeroize::Zeroizing;

use crate::services::localization_engine::is_supported_locale;
use crate::storage::KeyValueStore;
use crate::types::errors::SessionError;
use crate::types::session::{AdminData, AdminSession};

pub const ADMIN_TOKEN_KEY: &str = "bw_admin_tkn";
pub const ADMIN_DATA_KEY: &str = "bw_admin_dt";
pub const USER_ID_KEY: &str = "bw_usr_id";
pub const SESSION_ID_KEY: &str = "bw_sess_id";
pub const ADMIN_LOGGED_IN_KEY: &str = "admin_logged_in";
pub const ADMIN_USERNAME_KEY: &str = "admin_username";
pub const PREFERRED_LANGUAGE_KEY: &str = "preferred-language";

/// Trait defining session management operations.
pub trait SessionManagerTrait {
    fn set_admin_session(&self, token: &str, data: &AdminData) -> Result<(), SessionError>;
    fn get_admin_session(&self) -> Result<Option<AdminSession>, SessionError>;
    fn clear_admin_session(&self) -> Result<(), SessionError>;
    fn get_or_create_user_id(&self) -> Result<String, SessionError>;
    fn get_or_create_session_id(&self) -> Result<String, SessionError>;
    fn set_admin_flags(&self, username: &str) -> Result<(), SessionError>;
    fn is_admin_flagged(&self) -> bool;
    fn admin_username(&self) -> Option<String>;
    fn clear_admin_flags(&self) -> Result<(), SessionError>;
    fn set_preferred_language(&self, locale: &str) -> Result<(), SessionError>;
    fn preferred_language(&self) -> Option<String>;
}

/// Session manager over a persistent store and a per-process store.
pub struct SessionManager {
    local: Arc<dyn KeyValueStore>,
    session: Arc<dyn KeyValueStore>,
}

impl SessionManager {
    pub fn new(local: Arc<dyn KeyValueStore>, session: Arc<dyn KeyValueStore>) -> Self {
        Self { local, session }
    }

    fn encode<T: Serialize + ?Sized>(value: &T) -> Result<String, SessionError> {
        let json = Zeroizing::new(
            serde_json::to_vec(value).map_err(|e| SessionError::EncodingError(e.to_string()))?,
        );
        Ok(BASE64.encode(json.as_slice()))
    }

    fn decode<T: DeserializeOwned>(raw: &str) -> Result<T, SessionError> {
        let bytes = Zeroizing::new(
            BASE64
                .decode(raw)
                .map_err(|e| SessionError::EncodingError(e.to_string()))?,
        );
        serde_json::from_slice(&bytes).map_err(|e| SessionError::EncodingError(e.to_string()))
    }

    /// `user_<unix millis>_<8 hex chars>`
    fn generate_user_id() -> String {
        let random = Uuid::new_v4().simple().to_string();
        format!(
            "user_{}_{}",
            chrono::Utc::now().timestamp_millis(),
            &random[..8]
        )
    }
}

impl SessionManagerTrait for SessionManager {
    fn set_admin_session(&self, token: &str, data: &AdminData) -> Result<(), SessionError> {
        let token = Self::encode(token)?;
        let data = Self::encode(data)?;
        self.session.set_item(ADMIN_TOKEN_KEY, &token)?;
        self.session.set_item(ADMIN_DATA_KEY, &data)?;
        tracing::debug!("admin session stored");
        Ok(())
    }

    /// Returns the stored admin session. A half-written or undecodable session
    /// is wiped and reported as absent.
    fn get_admin_session(&self) -> Result<Option<AdminSession>, SessionError> {
        let token = self.session.get_item(ADMIN_TOKEN_KEY)?;
        let data = self.session.get_item(ADMIN_DATA_KEY)?;

        let (raw_token, raw_data) = match (token, data) {
            (Some(t), Some(d)) => (Zeroizing::new(t), d),
            (None, None) => return Ok(None),
            _ => {
                tracing::warn!("incomplete admin session in storage, clearing");
                self.clear_admin_session()?;
                return Ok(None);
            }
        };

        let decoded = Self::decode::<String>(&raw_token)
            .and_then(|token| Self::decode::<AdminData>(&raw_data).map(|data| (token, data)));

        match decoded {
            Ok((token, data)) => Ok(Some(AdminSession { token, data })),
            Err(e) => {
                tracing::warn!("corrupt admin session in storage, clearing: {}", e);
                self.clear_admin_session()?;
                Ok(None)
            }
        }
    }

    fn clear_admin_session(&self) -> Result<(), SessionError> {
        self.session.remove_item(ADMIN_TOKEN_KEY)?;
        self.session.remove_item(ADMIN_DATA_KEY)?;
        Ok(())
    }

    fn get_or_create_user_id(&self) -> Result<String, SessionError> {
        if let Some(id) = self.local.get_item(USER_ID_KEY)? {
            if !id.trim().is_empty() {
                return Ok(id);
            }
        }
        let id = Self::generate_user_id();
        self.local.set_item(USER_ID_KEY, &id)?;
        tracing::debug!(user_id = %id, "created anonymous user id");
        Ok(id)
    }

    fn get_or_create_session_id(&self) -> Result<String, SessionError> {
        if let Some(id) = self.session.get_item(SESSION_ID_KEY)? {
            return Ok(id);
        }
        let id = format!("sess_{}", Uuid::new_v4().simple());
        self.session.set_item(SESSION_ID_KEY, &id)?;
        Ok(id)
    }

    fn set_admin_flags(&self, username: &str) -> Result<(), SessionError> {
        self.local.set_item(ADMIN_LOGGED_IN_KEY, "true")?;
        self.local.set_item(ADMIN_USERNAME_KEY, username)?;
        Ok(())
    }

    /// Client-side flag only; it gates UI, not access.
    fn is_admin_flagged(&self) -> bool {
        matches!(
            self.local.get_item(ADMIN_LOGGED_IN_KEY),
            Ok(Some(ref v)) if v == "true"
        )
    }

    fn admin_username(&self) -> Option<String> {
        self.local.get_item(ADMIN_USERNAME_KEY).ok().flatten()
    }

    fn clear_admin_flags(&self) -> Result<(), SessionError> {
        self.local.remove_item(ADMIN_LOGGED_IN_KEY)?;
        self.local.remove_item(ADMIN_USERNAME_KEY)?;
        Ok(())
    }

    fn set_preferred_language(&self, locale: &str) -> Result<(), SessionError> {
        if !is_supported_locale(locale) {
            return Err(SessionError::UnsupportedLocale(locale.to_string()));
        }
        self.local.set_item(PREFERRED_LANGUAGE_KEY, locale)?;
        Ok(())
    }

    fn preferred_language(&self) -> Option<String> {
        self.local
            .get_item(PREFERRED_LANGUAGE_KEY)
            .ok()
            .flatten()
            .filter(|l| is_supported_locale(l))
    }
}
