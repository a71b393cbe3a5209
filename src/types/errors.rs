use std::fmt;

// === StorageError ===

/// Errors raised by key-value storage backends.
#[derive(Debug)]
pub enum StorageError {
    /// Database operation failed.
    DatabaseError(String),
    /// The backend lock was poisoned by a panicking writer.
    LockPoisoned(String),
    /// Failed to serialize or deserialize a stored document.
    SerializationError(String),
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageError::DatabaseError(msg) => write!(f, "Storage database error: {}", msg),
            StorageError::LockPoisoned(msg) => write!(f, "Storage lock poisoned: {}", msg),
            StorageError::SerializationError(msg) => {
                write!(f, "Storage serialization error: {}", msg)
            }
        }
    }
}

impl std::error::Error for StorageError {}

impl From<rusqlite::Error> for StorageError {
    fn from(err: rusqlite::Error) -> Self {
        StorageError::DatabaseError(err.to_string())
    }
}

// === ApiError ===

/// Errors returned by the backend API wrapper.
#[derive(Debug)]
pub enum ApiError {
    /// The request never produced a response (connection, DNS, timeout).
    Network(String),
    /// The backend answered with a non-success status.
    Http { status: u16, message: String },
    /// The backend rejected the admin credentials or session (401/403).
    Unauthorized(String),
    /// A success response body could not be decoded.
    Parse(String),
    /// The upload exceeds the client-side size cap (bytes).
    PayloadTooLarge(u64),
    /// The request was rejected before being sent.
    InvalidInput(String),
    /// The backend accepted the request but local state could not be saved.
    LocalState(String),
}

impl ApiError {
    /// HTTP status associated with the error, if the backend produced one.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Network(msg) => write!(f, "API network error: {}", msg),
            ApiError::Http { status, message } => {
                write!(f, "API error ({}): {}", status, message)
            }
            ApiError::Unauthorized(msg) => write!(f, "Admin session rejected: {}", msg),
            ApiError::Parse(msg) => write!(f, "API response parse error: {}", msg),
            ApiError::PayloadTooLarge(max) => {
                write!(f, "Upload exceeds the {} byte limit", max)
            }
            ApiError::InvalidInput(msg) => write!(f, "Invalid request: {}", msg),
            ApiError::LocalState(msg) => write!(f, "Local session state not saved: {}", msg),
        }
    }
}

impl std::error::Error for ApiError {}

// === SessionError ===

/// Errors related to session storage operations.
#[derive(Debug)]
pub enum SessionError {
    /// Failed to encode or decode a session value.
    EncodingError(String),
    /// The underlying storage failed.
    StorageError(String),
    /// The requested language is not supported.
    UnsupportedLocale(String),
}

impl fmt::Display for SessionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionError::EncodingError(msg) => write!(f, "Session encoding error: {}", msg),
            SessionError::StorageError(msg) => write!(f, "Session storage error: {}", msg),
            SessionError::UnsupportedLocale(locale) => {
                write!(f, "Unsupported preferred language: {}", locale)
            }
        }
    }
}

impl std::error::Error for SessionError {}

impl From<StorageError> for SessionError {
    fn from(err: StorageError) -> Self {
        SessionError::StorageError(err.to_string())
    }
}

// === StatsError ===

/// Errors related to the admin stats aggregator.
#[derive(Debug)]
pub enum StatsError {
    /// The underlying storage failed.
    StorageError(String),
    /// The stats document could not be serialized or parsed.
    SerializationError(String),
}

impl fmt::Display for StatsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatsError::StorageError(msg) => write!(f, "Stats storage error: {}", msg),
            StatsError::SerializationError(msg) => {
                write!(f, "Stats serialization error: {}", msg)
            }
        }
    }
}

impl std::error::Error for StatsError {}

impl From<StorageError> for StatsError {
    fn from(err: StorageError) -> Self {
        StatsError::StorageError(err.to_string())
    }
}

// === UserDataError ===

/// Errors related to per-user local data.
#[derive(Debug)]
pub enum UserDataError {
    /// Saved summary with the given ID was not found.
    NotFound(String),
    /// The underlying storage failed.
    StorageError(String),
    /// The user document could not be serialized or parsed.
    SerializationError(String),
    /// The provided input was rejected.
    InvalidInput(String),
}

impl fmt::Display for UserDataError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UserDataError::NotFound(id) => write!(f, "Saved summary not found: {}", id),
            UserDataError::StorageError(msg) => write!(f, "User data storage error: {}", msg),
            UserDataError::SerializationError(msg) => {
                write!(f, "User data serialization error: {}", msg)
            }
            UserDataError::InvalidInput(msg) => write!(f, "Invalid user data: {}", msg),
        }
    }
}

impl std::error::Error for UserDataError {}

impl From<StorageError> for UserDataError {
    fn from(err: StorageError) -> Self {
        UserDataError::StorageError(err.to_string())
    }
}

// === SettingsError ===

/// Errors related to site settings management.
#[derive(Debug)]
pub enum SettingsError {
    /// An I/O error occurred while reading or writing settings.
    IoError(String),
    /// Failed to serialize or deserialize settings.
    SerializationError(String),
    /// The provided settings key is invalid.
    InvalidKey(String),
    /// The provided settings value is invalid.
    InvalidValue(String),
}

impl fmt::Display for SettingsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SettingsError::IoError(msg) => write!(f, "Settings I/O error: {}", msg),
            SettingsError::SerializationError(msg) => {
                write!(f, "Settings serialization error: {}", msg)
            }
            SettingsError::InvalidKey(key) => write!(f, "Invalid settings key: {}", key),
            SettingsError::InvalidValue(msg) => {
                write!(f, "Invalid settings value: {}", msg)
            }
        }
    }
}

impl std::error::Error for SettingsError {}

// === LocaleError ===

/// Errors related to localization engine operations.
#[derive(Debug)]
pub enum LocaleError {
    /// The requested locale is not supported.
    UnsupportedLocale(String),
    /// A translation key is missing from the locale file.
    MissingKey(String),
    /// The locale file was not found or could not be parsed.
    FileNotFound(String),
}

impl fmt::Display for LocaleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LocaleError::UnsupportedLocale(locale) => {
                write!(f, "Unsupported locale: {}", locale)
            }
            LocaleError::MissingKey(key) => write!(f, "Missing locale key: {}", key),
            LocaleError::FileNotFound(path) => write!(f, "Locale file not found: {}", path),
        }
    }
}

impl std::error::Error for LocaleError {}

// === ContactError ===

/// Errors related to contact form delivery.
#[derive(Debug)]
pub enum ContactError {
    /// EmailJS service, template, or public key is missing.
    NotConfigured(String),
    /// A form field failed validation.
    InvalidField(String),
    /// The delivery request failed.
    DeliveryFailed(String),
}

impl fmt::Display for ContactError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContactError::NotConfigured(what) => {
                write!(f, "Contact form not configured: missing {}", what)
            }
            ContactError::InvalidField(field) => write!(f, "Invalid contact field: {}", field),
            ContactError::DeliveryFailed(msg) => write!(f, "Contact delivery failed: {}", msg),
        }
    }
}

impl std::error::Error for ContactError {}
