use bookwise::types::errors::*;

// === StorageError Tests ===

#[test]
fn storage_error_display_variants() {
    assert_eq!(
        StorageError::DatabaseError("disk full".to_string()).to_string(),
        "Storage database error: disk full"
    );
    assert_eq!(
        StorageError::LockPoisoned("writer panicked".to_string()).to_string(),
        "Storage lock poisoned: writer panicked"
    );
    assert_eq!(
        StorageError::SerializationError("bad json".to_string()).to_string(),
        "Storage serialization error: bad json"
    );
}

#[test]
fn storage_error_from_rusqlite() {
    let err: StorageError = rusqlite::Error::QueryReturnedNoRows.into();
    assert!(matches!(err, StorageError::DatabaseError(_)));
}

// === ApiError Tests ===

#[test]
fn api_error_display_variants() {
    assert_eq!(
        ApiError::Network("connection refused".to_string()).to_string(),
        "API network error: connection refused"
    );
    assert_eq!(
        ApiError::Http { status: 404, message: "Blog not found".to_string() }.to_string(),
        "API error (404): Blog not found"
    );
    assert_eq!(
        ApiError::Unauthorized("expired".to_string()).to_string(),
        "Admin session rejected: expired"
    );
    assert_eq!(
        ApiError::Parse("missing field `summary`".to_string()).to_string(),
        "API response parse error: missing field `summary`"
    );
    assert_eq!(
        ApiError::PayloadTooLarge(10_485_760).to_string(),
        "Upload exceeds the 10485760 byte limit"
    );
    assert_eq!(
        ApiError::InvalidInput("query is empty".to_string()).to_string(),
        "Invalid request: query is empty"
    );
    assert_eq!(
        ApiError::LocalState("disk full".to_string()).to_string(),
        "Local session state not saved: disk full"
    );
}

#[test]
fn api_error_status_only_for_http() {
    assert_eq!(ApiError::Http { status: 500, message: String::new() }.status(), Some(500));
    assert_eq!(ApiError::Unauthorized(String::new()).status(), None);
    assert_eq!(ApiError::Network(String::new()).status(), None);
}

#[test]
fn api_error_implements_error_trait() {
    let err: Box<dyn std::error::Error> = Box::new(ApiError::Parse("x".to_string()));
    assert!(err.source().is_none());
}

// === SessionError Tests ===

#[test]
fn session_error_display_variants() {
    assert_eq!(
        SessionError::EncodingError("invalid base64".to_string()).to_string(),
        "Session encoding error: invalid base64"
    );
    assert_eq!(
        SessionError::UnsupportedLocale("fr".to_string()).to_string(),
        "Unsupported preferred language: fr"
    );
}

#[test]
fn session_error_wraps_storage_error() {
    let err: SessionError = StorageError::LockPoisoned("p".to_string()).into();
    assert!(matches!(err, SessionError::StorageError(_)));
    assert!(err.to_string().starts_with("Session storage error:"));
}

// === StatsError / UserDataError Tests ===

#[test]
fn stats_error_display_variants() {
    assert_eq!(
        StatsError::SerializationError("eof".to_string()).to_string(),
        "Stats serialization error: eof"
    );
    let wrapped: StatsError = StorageError::DatabaseError("locked".to_string()).into();
    assert!(matches!(wrapped, StatsError::StorageError(_)));
}

#[test]
fn user_data_error_display_variants() {
    assert_eq!(
        UserDataError::NotFound("sum-1".to_string()).to_string(),
        "Saved summary not found: sum-1"
    );
    assert_eq!(
        UserDataError::InvalidInput("query is empty".to_string()).to_string(),
        "Invalid user data: query is empty"
    );
    let wrapped: UserDataError = StorageError::DatabaseError("locked".to_string()).into();
    assert!(matches!(wrapped, UserDataError::StorageError(_)));
}

// === SettingsError / LocaleError Tests ===

#[test]
fn settings_error_display_variants() {
    assert_eq!(
        SettingsError::InvalidKey("api.nope".to_string()).to_string(),
        "Invalid settings key: api.nope"
    );
    assert_eq!(
        SettingsError::IoError("denied".to_string()).to_string(),
        "Settings I/O error: denied"
    );
}

#[test]
fn locale_error_display_variants() {
    assert_eq!(
        LocaleError::UnsupportedLocale("fr".to_string()).to_string(),
        "Unsupported locale: fr"
    );
    assert_eq!(
        LocaleError::FileNotFound("locales/en.json".to_string()).to_string(),
        "Locale file not found: locales/en.json"
    );
}

// === ContactError Tests ===

#[test]
fn contact_error_display_variants() {
    assert_eq!(
        ContactError::NotConfigured("serviceId".to_string()).to_string(),
        "Contact form not configured: missing serviceId"
    );
    assert_eq!(
        ContactError::InvalidField("email".to_string()).to_string(),
        "Invalid contact field: email"
    );
    assert_eq!(
        ContactError::DeliveryFailed("status 400".to_string()).to_string(),
        "Contact delivery failed: status 400"
    );
}
