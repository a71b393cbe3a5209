use serde::{Deserialize, Serialize};

/// Default client-side cap on PDF uploads (10 MiB).
pub const DEFAULT_MAX_UPLOAD_BYTES: u64 = 10 * 1024 * 1024;

/// Top-level site settings container.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SiteSettings {
    #[serde(default)]
    pub api: ApiSettings,
    #[serde(default)]
    pub locale: LocaleSettings,
    #[serde(default)]
    pub contact: ContactSettings,
    #[serde(default)]
    pub storage: StorageSettings,
}

/// Backend API connection settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ApiSettings {
    pub base_url: String,
    pub timeout_secs: u64,
    pub max_upload_bytes: u64,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5000".to_string(),
            timeout_secs: 30,
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        }
    }
}

/// Locale defaults.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LocaleSettings {
    pub default_locale: String,
    pub locales_dir: String,
}

impl Default for LocaleSettings {
    fn default() -> Self {
        Self {
            default_locale: "en".to_string(),
            locales_dir: "locales".to_string(),
        }
    }
}

/// EmailJS credentials for the contact form. Empty values mean "not configured".
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ContactSettings {
    pub endpoint: String,
    pub service_id: String,
    pub template_id: String,
    pub public_key: String,
}

impl Default for ContactSettings {
    fn default() -> Self {
        Self {
            endpoint: "https://api.emailjs.com/api/v1.0/email/send".to_string(),
            service_id: String::new(),
            template_id: String::new(),
            public_key: String::new(),
        }
    }
}

/// Where the local key-value database lives.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StorageSettings {
    pub database_file: String,
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            database_file: "bookwise.db".to_string(),
        }
    }
}
