// BookWise Settings Engine
// Loads, saves, and updates site settings stored as a JSON file in the data directory.
// Environment variables override the API base URL and the contact form credentials.

use std::fs;
use std::path::Path;

use crate::platform;
use crate::types::errors::SettingsError;
use crate::types::settings::SiteSettings;

/// Environment variables consulted by `apply_env_overrides`, in priority order per field.
pub const API_BASE_ENV: &[&str] = &["BOOKWISE_API_BASE", "NEXT_PUBLIC_API_BASE"];
pub const EMAILJS_SERVICE_ENV: &str = "NEXT_PUBLIC_EMAILJS_SERVICE_ID";
pub const EMAILJS_TEMPLATE_ENV: &str = "NEXT_PUBLIC_EMAILJS_TEMPLATE_ID";
pub const EMAILJS_PUBLIC_KEY_ENV: &str = "NEXT_PUBLIC_EMAILJS_PUBLIC_KEY";

/// Trait defining the settings engine interface.
pub trait SettingsEngineTrait {
    fn load(&mut self) -> Result<SiteSettings, SettingsError>;
    fn save(&self) -> Result<(), SettingsError>;
    fn get_settings(&self) -> &SiteSettings;
    fn set_value(&mut self, key: &str, value: serde_json::Value) -> Result<(), SettingsError>;
    fn reset(&mut self) -> Result<(), SettingsError>;
    fn apply_env_overrides(&mut self);
    fn get_config_path(&self) -> &str;
}

/// Settings engine that persists settings as JSON on disk.
pub struct SettingsEngine {
    config_path: String,
    settings: SiteSettings,
}

impl SettingsEngine {
    /// Uses `path_override` when given, otherwise `settings.json` in the data directory.
    pub fn new(path_override: Option<String>) -> Self {
        let config_path = path_override.unwrap_or_else(|| {
            platform::data_dir()
                .join("settings.json")
                .to_string_lossy()
                .to_string()
        });

        Self {
            config_path,
            settings: SiteSettings::default(),
        }
    }

    fn first_env(names: &[&str]) -> Option<String> {
        names
            .iter()
            .filter_map(|name| std::env::var(name).ok())
            .map(|v| v.trim().to_string())
            .find(|v| !v.is_empty())
    }
}

impl SettingsEngineTrait for SettingsEngine {
    /// Missing file -> defaults; malformed file -> serialization error.
    fn load(&mut self) -> Result<SiteSettings, SettingsError> {
        let path = Path::new(&self.config_path);

        if !path.exists() {
            self.settings = SiteSettings::default();
            return Ok(self.settings.clone());
        }

        let content = fs::read_to_string(path)
            .map_err(|e| SettingsError::IoError(format!("Failed to read config file: {}", e)))?;

        self.settings = serde_json::from_str(&content).map_err(|e| {
            SettingsError::SerializationError(format!("Failed to parse config file: {}", e))
        })?;
        Ok(self.settings.clone())
    }

    fn save(&self) -> Result<(), SettingsError> {
        let path = Path::new(&self.config_path);

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                SettingsError::IoError(format!("Failed to create config directory: {}", e))
            })?;
        }

        let json = serde_json::to_string_pretty(&self.settings).map_err(|e| {
            SettingsError::SerializationError(format!("Failed to serialize settings: {}", e))
        })?;

        fs::write(path, json)
            .map_err(|e| SettingsError::IoError(format!("Failed to write config file: {}", e)))
    }

    fn get_settings(&self) -> &SiteSettings {
        &self.settings
    }

    /// Updates one setting by its camelCase dot path, e.g. `api.baseUrl`.
    ///
    /// The updated document must still deserialize into `SiteSettings`;
    /// the result is saved to disk.
    fn set_value(&mut self, key: &str, value: serde_json::Value) -> Result<(), SettingsError> {
        if key.trim().is_empty() {
            return Err(SettingsError::InvalidKey("Key cannot be empty".to_string()));
        }

        let mut json_value = serde_json::to_value(&self.settings).map_err(|e| {
            SettingsError::SerializationError(format!("Failed to serialize settings: {}", e))
        })?;

        let parts: Vec<&str> = key.split('.').collect();
        let (last, parents) = parts
            .split_last()
            .ok_or_else(|| SettingsError::InvalidKey(key.to_string()))?;

        let mut current = &mut json_value;
        for part in parents {
            current = current
                .get_mut(*part)
                .ok_or_else(|| SettingsError::InvalidKey(format!("Key '{}' not found in settings", key)))?;
        }

        match current {
            serde_json::Value::Object(map) if map.contains_key(*last) => {
                map.insert(last.to_string(), value);
            }
            _ => {
                return Err(SettingsError::InvalidKey(format!(
                    "Key '{}' not found in settings",
                    key
                )))
            }
        }

        let new_settings: SiteSettings = serde_json::from_value(json_value).map_err(|e| {
            SettingsError::InvalidValue(format!("Invalid value for key '{}': {}", key, e))
        })?;

        self.settings = new_settings;
        self.save()
    }

    fn reset(&mut self) -> Result<(), SettingsError> {
        self.settings = SiteSettings::default();
        self.save()
    }

    /// Overrides the in-memory settings from the environment. Not persisted.
    fn apply_env_overrides(&mut self) {
        if let Some(base) = Self::first_env(API_BASE_ENV) {
            tracing::debug!(base_url = %base, "API base URL taken from environment");
            self.settings.api.base_url = base;
        }
        if let Some(v) = Self::first_env(&[EMAILJS_SERVICE_ENV]) {
            self.settings.contact.service_id = v;
        }
        if let Some(v) = Self::first_env(&[EMAILJS_TEMPLATE_ENV]) {
            self.settings.contact.template_id = v;
        }
        if let Some(v) = Self::first_env(&[EMAILJS_PUBLIC_KEY_ENV]) {
            self.settings.contact.public_key = v;
        }
    }

    fn get_config_path(&self) -> &str {
        &self.config_path
    }
}
