use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

use serde_json::Value;

use crate::types::errors::LocaleError;

/// Supported locales.
pub const SUPPORTED_LOCALES: &[&str] = &["en", "ar"];

/// Default locale when nothing better can be negotiated.
pub const DEFAULT_LOCALE: &str = "en";

/// Path prefixes that are never locale-prefixed.
const PASSTHROUGH_PREFIXES: &[&str] = &["/_next", "/api", "/static", "/favicon"];

/// Returns true for `en` and `ar`.
pub fn is_supported_locale(locale: &str) -> bool {
    SUPPORTED_LOCALES.contains(&locale)
}

/// Text direction of a locale.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextDirection {
    Ltr,
    Rtl,
}

impl TextDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            TextDirection::Ltr => "ltr",
            TextDirection::Rtl => "rtl",
        }
    }
}

/// Direction for a locale code; anything but Arabic is left-to-right.
pub fn direction_of(locale: &str) -> TextDirection {
    if locale == "ar" {
        TextDirection::Rtl
    } else {
        TextDirection::Ltr
    }
}

/// Picks the best supported locale from an `Accept-Language` header.
///
/// Honors q-values; region subtags match their base language (`ar-SA` -> `ar`).
/// Ties keep header order. Falls back to [`DEFAULT_LOCALE`].
pub fn negotiate_locale(accept_language: Option<&str>) -> &'static str {
    let header = match accept_language {
        Some(h) => h,
        None => return DEFAULT_LOCALE,
    };

    let mut best: Option<(&'static str, f32)> = None;
    for part in header.split(',') {
        let mut pieces = part.trim().split(';');
        let tag = pieces.next().unwrap_or("").trim().to_lowercase();
        let quality = pieces
            .filter_map(|p| p.trim().strip_prefix("q="))
            .filter_map(|q| q.trim().parse::<f32>().ok())
            .next()
            .unwrap_or(1.0);
        if quality <= 0.0 {
            continue;
        }

        let base = tag.split('-').next().unwrap_or("");
        let matched = SUPPORTED_LOCALES.iter().find(|l| **l == base);
        if let Some(locale) = matched {
            match best {
                Some((_, q)) if q >= quality => {}
                _ => best = Some((*locale, quality)),
            }
        }
    }

    best.map(|(l, _)| l).unwrap_or(DEFAULT_LOCALE)
}

/// Outcome of locale routing for a request path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LocaleRoute {
    /// Serve the path as is. `locale` is `None` for asset and API paths.
    Pass { locale: Option<String> },
    /// Redirect to the locale-prefixed location.
    Redirect { location: String },
}

/// Returns the locale prefix of a path (`/ar/blogs` -> `ar`), if any.
pub fn locale_of_path(path: &str) -> Option<&'static str> {
    let first = path.trim_start_matches('/').split('/').next().unwrap_or("");
    SUPPORTED_LOCALES.iter().copied().find(|l| *l == first)
}

/// Decides whether a request must be redirected to a locale-prefixed path.
///
/// A stored preferred language wins over the `Accept-Language` header.
pub fn resolve_route(
    path: &str,
    accept_language: Option<&str>,
    preferred: Option<&str>,
) -> LocaleRoute {
    let path = if path.is_empty() { "/" } else { path };
    let route = path.split(['?', '#']).next().unwrap_or(path);

    if let Some(locale) = locale_of_path(route) {
        return LocaleRoute::Pass {
            locale: Some(locale.to_string()),
        };
    }

    let last_segment = route.rsplit('/').next().unwrap_or("");
    let passthrough = PASSTHROUGH_PREFIXES
        .iter()
        .any(|p| route == *p || route.strip_prefix(p).is_some_and(|rest| rest.starts_with('/')));
    if passthrough || last_segment.contains('.') {
        return LocaleRoute::Pass { locale: None };
    }

    let locale = match preferred.filter(|p| is_supported_locale(p)) {
        Some(p) => p,
        None => negotiate_locale(accept_language),
    };

    let location = if route == "/" {
        format!("/{}{}", locale, &path[1..])
    } else if path.starts_with('/') {
        format!("/{}{}", locale, path)
    } else {
        format!("/{}/{}", locale, path)
    };
    LocaleRoute::Redirect { location }
}

/// Trait defining the localization engine interface.
pub trait LocalizationEngineTrait {
    fn initialize(&mut self) -> Result<(), LocaleError>;
    fn set_locale(&mut self, lang: &str) -> Result<(), LocaleError>;
    fn get_locale(&self) -> &str;
    fn direction(&self) -> TextDirection;
    fn t(&self, key: &str, params: Option<&HashMap<String, String>>) -> String;
    fn plural(&self, key: &str, count: u64, params: Option<&HashMap<String, String>>) -> String;
    fn get_available_locales(&self) -> Vec<String>;
}

/// Localization engine managing English and Arabic translations.
pub struct LocalizationEngine {
    current_locale: String,
    /// Maps locale name to its parsed JSON document.
    locales: HashMap<String, Value>,
    locales_dir: PathBuf,
}

impl LocalizationEngine {
    pub fn new(locales_dir: impl Into<PathBuf>) -> Self {
        Self {
            current_locale: DEFAULT_LOCALE.to_string(),
            locales: HashMap::new(),
            locales_dir: locales_dir.into(),
        }
    }

    /// Creates an engine from already-parsed documents, skipping the filesystem.
    pub fn from_documents(documents: HashMap<String, Value>) -> Self {
        let locales = documents
            .into_iter()
            .filter(|(locale, _)| is_supported_locale(locale))
            .collect();
        Self {
            current_locale: DEFAULT_LOCALE.to_string(),
            locales,
            locales_dir: PathBuf::new(),
        }
    }

    /// Looks up a nested key using dot notation (`nav.blogs` -> `value["nav"]["blogs"]`).
    fn lookup_key<'a>(data: &'a Value, key: &str) -> Option<&'a Value> {
        key.split('.').try_fold(data, |current, part| current.get(part))
    }

    /// Replaces `{param_name}` placeholders with values from the params map.
    fn interpolate(template: &str, params: &HashMap<String, String>) -> String {
        let mut result = template.to_string();
        for (key, value) in params {
            result = result.replace(&format!("{{{}}}", key), value);
        }
        result
    }

    /// CLDR plural category for Arabic.
    fn arabic_plural_form(count: u64) -> &'static str {
        let mod100 = count % 100;
        match count {
            0 => "zero",
            1 => "one",
            2 => "two",
            _ if (3..=10).contains(&mod100) => "few",
            _ if (11..=99).contains(&mod100) => "many",
            _ => "other",
        }
    }

    fn english_plural_form(count: u64) -> &'static str {
        if count == 1 {
            "one"
        } else {
            "other"
        }
    }

    fn get_plural_form(&self, count: u64) -> &'static str {
        match self.current_locale.as_str() {
            "ar" => Self::arabic_plural_form(count),
            _ => Self::english_plural_form(count),
        }
    }
}

impl LocalizationEngineTrait for LocalizationEngine {
    /// Loads `en.json` and `ar.json` from the locales directory.
    fn initialize(&mut self) -> Result<(), LocaleError> {
        let dir = &self.locales_dir;

        if !dir.exists() {
            return Err(LocaleError::FileNotFound(dir.to_string_lossy().to_string()));
        }

        for locale in SUPPORTED_LOCALES {
            let file_path = dir.join(format!("{}.json", locale));
            if !file_path.exists() {
                continue;
            }
            let content = fs::read_to_string(&file_path).map_err(|e| {
                LocaleError::FileNotFound(format!("{}: {}", file_path.to_string_lossy(), e))
            })?;
            let data: Value = serde_json::from_str(&content).map_err(|e| {
                LocaleError::FileNotFound(format!(
                    "Failed to parse {}: {}",
                    file_path.to_string_lossy(),
                    e
                ))
            })?;
            self.locales.insert(locale.to_string(), data);
        }

        if self.locales.is_empty() {
            return Err(LocaleError::FileNotFound("No locale files found".to_string()));
        }

        tracing::debug!(locales = ?self.get_available_locales(), "translations loaded");
        Ok(())
    }

    fn set_locale(&mut self, lang: &str) -> Result<(), LocaleError> {
        if !is_supported_locale(lang) {
            return Err(LocaleError::UnsupportedLocale(lang.to_string()));
        }
        if !self.locales.contains_key(lang) {
            return Err(LocaleError::FileNotFound(format!("Locale '{}' not loaded", lang)));
        }
        self.current_locale = lang.to_string();
        Ok(())
    }

    fn get_locale(&self) -> &str {
        &self.current_locale
    }

    fn direction(&self) -> TextDirection {
        direction_of(&self.current_locale)
    }

    /// Returns the key itself when no translation exists.
    fn t(&self, key: &str, params: Option<&HashMap<String, String>>) -> String {
        let text = self
            .locales
            .get(&self.current_locale)
            .and_then(|data| Self::lookup_key(data, key))
            .and_then(Value::as_str);

        match (text, params) {
            (Some(text), Some(p)) => Self::interpolate(text, p),
            (Some(text), None) => text.to_string(),
            (None, _) => key.to_string(),
        }
    }

    /// Resolves `{key}_{form}` for the locale's plural form, falling back to
    /// `{key}_other`, then to the bare key. `{count}` is always available.
    fn plural(&self, key: &str, count: u64, params: Option<&HashMap<String, String>>) -> String {
        let plural_key = format!("{}_{}", key, self.get_plural_form(count));

        let mut merged_params = params.cloned().unwrap_or_default();
        merged_params
            .entry("count".to_string())
            .or_insert_with(|| count.to_string());

        let result = self.t(&plural_key, Some(&merged_params));
        if result != plural_key {
            return result;
        }

        let other_key = format!("{}_other", key);
        let other = self.t(&other_key, Some(&merged_params));
        if other == other_key {
            key.to_string()
        } else {
            other
        }
    }

    fn get_available_locales(&self) -> Vec<String> {
        let mut locales: Vec<String> = self.locales.keys().cloned().collect();
        locales.sort();
        locales
    }
}
