//! Unit tests for locale negotiation, locale routing, and the LocalizationEngine.
//!
//! Covers Accept-Language parsing, redirect decisions, Arabic plural rules,
//! parameter interpolation, and the shipped translation files.

use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

use rstest::rstest;
use tempfile::TempDir;

use bookwise::services::localization_engine::*;
use bookwise::types::errors::LocaleError;

fn shipped_locales() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("locales")
}

fn setup_locales(dir: &std::path::Path) {
    let en = serde_json::json!({
        "nav": { "blogs": "Blogs" },
        "greeting": "Hello, {name}!",
        "items_one": "{count} item",
        "items_other": "{count} items"
    });
    let ar = serde_json::json!({
        "nav": { "blogs": "المدونات" },
        "greeting": "مرحبا {name}!",
        "items_zero": "لا عناصر",
        "items_one": "عنصر واحد",
        "items_two": "عنصران",
        "items_few": "{count} عناصر",
        "items_many": "{count} عنصرًا",
        "items_other": "{count} عنصر"
    });
    fs::write(dir.join("en.json"), en.to_string()).unwrap();
    fs::write(dir.join("ar.json"), ar.to_string()).unwrap();
}

fn engine_in(tmp: &TempDir) -> LocalizationEngine {
    setup_locales(tmp.path());
    let mut engine = LocalizationEngine::new(tmp.path());
    engine.initialize().unwrap();
    engine
}

// ─── Negotiation ───

#[rstest]
#[case(None, "en")]
#[case(Some(""), "en")]
#[case(Some("ar"), "ar")]
#[case(Some("ar-SA,ar;q=0.9,en;q=0.8"), "ar")]
#[case(Some("en-US,en;q=0.9,ar;q=0.8"), "en")]
#[case(Some("fr-FR,fr;q=0.9,ar;q=0.5"), "ar")]
#[case(Some("en;q=0.3,ar;q=0.7"), "ar")]
#[case(Some("ar;q=0,en;q=0.1"), "en")]
#[case(Some("de,fr"), "en")]
fn test_negotiate_locale(#[case] header: Option<&str>, #[case] expected: &str) {
    assert_eq!(negotiate_locale(header), expected);
}

#[test]
fn test_direction() {
    assert_eq!(direction_of("ar"), TextDirection::Rtl);
    assert_eq!(direction_of("en"), TextDirection::Ltr);
    assert_eq!(TextDirection::Rtl.as_str(), "rtl");
}

// ─── Routing ───

#[rstest]
#[case("/", Some("ar"), None, "/ar")]
#[case("/", None, None, "/en")]
#[case("/blogs", None, None, "/en/blogs")]
#[case("/blogs/atomic-habits", Some("ar-EG"), None, "/ar/blogs/atomic-habits")]
#[case("/blogs", Some("ar"), Some("en"), "/en/blogs")]
#[case("/", None, Some("ar"), "/ar")]
#[case("/about", Some("en"), Some("xx"), "/en/about")]
#[case("/apiary", None, None, "/en/apiary")]
#[case("/statistics", Some("ar"), None, "/ar/statistics")]
#[case("/blogs?ref=v1.2", None, None, "/en/blogs?ref=v1.2")]
#[case("/?page=2", Some("ar"), None, "/ar?page=2")]
fn test_resolve_route_redirects(
    #[case] path: &str,
    #[case] accept: Option<&str>,
    #[case] preferred: Option<&str>,
    #[case] location: &str,
) {
    assert_eq!(
        resolve_route(path, accept, preferred),
        LocaleRoute::Redirect { location: location.to_string() }
    );
}

#[rstest]
#[case("/ar", Some("ar"))]
#[case("/en/blogs", Some("en"))]
#[case("/ar/blogs/slug", Some("ar"))]
#[case("/api/summary", None)]
#[case("/_next/static/chunk.js", None)]
#[case("/favicon.ico", None)]
#[case("/robots.txt", None)]
#[case("/api", None)]
#[case("/ar?tab=latest", Some("ar"))]
fn test_resolve_route_passes(#[case] path: &str, #[case] locale: Option<&str>) {
    assert_eq!(
        resolve_route(path, Some("ar"), None),
        LocaleRoute::Pass { locale: locale.map(str::to_string) }
    );
}

#[test]
fn test_locale_prefix_must_be_whole_segment() {
    assert_eq!(locale_of_path("/arabic-books"), None);
    assert_eq!(locale_of_path("/ar/x"), Some("ar"));
}

// ─── Engine ───

#[test]
fn test_initialize_missing_dir_fails() {
    let mut engine = LocalizationEngine::new("/definitely/not/here");
    assert!(matches!(engine.initialize(), Err(LocaleError::FileNotFound(_))));
}

#[test]
fn test_translate_and_switch() {
    let tmp = TempDir::new().unwrap();
    let mut engine = engine_in(&tmp);
    assert_eq!(engine.get_locale(), "en");
    assert_eq!(engine.t("nav.blogs", None), "Blogs");

    engine.set_locale("ar").unwrap();
    assert_eq!(engine.t("nav.blogs", None), "المدونات");
    assert_eq!(engine.direction(), TextDirection::Rtl);
    assert_eq!(engine.get_available_locales(), vec!["ar", "en"]);
}

#[test]
fn test_unsupported_locale_rejected() {
    let tmp = TempDir::new().unwrap();
    let mut engine = engine_in(&tmp);
    assert!(matches!(engine.set_locale("fr"), Err(LocaleError::UnsupportedLocale(_))));
    assert_eq!(engine.get_locale(), "en");
}

#[test]
fn test_interpolation_and_missing_key() {
    let tmp = TempDir::new().unwrap();
    let engine = engine_in(&tmp);
    let mut params = HashMap::new();
    params.insert("name".to_string(), "Omar".to_string());
    assert_eq!(engine.t("greeting", Some(&params)), "Hello, Omar!");
    assert_eq!(engine.t("nav.unknown", None), "nav.unknown");
}

#[rstest]
#[case(0, "لا عناصر")]
#[case(1, "عنصر واحد")]
#[case(2, "عنصران")]
#[case(5, "5 عناصر")]
#[case(11, "11 عنصرًا")]
#[case(100, "100 عنصر")]
#[case(103, "103 عناصر")]
fn test_arabic_plurals(#[case] count: u64, #[case] expected: &str) {
    let tmp = TempDir::new().unwrap();
    let mut engine = engine_in(&tmp);
    engine.set_locale("ar").unwrap();
    assert_eq!(engine.plural("items", count, None), expected);
}

#[rstest]
#[case(0, "0 items")]
#[case(1, "1 item")]
#[case(2, "2 items")]
fn test_english_plurals(#[case] count: u64, #[case] expected: &str) {
    let tmp = TempDir::new().unwrap();
    let engine = engine_in(&tmp);
    assert_eq!(engine.plural("items", count, None), expected);
}

#[test]
fn test_plural_falls_back_to_other() {
    let mut engine = LocalizationEngine::new(shipped_locales());
    engine.initialize().unwrap();
    engine.set_locale("ar").unwrap();
    assert_eq!(engine.plural("blog.likes", 1, None), "1 إعجاب");
}

// ─── Shipped translation files ───

fn collect_keys(value: &serde_json::Value, prefix: &str, out: &mut Vec<String>) {
    if let Some(map) = value.as_object() {
        for (k, v) in map {
            let key = if prefix.is_empty() { k.clone() } else { format!("{}.{}", prefix, k) };
            if v.is_object() {
                collect_keys(v, &key, out);
            } else {
                out.push(key);
            }
        }
    }
}

#[test]
fn test_shipped_files_cover_the_same_base_keys() {
    let read = |name: &str| -> serde_json::Value {
        serde_json::from_str(&fs::read_to_string(shipped_locales().join(name)).unwrap()).unwrap()
    };
    let base = |keys: Vec<String>| -> std::collections::BTreeSet<String> {
        keys.into_iter()
            .map(|k| {
                ["_zero", "_one", "_two", "_few", "_many", "_other"]
                    .iter()
                    .find_map(|s| k.strip_suffix(s).map(str::to_string))
                    .unwrap_or(k)
            })
            .collect()
    };

    let (mut en, mut ar) = (Vec::new(), Vec::new());
    collect_keys(&read("en.json"), "", &mut en);
    collect_keys(&read("ar.json"), "", &mut ar);
    assert_eq!(base(en), base(ar));
}
