//! BookWise — client core of a bilingual (English/Arabic) book-summary site.
//!
//! Entry point: runs an offline console demo of every local component.
//! The JSON-lines bridge lives in the `bookwise-rpc` binary.

use std::collections::HashMap;
use std::error::Error;
use std::sync::Arc;

use tracing_subscriber::EnvFilter;

type DemoResult = Result<(), Box<dyn Error>>;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("bookwise=warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    println!();
    println!("╔══════════════════════════════════════════════════════════════╗");
    println!("║               BookWise v{} — Demo Mode                ║", env!("CARGO_PKG_VERSION"));
    println!("║        Bilingual book summaries, client core               ║");
    println!("╚══════════════════════════════════════════════════════════════╝");
    println!();

    let demos: [(&str, fn() -> DemoResult); 9] = [
        ("Database Layer", demo_database),
        ("Session Manager", demo_session),
        ("User Data Manager", demo_user_data),
        ("Admin Stats Manager", demo_stats),
        ("Locale Routing", demo_locale_routing),
        ("Localization Engine (EN/AR)", demo_localization),
        ("Safe Image URLs", demo_image_urls),
        ("Blog Catalog", demo_blog_catalog),
        ("Settings Engine", demo_settings),
    ];

    let mut failed = 0;
    for (name, demo) in demos {
        section(name);
        if let Err(e) = demo() {
            failed += 1;
            println!("  ✗ {} failed: {}", name, e);
        }
        println!();
    }

    println!("═══════════════════════════════════════════════════════════════");
    if failed == 0 {
        println!("  ✅ All {} components demonstrated successfully!", demos.len());
    } else {
        println!("  ⚠ {} of {} components failed", failed, demos.len());
        std::process::exit(1);
    }
    println!("═══════════════════════════════════════════════════════════════");
}

fn section(name: &str) {
    println!("───────────────────────────────────────────────────────────────");
    println!("  📦 {}", name);
    println!("───────────────────────────────────────────────────────────────");
}

fn demo_database() -> DemoResult {
    use bookwise::database::connection::Database;
    use bookwise::database::migrations::{get_schema_version, CURRENT_SCHEMA_VERSION};

    let db = Database::open_in_memory()?;
    let conn = db.connection()?;
    let mut stmt = conn.prepare("SELECT name FROM sqlite_master WHERE type='table' ORDER BY name")?;
    let tables: Vec<String> = stmt
        .query_map([], |row| row.get(0))?
        .filter_map(|r| r.ok())
        .collect();
    println!("  Created {} tables: {}", tables.len(), tables.join(", "));
    println!("  Schema version {} (expected {})", get_schema_version(&conn), CURRENT_SCHEMA_VERSION);
    println!("  ✓ Database + migrations OK");
    Ok(())
}

fn demo_session() -> DemoResult {
    use bookwise::managers::session_manager::{SessionManager, SessionManagerTrait};
    use bookwise::storage::MemoryStore;
    use bookwise::types::session::AdminData;

    let manager = SessionManager::new(Arc::new(MemoryStore::new()), Arc::new(MemoryStore::new()));
    let user_id = manager.get_or_create_user_id()?;
    println!("  Anonymous user id: {}", user_id);
    println!("  Stable on second call: {}", manager.get_or_create_user_id()? == user_id);

    let admin = AdminData {
        username: "editor".to_string(),
        role: "admin".to_string(),
        login_time: chrono::Utc::now(),
    };
    manager.set_admin_session("demo-token", &admin)?;
    manager.set_admin_flags(&admin.username)?;
    let restored = manager.get_admin_session()?;
    println!("  Admin session restored: {:?}", restored.map(|s| s.data.username.clone()));
    manager.clear_admin_session()?;
    manager.clear_admin_flags()?;
    println!("  After sign-out, flagged: {}", manager.is_admin_flagged());
    println!("  ✓ Session manager OK");
    Ok(())
}

fn demo_user_data() -> DemoResult {
    use bookwise::managers::user_data_manager::{UserDataManager, UserDataManagerTrait};
    use bookwise::storage::MemoryStore;
    use bookwise::types::blog::BookDetails;
    use bookwise::types::user_data::NewSavedSummary;

    let manager = UserDataManager::new(Arc::new(MemoryStore::new()), "user_demo");
    for query in ["atomic habits", "sapiens", "deep work"] {
        manager.add_search(query, 3, None)?;
    }
    let history = manager.search_history(Some(2))?;
    println!("  Latest searches: {:?}", history.iter().map(|h| h.query.as_str()).collect::<Vec<_>>());

    let summary = |text: &str| NewSavedSummary {
        book: BookDetails {
            title: "Atomic Habits".to_string(),
            author: Some("James Clear".to_string()),
            ..BookDetails::default()
        },
        summary: text.to_string(),
        kind: Default::default(),
        amazon_link: None,
        recommendations: Vec::new(),
    };
    manager.save_summary(summary("first draft"))?;
    manager.save_summary(summary("second draft"))?;
    let saved = manager.saved_summaries()?;
    println!("  Saved twice, stored {} (latest: {:?})", saved.len(), saved.first().map(|s| s.summary.as_str()));
    println!("  ✓ User data manager OK");
    Ok(())
}

fn demo_stats() -> DemoResult {
    use bookwise::managers::stats_manager::{StatsManager, StatsManagerTrait};
    use bookwise::storage::MemoryStore;

    let stats = StatsManager::new(Arc::new(MemoryStore::new()));
    stats.initialize_stats()?;
    stats.track_visitor("user_a")?;
    stats.track_visitor("user_a")?;
    stats.track_search("Atomic Habits", true, 420)?;
    stats.track_search("atomic habits", true, 380)?;
    stats.track_search("unknown", false, 1200)?;
    stats.track_ad_click("sidebar")?;
    stats.track_ad_impression("sidebar")?;
    stats.track_ad_impression("sidebar")?;

    let visitors = stats.get_visitor_stats()?;
    let perf = stats.get_performance_stats()?;
    let ads = stats.get_ad_stats()?;
    println!("  Visitors: {} total, {} unique", visitors.total, visitors.unique);
    println!("  Success rate {:.1}%, avg {} ms", perf.success_rate, perf.average_response_time);
    println!("  Ad CTR {:.1}%", ads.ctr);
    println!("  Top search: {:?}", stats.get_popular_searches(1)?.first().map(|p| p.query.clone()));
    println!("  ✓ Stats manager OK");
    Ok(())
}

fn demo_locale_routing() -> DemoResult {
    use bookwise::services::localization_engine::resolve_route;

    for (path, accept) in [("/", Some("ar-SA,ar;q=0.9")), ("/blogs", None), ("/ar/blogs", None), ("/api/summary", None)] {
        println!("  {:<14} {:<18} -> {:?}", path, accept.unwrap_or("-"), resolve_route(path, accept, None));
    }
    println!("  ✓ Locale routing OK");
    Ok(())
}

fn demo_localization() -> DemoResult {
    use bookwise::services::localization_engine::{LocalizationEngine, LocalizationEngineTrait};

    let mut documents: HashMap<String, serde_json::Value> = HashMap::new();
    documents.insert("en".to_string(), serde_json::from_str(include_str!("../locales/en.json"))?);
    documents.insert("ar".to_string(), serde_json::from_str(include_str!("../locales/ar.json"))?);
    let mut engine = LocalizationEngine::from_documents(documents);

    for locale in ["en", "ar"] {
        engine.set_locale(locale)?;
        println!(
            "  [{}|{}] {} / {}",
            locale,
            engine.direction().as_str(),
            engine.t("nav.blogs", None),
            engine.plural("search.results", 3, None)
        );
    }
    println!("  ✓ Localization engine OK");
    Ok(())
}

fn demo_image_urls() -> DemoResult {
    use bookwise::services::image_url::{get_safe_image_url, PLACEHOLDER_IMAGE};

    for url in [Some("/covers/a.jpg"), Some("https://books.example/c.png"), Some("https://via.placeholder.com/150"), None] {
        let safe = get_safe_image_url(url);
        let shown = if safe == PLACEHOLDER_IMAGE { "<placeholder>" } else { safe.as_str() };
        println!("  {:<34} -> {}", url.unwrap_or("<none>"), shown);
    }
    println!("  ✓ Image URL sanitising OK");
    Ok(())
}

fn demo_blog_catalog() -> DemoResult {
    use bookwise::services::api_client::fallback_latest_blogs;
    use bookwise::services::blog_catalog::{category_counts, paginate, BlogQuery};

    let blogs = fallback_latest_blogs();
    let page = paginate(&blogs, &BlogQuery { per_page: 2, page: 5, ..BlogQuery::default() });
    println!("  {} blogs, page {} of {} ({} shown)", page.total, page.page, page.total_pages, page.items.len());
    println!("  Categories: {:?}", category_counts(&blogs));
    println!("  ✓ Blog catalog OK");
    Ok(())
}

fn demo_settings() -> DemoResult {
    use bookwise::services::settings_engine::{SettingsEngine, SettingsEngineTrait};

    let path = std::env::temp_dir().join(format!("bookwise-demo-{}.json", uuid::Uuid::new_v4()));
    let mut engine = SettingsEngine::new(Some(path.to_string_lossy().to_string()));
    engine.load()?;
    engine.set_value("api.baseUrl", serde_json::json!("https://api.bookwise.example"))?;
    println!("  API base: {}", engine.get_settings().api.base_url);
    println!("  Upload cap: {} bytes", engine.get_settings().api.max_upload_bytes);
    std::fs::remove_file(&path)?;
    println!("  ✓ Settings engine OK");
    Ok(())
}
