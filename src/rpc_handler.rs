//! RPC method handler for the BookWise JSON-lines bridge.
//!
//! Kept apart from `rpc_server.rs` so it can be unit-tested independently.
//! `handle_method` serves everything backed by local storage and the pure
//! helpers; `handle_api_method` serves calls that go over the network.
//! The app lock is never held across an `.await`: network methods clone the
//! client out of the lock first.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Instant;

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use serde::de::DeserializeOwned;
use serde_json::{json, Value};

use crate::app::App;
use crate::managers::session_manager::SessionManagerTrait;
use crate::managers::stats_manager::StatsManagerTrait;
use crate::managers::user_data_manager::UserDataManagerTrait;
use crate::services::blog_catalog::{self, BlogQuery};
use crate::services::image_url::get_safe_image_url;
use crate::services::localization_engine::{
    negotiate_locale, resolve_route, LocaleRoute, LocalizationEngineTrait,
};
use crate::services::settings_engine::SettingsEngineTrait;
use crate::types::blog::{Blog, NewBlog};
use crate::types::contact::ContactMessage;
use crate::types::user_data::NewSavedSummary;

/// Decode base64 string to bytes.
pub fn base64_decode(input: &str) -> Result<Vec<u8>, String> {
    BASE64.decode(input).map_err(|e| format!("base64 decode error: {}", e))
}

fn to_json<T: serde::Serialize>(value: &T) -> Result<Value, String> {
    serde_json::to_value(value).map_err(|e| e.to_string())
}

fn from_param<T: DeserializeOwned>(params: &Value, name: &str) -> Result<T, String> {
    let raw = params.get(name).cloned().ok_or(format!("missing {}", name))?;
    serde_json::from_value(raw).map_err(|e| format!("invalid {}: {}", name, e))
}

fn string_map(params: &Value) -> Option<HashMap<String, String>> {
    params.get("params").and_then(|v| v.as_object()).map(|obj| {
        obj.iter()
            .map(|(k, v)| {
                let text = v.as_str().map(str::to_string).unwrap_or_else(|| v.to_string());
                (k.clone(), text)
            })
            .collect()
    })
}

/// True for methods that must go through [`handle_api_method`].
pub fn is_network_method(method: &str) -> bool {
    method.starts_with("api.") || method.starts_with("contact.")
}

/// Routes a request to the sync or async handler.
pub async fn dispatch(app: &Mutex<App>, method: &str, params: &Value) -> Result<Value, String> {
    if is_network_method(method) {
        handle_api_method(app, method, params).await
    } else {
        handle_method(app, method, params)
    }
}

/// Dispatch a local (non-network) method call.
///
/// Returns `Ok(Value)` on success or `Err(String)` with an error message.
pub fn handle_method(app: &Mutex<App>, method: &str, params: &Value) -> Result<Value, String> {
    match method {
        "ping" => Ok(json!({"pong": true, "version": env!("CARGO_PKG_VERSION")})),

        // ─── Session ───
        "session.userId" => {
            let a = app.lock().map_err(|e| e.to_string())?;
            let id = a.session_manager.get_or_create_user_id().map_err(|e| e.to_string())?;
            Ok(json!({"userId": id}))
        }
        "session.sessionId" => {
            let a = app.lock().map_err(|e| e.to_string())?;
            let id = a.session_manager.get_or_create_session_id().map_err(|e| e.to_string())?;
            Ok(json!({"sessionId": id}))
        }
        "session.admin" => {
            let a = app.lock().map_err(|e| e.to_string())?;
            let session = a.session_manager.get_admin_session().map_err(|e| e.to_string())?;
            Ok(json!({
                "flagged": a.session_manager.is_admin_flagged(),
                "username": a.session_manager.admin_username(),
                "admin": session.as_ref().map(|s| to_json(&s.data)).transpose()?,
            }))
        }
        "session.clearAdmin" => {
            let a = app.lock().map_err(|e| e.to_string())?;
            a.session_manager.clear_admin_session().map_err(|e| e.to_string())?;
            a.session_manager.clear_admin_flags().map_err(|e| e.to_string())?;
            Ok(json!({"ok": true}))
        }
        "session.setLanguage" => {
            let locale = params.get("locale").and_then(|v| v.as_str()).ok_or("missing locale")?;
            let mut a = app.lock().map_err(|e| e.to_string())?;
            a.session_manager.set_preferred_language(locale).map_err(|e| e.to_string())?;
            a.localization_engine.set_locale(locale).map_err(|e| e.to_string())?;
            Ok(json!({"ok": true, "direction": a.localization_engine.direction().as_str()}))
        }
        "session.language" => {
            let a = app.lock().map_err(|e| e.to_string())?;
            Ok(json!({"locale": a.session_manager.preferred_language()}))
        }

        // ─── User data ───
        "user.load" => {
            let a = app.lock().map_err(|e| e.to_string())?;
            to_json(&a.user_data.load().map_err(|e| e.to_string())?)
        }
        "user.addSearch" => {
            let query = params.get("query").and_then(|v| v.as_str()).ok_or("missing query")?;
            let count = params.get("resultsCount").and_then(|v| v.as_u64()).unwrap_or(0);
            let title = params.get("bookTitle").and_then(|v| v.as_str());
            let a = app.lock().map_err(|e| e.to_string())?;
            let entry = a
                .user_data
                .add_search(query, u32::try_from(count).unwrap_or(u32::MAX), title)
                .map_err(|e| e.to_string())?;
            to_json(&entry)
        }
        "user.history" => {
            let limit = params.get("limit").and_then(|v| v.as_u64()).map(|l| l as usize);
            let a = app.lock().map_err(|e| e.to_string())?;
            to_json(&a.user_data.search_history(limit).map_err(|e| e.to_string())?)
        }
        "user.clearHistory" => {
            let a = app.lock().map_err(|e| e.to_string())?;
            a.user_data.clear_search_history().map_err(|e| e.to_string())?;
            Ok(json!({"ok": true}))
        }
        "user.saveSummary" => {
            let summary: NewSavedSummary = from_param(params, "summary")?;
            let a = app.lock().map_err(|e| e.to_string())?;
            to_json(&a.user_data.save_summary(summary).map_err(|e| e.to_string())?)
        }
        "user.summaries" => {
            let a = app.lock().map_err(|e| e.to_string())?;
            to_json(&a.user_data.saved_summaries().map_err(|e| e.to_string())?)
        }
        "user.getSummary" => {
            let id = params.get("id").and_then(|v| v.as_str()).ok_or("missing id")?;
            let a = app.lock().map_err(|e| e.to_string())?;
            to_json(&a.user_data.get_saved_summary(id).map_err(|e| e.to_string())?)
        }
        "user.isSaved" => {
            let title = params.get("title").and_then(|v| v.as_str()).ok_or("missing title")?;
            let a = app.lock().map_err(|e| e.to_string())?;
            let saved = a.user_data.is_summary_saved(title).map_err(|e| e.to_string())?;
            Ok(json!({"saved": saved}))
        }
        "user.deleteSummary" => {
            let id = params.get("id").and_then(|v| v.as_str()).ok_or("missing id")?;
            let a = app.lock().map_err(|e| e.to_string())?;
            let removed = a.user_data.delete_saved_summary(id).map_err(|e| e.to_string())?;
            Ok(json!({"removed": removed}))
        }
        "user.stats" => {
            let a = app.lock().map_err(|e| e.to_string())?;
            to_json(&a.user_data.user_stats().map_err(|e| e.to_string())?)
        }
        "user.clearAll" => {
            let a = app.lock().map_err(|e| e.to_string())?;
            a.user_data.clear_all().map_err(|e| e.to_string())?;
            Ok(json!({"ok": true}))
        }

        // ─── Admin stats ───
        "stats.init" => {
            let a = app.lock().map_err(|e| e.to_string())?;
            to_json(&a.stats.initialize_stats().map_err(|e| e.to_string())?)
        }
        "stats.trackVisitor" => {
            let a = app.lock().map_err(|e| e.to_string())?;
            let visitor = match params.get("visitorId").and_then(|v| v.as_str()) {
                Some(id) => id.to_string(),
                None => a.user_data.user_id().to_string(),
            };
            a.stats.track_visitor(&visitor).map_err(|e| e.to_string())?;
            Ok(json!({"ok": true}))
        }
        "stats.trackSearch" => {
            let query = params.get("query").and_then(|v| v.as_str()).ok_or("missing query")?;
            let success = params.get("success").and_then(|v| v.as_bool()).unwrap_or(true);
            let elapsed = params.get("responseTimeMs").and_then(|v| v.as_u64()).unwrap_or(0);
            let a = app.lock().map_err(|e| e.to_string())?;
            a.stats.track_search(query, success, elapsed).map_err(|e| e.to_string())?;
            Ok(json!({"ok": true}))
        }
        "stats.trackPdfUpload" => {
            let success = params.get("success").and_then(|v| v.as_bool()).unwrap_or(true);
            let a = app.lock().map_err(|e| e.to_string())?;
            a.stats.track_pdf_upload(success).map_err(|e| e.to_string())?;
            Ok(json!({"ok": true}))
        }
        "stats.trackAdImpression" | "stats.trackAdClick" => {
            let slot = params.get("slot").and_then(|v| v.as_str()).ok_or("missing slot")?;
            let a = app.lock().map_err(|e| e.to_string())?;
            if method == "stats.trackAdClick" {
                a.stats.track_ad_click(slot).map_err(|e| e.to_string())?;
            } else {
                a.stats.track_ad_impression(slot).map_err(|e| e.to_string())?;
            }
            Ok(json!({"ok": true}))
        }
        "stats.get" => {
            let a = app.lock().map_err(|e| e.to_string())?;
            to_json(&a.stats.get_stats().map_err(|e| e.to_string())?)
        }
        "stats.popular" => {
            let limit = params.get("limit").and_then(|v| v.as_u64()).unwrap_or(10) as usize;
            let a = app.lock().map_err(|e| e.to_string())?;
            to_json(&a.stats.get_popular_searches(limit).map_err(|e| e.to_string())?)
        }
        "stats.performance" => {
            let a = app.lock().map_err(|e| e.to_string())?;
            to_json(&a.stats.get_performance_stats().map_err(|e| e.to_string())?)
        }
        "stats.visitors" => {
            let a = app.lock().map_err(|e| e.to_string())?;
            to_json(&a.stats.get_visitor_stats().map_err(|e| e.to_string())?)
        }
        "stats.ads" => {
            let a = app.lock().map_err(|e| e.to_string())?;
            to_json(&a.stats.get_ad_stats().map_err(|e| e.to_string())?)
        }
        "stats.reset" => {
            let a = app.lock().map_err(|e| e.to_string())?;
            a.stats.reset_stats().map_err(|e| e.to_string())?;
            Ok(json!({"ok": true}))
        }
        "stats.export" => {
            let a = app.lock().map_err(|e| e.to_string())?;
            let exported = a.stats.export_stats().map_err(|e| e.to_string())?;
            Ok(json!({"json": exported}))
        }

        // ─── Locale routing & translations ───
        "locale.resolve" => {
            let path = params.get("path").and_then(|v| v.as_str()).ok_or("missing path")?;
            let accept = params.get("acceptLanguage").and_then(|v| v.as_str());
            let explicit = params.get("preferred").and_then(|v| v.as_str()).map(str::to_string);
            let preferred = match explicit {
                Some(p) => Some(p),
                None => {
                    let a = app.lock().map_err(|e| e.to_string())?;
                    a.session_manager.preferred_language()
                }
            };
            match resolve_route(path, accept, preferred.as_deref()) {
                LocaleRoute::Pass { locale } => Ok(json!({"action": "pass", "locale": locale})),
                LocaleRoute::Redirect { location } => {
                    Ok(json!({"action": "redirect", "location": location}))
                }
            }
        }
        "locale.negotiate" => {
            let accept = params.get("acceptLanguage").and_then(|v| v.as_str());
            Ok(json!({"locale": negotiate_locale(accept)}))
        }
        "i18n.t" => {
            let key = params.get("key").and_then(|v| v.as_str()).ok_or("missing key")?;
            let values = string_map(params);
            let a = app.lock().map_err(|e| e.to_string())?;
            Ok(json!({"text": a.localization_engine.t(key, values.as_ref())}))
        }
        "i18n.plural" => {
            let key = params.get("key").and_then(|v| v.as_str()).ok_or("missing key")?;
            let count = params.get("count").and_then(|v| v.as_u64()).ok_or("missing count")?;
            let values = string_map(params);
            let a = app.lock().map_err(|e| e.to_string())?;
            Ok(json!({"text": a.localization_engine.plural(key, count, values.as_ref())}))
        }
        "i18n.locale" => {
            let a = app.lock().map_err(|e| e.to_string())?;
            Ok(json!({
                "locale": a.localization_engine.get_locale(),
                "direction": a.localization_engine.direction().as_str(),
                "available": a.localization_engine.get_available_locales(),
            }))
        }

        // ─── Pure helpers ───
        "image.safeUrl" => {
            let url = params.get("url").and_then(|v| v.as_str());
            Ok(json!({"url": get_safe_image_url(url)}))
        }
        "blogs.filter" => {
            let blogs: Vec<Blog> = from_param(params, "blogs")?;
            let query: BlogQuery = match params.get("query") {
                Some(q) => serde_json::from_value(q.clone()).map_err(|e| format!("invalid query: {}", e))?,
                None => BlogQuery::default(),
            };
            to_json(&blog_catalog::paginate(&blogs, &query))
        }
        "blogs.categoryCounts" => {
            let blogs: Vec<Blog> = from_param(params, "blogs")?;
            to_json(&blog_catalog::category_counts(&blogs))
        }
        "blogs.tags" => {
            let blogs: Vec<Blog> = from_param(params, "blogs")?;
            Ok(json!(blog_catalog::all_tags(&blogs)))
        }

        // ─── Settings ───
        "settings.get" => {
            let a = app.lock().map_err(|e| e.to_string())?;
            to_json(a.settings_engine.get_settings())
        }
        "settings.set" => {
            let key = params.get("key").and_then(|v| v.as_str()).ok_or("missing key")?;
            let value = params.get("value").cloned().ok_or("missing value")?;
            let mut a = app.lock().map_err(|e| e.to_string())?;
            a.settings_engine.set_value(key, value).map_err(|e| e.to_string())?;
            if key.starts_with("api.") || key.starts_with("contact.") {
                a.rebuild_clients().map_err(|e| e.to_string())?;
            }
            Ok(json!({"ok": true}))
        }
        "settings.reset" => {
            let mut a = app.lock().map_err(|e| e.to_string())?;
            a.settings_engine.reset().map_err(|e| e.to_string())?;
            a.rebuild_clients().map_err(|e| e.to_string())?;
            Ok(json!({"ok": true}))
        }

        _ => Err(format!("unknown method: {}", method)),
    }
}

/// Dispatch a method that talks to the backend or the contact endpoint.
pub async fn handle_api_method(app: &Mutex<App>, method: &str, params: &Value) -> Result<Value, String> {
    let (api, contact) = {
        let a = app.lock().map_err(|e| e.to_string())?;
        (a.api.clone(), a.contact.clone())
    };
    let language = params.get("language").and_then(|v| v.as_str()).unwrap_or("en");
    let page = params.get("page").and_then(|v| v.as_u64()).unwrap_or(1) as u32;
    let limit = params.get("limit").and_then(|v| v.as_u64()).unwrap_or(9) as u32;

    match method {
        // ─── Summaries ───
        "api.summary" => {
            let query = params.get("query").and_then(|v| v.as_str()).ok_or("missing query")?;
            let started = Instant::now();
            let result = api.get_summary(query, language).await;
            let elapsed = started.elapsed().as_millis() as u64;

            let a = app.lock().map_err(|e| e.to_string())?;
            if let Err(e) = a.stats.track_search(query, result.is_ok(), elapsed) {
                tracing::warn!("search tracking failed: {}", e);
            }
            let response = result.map_err(|e| e.to_string())?;
            let count = response.results_count.unwrap_or(1);
            let title = Some(response.book.title.as_str()).filter(|t| !t.is_empty());
            if let Err(e) = a.user_data.add_search(query, count, title) {
                tracing::warn!("search history update failed: {}", e);
            }
            to_json(&response)
        }
        "api.upload" => {
            let file_name = params.get("fileName").and_then(|v| v.as_str()).ok_or("missing fileName")?;
            let data = params.get("data").and_then(|v| v.as_str()).ok_or("missing data")?;
            let bytes = base64_decode(data)?;
            let result = api.upload_pdf(file_name, bytes, language).await;

            let a = app.lock().map_err(|e| e.to_string())?;
            if let Err(e) = a.stats.track_pdf_upload(result.is_ok()) {
                tracing::warn!("upload tracking failed: {}", e);
            }
            to_json(&result.map_err(|e| e.to_string())?)
        }

        // ─── Blogs ───
        "api.blogs" => {
            let category = params.get("category").and_then(|v| v.as_str());
            to_json(&api.get_blogs(page, limit, category).await.map_err(|e| e.to_string())?)
        }
        "api.blog" => {
            let slug = params.get("slug").and_then(|v| v.as_str()).ok_or("missing slug")?;
            to_json(&api.get_blog(slug).await.map_err(|e| e.to_string())?)
        }
        "api.like" => {
            let id = params.get("id").and_then(|v| v.as_str()).ok_or("missing id")?;
            to_json(&api.like_blog(id).await.map_err(|e| e.to_string())?)
        }
        "api.comment" => {
            let id = params.get("id").and_then(|v| v.as_str()).ok_or("missing id")?;
            let author = params.get("author").and_then(|v| v.as_str()).unwrap_or("");
            let content = params.get("content").and_then(|v| v.as_str()).ok_or("missing content")?;
            to_json(&api.add_comment(id, author, content).await.map_err(|e| e.to_string())?)
        }
        "api.view" => {
            let id = params.get("id").and_then(|v| v.as_str()).ok_or("missing id")?;
            api.record_view(id).await.map_err(|e| e.to_string())?;
            Ok(json!({"ok": true}))
        }
        "api.createBlog" => {
            let blog: NewBlog = from_param(params, "blog")?;
            to_json(&api.create_blog(&blog).await.map_err(|e| e.to_string())?)
        }
        "api.categories" => to_json(&api.get_categories().await),
        "api.latest" => {
            let limit = params.get("limit").and_then(|v| v.as_u64()).unwrap_or(3) as usize;
            to_json(&api.get_latest_blogs(limit).await)
        }
        "api.categoryBlogs" => {
            let category = params.get("category").and_then(|v| v.as_str()).ok_or("missing category")?;
            to_json(&api.get_category_blogs(category, page, limit).await.map_err(|e| e.to_string())?)
        }

        // ─── Admin ───
        "api.adminLogin" => {
            let username = params.get("username").and_then(|v| v.as_str()).ok_or("missing username")?;
            let password = params.get("password").and_then(|v| v.as_str()).ok_or("missing password")?;
            let response = api.admin_login(username, password).await.map_err(|e| e.to_string())?;
            Ok(json!({"ok": true, "admin": to_json(&response.admin)?, "message": response.message}))
        }
        "api.adminLogout" => {
            api.admin_logout().await.map_err(|e| e.to_string())?;
            Ok(json!({"ok": true}))
        }
        "api.verifyAdmin" => {
            let valid = api.verify_admin_session().await.map_err(|e| e.to_string())?;
            Ok(json!({"valid": valid}))
        }
        "api.adminStats" => api.get_admin_stats().await.map_err(|e| e.to_string()),
        "api.deleteBlog" => {
            let id = params.get("id").and_then(|v| v.as_str()).ok_or("missing id")?;
            api.delete_blog(id).await.map_err(|e| e.to_string())?;
            Ok(json!({"ok": true}))
        }
        "api.updateBlog" => {
            let id = params.get("id").and_then(|v| v.as_str()).ok_or("missing id")?;
            let patch = params.get("patch").cloned().ok_or("missing patch")?;
            to_json(&api.update_blog(id, &patch).await.map_err(|e| e.to_string())?)
        }

        // ─── User (server copy) ───
        "api.userHistory" => to_json(&api.get_user_history().await.map_err(|e| e.to_string())?),
        "api.userSummaries" => to_json(&api.get_user_summaries().await.map_err(|e| e.to_string())?),

        // ─── Contact ───
        "contact.send" => {
            let message: ContactMessage = from_param(params, "message")?;
            contact.send(&message).await.map_err(|e| e.to_string())?;
            Ok(json!({"ok": true}))
        }

        _ => Err(format!("unknown method: {}", method)),
    }
}
