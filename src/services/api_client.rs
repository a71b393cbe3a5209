//! HTTP gateway to the BookWise backend.
//!
//! Every request carries the anonymous user id and shares a cookie jar, so
//! the backend's admin cookie session survives across calls. Failures are
//! normalized into [`ApiError`] with the best message the body offers.
//! The category and latest-blog reads never fail: they fall back to built-in
//! content so public pages always have something to show.

use std::sync::Arc;
use std::time::Duration;

use reqwest::multipart::{Form, Part};
use reqwest::{Client, Method, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::managers::session_manager::{SessionManager, SessionManagerTrait};
use crate::types::blog::{Blog, BlogPage, BookDetails, Category, Comment, LikeResponse, NewBlog};
use crate::types::errors::ApiError;
use crate::types::session::{AdminData, AdminLoginResponse};
use crate::types::settings::ApiSettings;
use crate::types::summary::SummaryResponse;
use crate::types::user_data::{SavedSummary, SearchHistoryEntry};

/// Header carrying the anonymous visitor id.
pub const USER_ID_HEADER: &str = "X-User-Id";

/// Lists come back either bare or wrapped in a named field.
#[derive(Deserialize)]
#[serde(untagged)]
enum ListEnvelope<T> {
    Bare(Vec<T>),
    Categories { categories: Vec<T> },
    Blogs { blogs: Vec<T> },
    History { history: Vec<T> },
    Summaries { summaries: Vec<T> },
    Data { data: Vec<T> },
}

impl<T> ListEnvelope<T> {
    fn into_vec(self) -> Vec<T> {
        match self {
            ListEnvelope::Bare(v)
            | ListEnvelope::Categories { categories: v }
            | ListEnvelope::Blogs { blogs: v }
            | ListEnvelope::History { history: v }
            | ListEnvelope::Summaries { summaries: v }
            | ListEnvelope::Data { data: v } => v,
        }
    }
}

/// Single records come back either bare or as `{"blog": ...}` / `{"comment": ...}`.
#[derive(Deserialize)]
#[serde(untagged)]
enum RecordEnvelope<T> {
    Blog { blog: T },
    Comment { comment: T },
    Data { data: T },
    Bare(T),
}

impl<T> RecordEnvelope<T> {
    fn into_inner(self) -> T {
        match self {
            RecordEnvelope::Blog { blog: v }
            | RecordEnvelope::Comment { comment: v }
            | RecordEnvelope::Data { data: v }
            | RecordEnvelope::Bare(v) => v,
        }
    }
}

/// Picks the most useful message from an error response body.
///
/// Order: JSON `message`, `error`, `detail`; then the raw text; then a
/// generic message naming the status.
pub fn extract_error_message(status: u16, body: &str) -> String {
    if let Ok(Value::Object(map)) = serde_json::from_str::<Value>(body) {
        for field in ["message", "error", "detail"] {
            if let Some(msg) = map.get(field).and_then(Value::as_str) {
                if !msg.trim().is_empty() {
                    return msg.to_string();
                }
            }
        }
    }

    let text = body.trim();
    if text.is_empty() {
        format!("Request failed with status {}", status)
    } else {
        text.to_string()
    }
}

/// Categories shown when the backend cannot be reached.
pub fn fallback_categories() -> Vec<Category> {
    [
        ("self-development", "Self Development", "تطوير الذات"),
        ("business", "Business", "الأعمال"),
        ("psychology", "Psychology", "علم النفس"),
        ("history", "History", "التاريخ"),
        ("science", "Science", "العلوم"),
        ("fiction", "Fiction", "الروايات"),
    ]
    .into_iter()
    .map(|(id, name, name_ar)| Category {
        id: id.to_string(),
        name: name.to_string(),
        name_ar: Some(name_ar.to_string()),
        count: 0,
    })
    .collect()
}

/// Articles shown on the home page when the backend cannot be reached.
pub fn fallback_latest_blogs() -> Vec<Blog> {
    [
        ("fallback-atomic-habits", "Atomic Habits", "James Clear", "self-development"),
        ("fallback-thinking-fast-and-slow", "Thinking, Fast and Slow", "Daniel Kahneman", "psychology"),
        ("fallback-sapiens", "Sapiens", "Yuval Noah Harari", "history"),
    ]
    .into_iter()
    .map(|(slug, title, author, category)| Blog {
        id: slug.to_string(),
        slug: slug.to_string(),
        title: format!("{}: key ideas", title),
        content: format!("A short summary of the main ideas in {} by {}.", title, author),
        ai_response: None,
        category: category.to_string(),
        tags: vec![category.to_string()],
        book_details: BookDetails {
            title: title.to_string(),
            author: Some(author.to_string()),
            ..BookDetails::default()
        },
        likes_count: 0,
        liked: false,
        views: 0,
        comments_count: 0,
        comments: Vec::new(),
        created_at: chrono::Utc::now(),
    })
    .collect()
}

/// HTTP client for the backend REST API.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    user_id: String,
    max_upload_bytes: u64,
    session: Option<Arc<SessionManager>>,
}

impl ApiClient {
    /// Creates a client with a cookie jar and the configured request timeout.
    pub fn new(settings: &ApiSettings, user_id: &str) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs.max(1)))
            .cookie_store(true)
            .build()
            .map_err(|e| ApiError::Network(format!("failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            user_id: user_id.to_string(),
            max_upload_bytes: settings.max_upload_bytes,
            session: None,
        })
    }

    /// Attaches the session manager whose admin flags are kept in sync with
    /// login, logout, and rejected admin requests.
    pub fn with_session(mut self, session: Arc<SessionManager>) -> Self {
        self.session = Some(session);
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.client
            .request(method, format!("{}{}", self.base_url, path))
            .header(USER_ID_HEADER, &self.user_id)
    }

    async fn execute(&self, request: RequestBuilder, context: &str) -> Result<reqwest::Response, ApiError> {
        let response = request.send().await.map_err(|e| {
            tracing::error!("{} failed: {}", context, e);
            ApiError::Network(e.to_string())
        })?;

        let status = response.status();
        if status.is_success() {
            tracing::debug!("{} succeeded: {}", context, status);
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let message = extract_error_message(status.as_u16(), &body);
        tracing::error!("{} failed: status={}, message={}", context, status, message);
        Err(ApiError::Http {
            status: status.as_u16(),
            message,
        })
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder, context: &str) -> Result<T, ApiError> {
        let response = self.execute(request, context).await?;
        let body = response
            .text()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;
        serde_json::from_str(&body).map_err(|e| {
            tracing::error!("{}: undecodable response: {}", context, e);
            ApiError::Parse(e.to_string())
        })
    }

    async fn send_ignoring_body(&self, request: RequestBuilder, context: &str) -> Result<(), ApiError> {
        self.execute(request, context).await.map(|_| ())
    }

    fn forget_admin(&self) {
        if let Some(session) = &self.session {
            if let Err(e) = session.clear_admin_flags() {
                tracing::warn!("failed to clear admin flags: {}", e);
            }
            if let Err(e) = session.clear_admin_session() {
                tracing::warn!("failed to clear admin session: {}", e);
            }
        }
    }

    /// Runs an authenticated admin request. A 401/403 clears the local admin
    /// state and becomes [`ApiError::Unauthorized`].
    async fn secure_admin_request<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        context: &str,
    ) -> Result<T, ApiError> {
        let request = match self.session.as_ref().map(|s| s.get_admin_session()) {
            Some(Ok(Some(admin))) if !admin.token.is_empty() => request.bearer_auth(&admin.token),
            _ => request,
        };

        match self.send(request, context).await {
            Err(ApiError::Http { status, message })
                if status == StatusCode::UNAUTHORIZED.as_u16()
                    || status == StatusCode::FORBIDDEN.as_u16() =>
            {
                tracing::warn!("{}: admin session rejected ({}), signing out locally", context, status);
                self.forget_admin();
                Err(ApiError::Unauthorized(message))
            }
            other => other,
        }
    }

    // ─── Summaries ───

    /// Generates a summary for a book title or author query.
    pub async fn get_summary(&self, query: &str, language: &str) -> Result<SummaryResponse, ApiError> {
        let query = query.trim();
        if query.is_empty() {
            return Err(ApiError::InvalidInput("query is empty".to_string()));
        }
        let body = json!({ "query": query, "language": language, "userId": self.user_id });
        self.send(self.request(Method::POST, "/api/summary").json(&body), "get_summary")
            .await
    }

    /// Uploads a PDF for summarization. Enforces the client-side size cap first.
    pub async fn upload_pdf(
        &self,
        file_name: &str,
        bytes: Vec<u8>,
        language: &str,
    ) -> Result<SummaryResponse, ApiError> {
        if bytes.is_empty() {
            return Err(ApiError::InvalidInput("file is empty".to_string()));
        }
        if !file_name.to_lowercase().ends_with(".pdf") {
            return Err(ApiError::InvalidInput(format!("{} is not a PDF", file_name)));
        }
        if bytes.len() as u64 > self.max_upload_bytes {
            return Err(ApiError::PayloadTooLarge(self.max_upload_bytes));
        }

        let part = Part::bytes(bytes)
            .file_name(file_name.to_string())
            .mime_str("application/pdf")
            .map_err(|e| ApiError::InvalidInput(e.to_string()))?;
        let form = Form::new()
            .part("pdf", part)
            .text("language", language.to_string())
            .text("userId", self.user_id.clone());

        self.send(self.request(Method::POST, "/api/upload").multipart(form), "upload_pdf")
            .await
    }

    // ─── Blogs ───

    pub async fn get_blogs(&self, page: u32, limit: u32, category: Option<&str>) -> Result<BlogPage, ApiError> {
        let mut query = vec![("page", page.max(1).to_string()), ("limit", limit.to_string())];
        if let Some(category) = category.filter(|c| !c.is_empty() && *c != "all") {
            query.push(("category", category.to_string()));
        }
        self.send(self.request(Method::GET, "/api/blog").query(&query), "get_blogs")
            .await
    }

    pub async fn get_blog(&self, slug: &str) -> Result<Blog, ApiError> {
        let envelope: RecordEnvelope<Blog> = self
            .send(self.request(Method::GET, &format!("/api/blog/{}", slug)), "get_blog")
            .await?;
        Ok(envelope.into_inner())
    }

    pub async fn like_blog(&self, id: &str) -> Result<LikeResponse, ApiError> {
        let body = json!({ "userId": self.user_id });
        self.send(
            self.request(Method::POST, &format!("/api/blog/{}/like", id)).json(&body),
            "like_blog",
        )
        .await
    }

    pub async fn add_comment(&self, id: &str, author: &str, content: &str) -> Result<Comment, ApiError> {
        if content.trim().is_empty() {
            return Err(ApiError::InvalidInput("comment is empty".to_string()));
        }
        let body = json!({ "author": author, "content": content.trim(), "userId": self.user_id });
        let envelope: RecordEnvelope<Comment> = self
            .send(
                self.request(Method::POST, &format!("/api/blog/{}/comment", id)).json(&body),
                "add_comment",
            )
            .await?;
        Ok(envelope.into_inner())
    }

    pub async fn record_view(&self, id: &str) -> Result<(), ApiError> {
        self.send_ignoring_body(
            self.request(Method::POST, &format!("/api/blog/{}/view", id)),
            "record_view",
        )
        .await
    }

    /// Publishes a summary as a blog post.
    pub async fn create_blog(&self, blog: &NewBlog) -> Result<Blog, ApiError> {
        let envelope: RecordEnvelope<Blog> = self
            .send(self.request(Method::POST, "/api/blog").json(blog), "create_blog")
            .await?;
        Ok(envelope.into_inner())
    }

    /// Never fails; returns [`fallback_categories`] when the backend does.
    pub async fn get_categories(&self) -> Vec<Category> {
        match self
            .send::<ListEnvelope<Category>>(self.request(Method::GET, "/api/categories"), "get_categories")
            .await
        {
            Ok(envelope) => envelope.into_vec(),
            Err(e) => {
                tracing::warn!("using fallback categories: {}", e);
                fallback_categories()
            }
        }
    }

    /// Never fails; returns [`fallback_latest_blogs`] when the backend does.
    pub async fn get_latest_blogs(&self, limit: usize) -> Vec<Blog> {
        let request = self
            .request(Method::GET, "/api/blog/latest")
            .query(&[("limit", limit.to_string())]);
        let mut blogs = match self.send::<ListEnvelope<Blog>>(request, "get_latest_blogs").await {
            Ok(envelope) => envelope.into_vec(),
            Err(e) => {
                tracing::warn!("using fallback latest blogs: {}", e);
                fallback_latest_blogs()
            }
        };
        blogs.truncate(limit);
        blogs
    }

    pub async fn get_category_blogs(&self, category: &str, page: u32, limit: u32) -> Result<BlogPage, ApiError> {
        let request = self
            .request(Method::GET, &format!("/api/categories/{}/blogs", category))
            .query(&[("page", page.max(1).to_string()), ("limit", limit.to_string())]);
        self.send(request, "get_category_blogs").await
    }

    // ─── Admin ───

    /// Signs in. On success the admin flags and admin session are stored locally.
    pub async fn admin_login(&self, username: &str, password: &str) -> Result<AdminLoginResponse, ApiError> {
        if username.trim().is_empty() || password.is_empty() {
            return Err(ApiError::InvalidInput("username and password are required".to_string()));
        }
        let body = json!({ "username": username.trim(), "password": password });
        let response: AdminLoginResponse = self
            .send(self.request(Method::POST, "/api/admin/login").json(&body), "admin_login")
            .await?;

        if let Some(session) = &self.session {
            let token = response.token.clone().unwrap_or_default();
            let stored = session
                .set_admin_session(&token, &response.admin)
                .and_then(|_| session.set_admin_flags(&response.admin.username));
            if let Err(e) = stored {
                tracing::error!("admin login succeeded but session was not stored: {}", e);
                self.forget_admin();
                return Err(ApiError::LocalState(e.to_string()));
            }
        }
        Ok(response)
    }

    /// Signs out on the backend; local admin state is cleared even if that fails.
    pub async fn admin_logout(&self) -> Result<(), ApiError> {
        let result = self
            .send_ignoring_body(self.request(Method::POST, "/api/admin/logout"), "admin_logout")
            .await;
        self.forget_admin();
        result
    }

    /// Asks the backend whether the cookie session is still valid.
    pub async fn verify_admin_session(&self) -> Result<bool, ApiError> {
        match self
            .secure_admin_request::<Value>(self.request(Method::GET, "/api/admin/verify"), "verify_admin_session")
            .await
        {
            Ok(_) => Ok(true),
            Err(ApiError::Unauthorized(_)) => Ok(false),
            Err(e) => Err(e),
        }
    }

    pub async fn get_admin_stats(&self) -> Result<Value, ApiError> {
        self.secure_admin_request(self.request(Method::GET, "/api/admin/stats"), "get_admin_stats")
            .await
    }

    pub async fn delete_blog(&self, id: &str) -> Result<(), ApiError> {
        self.secure_admin_request::<Value>(
            self.request(Method::DELETE, &format!("/api/admin/blogs/{}", id)),
            "delete_blog",
        )
        .await
        .map(|_| ())
    }

    pub async fn update_blog(&self, id: &str, patch: &Value) -> Result<Blog, ApiError> {
        let envelope: RecordEnvelope<Blog> = self
            .secure_admin_request(
                self.request(Method::PUT, &format!("/api/admin/blogs/{}", id)).json(patch),
                "update_blog",
            )
            .await?;
        Ok(envelope.into_inner())
    }

    /// Profile of the signed-in admin, from local session storage.
    pub fn current_admin(&self) -> Option<AdminData> {
        self.session
            .as_ref()
            .and_then(|s| s.get_admin_session().ok().flatten())
            .map(|admin| admin.data.clone())
    }

    // ─── User ───

    pub async fn get_user_history(&self) -> Result<Vec<SearchHistoryEntry>, ApiError> {
        let envelope: ListEnvelope<SearchHistoryEntry> = self
            .send(
                self.request(Method::GET, &format!("/api/user/{}/history", self.user_id)),
                "get_user_history",
            )
            .await?;
        Ok(envelope.into_vec())
    }

    pub async fn get_user_summaries(&self) -> Result<Vec<SavedSummary>, ApiError> {
        let envelope: ListEnvelope<SavedSummary> = self
            .send(
                self.request(Method::GET, &format!("/api/user/{}/summaries", self.user_id)),
                "get_user_summaries",
            )
            .await?;
        Ok(envelope.into_vec())
    }
}
