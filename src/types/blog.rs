use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Book metadata attached to a blog post or summary.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct BookDetails {
    pub title: String,
    pub author: Option<String>,
    pub thumbnail: Option<String>,
    pub page_count: Option<u32>,
    pub published_date: Option<String>,
    pub description: Option<String>,
}

/// A reader comment on a blog post.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub author: String,
    pub content: String,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
}

/// A published book-summary article, as served by the backend.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Blog {
    pub id: String,
    #[serde(default)]
    pub slug: String,
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub ai_response: Option<String>,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub book_details: BookDetails,
    #[serde(default)]
    pub likes_count: u64,
    #[serde(default)]
    pub liked: bool,
    #[serde(default)]
    pub views: u64,
    #[serde(default)]
    pub comments_count: u64,
    #[serde(default)]
    pub comments: Vec<Comment>,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
}

/// One page of blogs from the list endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BlogPage {
    #[serde(default)]
    pub blogs: Vec<Blog>,
    #[serde(default)]
    pub total: u64,
    #[serde(default = "first_page")]
    pub page: u32,
    #[serde(default = "first_page")]
    pub total_pages: u32,
}

fn first_page() -> u32 {
    1
}

/// Result of toggling a like.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LikeResponse {
    pub likes_count: u64,
    pub liked: bool,
}

/// Payload for publishing a summary as a blog post.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NewBlog {
    pub title: String,
    pub content: String,
    pub ai_response: Option<String>,
    pub category: String,
    pub tags: Vec<String>,
    pub book_details: BookDetails,
}

/// A blog category with its display names.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub name_ar: Option<String>,
    #[serde(default)]
    pub count: u64,
}
