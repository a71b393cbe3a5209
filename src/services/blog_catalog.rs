//! Client-side filtering, sorting, and pagination over a fetched blog list.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::types::blog::Blog;

/// Default page size of the blog grid.
pub const DEFAULT_PER_PAGE: usize = 9;

/// Category value that disables category filtering.
pub const ALL_CATEGORIES: &str = "all";

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub enum BlogSort {
    #[default]
    Newest,
    Oldest,
    MostLiked,
    MostViewed,
}

/// Filter and paging options; every field is optional on the wire.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct BlogQuery {
    pub search: Option<String>,
    pub category: Option<String>,
    pub tag: Option<String>,
    pub sort: BlogSort,
    /// 1-based.
    pub page: usize,
    pub per_page: usize,
}

impl Default for BlogQuery {
    fn default() -> Self {
        Self {
            search: None,
            category: None,
            tag: None,
            sort: BlogSort::Newest,
            page: 1,
            per_page: DEFAULT_PER_PAGE,
        }
    }
}

/// One page of filtered blogs.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BlogListPage {
    pub items: Vec<Blog>,
    /// Page actually served, after clamping.
    pub page: usize,
    /// Always at least 1.
    pub total_pages: usize,
    /// Number of blogs matching the filters.
    pub total: usize,
}

fn contains_ci(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(needle)
}

fn matches_search(blog: &Blog, needle: &str) -> bool {
    contains_ci(&blog.title, needle)
        || contains_ci(&blog.book_details.title, needle)
        || blog
            .book_details
            .author
            .as_deref()
            .map(|a| contains_ci(a, needle))
            .unwrap_or(false)
        || blog.tags.iter().any(|t| contains_ci(t, needle))
}

/// Returns true if the blog passes the query's search, category, and tag filters.
pub fn matches(blog: &Blog, query: &BlogQuery) -> bool {
    if let Some(search) = query.search.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
        if !matches_search(blog, &search.to_lowercase()) {
            return false;
        }
    }

    if let Some(category) = query.category.as_deref().map(str::trim) {
        if !category.is_empty()
            && !category.eq_ignore_ascii_case(ALL_CATEGORIES)
            && !blog.category.eq_ignore_ascii_case(category)
        {
            return false;
        }
    }

    if let Some(tag) = query.tag.as_deref().map(str::trim).filter(|t| !t.is_empty()) {
        if !blog.tags.iter().any(|t| t.eq_ignore_ascii_case(tag)) {
            return false;
        }
    }

    true
}

/// Filters, sorts, and slices `blogs` according to `query`.
///
/// Out-of-range pages are clamped into `[1, total_pages]`; a `per_page` of 0
/// falls back to [`DEFAULT_PER_PAGE`].
pub fn paginate(blogs: &[Blog], query: &BlogQuery) -> BlogListPage {
    let mut filtered: Vec<&Blog> = blogs.iter().filter(|b| matches(b, query)).collect();

    match query.sort {
        BlogSort::Newest => filtered.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
        BlogSort::Oldest => filtered.sort_by(|a, b| a.created_at.cmp(&b.created_at)),
        BlogSort::MostLiked => filtered.sort_by(|a, b| {
            b.likes_count
                .cmp(&a.likes_count)
                .then_with(|| b.created_at.cmp(&a.created_at))
        }),
        BlogSort::MostViewed => filtered.sort_by(|a, b| {
            b.views
                .cmp(&a.views)
                .then_with(|| b.created_at.cmp(&a.created_at))
        }),
    }

    let per_page = if query.per_page == 0 {
        DEFAULT_PER_PAGE
    } else {
        query.per_page
    };
    let total = filtered.len();
    let total_pages = total.div_ceil(per_page).max(1);
    let page = query.page.clamp(1, total_pages);

    let items = filtered
        .into_iter()
        .skip((page - 1) * per_page)
        .take(per_page)
        .cloned()
        .collect();

    BlogListPage {
        items,
        page,
        total_pages,
        total,
    }
}

/// Number of blogs per category, keyed by category name.
pub fn category_counts(blogs: &[Blog]) -> BTreeMap<String, usize> {
    let mut counts = BTreeMap::new();
    for blog in blogs {
        if blog.category.is_empty() {
            continue;
        }
        *counts.entry(blog.category.clone()).or_insert(0) += 1;
    }
    counts
}

/// Distinct tags across all blogs, sorted.
pub fn all_tags(blogs: &[Blog]) -> Vec<String> {
    let mut tags: Vec<String> = blogs.iter().flat_map(|b| b.tags.iter().cloned()).collect();
    tags.sort();
    tags.dedup();
    tags
}
