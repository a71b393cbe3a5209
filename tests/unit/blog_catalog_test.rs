//! Unit tests for client-side blog filtering, sorting, and pagination.

use chrono::{Duration, TimeZone, Utc};
use rstest::rstest;

use bookwise::services::blog_catalog::*;
use bookwise::types::blog::{Blog, BookDetails};

fn blog(id: &str, category: &str, tags: &[&str], likes: u64, views: u64, age_days: i64) -> Blog {
    let base = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();
    Blog {
        id: id.to_string(),
        slug: id.to_string(),
        title: format!("Summary of {}", id),
        content: String::new(),
        ai_response: None,
        category: category.to_string(),
        tags: tags.iter().map(|t| t.to_string()).collect(),
        book_details: BookDetails {
            title: id.to_string(),
            author: Some(format!("Author {}", id)),
            ..BookDetails::default()
        },
        likes_count: likes,
        liked: false,
        views,
        comments_count: 0,
        comments: Vec::new(),
        created_at: base - Duration::days(age_days),
    }
}

fn catalog() -> Vec<Blog> {
    vec![
        blog("Sapiens", "history", &["humanity"], 10, 500, 3),
        blog("Atomic Habits", "self-development", &["habits", "productivity"], 42, 300, 1),
        blog("Deep Work", "self-development", &["productivity"], 7, 900, 5),
        blog("Guns Germs Steel", "history", &["geography"], 1, 50, 10),
        blog("Thinking Fast", "psychology", &["decisions"], 30, 100, 0),
    ]
}

fn ids(page: &BlogListPage) -> Vec<&str> {
    page.items.iter().map(|b| b.id.as_str()).collect()
}

#[test]
fn test_default_query() {
    let query = BlogQuery::default();
    assert_eq!(query.page, 1);
    assert_eq!(query.per_page, DEFAULT_PER_PAGE);
    assert_eq!(query.sort, BlogSort::Newest);
}

#[test]
fn test_default_sort_is_newest_first() {
    let page = paginate(&catalog(), &BlogQuery::default());
    assert_eq!(page.total, 5);
    assert_eq!(page.total_pages, 1);
    assert_eq!(ids(&page), vec!["Thinking Fast", "Atomic Habits", "Sapiens", "Deep Work", "Guns Germs Steel"]);
}

#[rstest]
#[case(BlogSort::Oldest, "Guns Germs Steel")]
#[case(BlogSort::MostLiked, "Atomic Habits")]
#[case(BlogSort::MostViewed, "Deep Work")]
fn test_sort_orders(#[case] sort: BlogSort, #[case] first: &str) {
    let page = paginate(&catalog(), &BlogQuery { sort, ..BlogQuery::default() });
    assert_eq!(page.items[0].id, first);
}

#[rstest]
#[case(Some("history"), 2)]
#[case(Some("HISTORY"), 2)]
#[case(Some("all"), 5)]
#[case(Some(""), 5)]
#[case(None, 5)]
#[case(Some("poetry"), 0)]
fn test_category_filter(#[case] category: Option<&str>, #[case] expected: usize) {
    let query = BlogQuery {
        category: category.map(str::to_string),
        ..BlogQuery::default()
    };
    assert_eq!(paginate(&catalog(), &query).total, expected);
}

#[rstest]
#[case("sapiens", vec!["Sapiens"])]
#[case("AUTHOR deep", vec!["Deep Work"])]
#[case("productivity", vec!["Atomic Habits", "Deep Work"])]
#[case("   ", vec!["Thinking Fast", "Atomic Habits", "Sapiens", "Deep Work", "Guns Germs Steel"])]
fn test_search_matches_title_author_tags(#[case] search: &str, #[case] expected: Vec<&str>) {
    let query = BlogQuery {
        search: Some(search.to_string()),
        ..BlogQuery::default()
    };
    let page = paginate(&catalog(), &query);
    assert_eq!(ids(&page), expected);
}

#[test]
fn test_tag_filter_combined_with_category() {
    let query = BlogQuery {
        category: Some("self-development".to_string()),
        tag: Some("Habits".to_string()),
        ..BlogQuery::default()
    };
    assert_eq!(ids(&paginate(&catalog(), &query)), vec!["Atomic Habits"]);
}

#[rstest]
#[case(1, vec!["Thinking Fast", "Atomic Habits"])]
#[case(3, vec!["Guns Germs Steel"])]
#[case(0, vec!["Thinking Fast", "Atomic Habits"])]
#[case(99, vec!["Guns Germs Steel"])]
fn test_page_clamping(#[case] page: usize, #[case] expected: Vec<&str>) {
    let query = BlogQuery { page, per_page: 2, ..BlogQuery::default() };
    let result = paginate(&catalog(), &query);
    assert_eq!(result.total_pages, 3);
    assert!(result.page >= 1 && result.page <= 3);
    assert_eq!(ids(&result), expected);
}

#[test]
fn test_empty_result_has_one_page() {
    let page = paginate(&[], &BlogQuery { page: 4, ..BlogQuery::default() });
    assert_eq!(page.total, 0);
    assert_eq!(page.total_pages, 1);
    assert_eq!(page.page, 1);
    assert!(page.items.is_empty());
}

#[test]
fn test_zero_per_page_uses_default() {
    let page = paginate(&catalog(), &BlogQuery { per_page: 0, ..BlogQuery::default() });
    assert_eq!(page.items.len(), 5);
}

#[test]
fn test_category_counts_and_tags() {
    let counts = category_counts(&catalog());
    assert_eq!(counts["history"], 2);
    assert_eq!(counts["self-development"], 2);
    assert_eq!(counts["psychology"], 1);

    let tags = all_tags(&catalog());
    assert_eq!(tags.first().map(String::as_str), Some("decisions"));
    assert_eq!(tags.iter().filter(|t| *t == "productivity").count(), 1);
}

#[test]
fn test_query_deserializes_partial_json() {
    let query: BlogQuery = serde_json::from_str(r#"{"category":"history","sort":"mostLiked"}"#).unwrap();
    assert_eq!(query.page, 1);
    assert_eq!(query.per_page, DEFAULT_PER_PAGE);
    assert_eq!(query.sort, BlogSort::MostLiked);
}
