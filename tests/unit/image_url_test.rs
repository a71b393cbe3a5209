//! Unit tests for safe image URL selection.

use rstest::rstest;

use bookwise::services::image_url::{get_safe_image_url, PLACEHOLDER_IMAGE};

#[rstest]
#[case::none(None)]
#[case::empty(Some(""))]
#[case::blank(Some("   "))]
#[case::dead_host(Some("https://via.placeholder.com/150"))]
#[case::dead_host_upper(Some("HTTPS://VIA.PLACEHOLDER.COM/300x450?text=Book"))]
#[case::protocol_relative_dead_host(Some("//via.placeholder.com/150"))]
#[case::relative_without_slash(Some("covers/a.jpg"))]
#[case::garbage(Some("not a url"))]
#[case::javascript(Some("javascript:alert(1)"))]
#[case::ftp(Some("ftp://files.example.com/cover.jpg"))]
fn test_placeholder_cases(#[case] input: Option<&str>) {
    assert_eq!(get_safe_image_url(input), PLACEHOLDER_IMAGE);
}

#[rstest]
#[case::root_relative("/images/cover.jpg")]
#[case::https("https://books.google.com/books/content?id=abc&printsec=frontcover")]
#[case::http("http://covers.openlibrary.org/b/id/240727-M.jpg")]
#[case::protocol_relative("//covers.openlibrary.org/b/id/1-M.jpg")]
#[case::data_uri("data:image/png;base64,iVBORw0KGgo=")]
fn test_kept_unchanged(#[case] input: &str) {
    assert_eq!(get_safe_image_url(Some(input)), input);
}

#[test]
fn test_lookalike_host_is_kept() {
    let url = "https://via.placeholder.com.example.org/cover.jpg";
    assert_eq!(get_safe_image_url(Some(url)), url);
}
