//! Image URL sanitising for book covers and blog thumbnails.

use reqwest::Url;

/// Neutral book-cover placeholder, inlined so it never needs a network fetch.
pub const PLACEHOLDER_IMAGE: &str = "data:image/svg+xml;charset=utf-8,%3Csvg xmlns='http://www.w3.org/2000/svg' width='128' height='192' viewBox='0 0 128 192'%3E%3Crect width='128' height='192' fill='%23e5e7eb'/%3E%3Cpath d='M40 64h48v64H40z' fill='none' stroke='%239ca3af' stroke-width='4'/%3E%3C/svg%3E";

/// Host of the retired placeholder service; its URLs no longer resolve.
const DEAD_PLACEHOLDER_HOST: &str = "via.placeholder.com";

/// Returns a URL that is safe to render as an image source.
///
/// Site-relative paths, protocol-relative URLs, and well-formed http(s)/data URLs pass through
/// unchanged. Missing, blank, malformed, or `via.placeholder.com` URLs are
/// replaced with [`PLACEHOLDER_IMAGE`].
pub fn get_safe_image_url(url: Option<&str>) -> String {
    let (original, candidate) = match url {
        Some(u) if !u.trim().is_empty() => (u, u.trim()),
        _ => return PLACEHOLDER_IMAGE.to_string(),
    };

    let parsed = if let Some(rest) = candidate.strip_prefix("//") {
        Url::parse(&format!("https://{}", rest))
    } else if candidate.starts_with('/') {
        return original.to_string();
    } else {
        Url::parse(candidate)
    };

    match parsed {
        Ok(parsed) => {
            let host_is_dead = parsed
                .host_str()
                .map(|h| h.eq_ignore_ascii_case(DEAD_PLACEHOLDER_HOST))
                .unwrap_or(false);
            let scheme_ok = matches!(parsed.scheme(), "http" | "https" | "data");
            if host_is_dead || !scheme_ok {
                PLACEHOLDER_IMAGE.to_string()
            } else {
                original.to_string()
            }
        }
        Err(_) => PLACEHOLDER_IMAGE.to_string(),
    }
}
