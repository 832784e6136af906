//! Cursor extraction from Shopify's `Link` response header.
//!
//! Shopify paginates REST listings with headers like:
//!
//! ```text
//! <https://shop.myshopify.com/admin/api/2024-10/orders.json?limit=250&page_info=abc>; rel="previous",
//! <https://shop.myshopify.com/admin/api/2024-10/orders.json?limit=250&page_info=def>; rel="next"
//! ```

use url::Url;

/// The `page_info` cursor of the `rel="next"` entry, if any.
#[must_use]
pub fn next_page_info(link_header: &str) -> Option<String> {
    link_header
        .split(',')
        .filter_map(parse_link)
        .find(|(_, rel)| rel.eq_ignore_ascii_case("next"))
        .and_then(|(url, _)| {
            url.query_pairs()
                .find(|(key, _)| key == "page_info")
                .map(|(_, value)| value.into_owned())
        })
        .filter(|cursor| !cursor.is_empty())
}

/// Split one `<url>; rel="..."` entry into its URL and relation.
fn parse_link(entry: &str) -> Option<(Url, String)> {
    let mut parts = entry.split(';');
    let target = parts.next()?.trim();
    let target = target.strip_prefix('<')?.strip_suffix('>')?;
    let url = Url::parse(target).ok()?;

    let rel = parts.find_map(|param| {
        let (key, value) = param.split_once('=')?;
        key.trim()
            .eq_ignore_ascii_case("rel")
            .then(|| value.trim().trim_matches('"').to_string())
    })?;

    Some((url, rel))
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: &str = "https://shop.myshopify.com/admin/api/2024-10/orders.json";

    #[test]
    fn test_next_only() {
        let header = format!(r#"<{BASE}?limit=250&page_info=abc123>; rel="next""#);
        assert_eq!(next_page_info(&header).as_deref(), Some("abc123"));
    }

    #[test]
    fn test_previous_and_next() {
        let header = format!(
            r#"<{BASE}?limit=250&page_info=prev1>; rel="previous", <{BASE}?limit=250&page_info=next2>; rel="next""#
        );
        assert_eq!(next_page_info(&header).as_deref(), Some("next2"));
    }

    #[test]
    fn test_previous_only_means_last_page() {
        let header = format!(r#"<{BASE}?limit=250&page_info=prev1>; rel="previous""#);
        assert_eq!(next_page_info(&header), None);
    }

    #[test]
    fn test_cursor_is_percent_decoded() {
        let header = format!(r#"<{BASE}?page_info=eyJ%3D%3D&limit=50>; rel="next""#);
        assert_eq!(next_page_info(&header).as_deref(), Some("eyJ=="));
    }

    #[test]
    fn test_garbage_is_ignored() {
        assert_eq!(next_page_info(""), None);
        assert_eq!(next_page_info("not a link header"), None);
        assert_eq!(next_page_info(r#"<not a url>; rel="next""#), None);
        assert_eq!(next_page_info(&format!(r#"<{BASE}?limit=250>; rel="next""#)), None);
    }
}
