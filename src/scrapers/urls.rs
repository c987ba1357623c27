//! Absolutizing the root-relative paths the portal emits.

/// Make `path` absolute against `base_origin`.
///
/// Paths that already carry an `http://` or `https://` scheme are returned
/// unchanged. Anything else is appended to `base_origin` as-is, so the origin
/// must not end with a slash when the site's paths start with one. Absent
/// values are handled by the caller with `Option::map`.
pub fn normalize_url(path: &str, base_origin: &str) -> String {
    if has_http_scheme(path) {
        path.to_string()
    } else {
        format!("{base_origin}{path}")
    }
}

/// True if `url` starts with `http://` or `https://`, ignoring ASCII case.
pub fn has_http_scheme(url: &str) -> bool {
    ["http://", "https://"].iter().any(|scheme| {
        url.get(..scheme.len())
            .is_some_and(|prefix| prefix.eq_ignore_ascii_case(scheme))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: &str = "https://odia.krishijagran.com";

    #[test]
    fn test_relative_path_is_prefixed() {
        assert_eq!(
            normalize_url("/news/paddy-procurement", BASE),
            "https://odia.krishijagran.com/news/paddy-procurement"
        );
    }

    #[test]
    fn test_absolute_url_is_unchanged() {
        assert_eq!(
            normalize_url("https://cdn.krishijagran.com/a.jpg", BASE),
            "https://cdn.krishijagran.com/a.jpg"
        );
        assert_eq!(
            normalize_url("HTTP://example.com/x", BASE),
            "HTTP://example.com/x"
        );
    }

    #[test]
    fn test_no_slash_deduplication() {
        assert_eq!(
            normalize_url("news/x", BASE),
            "https://odia.krishijagran.comnews/x"
        );
    }

    #[test]
    fn test_absent_path_stays_absent() {
        let path: Option<&str> = None;
        assert_eq!(path.map(|p| normalize_url(p, BASE)), None);
    }

    #[test]
    fn test_has_http_scheme() {
        assert!(has_http_scheme("https://a"));
        assert!(has_http_scheme("http://a"));
        assert!(!has_http_scheme("ftp://a"));
        assert!(!has_http_scheme("/http://a"));
        assert!(!has_http_scheme("ht"));
    }
}
