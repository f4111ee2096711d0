use reqwest::Url;

/// Only absolute `http`/`https` URLs are accepted from providers.
pub fn is_valid_http_url(candidate: &str) -> bool {
    let candidate = candidate.trim();
    if candidate.is_empty() {
        return false;
    }

    match Url::parse(candidate) {
        Ok(url) => matches!(url.scheme(), "http" | "https") && url.host_str().is_some(),
        Err(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_http_and_https() {
        assert!(is_valid_http_url("https://upload.wikimedia.org/a.jpg"));
        assert!(is_valid_http_url(" http://example.com/cat.png "));
    }

    #[test]
    fn rejects_other_schemes_and_garbage() {
        assert!(!is_valid_http_url("javascript:alert(1)"));
        assert!(!is_valid_http_url("data:image/png;base64,AAAA"));
        assert!(!is_valid_http_url("file:///etc/passwd"));
        assert!(!is_valid_http_url("//example.com/cat.png"));
        assert!(!is_valid_http_url("not a url"));
        assert!(!is_valid_http_url(""));
    }
}
