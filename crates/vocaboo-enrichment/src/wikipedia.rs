use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use tokio_util::sync::CancellationToken;

use crate::url::is_valid_http_url;
use crate::{EnrichError, ImageProvider, ProviderMetadata, cancellable, http_client};

const DEFAULT_API_URL: &str = "https://en.wikipedia.org/w/api.php";
const THUMB_SIZE: &str = "600";

/// Page thumbnails from a Wikipedia full-text search. No key required.
#[derive(Clone)]
pub struct WikipediaImages {
    client: reqwest::Client,
    api_url: String,
}

impl WikipediaImages {
    pub fn new(api_url: String, timeout: Duration) -> Self {
        let api_url = if api_url.trim().is_empty() {
            DEFAULT_API_URL.to_string()
        } else {
            api_url
        };

        Self {
            client: http_client(timeout),
            api_url,
        }
    }

    async fn request(&self, term: &str) -> Result<Option<String>, EnrichError> {
        let params = [
            ("action", "query"),
            ("prop", "pageimages"),
            ("piprop", "thumbnail"),
            ("pithumbsize", THUMB_SIZE),
            ("format", "json"),
            ("generator", "search"),
            ("gsrsearch", term),
        ];

        let response = self.client.get(&self.api_url).query(&params).send().await?;
        if !response.status().is_success() {
            return Err(EnrichError::from_status(response.status()));
        }

        let body: SearchResponse = response
            .json()
            .await
            .map_err(|e| EnrichError::Malformed(e.to_string()))?;

        Ok(best_thumbnail(body))
    }
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    query: Option<SearchQuery>,
}

#[derive(Debug, Deserialize)]
struct SearchQuery {
    #[serde(default)]
    pages: HashMap<String, Page>,
}

#[derive(Debug, Deserialize)]
struct Page {
    #[serde(default)]
    pageid: u64,
    /// Search rank, 1 is the best hit
    index: Option<u32>,
    thumbnail: Option<Thumbnail>,
}

#[derive(Debug, Deserialize)]
struct Thumbnail {
    source: String,
}

/// Thumbnail of the best ranked page that has one
fn best_thumbnail(response: SearchResponse) -> Option<String> {
    let mut pages: Vec<Page> = response.query?.pages.into_values().collect();
    pages.sort_by_key(|p| (p.index.unwrap_or(u32::MAX), p.pageid));

    pages
        .into_iter()
        .filter_map(|p| p.thumbnail)
        .map(|t| t.source)
        .next()
        .filter(|src| is_valid_http_url(src))
}

#[async_trait]
impl ImageProvider for WikipediaImages {
    async fn fetch_image(
        &self,
        word: &str,
        cancel: &CancellationToken,
    ) -> Result<Option<String>, EnrichError> {
        let term = word.trim();
        if term.is_empty() {
            return Ok(None);
        }

        cancellable(cancel, self.request(term)).await
    }

    fn metadata(&self) -> ProviderMetadata {
        ProviderMetadata {
            name: "Wikipedia".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> SearchResponse {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn picks_best_ranked_page_with_thumbnail() {
        let response = parse(
            r#"{"query":{"pages":{
                "10":{"pageid":10,"index":3,"thumbnail":{"source":"https://upload.wikimedia.org/c.jpg"}},
                "20":{"pageid":20,"index":1},
                "30":{"pageid":30,"index":2,"thumbnail":{"source":"https://upload.wikimedia.org/b.jpg"}}
            }}}"#,
        );
        assert_eq!(
            best_thumbnail(response).as_deref(),
            Some("https://upload.wikimedia.org/b.jpg")
        );
    }

    #[test]
    fn no_pages_or_no_thumbnails_yield_none() {
        assert_eq!(best_thumbnail(parse(r#"{"batchcomplete":""}"#)), None);
        assert_eq!(
            best_thumbnail(parse(r#"{"query":{"pages":{"1":{"pageid":1,"index":1}}}}"#)),
            None
        );
    }

    #[test]
    fn untrusted_scheme_is_dropped() {
        let response = parse(
            r#"{"query":{"pages":{"1":{"pageid":1,"index":1,"thumbnail":{"source":"ftp://x/y.jpg"}}}}}"#,
        );
        assert_eq!(best_thumbnail(response), None);
    }

    #[tokio::test]
    async fn blank_word_skips_the_request() {
        let provider = WikipediaImages::new("http://127.0.0.1:9/unreachable".into(), Duration::from_millis(50));
        let result = provider.fetch_image("   ", &CancellationToken::new()).await;
        assert!(matches!(result, Ok(None)));
    }
}
