use std::time::Duration;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::url::is_valid_http_url;
use crate::{EnrichError, ImageProvider, ProviderMetadata, cancellable, http_client};

const DEFAULT_API_URL: &str = "https://api.pexels.com/v1/search";

/// Pexels photo search, needs an API key.
#[derive(Clone)]
pub struct PexelsImages {
    client: reqwest::Client,
    api_key: String,
    api_url: String,
}

impl PexelsImages {
    pub fn new(api_key: String, api_url: String, timeout: Duration) -> Self {
        let api_url = if api_url.trim().is_empty() {
            DEFAULT_API_URL.to_string()
        } else {
            api_url
        };

        Self {
            client: http_client(timeout),
            api_key,
            api_url,
        }
    }

    async fn request(&self, term: &str) -> Result<Option<String>, EnrichError> {
        let params = [("query", term), ("per_page", "1"), ("orientation", "square")];

        let response = self
            .client
            .get(&self.api_url)
            .header("Authorization", &self.api_key)
            .query(&params)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(EnrichError::from_status(response.status()));
        }

        let json: serde_json::Value = response
            .json()
            .await
            .map_err(|e| EnrichError::Malformed(format!("Failed to parse response: {}", e)))?;

        Ok(first_photo(&json))
    }
}

/// Largest usable rendition of the first photo
fn first_photo(json: &serde_json::Value) -> Option<String> {
    let src = &json["photos"].get(0)?["src"];

    ["large", "medium", "original"]
        .iter()
        .filter_map(|size| src[*size].as_str())
        .find(|url| !url.trim().is_empty())
        .filter(|url| is_valid_http_url(url))
        .map(str::to_string)
}

#[async_trait]
impl ImageProvider for PexelsImages {
    async fn fetch_image(
        &self,
        word: &str,
        cancel: &CancellationToken,
    ) -> Result<Option<String>, EnrichError> {
        let term = word.trim();
        if term.is_empty() {
            return Ok(None);
        }
        if self.api_key.is_empty() {
            return Err(EnrichError::AuthenticationError);
        }

        cancellable(cancel, self.request(term)).await
    }

    fn metadata(&self) -> ProviderMetadata {
        ProviderMetadata {
            name: "Pexels".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn prefers_large_then_medium_then_original() {
        let body = json!({ "photos": [{ "src": {
            "large": "https://images.pexels.com/large.jpg",
            "medium": "https://images.pexels.com/medium.jpg"
        }}]});
        assert_eq!(first_photo(&body).as_deref(), Some("https://images.pexels.com/large.jpg"));

        let body = json!({ "photos": [{ "src": { "original": "https://images.pexels.com/o.jpg" }}]});
        assert_eq!(first_photo(&body).as_deref(), Some("https://images.pexels.com/o.jpg"));
    }

    #[test]
    fn missing_or_invalid_photos_yield_none() {
        assert_eq!(first_photo(&json!({ "photos": [] })), None);
        assert_eq!(first_photo(&json!({ "error": "bad key" })), None);
        assert_eq!(
            first_photo(&json!({ "photos": [{ "src": { "large": "data:image/png;base64,AA" }}]})),
            None
        );
    }
}
