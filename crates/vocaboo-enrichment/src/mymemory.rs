use std::collections::HashSet;
use std::time::Duration;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::{EnrichError, ProviderMetadata, TranslationProvider, cancellable, http_client};

const QUOTES: &[char] = &['"', '\'', '«', '»', '„', '“', '”'];
const PUNCTUATION: &[char] = &['.', ',', '!', '?', ';', ':', '/', '(', ')', '[', ']', '{', '}'];
const MAX_WORD_LEN: usize = 24;
const MIN_MATCH: f64 = 0.3;
const MIN_QUALITY: f64 = 40.0;

/// MyMemory translation memory lookup.
#[derive(Clone)]
pub struct MyMemoryTranslator {
    client: reqwest::Client,
    api_url: String,
    max_candidates: usize,
}

impl MyMemoryTranslator {
    pub fn new(api_url: String, max_candidates: usize, timeout: Duration) -> Self {
        Self {
            client: http_client(timeout),
            api_url,
            max_candidates,
        }
    }

    async fn request(&self, query: &str, from: &str, to: &str) -> Result<Vec<String>, EnrichError> {
        let langpair = format!("{}|{}", from, to);
        let params = [("q", query), ("langpair", langpair.as_str()), ("of", "json")];

        let response = self.client.get(&self.api_url).query(&params).send().await?;
        if !response.status().is_success() {
            return Err(EnrichError::from_status(response.status()));
        }

        let json: serde_json::Value = response
            .json()
            .await
            .map_err(|e| EnrichError::Malformed(format!("Failed to parse response: {}", e)))?;

        Ok(rank_candidates(&json, query, to, self.max_candidates))
    }
}

#[async_trait]
impl TranslationProvider for MyMemoryTranslator {
    async fn suggest(
        &self,
        query: &str,
        from: &str,
        to: &str,
        cancel: &CancellationToken,
    ) -> Result<Vec<String>, EnrichError> {
        let query = query.trim();
        if query.is_empty() {
            return Ok(Vec::new());
        }

        cancellable(cancel, self.request(query, from, to)).await
    }

    fn metadata(&self) -> ProviderMetadata {
        ProviderMetadata {
            name: "MyMemory".to_string(),
        }
    }
}

#[derive(Debug, Clone)]
struct Candidate {
    text: String,
    match_score: f64,
    quality: f64,
}

/// Turn a MyMemory response into an ordered list of suggestions.
pub fn rank_candidates(json: &serde_json::Value, query: &str, to: &str, limit: usize) -> Vec<String> {
    let single_word = !query.trim().chars().any(char::is_whitespace);
    let mut candidates = Vec::new();

    if let Some(text) = json["responseData"]["translatedText"].as_str() {
        push_candidate(&mut candidates, text, 1.0, 100.0, single_word);
    }

    if let Some(matches) = json["matches"].as_array() {
        for m in matches {
            let Some(text) = m["translation"].as_str() else {
                continue;
            };
            // non-numeric scores count as zero
            let match_score = m["match"].as_f64().unwrap_or(0.0);
            let quality = m["quality"].as_f64().unwrap_or(0.0);
            push_candidate(&mut candidates, text, match_score, quality, single_word);
        }
    }

    let mut seen = HashSet::new();
    let mut ranked: Vec<(f64, Candidate)> = candidates
        .into_iter()
        .filter(|c| seen.insert(c.text.to_lowercase()))
        .filter(|c| c.match_score >= MIN_MATCH || c.quality >= MIN_QUALITY)
        .map(|c| (score(&c, to), c))
        .collect();

    ranked.sort_by(|a, b| b.0.total_cmp(&a.0));

    ranked.into_iter().map(|(_, c)| c.text).take(limit).collect()
}

fn push_candidate(
    candidates: &mut Vec<Candidate>,
    raw: &str,
    match_score: f64,
    quality: f64,
    single_word: bool,
) {
    let trimmed = raw.trim().trim_matches(QUOTES);
    let text = trimmed.split_whitespace().collect::<Vec<_>>().join(" ");
    if text.is_empty() {
        return;
    }

    if single_word
        && (text.contains(' ') || text.contains(PUNCTUATION) || text.chars().count() > MAX_WORD_LEN)
    {
        return;
    }

    candidates.push(Candidate {
        text,
        match_score,
        quality,
    });
}

fn score(candidate: &Candidate, to: &str) -> f64 {
    let len = candidate.text.chars().count();
    let mut score = candidate.match_score * 2.0 + candidate.quality / 100.0;

    if to == "en"
        && candidate
            .text
            .chars()
            .all(|c| c.is_ascii_alphabetic() || c == '-')
    {
        score += 0.25;
    }
    if (2..=16).contains(&len) {
        score += 0.1;
    }
    if len > MAX_WORD_LEN {
        score -= 0.5;
    }

    score
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn main_translation_and_matches_are_ranked() {
        let body = json!({
            "responseData": { "translatedText": "cat" },
            "matches": [
                { "translation": "tomcat", "match": 0.8, "quality": 70 },
                { "translation": "Cat", "match": 0.99, "quality": 80 },
                { "translation": "kitty", "match": 0.5, "quality": 0 },
                { "translation": "feline", "match": 0.1, "quality": 10 }
            ]
        });

        let ranked = rank_candidates(&body, "кот", "en", 10);
        assert_eq!(ranked, vec!["cat", "tomcat", "kitty"]);
    }

    #[test]
    fn single_word_queries_drop_phrases_and_punctuation() {
        let body = json!({
            "responseData": { "translatedText": "«dog»" },
            "matches": [
                { "translation": "a dog", "match": 1, "quality": 100 },
                { "translation": "dog!", "match": 1, "quality": 100 },
                { "translation": "hound", "match": 0.7, "quality": 70 },
                { "translation": "abcdefghijklmnopqrstuvwxyz", "match": 1, "quality": 100 }
            ]
        });

        let ranked = rank_candidates(&body, "собака", "en", 10);
        assert_eq!(ranked, vec!["dog", "hound"]);
    }

    #[test]
    fn phrase_queries_keep_phrases_and_collapse_whitespace() {
        let body = json!({
            "responseData": { "translatedText": "  ice   cream " },
            "matches": []
        });

        let ranked = rank_candidates(&body, "мороженое пломбир", "en", 10);
        assert_eq!(ranked, vec!["ice cream"]);
    }

    #[test]
    fn string_scores_count_as_zero() {
        let body = json!({
            "matches": [
                { "translation": "bird", "match": 0.2, "quality": "74" },
                { "translation": "fowl", "match": 0.31, "quality": "74" }
            ]
        });

        assert_eq!(rank_candidates(&body, "птица", "en", 10), vec!["fowl"]);
    }

    #[test]
    fn respects_limit_and_empty_responses() {
        let matches: Vec<_> = (0..15)
            .map(|i| json!({ "translation": format!("word{i}"), "match": 1, "quality": 100 }))
            .collect();
        let body = json!({ "matches": matches });

        assert_eq!(rank_candidates(&body, "слово", "en", 10).len(), 10);
        assert!(rank_candidates(&json!({}), "слово", "en", 10).is_empty());
    }
}
