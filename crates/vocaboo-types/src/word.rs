use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Opaque word identifier.
///
/// New words get a uuid v4, but any string is accepted on load so older
/// exports with ids like `id-k3j5h2a9q` keep working.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WordId(String);

impl WordId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for WordId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for WordId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl fmt::Display for WordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Per-word answer counters.
///
/// `seen == correct + wrong` holds after every recorded answer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordStats {
    #[serde(default)]
    pub seen: u32,
    #[serde(default)]
    pub correct: u32,
    #[serde(default)]
    pub wrong: u32,
}

impl WordStats {
    pub fn record(&mut self, correct: bool) {
        self.seen += 1;
        if correct {
            self.correct += 1;
        } else {
            self.wrong += 1;
        }
    }

    pub fn is_consistent(&self) -> bool {
        self.seen == self.correct + self.wrong
    }
}

/// A source/target word pair as stored in the vocabulary.
///
/// The `ru`/`en` aliases accept older exports keyed by language.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WordPair {
    pub id: WordId,
    #[serde(alias = "ru")]
    pub source: String,
    #[serde(alias = "en")]
    pub target: String,
    #[serde(default)]
    pub stats: WordStats,
}

impl WordPair {
    pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            id: WordId::generate(),
            source: source.into(),
            target: target.into(),
            stats: WordStats::default(),
        }
    }
}
