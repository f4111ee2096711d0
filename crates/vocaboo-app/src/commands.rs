use std::fmt::Write;

use vocaboo_config::Config;
use vocaboo_core::{FoldingNormalizer, ProgressStore, VocabularyStore, add_unique};
use vocaboo_types::WordPair;

use crate::store::JsonFileStore;

/// `vocaboo add`: store a new pair unless an equal one exists.
pub fn add_word(config: &Config, source: &str, target: &str) -> anyhow::Result<bool> {
    let (source, target) = (source.trim(), target.trim());
    if source.is_empty() || target.is_empty() {
        anyhow::bail!("Both the word and its translation are required");
    }

    let mut store = JsonFileStore::open(&config.storage)?;
    let normalizer = FoldingNormalizer::from_config(&config.normalization);

    let added = add_unique(&mut store, &normalizer, WordPair::new(source, target))?;
    if added {
        tracing::info!(source, target, "Word added");
    }
    Ok(added)
}

/// `vocaboo stats`: overall progress followed by one line per word.
pub fn stats_report(config: &Config) -> anyhow::Result<String> {
    let store = JsonFileStore::open(&config.storage)?;
    let words = store.get_all()?;
    let progress = ProgressStore::get(&store)?;

    let mut out = String::new();
    writeln!(
        out,
        "Answered: {}  Accuracy: {}%  Streak: {}",
        progress.total_answered,
        progress.accuracy_percent(),
        progress.streak
    )?;
    writeln!(out, "Words: {}", words.len())?;

    for word in &words {
        writeln!(
            out,
            "  {} -> {}  seen {} / correct {} / wrong {}",
            word.source, word.target, word.stats.seen, word.stats.correct, word.stats.wrong
        )?;
    }

    Ok(out)
}
