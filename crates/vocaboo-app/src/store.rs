use std::fs::{self, File, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde::de::DeserializeOwned;
use vocaboo_config::storage::StorageConfig;
use vocaboo_core::{ProgressStore, StoreError, VocabularyStore};
use vocaboo_types::{ProgressAggregate, WordId, WordPair, WordStats};

const LOCK_FILE: &str = ".vocaboo.lock";

/// Key-value store with one JSON document per key, `<data_dir>/<key>.json`.
///
/// Every call reads or writes the file, so separate processes see each
/// other's changes. Updates hold an exclusive lock on the data dir for the
/// whole read-modify-write and land through a uniquely named temp file.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    dir: PathBuf,
    words_key: String,
    progress_key: String,
}

impl JsonFileStore {
    pub fn open(config: &StorageConfig) -> Result<Self, StoreError> {
        fs::create_dir_all(&config.data_dir)?;
        Ok(Self {
            dir: config.data_dir.clone(),
            words_key: config.words_key.clone(),
            progress_key: config.progress_key.clone(),
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }

    fn read<T: DeserializeOwned + Default>(&self, key: &str) -> Result<T, StoreError> {
        match fs::read_to_string(self.path(key)) {
            Ok(data) if data.trim().is_empty() => Ok(T::default()),
            Ok(data) => Ok(serde_json::from_str(&data)?),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(T::default()),
            Err(e) => Err(e.into()),
        }
    }

    fn write<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<(), StoreError> {
        let mut tmp = tempfile::NamedTempFile::new_in(&self.dir)?;
        tmp.write_all(&serde_json::to_vec_pretty(value)?)?;
        tmp.as_file().sync_all()?;
        tmp.persist(self.path(key)).map_err(|e| e.error)?;
        Ok(())
    }

    /// Exclusive lock over the data dir, released when the file is dropped.
    fn lock(&self) -> Result<File, StoreError> {
        let file = OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(self.dir.join(LOCK_FILE))?;
        file.lock()?;
        Ok(file)
    }

    /// Read the word list, apply `update`, and write it back if it asks to.
    fn update_words<R>(
        &self,
        update: impl FnOnce(&mut Vec<WordPair>) -> Result<(R, bool), StoreError>,
    ) -> Result<R, StoreError> {
        let _lock = self.lock()?;
        let mut words: Vec<WordPair> = self.read(&self.words_key)?;
        let (result, changed) = update(&mut words)?;
        if changed {
            self.write(&self.words_key, &words)?;
        }
        Ok(result)
    }
}

impl VocabularyStore for JsonFileStore {
    fn get_all(&self) -> Result<Vec<WordPair>, StoreError> {
        self.read(&self.words_key)
    }

    fn upsert(&mut self, word: WordPair) -> Result<(), StoreError> {
        self.update_words(|words| {
            match words.iter_mut().find(|w| w.id == word.id) {
                Some(existing) => *existing = word,
                None => words.insert(0, word),
            }
            Ok(((), true))
        })
    }

    fn remove(&mut self, id: &WordId) -> Result<bool, StoreError> {
        self.update_words(|words| {
            let before = words.len();
            words.retain(|w| w.id != *id);
            let removed = words.len() != before;
            Ok((removed, removed))
        })
    }

    fn patch_stats(&mut self, id: &WordId, stats: WordStats) -> Result<(), StoreError> {
        self.update_words(|words| {
            let word = words
                .iter_mut()
                .find(|w| w.id == *id)
                .ok_or_else(|| StoreError::NotFound(id.clone()))?;
            word.stats = stats;
            Ok(((), true))
        })
    }
}

impl ProgressStore for JsonFileStore {
    fn get(&self) -> Result<ProgressAggregate, StoreError> {
        self.read(&self.progress_key)
    }

    fn set(&mut self, progress: &ProgressAggregate) -> Result<(), StoreError> {
        let _lock = self.lock()?;
        self.write(&self.progress_key, progress)
    }
}
