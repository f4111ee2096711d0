use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use serde_json::Value;
use vocaboo_config::Config;

pub const PROFILE_FILE: &str = "config.json";

pub fn profile_path(data_dir: &Path) -> PathBuf {
    data_dir.join(PROFILE_FILE)
}

/// Keys whose defaults come from the environment. The generated profile
/// leaves them out so the environment keeps deciding until the user names them.
const ENV_KEYS: &[&str] = &[
    "/storage/data_dir",
    "/trainer/advance_delay_ms",
    "/translator/debounce_ms",
    "/images/provider",
    "/images/api_key",
    "/images/timeout_ms",
    "/log_json",
];

/// Load `config.json` from the data dir, creating it on first run.
///
/// The environment supplies the defaults and decides where the data dir is.
/// The file overrides only the keys it names.
pub fn load_config(data_dir_override: Option<&Path>) -> anyhow::Result<Config> {
    let mut env_config = Config::new();
    if let Some(dir) = data_dir_override {
        env_config.storage.data_dir = dir.to_path_buf();
    }

    let data_dir = env_config.storage.data_dir.clone();
    fs::create_dir_all(&data_dir)
        .with_context(|| format!("Failed to create data dir {}", data_dir.display()))?;

    let path = profile_path(&data_dir);
    if !path.exists() {
        init_profile(&path, &env_config)?;
    }

    let data = fs::read_to_string(&path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let profile: Value = serde_json::from_str(&data)
        .with_context(|| format!("Invalid profile {}", path.display()))?;

    let mut merged = serde_json::to_value(&env_config)?;
    merge(&mut merged, profile);
    let mut config: Config = serde_json::from_value(merged)
        .with_context(|| format!("Invalid profile {}", path.display()))?;

    config.storage.data_dir = data_dir;
    // keys stay in the environment unless the profile sets one
    if config.images.api_key.trim().is_empty() {
        config.images.api_key = env_config.images.api_key;
    }

    Ok(config)
}

fn init_profile(path: &Path, config: &Config) -> anyhow::Result<()> {
    let mut stored = serde_json::to_value(config)?;
    for pointer in ENV_KEYS {
        remove_pointer(&mut stored, pointer);
    }

    fs::write(path, serde_json::to_string_pretty(&stored)?)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    tracing::info!("Created profile at {}", path.display());
    Ok(())
}

/// Deep merge: objects merge key by key, anything else in `overlay` replaces `base`.
fn merge(base: &mut Value, overlay: Value) {
    match (base, overlay) {
        (Value::Object(base), Value::Object(overlay)) => {
            for (key, value) in overlay {
                match base.get_mut(&key) {
                    Some(slot) => merge(slot, value),
                    None => {
                        base.insert(key, value);
                    }
                }
            }
        }
        (slot, value) => *slot = value,
    }
}

fn remove_pointer(value: &mut Value, pointer: &str) {
    let Some((parent, key)) = pointer.rsplit_once('/') else {
        return;
    };
    if let Some(object) = value.pointer_mut(parent).and_then(Value::as_object_mut) {
        object.remove(key);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_run_writes_profile() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_config(Some(dir.path())).unwrap();

        assert_eq!(config.storage.data_dir, dir.path());
        let written = fs::read_to_string(profile_path(dir.path())).unwrap();
        assert!(written.contains("ruen_words_v1"));
        assert!(written.contains("max_distractors"));
        for key in ["advance_delay_ms", "debounce_ms", "timeout_ms", "api_key", "data_dir", "log_json"] {
            assert!(!written.contains(key), "{key} should stay with the environment");
        }
    }

    #[test]
    fn environment_defaults_survive_the_first_run() {
        let dir = tempfile::tempdir().unwrap();
        load_config(Some(dir.path())).unwrap();

        // second run reads the generated profile
        let config = load_config(Some(dir.path())).unwrap();
        let env = Config::new();
        assert_eq!(config.trainer.advance_delay_ms, env.trainer.advance_delay_ms);
        assert_eq!(config.translator.debounce_ms, env.translator.debounce_ms);
        assert_eq!(config.images.timeout_ms, env.images.timeout_ms);
        assert_eq!(config.log_json, env.log_json);
    }

    #[test]
    fn profile_section_keeps_environment_values_for_unnamed_keys() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            profile_path(dir.path()),
            r#"{ "trainer": { "max_distractors": 5 }, "images": { "enabled": false } }"#,
        )
        .unwrap();

        let config = load_config(Some(dir.path())).unwrap();
        let env = Config::new();
        assert_eq!(config.trainer.max_distractors, 5);
        assert_eq!(config.trainer.advance_delay_ms, env.trainer.advance_delay_ms);
        assert!(!config.images.enabled);
        assert_eq!(config.images.timeout_ms, env.images.timeout_ms);
        assert_eq!(config.images.provider, env.images.provider);
    }

    #[test]
    fn merge_replaces_leaves_and_recurses_into_objects() {
        let mut base = serde_json::json!({ "a": { "x": 1, "y": 2 }, "b": [1, 2] });
        merge(&mut base, serde_json::json!({ "a": { "y": 3 }, "b": [], "c": true }));
        assert_eq!(base, serde_json::json!({ "a": { "x": 1, "y": 3 }, "b": [], "c": true }));
    }

    #[test]
    fn profile_overrides_only_named_keys() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            profile_path(dir.path()),
            r#"{ "trainer": { "advance_delay_ms": 50 }, "storage": { "data_dir": "/elsewhere" } }"#,
        )
        .unwrap();

        let config = load_config(Some(dir.path())).unwrap();
        assert_eq!(config.trainer.advance_delay_ms, 50);
        assert_eq!(config.trainer.max_distractors, 3);
        assert_eq!(config.storage.data_dir, dir.path());
    }

    #[test]
    fn broken_profile_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(profile_path(dir.path()), "{ not json").unwrap();
        assert!(load_config(Some(dir.path())).is_err());
    }
}
