//! Per-user configuration directory and persisted settings.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use log::warn;
use serde::{Deserialize, Serialize};

pub fn config_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("vocab-trainer")
}

pub fn settings_file() -> PathBuf {
    config_dir().join("settings.json")
}

pub fn hard_words_file() -> PathBuf {
    config_dir().join("hard-words.json")
}

pub fn analytics_file() -> PathBuf {
    config_dir().join("analytics.jsonl")
}

pub fn log_file() -> PathBuf {
    config_dir().join("vocab.log")
}

pub fn ensure_config_dir() -> io::Result<()> {
    fs::create_dir_all(config_dir())
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub words_path: Option<PathBuf>,
    pub user_id: Option<String>,
    pub analytics: bool,
    pub last_book: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            words_path: None,
            user_id: None,
            analytics: true,
            last_book: None,
        }
    }
}

impl Settings {
    pub fn load() -> Self {
        Self::load_from(&settings_file())
    }

    pub fn load_from(path: &Path) -> Self {
        match fs::read_to_string(path) {
            Ok(content) => serde_json::from_str(&content).unwrap_or_else(|e| {
                warn!("ignoring corrupt settings file {}: {}", path.display(), e);
                Settings::default()
            }),
            Err(_) => Settings::default(),
        }
    }

    pub fn save(&self) {
        let _ = ensure_config_dir();
        self.save_to(&settings_file());
    }

    pub fn save_to(&self, path: &Path) {
        if let Some(parent) = path.parent() {
            let _ = fs::create_dir_all(parent);
        }
        match serde_json::to_string_pretty(self) {
            Ok(content) => {
                if let Err(e) = fs::write(path, content) {
                    warn!("failed to save settings to {}: {}", path.display(), e);
                }
            }
            Err(e) => warn!("failed to encode settings: {}", e),
        }
    }

    /// Returns the anonymous user id, generating one on first use.
    /// The caller is responsible for saving.
    pub fn ensure_user_id(&mut self) -> String {
        self.user_id
            .get_or_insert_with(|| uuid::Uuid::new_v4().to_string())
            .clone()
    }

    /// Resolves the word source: explicit argument, then settings, then
    /// `./words.json`, then the config directory.
    pub fn resolve_words_path(&self, arg: Option<PathBuf>) -> PathBuf {
        if let Some(path) = arg {
            return path;
        }
        if let Some(path) = &self.words_path {
            return path.clone();
        }
        let local = PathBuf::from("words.json");
        if local.exists() {
            return local;
        }
        config_dir().join("words.json")
    }
}

pub fn expand_home(path: &str) -> PathBuf {
    if path.starts_with('~') {
        if let Some(home) = dirs::home_dir() {
            return PathBuf::from(path.replacen('~', &home.to_string_lossy(), 1));
        }
    }
    PathBuf::from(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn corrupt_settings_fall_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, "{ not json").unwrap();

        let settings = Settings::load_from(&path);
        assert!(settings.analytics);
        assert!(settings.user_id.is_none());
    }

    #[test]
    fn user_id_is_generated_once_and_persisted() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("settings.json");

        let mut settings = Settings::default();
        let id = settings.ensure_user_id();
        assert_eq!(settings.ensure_user_id(), id);
        settings.last_book = Some("2".to_string());
        settings.save_to(&path);

        let reloaded = Settings::load_from(&path);
        assert_eq!(reloaded.user_id.as_deref(), Some(id.as_str()));
        assert_eq!(reloaded.last_book.as_deref(), Some("2"));
    }

    #[test]
    fn explicit_words_path_wins() {
        let settings = Settings {
            words_path: Some(PathBuf::from("/tmp/from-settings.json")),
            ..Default::default()
        };
        assert_eq!(
            settings.resolve_words_path(Some(PathBuf::from("cli.json"))),
            PathBuf::from("cli.json")
        );
        assert_eq!(
            settings.resolve_words_path(None),
            PathBuf::from("/tmp/from-settings.json")
        );
    }
}
