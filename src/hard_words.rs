//! Persisted set of word keys the user flagged as difficult.

use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use log::warn;

use crate::error::Result;
use crate::word_set::HardWordKey;

#[derive(Debug, Default)]
pub struct HardWordStore {
    path: Option<PathBuf>,
    keys: BTreeSet<HardWordKey>,
}

impl HardWordStore {
    /// Opens the store; a missing or corrupt file is an empty set.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let keys = read_keys(&path);
        Self {
            path: Some(path),
            keys,
        }
    }

    pub fn in_memory() -> Self {
        Self::default()
    }

    pub fn contains(&self, key: &HardWordKey) -> bool {
        self.keys.contains(key)
    }

    /// Flips membership and persists. Returns the new membership.
    pub fn toggle(&mut self, key: &HardWordKey) -> bool {
        let now_hard = if self.keys.remove(key) {
            false
        } else {
            self.keys.insert(key.clone());
            true
        };
        if let Err(e) = self.write() {
            warn!("failed to save hard words: {}", e);
        }
        now_hard
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &HardWordKey> {
        self.keys.iter()
    }

    fn write(&self) -> Result<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let keys: Vec<String> = self.keys.iter().map(HardWordKey::to_string).collect();
        fs::write(path, serde_json::to_string(&keys)?)?;
        Ok(())
    }
}

/// Reads the stored keys, skipping entries that do not parse.
fn read_keys(path: &Path) -> BTreeSet<HardWordKey> {
    let Ok(content) = fs::read_to_string(path) else {
        return BTreeSet::new();
    };
    let raw = match serde_json::from_str::<Vec<String>>(&content) {
        Ok(raw) => raw,
        Err(e) => {
            warn!("ignoring corrupt hard-word store {}: {}", path.display(), e);
            return BTreeSet::new();
        }
    };
    raw.iter()
        .filter_map(|entry| match entry.parse() {
            Ok(key) => Some(key),
            Err(e) => {
                warn!("skipping hard-word entry: {}", e);
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggling_twice_restores_membership() {
        let mut store = HardWordStore::in_memory();
        let key = HardWordKey::new("1", "L1", 3);
        assert!(store.toggle(&key));
        assert!(store.contains(&key));
        assert!(!store.toggle(&key));
        assert!(!store.contains(&key));
        assert!(store.is_empty());
    }

    #[test]
    fn flagged_key_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("hard.json");

        let mut store = HardWordStore::open(&path);
        store.toggle(&HardWordKey::new("1", "L1", 0));
        drop(store);

        let raw = fs::read_to_string(&path).unwrap();
        assert_eq!(raw, r#"["1|L1:0"]"#);

        let reopened = HardWordStore::open(&path);
        assert_eq!(
            reopened.keys().collect::<Vec<_>>(),
            vec![&HardWordKey::new("1", "L1", 0)]
        );
    }

    #[test]
    fn corrupt_file_is_treated_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("hard.json");
        fs::write(&path, "{{{").unwrap();

        let store = HardWordStore::open(&path);
        assert_eq!(store.len(), 0);
    }

    #[test]
    fn malformed_entries_are_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("hard.json");
        fs::write(&path, r#"["1|L1:0", "no-bar", "2|L3:x", "2|L3:4"]"#).unwrap();

        let store = HardWordStore::open(&path);
        assert_eq!(store.len(), 2);
        assert!(store.contains(&HardWordKey::new("1", "L1", 0)));
        assert!(store.contains(&HardWordKey::new("2", "L3", 4)));
    }

    #[test]
    fn save_failure_keeps_the_toggle() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("not-a-dir");
        fs::write(&blocker, "").unwrap();

        let mut store = HardWordStore::open(blocker.join("hard.json"));
        let key = HardWordKey::new("1", "L1", 2);
        assert!(store.toggle(&key));
        assert!(store.contains(&key));
        assert!(store.write().is_err());
    }
}
