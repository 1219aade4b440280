//! Persisted stores: label cache and banned-property ledger
//!
//! Both stores are single JSON documents rewritten wholesale on each
//! mutation batch, using a write-to-tmp-then-rename cycle so a crash
//! mid-write never leaves a truncated document behind. There is no
//! cross-process coordination; concurrent processes sharing the same
//! files may race (accepted limitation).

use crate::error::Result;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// On-disk shape of the label cache: the no-label set under a reserved
/// key, every other key a resolved identifier → label entry.
#[derive(Debug, Default, Serialize, Deserialize)]
struct LabelStoreFile {
    #[serde(default)]
    no_label_elements: Vec<String>,
    #[serde(flatten)]
    labels: HashMap<String, String>,
}

/// On-disk shape of the banned-property ledger.
#[derive(Debug, Default, Serialize, Deserialize)]
struct BanLedgerFile {
    #[serde(default)]
    banned_properties: Vec<String>,
}

/// Identifier → label cache plus the set of identifiers known to have
/// no label. Loaded once at startup, flushed after each resolution batch.
#[derive(Debug)]
pub struct LabelStore {
    path: PathBuf,
    labels: HashMap<String, String>,
    no_label: HashSet<String>,
}

impl LabelStore {
    /// Load the store from `path`, creating an empty document when the
    /// file does not exist yet.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let file: LabelStoreFile = load_or_init(&path)?;
        let store = Self {
            path,
            no_label: file.no_label_elements.into_iter().collect(),
            labels: file.labels,
        };
        info!(
            path = %store.path.display(),
            labels = store.labels.len(),
            no_label = store.no_label.len(),
            "label store loaded"
        );
        Ok(store)
    }

    pub fn get(&self, id: &str) -> Option<&str> {
        self.labels.get(id).map(|s| s.as_str())
    }

    pub fn has_no_label(&self, id: &str) -> bool {
        self.no_label.contains(id)
    }

    pub fn insert(&mut self, id: impl Into<String>, label: impl Into<String>) {
        self.labels.insert(id.into(), label.into());
    }

    pub fn mark_no_label(&mut self, id: impl Into<String>) {
        self.no_label.insert(id.into());
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn no_label_len(&self) -> usize {
        self.no_label.len()
    }

    /// Rewrite the persisted document from the in-memory state.
    pub fn flush(&self) -> Result<()> {
        let mut no_label_elements: Vec<String> = self.no_label.iter().cloned().collect();
        no_label_elements.sort();
        let file = LabelStoreFile {
            no_label_elements,
            labels: self.labels.clone(),
        };
        write_json_atomic(&self.path, &file)?;
        debug!(path = %self.path.display(), labels = self.labels.len(), "label store flushed");
        Ok(())
    }
}

/// Persisted set of properties permanently excluded because their
/// resolved label matched the banned-word denylist.
#[derive(Debug)]
pub struct BanLedger {
    path: PathBuf,
    banned: HashSet<String>,
    words: Vec<String>,
}

impl BanLedger {
    /// Load the ledger from `path` (created empty when absent) with the
    /// statically configured banned words. Matching is case-insensitive,
    /// so words are lowercased up front.
    pub fn open(path: impl Into<PathBuf>, words: impl IntoIterator<Item = String>) -> Result<Self> {
        let path = path.into();
        let file: BanLedgerFile = load_or_init(&path)?;
        let ledger = Self {
            path,
            banned: file.banned_properties.into_iter().collect(),
            words: words.into_iter().map(|w| w.to_lowercase()).collect(),
        };
        info!(
            path = %ledger.path.display(),
            banned = ledger.banned.len(),
            words = ledger.words.len(),
            "ban ledger loaded"
        );
        Ok(ledger)
    }

    pub fn is_banned(&self, property: &str) -> bool {
        self.banned.contains(property)
    }

    pub fn len(&self) -> usize {
        self.banned.len()
    }

    pub fn is_empty(&self) -> bool {
        self.banned.is_empty()
    }

    /// Snapshot of the banned property ids, for the claim filter.
    pub fn banned_snapshot(&self) -> HashSet<String> {
        self.banned.clone()
    }

    /// Check a resolved property label against the denylist.
    ///
    /// Returns `true` when the property is admissible. On the first
    /// banned-word hit the property id is recorded and the ledger is
    /// persisted immediately, so a ban discovered mid-request survives a
    /// crash on the next claim. A persistence failure is logged and does
    /// not fail the request.
    pub fn check_label(&mut self, label: &str, property: &str) -> bool {
        let label = label.to_lowercase();
        for word in &self.words {
            if label.contains(word.as_str()) {
                info!(property, word = %word, "property banned by label");
                self.banned.insert(property.to_string());
                if let Err(e) = self.flush() {
                    tracing::warn!(property, error = %e, "failed to persist ban ledger");
                }
                return false;
            }
        }
        true
    }

    fn flush(&self) -> Result<()> {
        let mut banned_properties: Vec<String> = self.banned.iter().cloned().collect();
        banned_properties.sort();
        write_json_atomic(&self.path, &BanLedgerFile { banned_properties })
    }
}

/// Read a JSON document, writing an empty one first when the file is
/// missing (so the store files always exist after startup).
fn load_or_init<T: Serialize + DeserializeOwned + Default>(path: &Path) -> Result<T> {
    if path.exists() {
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    } else {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let empty = T::default();
        write_json_atomic(path, &empty)?;
        Ok(empty)
    }
}

/// Write a JSON file atomically (write to .tmp then rename).
fn write_json_atomic<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let tmp = path.with_extension("tmp");
    let json = serde_json::to_string_pretty(value)?;
    std::fs::write(&tmp, json)?;
    std::fs::rename(&tmp, path)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn label_store_round_trips_through_disk() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("labels_map.json");

        let mut store = LabelStore::open(&path).unwrap();
        store.insert("Q2", "class");
        store.mark_no_label("Q999");
        store.flush().unwrap();

        let reloaded = LabelStore::open(&path).unwrap();
        assert_eq!(reloaded.get("Q2"), Some("class"));
        assert!(reloaded.has_no_label("Q999"));
        assert!(!reloaded.has_no_label("Q2"));
    }

    #[test]
    fn label_store_file_keeps_reserved_key_shape() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("labels_map.json");

        let mut store = LabelStore::open(&path).unwrap();
        store.insert("P31", "instance of");
        store.mark_no_label("Q7");
        store.flush().unwrap();

        let raw: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(raw["P31"], "instance of");
        assert_eq!(raw["no_label_elements"], serde_json::json!(["Q7"]));
    }

    #[test]
    fn open_creates_missing_store_files() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("state").join("labels_map.json");
        let store = LabelStore::open(&path).unwrap();
        assert!(path.exists());
        assert!(store.is_empty());
    }

    #[test]
    fn ban_is_persisted_immediately_and_survives_reload() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("banned_data.json");

        let mut ledger = BanLedger::open(&path, vec!["category".to_string()]).unwrap();
        assert!(ledger.check_label("instance of", "P31"));
        assert!(!ledger.is_banned("P31"));

        assert!(!ledger.check_label("Topic Category", "P910"));
        assert!(ledger.is_banned("P910"));

        // No in-process flush between check and reload: the ban write is synchronous.
        let reloaded = BanLedger::open(&path, vec!["category".to_string()]).unwrap();
        assert!(reloaded.is_banned("P910"));
        assert!(!reloaded.is_banned("P31"));
    }

    #[test]
    fn check_label_is_case_insensitive_substring() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("banned_data.json");
        let mut ledger =
            BanLedger::open(&path, vec!["Commons".to_string(), "category".to_string()]).unwrap();

        assert!(!ledger.check_label("Wikimedia COMMONS gallery", "P935"));
        assert!(ledger.is_banned("P935"));
    }
}
