use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;

use chrono::Utc;
use log::{debug, warn};
use tempfile::NamedTempFile;

use crate::error::{StoreError, StoreResult};
use crate::models::{NewSnippet, Snippet, id};

/// Key under which the collection is persisted unless configured otherwise
pub const DEFAULT_STORE_KEY: &str = "codevault_snippets";

/// String-keyed persistence backend
pub trait KeyValueStore {
    fn get(&self, key: &str) -> io::Result<Option<String>>;
    fn set(&self, key: &str, value: &str) -> io::Result<()>;
}

/// File-backed key-value store: one `<key>.json` file per key.
#[derive(Debug)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> io::Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    pub fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> io::Result<Option<String>> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }

    fn set(&self, key: &str, value: &str) -> io::Result<()> {
        // Write to a sibling temp file and rename so a crash never leaves
        // a half-written collection behind
        let mut temp_file = NamedTempFile::new_in(&self.dir)?;
        temp_file.write_all(value.as_bytes())?;
        temp_file.flush()?;
        temp_file.persist(self.path_for(key)).map_err(|e| e.error)?;
        Ok(())
    }
}

/// In-process key-value store.
///
/// `fail_writes` makes every `set` return an error, to exercise the
/// persistence-failure paths.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RefCell<HashMap<String, String>>,
    fail_writes: Cell<bool>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.set(fail);
    }

    pub fn raw(&self, key: &str) -> Option<String> {
        self.entries.borrow().get(key).cloned()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> io::Result<Option<String>> {
        Ok(self.entries.borrow().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> io::Result<()> {
        if self.fail_writes.get() {
            return Err(io::Error::new(io::ErrorKind::Other, "storage quota exceeded"));
        }
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Sole owner of the persisted snippet collection.
///
/// Every mutation reads the whole collection, applies one change and
/// writes the whole collection back. Nothing is cached between calls.
#[derive(Debug)]
pub struct SnippetStore<B: KeyValueStore> {
    backend: B,
    key: String,
}

impl<B: KeyValueStore> SnippetStore<B> {
    pub fn new(backend: B, key: impl Into<String>) -> Self {
        Self {
            backend,
            key: key.into(),
        }
    }

    pub fn with_default_key(backend: B) -> Self {
        Self::new(backend, DEFAULT_STORE_KEY)
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Reads the full collection. A missing blob is an empty collection.
    pub fn read_all(&self) -> StoreResult<Vec<Snippet>> {
        match self.backend.get(&self.key)? {
            Some(content) => serde_json::from_str(&content).map_err(StoreError::Corrupted),
            None => Ok(Vec::new()),
        }
    }

    /// Fail-soft read: logs the problem and returns an empty collection.
    pub fn load(&self) -> Vec<Snippet> {
        self.read_all().unwrap_or_else(|e| {
            warn!("Error loading snippets from '{}': {}", self.key, e);
            Vec::new()
        })
    }

    /// Persists the full collection in a single write
    pub fn replace_all(&self, snippets: &[Snippet]) -> StoreResult<()> {
        let content = serde_json::to_string_pretty(snippets).map_err(StoreError::Serialize)?;
        self.backend.set(&self.key, &content)?;
        debug!("Persisted {} snippets under '{}'", snippets.len(), self.key);
        Ok(())
    }

    /// Adds a snippet at the front of the collection with a fresh id.
    pub fn insert(&self, data: NewSnippet) -> StoreResult<Snippet> {
        let mut snippets = self.read_all()?;

        let now = Utc::now().timestamp_millis();
        let snippet = NewSnippet {
            created_at: now,
            updated_at: now,
            ..data
        }
        .with_id(id::generate());

        snippets.insert(0, snippet.clone());
        self.replace_all(&snippets)?;

        Ok(snippet)
    }

    /// Replaces the snippet with the same id in place. The caller sets
    /// `updated_at`. Returns `false` without writing when no such id exists.
    pub fn update(&self, snippet: &Snippet) -> StoreResult<bool> {
        let mut snippets = self.read_all()?;

        let Some(index) = snippets.iter().position(|s| s.id == snippet.id) else {
            debug!("Update skipped, no snippet with id {}", snippet.id);
            return Ok(false);
        };

        snippets[index] = snippet.clone();
        self.replace_all(&snippets)?;
        Ok(true)
    }

    /// Removes the snippet with the given id. Returns `false` without
    /// writing when no such id exists.
    pub fn delete(&self, id: &str) -> StoreResult<bool> {
        let mut snippets = self.read_all()?;

        let Some(index) = snippets.iter().position(|s| s.id == id) else {
            debug!("Delete skipped, no snippet with id {}", id);
            return Ok(false);
        };

        snippets.remove(index);
        self.replace_all(&snippets)?;
        Ok(true)
    }

    pub fn get(&self, id: &str) -> StoreResult<Option<Snippet>> {
        Ok(self.read_all()?.into_iter().find(|s| s.id == id))
    }

    /// Looks a snippet up by id, then exact title, then partial title.
    /// Title matching ignores case. An empty needle matches nothing.
    pub fn find(&self, needle: &str) -> StoreResult<Option<Snippet>> {
        if needle.is_empty() {
            return Ok(None);
        }
        let snippets = self.read_all()?;
        let lowered = needle.to_lowercase();

        let position = snippets
            .iter()
            .position(|s| s.id == needle)
            .or_else(|| {
                snippets
                    .iter()
                    .position(|s| s.title.to_lowercase() == lowered)
            })
            .or_else(|| {
                snippets
                    .iter()
                    .position(|s| s.title.to_lowercase().contains(&lowered))
            });

        Ok(position.map(|index| snippets[index].clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_snippet(title: &str) -> NewSnippet {
        NewSnippet {
            title: title.to_string(),
            description: String::new(),
            code: format!("// {}", title),
            language: "javascript".to_string(),
            category: "utility".to_string(),
            tags: Vec::new(),
            created_at: 0,
            updated_at: 0,
        }
    }

    fn memory_store() -> SnippetStore<MemoryStore> {
        SnippetStore::with_default_key(MemoryStore::new())
    }

    #[test]
    fn empty_store_reads_empty() {
        let store = memory_store();
        assert!(store.read_all().unwrap().is_empty());
        assert!(store.load().is_empty());
    }

    #[test]
    fn insert_prepends_and_stamps_times() {
        let store = memory_store();
        let first = store.insert(new_snippet("first")).unwrap();
        let second = store.insert(new_snippet("second")).unwrap();

        let all = store.read_all().unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].id, second.id);
        assert_eq!(all[1].id, first.id);
        assert!(first.created_at > 0);
        assert_eq!(first.created_at, first.updated_at);
    }

    #[test]
    fn update_replaces_in_place() {
        let store = memory_store();
        let a = store.insert(new_snippet("a")).unwrap();
        let b = store.insert(new_snippet("b")).unwrap();

        let mut edited = a.clone();
        edited.title = "a2".to_string();
        assert!(store.update(&edited).unwrap());

        let all = store.read_all().unwrap();
        assert_eq!(all[0].id, b.id);
        assert_eq!(all[1].title, "a2");
    }

    #[test]
    fn update_missing_id_does_not_write() {
        let store = memory_store();
        store.insert(new_snippet("a")).unwrap();
        let before = store.backend().raw(DEFAULT_STORE_KEY);

        let mut ghost = store.read_all().unwrap()[0].clone();
        ghost.id = "missing".to_string();
        assert!(!store.update(&ghost).unwrap());
        assert_eq!(store.backend().raw(DEFAULT_STORE_KEY), before);
    }

    #[test]
    fn delete_removes_only_match() {
        let store = memory_store();
        let a = store.insert(new_snippet("a")).unwrap();
        store.insert(new_snippet("b")).unwrap();

        assert!(store.delete(&a.id).unwrap());
        assert!(!store.delete(&a.id).unwrap());
        assert_eq!(store.read_all().unwrap().len(), 1);
    }

    #[test]
    fn corrupted_blob_is_reported_and_left_alone() {
        let store = memory_store();
        store.backend().set(DEFAULT_STORE_KEY, "{not json").unwrap();

        assert!(matches!(store.read_all(), Err(StoreError::Corrupted(_))));
        assert!(store.load().is_empty());
        assert!(matches!(
            store.insert(new_snippet("a")),
            Err(StoreError::Corrupted(_))
        ));
        assert_eq!(
            store.backend().raw(DEFAULT_STORE_KEY).as_deref(),
            Some("{not json")
        );
    }

    #[test]
    fn failed_write_surfaces_backend_error() {
        let store = memory_store();
        store.insert(new_snippet("kept")).unwrap();
        store.backend().set_fail_writes(true);

        assert!(matches!(
            store.insert(new_snippet("lost")),
            Err(StoreError::Backend(_))
        ));
        store.backend().set_fail_writes(false);
        assert_eq!(store.read_all().unwrap().len(), 1);
    }

    #[test]
    fn find_prefers_id_then_exact_title() {
        let store = memory_store();
        store.insert(new_snippet("Array helpers")).unwrap();
        let exact = store.insert(new_snippet("array")).unwrap();

        assert_eq!(store.find(&exact.id).unwrap().unwrap().id, exact.id);
        assert_eq!(store.find("ARRAY").unwrap().unwrap().id, exact.id);
        assert_eq!(
            store.find("helpers").unwrap().unwrap().title,
            "Array helpers"
        );
        assert!(store.find("nothing").unwrap().is_none());
        assert!(store.find("").unwrap().is_none());
    }

    #[test]
    fn file_store_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let backend = FileStore::new(dir.path().join("data")).unwrap();
        let path = backend.path_for("custom");
        let store = SnippetStore::new(backend, "custom");

        assert!(store.read_all().unwrap().is_empty());
        let saved = store.insert(new_snippet("persisted")).unwrap();

        assert!(path.exists());
        let reopened = SnippetStore::new(FileStore::new(dir.path().join("data")).unwrap(), "custom");
        assert_eq!(reopened.read_all().unwrap(), vec![saved]);
    }
}
