use crate::journal_entry::{EntryPatch, JournalEntry, NewEntry};
use crate::storage::{Storage, StorageError, ENTRIES_KEY};
use std::collections::HashSet;
use std::thread;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info, warn};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("no entry with id '{0}'")]
    NotFound(String),
    #[error("entry changed in memory but could not be saved: {0}")]
    Persist(#[source] StorageError),
    #[error("failed to serialize entries: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// How hard a mutation tries to get its snapshot onto storage.
#[derive(Debug, Clone, Copy)]
pub struct PersistPolicy {
    pub retries: u32,
    pub backoff: Duration,
}

impl Default for PersistPolicy {
    fn default() -> Self {
        PersistPolicy {
            retries: 2,
            backoff: Duration::from_millis(50),
        }
    }
}

/// Owns the journal and mirrors every change to the `journal_entries` slot.
pub struct JournalStore {
    entries: Vec<JournalEntry>,
    storage: Box<dyn Storage>,
    policy: PersistPolicy,
    dirty: bool,
}

impl JournalStore {
    /// Reads the slot. An absent or unreadable slot gives an empty journal;
    /// records that fail validation or repeat an id are dropped.
    pub fn load(storage: Box<dyn Storage>, policy: PersistPolicy) -> Self {
        let entries = match storage.read(ENTRIES_KEY) {
            Ok(Some(raw)) => parse_entries(&raw),
            Ok(None) => {
                info!("no saved journal found, starting empty");
                Vec::new()
            }
            Err(e) => {
                warn!(error = %e, "could not read saved journal, starting empty");
                Vec::new()
            }
        };
        info!(count = entries.len(), "journal loaded");
        JournalStore {
            entries,
            storage,
            policy,
            dirty: false,
        }
    }

    pub fn add(&mut self, entry: NewEntry) -> Result<JournalEntry, StoreError> {
        let entry = JournalEntry::from_new(entry);
        debug!(id = %entry.id, "adding entry");
        self.entries.push(entry.clone());
        self.persist()?;
        Ok(entry)
    }

    pub fn update(&mut self, id: &str, patch: EntryPatch) -> Result<JournalEntry, StoreError> {
        let entry = self
            .entries
            .iter_mut()
            .find(|e| e.id == id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        entry.apply(patch);
        let updated = entry.clone();
        debug!(id, "updated entry");
        self.persist()?;
        Ok(updated)
    }

    pub fn delete(&mut self, id: &str) -> Result<JournalEntry, StoreError> {
        let index = self
            .entries
            .iter()
            .position(|e| e.id == id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        let removed = self.entries.remove(index);
        debug!(id, "deleted entry");
        self.persist()?;
        Ok(removed)
    }

    pub fn get_by_id(&self, id: &str) -> Option<&JournalEntry> {
        self.entries.iter().find(|e| e.id == id)
    }

    /// Entries in insertion order.
    pub fn list(&self) -> &[JournalEntry] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries ordered for display, latest first.
    pub fn newest_first(&self) -> Vec<JournalEntry> {
        let mut sorted = self.entries.clone();
        sorted.sort_by(|a, b| b.date.cmp(&a.date));
        sorted
    }

    pub fn search(&self, query: &str) -> Vec<JournalEntry> {
        let query = query.to_lowercase();
        self.entries
            .iter()
            .filter(|e| {
                e.content.to_lowercase().contains(&query)
                    || e.emotions.iter().any(|t| t.label().contains(&query))
            })
            .cloned()
            .collect()
    }

    /// True when the last write attempt failed and storage lags memory.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Writes the current snapshot again, e.g. after a failed mutation.
    pub fn sync(&mut self) -> Result<(), StoreError> {
        self.persist()
    }

    fn persist(&mut self) -> Result<(), StoreError> {
        let result = self.write_snapshot();
        self.dirty = result.is_err();
        result
    }

    fn write_snapshot(&mut self) -> Result<(), StoreError> {
        let serialized = serde_json::to_string(&self.entries).map_err(|e| {
            warn!(error = %e, "could not serialize journal, storage is behind memory");
            StoreError::Serialize(e)
        })?;
        let mut attempt = 0;
        loop {
            match self.storage.write(ENTRIES_KEY, &serialized) {
                Ok(()) => return Ok(()),
                Err(e) if attempt < self.policy.retries => {
                    attempt += 1;
                    warn!(error = %e, attempt, "journal write failed, retrying");
                    thread::sleep(self.policy.backoff * attempt);
                }
                Err(e) => {
                    warn!(error = %e, "journal write failed, storage is behind memory");
                    return Err(StoreError::Persist(e));
                }
            }
        }
    }
}

fn parse_entries(raw: &str) -> Vec<JournalEntry> {
    let records: Vec<serde_json::Value> = match serde_json::from_str(raw) {
        Ok(records) => records,
        Err(e) => {
            warn!(error = %e, "saved journal is not a JSON array, starting empty");
            return Vec::new();
        }
    };

    let mut seen = HashSet::new();
    let mut entries = Vec::with_capacity(records.len());
    for (index, record) in records.into_iter().enumerate() {
        match serde_json::from_value::<JournalEntry>(record) {
            Ok(entry) if seen.insert(entry.id.clone()) => entries.push(entry),
            Ok(entry) => warn!(index, id = %entry.id, "dropping entry with duplicate id"),
            Err(e) => warn!(index, error = %e, "dropping invalid entry"),
        }
    }
    entries
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::journal_entry::{parse_emotions, MoodLevel};
    use crate::storage::MemoryStorage;
    use pretty_assertions::assert_eq;

    fn no_retry() -> PersistPolicy {
        PersistPolicy {
            retries: 0,
            backoff: Duration::ZERO,
        }
    }

    fn empty_store() -> JournalStore {
        JournalStore::load(Box::new(MemoryStorage::new()), no_retry())
    }

    fn new_entry(content: &str, mood: u8) -> NewEntry {
        NewEntry::new(
            content.to_string(),
            MoodLevel::new(mood).unwrap(),
            parse_emotions("happy, tired").unwrap(),
        )
    }

    #[test]
    fn add_then_get_returns_input_with_id() {
        let mut store = empty_store();
        let input = new_entry("first entry", 4);
        let added = store.add(input.clone()).unwrap();

        let fetched = store.get_by_id(&added.id).unwrap();
        assert_eq!(fetched.content, input.content);
        assert_eq!(fetched.mood, input.mood);
        assert_eq!(fetched.emotions, input.emotions);
        assert_eq!(fetched.date, input.date);
        assert!(!fetched.id.is_empty());
    }

    #[test]
    fn ids_are_unique() {
        let mut store = empty_store();
        let a = store.add(new_entry("a", 3)).unwrap();
        let b = store.add(new_entry("b", 3)).unwrap();
        assert_ne!(a.id, b.id);
        assert_eq!(store.list().len(), 2);
    }

    #[test]
    fn delete_removes_and_second_delete_is_noop() {
        let mut store = empty_store();
        let keep = store.add(new_entry("keep", 2)).unwrap();
        let gone = store.add(new_entry("gone", 5)).unwrap();

        store.delete(&gone.id).unwrap();
        assert!(store.get_by_id(&gone.id).is_none());
        assert!(matches!(store.delete(&gone.id), Err(StoreError::NotFound(_))));
        assert_eq!(store.list(), &[keep]);
    }

    #[test]
    fn update_mood_only_changes_mood() {
        let mut store = empty_store();
        let original = store.add(new_entry("rainy day", 2)).unwrap();
        let updated = store
            .update(&original.id, EntryPatch::mood(MoodLevel::new(4).unwrap()))
            .unwrap();

        assert_eq!(updated.mood.value(), 4);
        assert_eq!(
            JournalEntry {
                mood: original.mood,
                ..updated
            },
            original
        );
    }

    #[test]
    fn update_missing_id_changes_nothing() {
        let mut store = empty_store();
        store.add(new_entry("only", 3)).unwrap();
        let before = store.list().to_vec();

        let result = store.update("missing", EntryPatch::mood(MoodLevel::new(1).unwrap()));
        assert!(matches!(result, Err(StoreError::NotFound(id)) if id == "missing"));
        assert_eq!(store.list(), before.as_slice());
    }

    #[test]
    fn failed_write_keeps_memory_change_and_marks_dirty() {
        let mut storage = MemoryStorage::new();
        storage.fail_next_writes(1);
        let mut store = JournalStore::load(Box::new(storage), no_retry());

        let result = store.add(new_entry("unsaved", 3));
        assert!(matches!(result, Err(StoreError::Persist(_))));
        assert_eq!(store.list().len(), 1);
        assert!(store.is_dirty());

        store.sync().unwrap();
        assert!(!store.is_dirty());
    }

    #[test]
    fn any_failed_mutation_leaves_store_dirty_until_a_later_write_succeeds() {
        let mut storage = MemoryStorage::new();
        storage.fail_next_writes(2);
        let mut store = JournalStore::load(Box::new(storage), no_retry());

        assert!(matches!(
            store.add(new_entry("first", 3)),
            Err(StoreError::Persist(_))
        ));
        assert!(store.is_dirty());

        let id = store.list()[0].id.clone();
        assert!(matches!(
            store.update(&id, EntryPatch::mood(MoodLevel::new(5).unwrap())),
            Err(StoreError::Persist(_))
        ));
        assert!(store.is_dirty());

        store.delete(&id).unwrap();
        assert!(!store.is_dirty());
        assert!(store.is_empty());
    }

    #[test]
    fn retries_recover_from_transient_failures() {
        let mut storage = MemoryStorage::new();
        storage.fail_next_writes(2);
        let policy = PersistPolicy {
            retries: 2,
            backoff: Duration::ZERO,
        };
        let mut store = JournalStore::load(Box::new(storage), policy);

        store.add(new_entry("eventually saved", 3)).unwrap();
        assert!(!store.is_dirty());
    }

    #[test]
    fn garbage_slot_loads_empty() {
        let storage = MemoryStorage::with_slot(ENTRIES_KEY, "{not json");
        let store = JournalStore::load(Box::new(storage), no_retry());
        assert!(store.is_empty());
    }

    #[test]
    fn invalid_and_duplicate_records_are_dropped() {
        let raw = r#"[
            {"id":"a","date":"2024-05-01T08:00:00Z","content":"ok","mood":3,"emotions":["calm"]},
            {"id":"b","date":"2024-05-01T09:00:00Z","content":"bad mood","mood":7,"emotions":[]},
            {"id":"c","date":"2024-05-01T10:00:00Z","content":"bad tag","mood":2,"emotions":["bored"]},
            {"id":"a","date":"2024-05-02T08:00:00Z","content":"dupe","mood":1,"emotions":[]}
        ]"#;
        let store = JournalStore::load(
            Box::new(MemoryStorage::with_slot(ENTRIES_KEY, raw)),
            no_retry(),
        );
        assert_eq!(store.list().len(), 1);
        assert_eq!(store.list()[0].content, "ok");
    }

    #[test]
    fn search_matches_content_and_emotions() {
        let mut store = empty_store();
        store.add(new_entry("Long walk by the river", 4)).unwrap();
        store
            .add(NewEntry::new(
                "deadline".to_string(),
                MoodLevel::new(2).unwrap(),
                parse_emotions("stressed").unwrap(),
            ))
            .unwrap();

        assert_eq!(store.search("RIVER").len(), 1);
        assert_eq!(store.search("stress").len(), 1);
        assert_eq!(store.search("tired").len(), 1);
        assert!(store.search("nothing").is_empty());
    }

    #[test]
    fn newest_first_sorts_by_date_descending() {
        let mut store = empty_store();
        let mut older = new_entry("older", 3);
        older.date -= chrono::Duration::days(2);
        store.add(older).unwrap();
        store.add(new_entry("newer", 3)).unwrap();

        let sorted = store.newest_first();
        assert_eq!(sorted[0].content, "newer");
        assert_eq!(store.list()[0].content, "older");
    }
}
