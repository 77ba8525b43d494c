//! Record store
//!
//! Owns the ordered record collection and the edit cursor. Every mutation is
//! validated first and written through to storage before it returns. If the
//! write fails the mutation is rolled back, so memory always matches the last
//! successful save.
//!
//! Positions are only valid until the next mutation: deleting position `i`
//! shifts every later record down by one.

use crate::config::Config;
use crate::error::{Result, StorageError, StoreError};
use crate::persistence::{KeyValueStore, Repository};
use crate::record::{Record, RecordFields};
use crate::stats::Statistics;
use crate::validate::{ValidationErrors, validate};

/// Outcome of a delete request
#[derive(Debug, Clone, PartialEq)]
pub enum DeleteOutcome {
    /// The record was removed
    Removed(Record),
    /// The user did not confirm; nothing changed
    Declined,
}

/// The record collection and its editing state
pub struct RecordStore<S> {
    config: Config,
    repo: Repository<S>,
    records: Vec<Record>,
    /// Position being edited (Idle when `None`)
    editing: Option<usize>,
    last_errors: Option<ValidationErrors>,
}

impl<S: KeyValueStore> RecordStore<S> {
    /// Create a store hydrated from `storage`. Never fails; unreadable
    /// state starts an empty collection.
    pub fn open(config: Config, storage: S) -> Self {
        let mut repo = Repository::new(storage, config.storage_key.clone());
        let records = repo.load(&config);
        Self {
            config,
            repo,
            records,
            editing: None,
            last_errors: None,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn storage(&self) -> &S {
        self.repo.storage()
    }

    /// The full ordered collection
    pub fn current(&self) -> &[Record] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Position under edit, if any
    pub fn editing(&self) -> Option<usize> {
        self.editing
    }

    /// Pre-filled form text for the record under edit
    pub fn edit_form(&self) -> Option<RecordFields> {
        self.editing
            .and_then(|i| self.records.get(i))
            .map(Record::to_fields)
    }

    /// Errors from the last rejected submit, if any
    pub fn last_errors(&self) -> Option<&ValidationErrors> {
        self.last_errors.as_ref()
    }

    pub fn statistics(&self) -> Statistics {
        Statistics::compute(&self.records, &self.config)
    }

    /// Validate and append a record. Returns its position.
    pub fn add(&mut self, fields: &RecordFields) -> Result<usize> {
        let record = self.check(fields)?;

        self.records.push(record);
        let previous_edit = self.editing.take();
        if let Err(e) = self.repo.save(&self.records) {
            self.records.pop();
            self.editing = previous_edit;
            return Err(self.write_failed(e));
        }

        self.last_errors = None;
        let position = self.records.len() - 1;
        log::debug!("Added record at {}", position);
        Ok(position)
    }

    /// Start editing `position`, returning its fields as form text
    pub fn begin_edit(&mut self, position: usize) -> Result<RecordFields> {
        let fields = self.get(position)?.to_fields();
        self.editing = Some(position);
        self.last_errors = None;
        log::debug!("Editing record at {}", position);
        Ok(fields)
    }

    /// Validate and replace the record under edit. On a validation error
    /// the edit stays active.
    pub fn commit_edit(&mut self, fields: &RecordFields) -> Result<usize> {
        let position = self.editing.ok_or(StoreError::NoActiveEdit)?;
        let record = self.check(fields)?;

        let previous = std::mem::replace(&mut self.records[position], record);
        self.editing = None;
        if let Err(e) = self.repo.save(&self.records) {
            self.records[position] = previous;
            self.editing = Some(position);
            return Err(self.write_failed(e));
        }

        self.last_errors = None;
        log::debug!("Updated record at {}", position);
        Ok(position)
    }

    /// Abandon the current edit, if any
    pub fn cancel_edit(&mut self) {
        if let Some(position) = self.editing.take() {
            log::debug!("Cancelled edit of record at {}", position);
        }
        self.last_errors = None;
    }

    /// Remove the record at `position` once the caller has confirmed.
    ///
    /// Clears the edit cursor if it pointed at the removed record or at one
    /// that shifted down.
    pub fn delete(&mut self, position: usize, confirmed: bool) -> Result<DeleteOutcome> {
        self.get(position)?;
        if !confirmed {
            return Ok(DeleteOutcome::Declined);
        }

        let removed = self.records.remove(position);
        let previous_edit = self.editing;
        if matches!(self.editing, Some(i) if i >= position) {
            self.editing = None;
        }
        if let Err(e) = self.repo.save(&self.records) {
            self.records.insert(position, removed);
            self.editing = previous_edit;
            return Err(self.write_failed(e));
        }

        self.last_errors = None;
        log::debug!("Deleted record at {}", position);
        Ok(DeleteOutcome::Removed(removed))
    }

    fn get(&self, position: usize) -> Result<&Record> {
        self.records.get(position).ok_or(StoreError::IndexOutOfRange {
            position,
            len: self.records.len(),
        })
    }

    fn check(&mut self, fields: &RecordFields) -> Result<Record> {
        validate(fields, &self.config).map_err(|errors| {
            self.last_errors = Some(errors.clone());
            StoreError::Validation(errors)
        })
    }

    fn write_failed(&self, e: StorageError) -> StoreError {
        log::error!("Failed to save records, change rolled back: {}", e);
        StoreError::Storage(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Profile;
    use crate::persistence::MemoryStore;
    use crate::record::Field;
    use crate::validate::Reason;

    fn fields(name: &str, subject: &str, grade: &str) -> RecordFields {
        RecordFields::new(name, subject, grade)
    }

    fn store() -> RecordStore<MemoryStore> {
        RecordStore::open(Config::default(), MemoryStore::new())
    }

    fn seeded(names: &[&str]) -> RecordStore<MemoryStore> {
        let mut store = store();
        for name in names {
            store.add(&fields(name, "Math", "5")).unwrap();
        }
        store
    }

    fn names<S: KeyValueStore>(store: &RecordStore<S>) -> Vec<&str> {
        store.current().iter().map(|r| r.name.as_str()).collect()
    }

    #[test]
    fn test_add_valid_record() {
        let mut store = store();
        let position = store.add(&fields("Ana", "Math", "7")).unwrap();
        assert_eq!(position, 0);
        assert_eq!(store.len(), 1);
        assert_eq!(store.current()[0].grade, 7.0);
        assert!(store.last_errors().is_none());
    }

    #[test]
    fn test_add_invalid_name() {
        let mut store = store();
        let err = store.add(&fields("A1", "Math", "5")).unwrap_err();
        let errors = err.validation().unwrap();
        assert_eq!(errors.get(Field::Name), Some(Reason::InvalidFormat));
        assert!(store.is_empty());
        assert_eq!(store.last_errors(), Some(errors));
        assert_eq!(store.storage().get_item("students").unwrap(), None);
    }

    #[test]
    fn test_add_writes_through() {
        let mut store = store();
        store.add(&fields("Ana", "Math", "6.5")).unwrap();
        let json = store.storage().get_item("students").unwrap().unwrap();
        assert_eq!(json, r#"[{"name":"Ana","subject":"Math","grade":6.5}]"#);
    }

    #[test]
    fn test_reopen_restores_records() {
        let storage = MemoryStore::new();
        {
            let mut store = RecordStore::open(Config::default(), &storage);
            store.add(&fields("Ana", "Math", "7")).unwrap();
            store.add(&fields("Luis", "Art", "4.5")).unwrap();
        }
        let store = RecordStore::open(Config::default(), &storage);
        assert_eq!(names(&store), vec!["Ana", "Luis"]);
        assert_eq!(store.current()[1].grade, 4.5);
    }

    #[test]
    fn test_add_clears_edit_cursor() {
        let mut store = seeded(&["Ana"]);
        store.begin_edit(0).unwrap();
        store.add(&fields("Luis", "Art", "6")).unwrap();
        assert_eq!(store.editing(), None);
    }

    #[test]
    fn test_begin_edit_prefills_fields() {
        let mut store = seeded(&["Ana"]);
        let form = store.begin_edit(0).unwrap();
        assert_eq!(form, fields("Ana", "Math", "5"));
        assert_eq!(store.editing(), Some(0));
        assert_eq!(store.edit_form(), Some(form));
    }

    #[test]
    fn test_begin_edit_out_of_range() {
        let mut store = seeded(&["Ana"]);
        assert!(matches!(
            store.begin_edit(1),
            Err(StoreError::IndexOutOfRange { position: 1, len: 1 })
        ));
        assert_eq!(store.editing(), None);
    }

    #[test]
    fn test_commit_edit_replaces_record() {
        let mut store = seeded(&["Ana", "Luis"]);
        store.begin_edit(1).unwrap();
        store.commit_edit(&fields("Luisa", "Art", "6.8")).unwrap();
        assert_eq!(names(&store), vec!["Ana", "Luisa"]);
        assert_eq!(store.current()[1].grade, 6.8);
        assert_eq!(store.editing(), None);
    }

    #[test]
    fn test_commit_edit_without_cursor() {
        let mut store = seeded(&["Ana"]);
        assert!(matches!(
            store.commit_edit(&fields("Ana", "Math", "6")),
            Err(StoreError::NoActiveEdit)
        ));
        assert_eq!(store.current()[0].grade, 5.0);
    }

    #[test]
    fn test_commit_edit_out_of_range_grade_keeps_cursor() {
        let mut store = seeded(&["Ana"]);
        store.begin_edit(0).unwrap();
        let err = store.commit_edit(&fields("Ana", "Math", "8")).unwrap_err();
        assert_eq!(err.validation().unwrap().get(Field::Grade), Some(Reason::OutOfRange));
        assert_eq!(store.editing(), Some(0));
        assert_eq!(store.current()[0].grade, 5.0);
        assert!(store.last_errors().is_some());
    }

    #[test]
    fn test_cancel_edit() {
        let mut store = seeded(&["Ana"]);
        store.begin_edit(0).unwrap();
        let _ = store.commit_edit(&fields("", "Math", "5"));
        store.cancel_edit();
        assert_eq!(store.editing(), None);
        assert!(store.last_errors().is_none());
        store.cancel_edit();
    }

    #[test]
    fn test_delete_shifts_positions() {
        let mut store = seeded(&["Ana", "Luis", "Eva", "Tom"]);
        let outcome = store.delete(1, true).unwrap();
        assert!(matches!(outcome, DeleteOutcome::Removed(r) if r.name == "Luis"));
        assert_eq!(names(&store), vec!["Ana", "Eva", "Tom"]);

        let saved = store.storage().get_item("students").unwrap().unwrap();
        assert!(!saved.contains("Luis"));
    }

    #[test]
    fn test_delete_requires_confirmation() {
        let mut store = seeded(&["Ana", "Luis"]);
        assert_eq!(store.delete(0, false).unwrap(), DeleteOutcome::Declined);
        assert_eq!(names(&store), vec!["Ana", "Luis"]);
    }

    #[test]
    fn test_delete_out_of_range() {
        let mut store = seeded(&["Ana"]);
        assert!(matches!(
            store.delete(3, true),
            Err(StoreError::IndexOutOfRange { position: 3, len: 1 })
        ));
        assert!(store.delete(3, false).is_err());
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_delete_and_edit_cursor() {
        let mut store = seeded(&["Ana", "Luis", "Eva"]);

        store.begin_edit(0).unwrap();
        store.delete(1, true).unwrap();
        assert_eq!(store.editing(), Some(0));

        store.begin_edit(1).unwrap();
        store.delete(1, true).unwrap();
        assert_eq!(store.editing(), None);

        let mut store = seeded(&["Ana", "Luis", "Eva"]);
        store.begin_edit(2).unwrap();
        store.delete(0, true).unwrap();
        assert_eq!(store.editing(), None);
    }

    #[test]
    fn test_delete_clears_last_errors() {
        let mut store = seeded(&["Ana", "Luis"]);
        store.begin_edit(1).unwrap();
        assert!(store.commit_edit(&fields("L1", "Math", "5")).is_err());
        assert!(store.last_errors().is_some());

        store.delete(0, false).unwrap();
        assert!(store.last_errors().is_some());

        store.delete(0, true).unwrap();
        assert_eq!(store.editing(), None);
        assert!(store.last_errors().is_none());
    }

    #[test]
    fn test_current_is_idempotent() {
        let store = seeded(&["Ana", "Luis"]);
        assert_eq!(store.current().to_vec(), store.current().to_vec());
    }

    #[test]
    fn test_write_failure_rolls_back() {
        let mut store = seeded(&["Ana", "Luis"]);
        let before = store.current().to_vec();
        store.storage().set_simulate_write_error(true);

        assert!(matches!(
            store.add(&fields("Eva", "Math", "6")),
            Err(StoreError::Storage(_))
        ));
        assert_eq!(store.current(), before.as_slice());

        store.begin_edit(1).unwrap();
        assert!(matches!(
            store.commit_edit(&fields("Luisa", "Math", "6")),
            Err(StoreError::Storage(_))
        ));
        assert_eq!(store.current(), before.as_slice());
        assert_eq!(store.editing(), Some(1));

        assert!(matches!(store.delete(0, true), Err(StoreError::Storage(_))));
        assert_eq!(store.current(), before.as_slice());
        assert_eq!(store.editing(), Some(1));

        store.storage().set_simulate_write_error(false);
        store.delete(0, true).unwrap();
        assert_eq!(names(&store), vec!["Luis"]);
    }

    #[test]
    fn test_statistics_follow_mutations() {
        let mut store = store();
        assert_eq!(store.statistics().mean, None);
        store.add(&fields("Ana", "Math", "4")).unwrap();
        store.add(&fields("Luis", "Art", "6")).unwrap();
        let stats = store.statistics();
        assert_eq!(stats.count, 2);
        assert_eq!(stats.mean, Some(5.0));
        assert_eq!(stats.passing, 1);
        assert_eq!(stats.must_improve, 1);
    }

    #[test]
    fn test_extended_profile_round_trip() {
        let storage = MemoryStore::new();
        let config = Config::from_profile(Profile::Extended);
        {
            let mut store = RecordStore::open(config.clone(), &storage);
            let err = store.add(&fields("Ana", "Math", "6")).unwrap_err();
            assert_eq!(err.validation().unwrap().get(Field::LastName), Some(Reason::Required));
            store
                .add(&fields("Ana", "Math", "6").with_last_name("Rojas"))
                .unwrap();
        }
        let store = RecordStore::open(config, &storage);
        assert_eq!(store.current()[0].last_name.as_deref(), Some("Rojas"));
        assert_eq!(store.edit_form(), None);
    }

    #[test]
    fn test_switching_profiles_keeps_unreadable_records() {
        let storage = MemoryStore::new();
        {
            let mut store = RecordStore::open(Config::default(), &storage);
            store.add(&fields("Ana", "Math", "7")).unwrap();
            store.add(&fields("Luis", "Art", "4.5")).unwrap();
        }
        {
            let mut store = RecordStore::open(Config::from_profile(Profile::Extended), &storage);
            assert!(store.is_empty());
            store
                .add(&fields("Eva", "History", "6").with_last_name("Rojas"))
                .unwrap();
            assert_eq!(names(&store), vec!["Eva"]);
        }
        let store = RecordStore::open(Config::default(), &storage);
        assert_eq!(names(&store), vec!["Eva", "Ana", "Luis"]);
        assert_eq!(store.current()[2].grade, 4.5);
    }

    #[test]
    fn test_custom_storage_key() {
        let storage = MemoryStore::new();
        storage
            .set_item("students", r#"[{"name":"Ana","subject":"Math","grade":7}]"#)
            .unwrap();

        let config = Config::default().with_storage_key("other");
        let mut store = RecordStore::open(config, &storage);
        assert!(store.is_empty());
        store.add(&fields("Eva", "Art", "6")).unwrap();

        assert_eq!(
            storage.get_item("students").unwrap().as_deref(),
            Some(r#"[{"name":"Ana","subject":"Math","grade":7}]"#)
        );
        assert!(storage.get_item("other").unwrap().unwrap().contains("Eva"));
    }

    #[test]
    fn test_open_with_corrupt_state() {
        let storage = MemoryStore::new();
        storage.set_item("students", "not json").unwrap();
        let mut store = RecordStore::open(Config::default(), &storage);
        assert!(store.is_empty());
        store.add(&fields("Ana", "Math", "7")).unwrap();
        assert_eq!(store.len(), 1);
        assert_eq!(
            storage.get_item("students.corrupt").unwrap().as_deref(),
            Some("not json")
        );
    }
}
