//! Gradebook - Student evaluation record manager
//!
//! Core modules:
//! - `record`: Record and editable field types
//! - `validate`: Field and record validation rules
//! - `store`: Record collection, edit cursor and write-through mutations
//! - `stats`: Aggregate statistics and grade bands
//! - `persistence`: Key-value storage seam and JSON load/save
//! - `config`: Construction-time profiles
//! - `platform`: Logging bootstrap and browser LocalStorage
//! - `web`: wasm-bindgen surface for a JavaScript UI

pub mod config;
pub mod error;
pub mod persistence;
pub mod platform;
pub mod record;
pub mod stats;
pub mod store;
pub mod validate;
#[cfg(target_arch = "wasm32")]
pub mod web;

pub use config::{Config, ErrorReporting, Language, Profile};
pub use error::{StorageError, StoreError};
pub use persistence::{KeyValueStore, MemoryStore, Repository};
pub use record::{Field, Record, RecordFields};
pub use stats::{Band, Statistics};
pub use store::{DeleteOutcome, RecordStore};
pub use validate::{ErrorReport, Reason, ValidationError, ValidationErrors};

/// Grading policy constants
pub mod consts {
    /// Lowest valid grade (inclusive)
    pub const MIN_GRADE: f64 = 1.0;
    /// Highest valid grade (inclusive)
    pub const MAX_GRADE: f64 = 7.0;

    /// Pass threshold of the standard profile
    pub const STANDARD_PASS_THRESHOLD: f64 = 5.0;
    /// Pass threshold of the extended profile
    pub const EXTENDED_PASS_THRESHOLD: f64 = 4.0;

    /// Band lower bounds (inclusive)
    pub const OUTSTANDING_FROM: f64 = 6.5;
    pub const GOOD_FROM: f64 = 5.6;
    pub const NEEDS_IMPROVEMENT_FROM: f64 = 4.0;

    /// LocalStorage slot holding the record collection
    pub const DEFAULT_STORAGE_KEY: &str = "students";
    /// LocalStorage slot holding persisted preferences
    pub const CONFIG_STORAGE_KEY: &str = "gradebook_config";
}

/// Format a grade the way it is typed into a form (`7.0` -> "7", `6.5` -> "6.5")
#[inline]
pub fn format_grade(grade: f64) -> String {
    format!("{}", grade)
}
