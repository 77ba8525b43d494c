//! Gradebook configuration profiles
//!
//! Selected at construction time. Preferences can be persisted under their
//! own storage key, separately from the record collection.

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::persistence::KeyValueStore;

/// Known configuration profiles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Profile {
    /// Name, subject and grade; inline messages; passes at 5.0
    #[default]
    Standard,
    /// Adds a last name; blocking messages; passes at 4.0
    Extended,
}

impl Profile {
    pub fn as_str(&self) -> &'static str {
        match self {
            Profile::Standard => "standard",
            Profile::Extended => "extended",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "standard" | "std" => Some(Profile::Standard),
            "extended" | "ext" => Some(Profile::Extended),
            _ => None,
        }
    }

    /// Whether records carry a last name
    pub fn has_last_name_field(&self) -> bool {
        match self {
            Profile::Standard => false,
            Profile::Extended => true,
        }
    }

    pub fn pass_threshold(&self) -> f64 {
        match self {
            Profile::Standard => STANDARD_PASS_THRESHOLD,
            Profile::Extended => EXTENDED_PASS_THRESHOLD,
        }
    }

    pub fn error_reporting(&self) -> ErrorReporting {
        match self {
            Profile::Standard => ErrorReporting::Inline,
            Profile::Extended => ErrorReporting::Blocking,
        }
    }
}

/// How validation failures are presented to the user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ErrorReporting {
    /// One message per field, shown next to its input
    #[default]
    Inline,
    /// A single combined message, shown as a modal alert
    Blocking,
}

/// Language of user-facing messages and labels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    English,
    Spanish,
}

impl Language {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "en" | "english" => Some(Language::English),
            "es" | "spanish" | "español" => Some(Language::Spanish),
            _ => None,
        }
    }
}

/// Gradebook configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Config {
    /// Records carry a required `lastName`
    pub has_last_name_field: bool,
    /// Grades at or above this pass; below it must improve
    pub pass_threshold: f64,
    pub error_reporting: ErrorReporting,
    pub language: Language,
    /// Storage slot for the record collection
    pub storage_key: String,
}

impl Default for Config {
    fn default() -> Self {
        Self::from_profile(Profile::default())
    }
}

impl Config {
    /// Create a config from a profile (applies profile defaults)
    pub fn from_profile(profile: Profile) -> Self {
        Self {
            has_last_name_field: profile.has_last_name_field(),
            pass_threshold: profile.pass_threshold(),
            error_reporting: profile.error_reporting(),
            language: Language::default(),
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
        }
    }

    pub fn with_language(mut self, language: Language) -> Self {
        self.language = language;
        self
    }

    pub fn with_storage_key(mut self, key: impl Into<String>) -> Self {
        self.storage_key = key.into();
        self
    }

    /// Load persisted preferences, falling back to the default profile
    pub fn load<S: KeyValueStore>(store: &S) -> Self {
        match store.get_item(CONFIG_STORAGE_KEY) {
            Ok(Some(json)) => match serde_json::from_str(&json) {
                Ok(config) => {
                    log::info!("Loaded config from storage");
                    return config;
                }
                Err(e) => log::warn!("Ignoring unreadable config: {}", e),
            },
            Ok(None) => {}
            Err(e) => log::error!("Config read failed: {}", e),
        }

        log::info!("Using default config");
        Self::default()
    }

    /// Persist preferences under their own key
    pub fn save<S: KeyValueStore>(&self, store: &S) -> Result<(), crate::StorageError> {
        let json = serde_json::to_string(self)?;
        store.set_item(CONFIG_STORAGE_KEY, &json)?;
        log::info!("Config saved");
        Ok(())
    }
}
