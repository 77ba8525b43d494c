//! wasm-bindgen surface for a JavaScript UI
//!
//! Structured values cross the boundary as JSON strings. Validation failures
//! are thrown as the JSON of an `ErrorReport`; in blocking mode they are also
//! shown with `window.alert`.

use serde::Serialize;
use wasm_bindgen::prelude::*;

use crate::config::{Config, Language, Profile};
use crate::error::StoreError;
use crate::platform::{self, LocalStorage};
use crate::record::RecordFields;
use crate::stats::Statistics;
use crate::store::{DeleteOutcome, RecordStore};
use crate::validate::ErrorReport;

#[wasm_bindgen(start)]
pub fn start() {
    platform::init_logging();
    log::info!("Gradebook starting...");
}

/// Statistics plus display labels for each record's band
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct StatisticsView<'a> {
    #[serde(flatten)]
    stats: &'a Statistics,
    band_labels: Vec<&'static str>,
}

#[wasm_bindgen]
pub struct GradeBook {
    store: RecordStore<LocalStorage>,
}

#[wasm_bindgen]
impl GradeBook {
    /// Open the gradebook over `window.localStorage`.
    ///
    /// Without a profile name, persisted preferences are used.
    #[wasm_bindgen(constructor)]
    pub fn new(profile: Option<String>, language: Option<String>) -> Result<GradeBook, JsValue> {
        let storage = LocalStorage::open().map_err(|e| JsValue::from_str(&e.to_string()))?;

        let mut config = match profile.as_deref() {
            Some(name) => {
                let profile = Profile::from_str(name)
                    .ok_or_else(|| JsValue::from_str(&format!("Unknown profile: {}", name)))?;
                log::info!("Using the {} profile", profile.as_str());
                Config::from_profile(profile)
            }
            None => Config::load(&storage),
        };
        if let Some(language) = language.as_deref().and_then(Language::from_str) {
            config.language = language;
        }

        log::info!(
            "Opening gradebook (last name: {}, pass at {})",
            config.has_last_name_field,
            config.pass_threshold
        );
        Ok(GradeBook {
            store: RecordStore::open(config, storage),
        })
    }

    /// Add a record from form JSON. Returns its position.
    pub fn add(&mut self, fields: &str) -> Result<usize, JsValue> {
        let fields = parse_fields(fields)?;
        self.store.add(&fields).map_err(|e| self.throw(e))
    }

    /// Start editing; returns the pre-filled form as JSON
    #[wasm_bindgen(js_name = beginEdit)]
    pub fn begin_edit(&mut self, position: usize) -> Result<String, JsValue> {
        let fields = self.store.begin_edit(position).map_err(|e| self.throw(e))?;
        to_json(&fields)
    }

    #[wasm_bindgen(js_name = commitEdit)]
    pub fn commit_edit(&mut self, fields: &str) -> Result<usize, JsValue> {
        let fields = parse_fields(fields)?;
        self.store.commit_edit(&fields).map_err(|e| self.throw(e))
    }

    #[wasm_bindgen(js_name = cancelEdit)]
    pub fn cancel_edit(&mut self) {
        self.store.cancel_edit();
    }

    /// Delete after the UI asked the user. Returns whether a record was removed.
    pub fn delete(&mut self, position: usize, confirmed: bool) -> Result<bool, JsValue> {
        let outcome = self.store.delete(position, confirmed).map_err(|e| self.throw(e))?;
        Ok(matches!(outcome, DeleteOutcome::Removed(_)))
    }

    /// The ordered collection as JSON
    pub fn records(&self) -> Result<String, JsValue> {
        to_json(&self.store.current())
    }

    pub fn editing(&self) -> Option<usize> {
        self.store.editing()
    }

    #[wasm_bindgen(js_name = editForm)]
    pub fn edit_form(&self) -> Result<Option<String>, JsValue> {
        self.store.edit_form().map(|f| to_json(&f)).transpose()
    }

    pub fn statistics(&self) -> Result<String, JsValue> {
        let stats = self.store.statistics();
        to_json(&StatisticsView {
            band_labels: stats.band_labels(self.store.config().language),
            stats: &stats,
        })
    }

    /// The last validation report as JSON, if any
    #[wasm_bindgen(js_name = lastErrors)]
    pub fn last_errors(&self) -> Result<Option<String>, JsValue> {
        self.store
            .last_errors()
            .map(|errors| to_json(&errors.report(self.store.config())))
            .transpose()
    }

    /// Persist the active configuration as the default for later sessions
    #[wasm_bindgen(js_name = savePreferences)]
    pub fn save_preferences(&self) -> Result<(), JsValue> {
        self.store
            .config()
            .save(self.store.storage())
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Convert a store error into a thrown value, alerting in blocking mode
    fn throw(&self, err: StoreError) -> JsValue {
        let Some(errors) = err.validation() else {
            log::warn!("{}", err);
            return JsValue::from_str(&err.to_string());
        };

        let report = errors.report(self.store.config());
        if let ErrorReport::Blocking(message) = &report {
            if let Some(window) = web_sys::window() {
                if let Err(e) = window.alert_with_message(message) {
                    log::warn!("Failed to show validation alert: {:?}", e);
                }
            }
        }
        match to_json(&report) {
            Ok(json) => JsValue::from_str(&json),
            Err(e) => e,
        }
    }
}

fn parse_fields(json: &str) -> Result<RecordFields, JsValue> {
    serde_json::from_str(json).map_err(|e| JsValue::from_str(&format!("Invalid fields: {}", e)))
}

fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<String, JsValue> {
    serde_json::to_string(value).map_err(|e| JsValue::from_str(&e.to_string()))
}
