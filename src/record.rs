//! Evaluation records
//!
//! `Record` is the validated, stored shape. `RecordFields` is the raw text a
//! form holds before validation.

use serde::{Deserialize, Serialize};

use crate::format_grade;

/// A validated student evaluation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Record {
    pub name: String,
    /// Only present when the profile enables the last-name field
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    pub subject: String,
    /// Always within [MIN_GRADE, MAX_GRADE]
    pub grade: f64,
}

impl Record {
    /// Editable text for pre-populating an edit form
    pub fn to_fields(&self) -> RecordFields {
        RecordFields {
            name: self.name.clone(),
            last_name: self.last_name.clone(),
            subject: self.subject.clone(),
            grade: format_grade(self.grade),
        }
    }
}

/// Form input for a record, all fields as typed
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RecordFields {
    pub name: String,
    pub last_name: Option<String>,
    pub subject: String,
    pub grade: String,
}

impl RecordFields {
    pub fn new(name: impl Into<String>, subject: impl Into<String>, grade: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            last_name: None,
            subject: subject.into(),
            grade: grade.into(),
        }
    }

    /// Builder-style last name
    pub fn with_last_name(mut self, last_name: impl Into<String>) -> Self {
        self.last_name = Some(last_name.into());
        self
    }
}

/// Record field identifiers, in form order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Field {
    Name,
    LastName,
    Subject,
    Grade,
}

impl Field {
    /// Key used in inline error maps and the persisted layout
    pub fn as_str(&self) -> &'static str {
        match self {
            Field::Name => "name",
            Field::LastName => "lastName",
            Field::Subject => "subject",
            Field::Grade => "grade",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_fields_formats_grade() {
        let record = Record {
            name: "Ana".into(),
            last_name: None,
            subject: "Math".into(),
            grade: 7.0,
        };
        let fields = record.to_fields();
        assert_eq!(fields.grade, "7");
        assert_eq!(fields.name, "Ana");

        let record = Record { grade: 6.5, ..record };
        assert_eq!(record.to_fields().grade, "6.5");
    }

    #[test]
    fn test_record_serializes_camel_case() {
        let record = Record {
            name: "Ana".into(),
            last_name: Some("Rojas".into()),
            subject: "Math".into(),
            grade: 5.5,
        };
        let json = serde_json::to_string(&record).unwrap();
        assert!(json.contains("\"lastName\":\"Rojas\""));

        let record = Record { last_name: None, ..record };
        let json = serde_json::to_string(&record).unwrap();
        assert!(!json.contains("lastName"));
    }

    #[test]
    fn test_fields_deserialize_with_missing_keys() {
        let fields: RecordFields = serde_json::from_str(r#"{"name":"Ana","grade":"6"}"#).unwrap();
        assert_eq!(fields.name, "Ana");
        assert_eq!(fields.subject, "");
        assert_eq!(fields.last_name, None);
    }
}
