//! Record validation
//!
//! Every field is checked independently and all violations are reported
//! together. Validation never mutates anything.
//!
//! Rules:
//! - `name`, `lastName`, `subject`: required (non-blank), no digit characters
//! - `grade`: required, a decimal within [1.0, 7.0]

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

use crate::config::{Config, ErrorReporting, Language};
use crate::consts::{MAX_GRADE, MIN_GRADE};
use crate::record::{Field, Record, RecordFields};

/// Why a field was rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Reason {
    Required,
    InvalidFormat,
    OutOfRange,
    NotANumber,
}

/// A single field-level failure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ValidationError {
    pub field: Field,
    pub reason: Reason,
}

impl ValidationError {
    /// Human-readable message for this failure
    pub fn message(&self, language: Language) -> &'static str {
        use Field::*;
        use Reason::*;
        match language {
            Language::English => match (self.field, self.reason) {
                (Name, Required) => "Name is required.",
                (Name, _) => "Name must not contain digits.",
                (LastName, Required) => "Last name is required.",
                (LastName, _) => "Last name must not contain digits.",
                (Subject, Required) => "Subject is required.",
                (Subject, _) => "Subject must not contain digits.",
                (Grade, Required) => "Grade is required.",
                (Grade, NotANumber) => "Grade must be a number.",
                (Grade, _) => "Grade must be between 1.0 and 7.0.",
            },
            Language::Spanish => match (self.field, self.reason) {
                (Name, Required) => "El nombre es obligatorio.",
                (Name, _) => "El nombre no puede contener números.",
                (LastName, Required) => "El apellido es obligatorio.",
                (LastName, _) => "El apellido no puede contener números.",
                (Subject, Required) => "La asignatura es obligatoria.",
                (Subject, _) => "La asignatura no puede contener números.",
                (Grade, Required) => "El promedio es obligatorio.",
                (Grade, NotANumber) => "El promedio debe ser un número.",
                (Grade, _) => "El promedio debe estar entre 1.0 y 7.0.",
            },
        }
    }
}

/// All failures for one candidate record, in field order
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationErrors(Vec<ValidationError>);

impl ValidationErrors {
    pub fn errors(&self) -> &[ValidationError] {
        &self.0
    }

    /// Reason a given field was rejected, if it was
    pub fn get(&self, field: Field) -> Option<Reason> {
        self.0.iter().find(|e| e.field == field).map(|e| e.reason)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Field name -> message, for inline display
    pub fn messages(&self, language: Language) -> BTreeMap<&'static str, &'static str> {
        self.0
            .iter()
            .map(|e| (e.field.as_str(), e.message(language)))
            .collect()
    }

    /// Present the failures the way the profile asks for
    pub fn report(&self, config: &Config) -> ErrorReport {
        match config.error_reporting {
            ErrorReporting::Inline => ErrorReport::Inline(self.messages(config.language)),
            ErrorReporting::Blocking => ErrorReport::Blocking(
                self.errors()
                    .iter()
                    .map(|e| e.message(config.language))
                    .collect::<Vec<_>>()
                    .join("\n"),
            ),
        }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .0
            .iter()
            .map(|e| format!("{}: {:?}", e.field.as_str(), e.reason))
            .collect();
        write!(f, "{}", parts.join(", "))
    }
}

impl std::error::Error for ValidationErrors {}

/// Validation failures ready for display
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "mode", content = "errors", rename_all = "lowercase")]
pub enum ErrorReport {
    Inline(BTreeMap<&'static str, &'static str>),
    Blocking(String),
}

/// Check a text field: non-blank, no digits
pub fn check_text(field: Field, value: &str) -> Option<ValidationError> {
    let reason = if value.trim().is_empty() {
        Reason::Required
    } else if value.chars().any(char::is_numeric) {
        Reason::InvalidFormat
    } else {
        return None;
    };
    Some(ValidationError { field, reason })
}

/// Check an already-parsed grade against the valid domain
pub fn check_grade(grade: f64) -> Result<f64, Reason> {
    if grade.is_nan() {
        return Err(Reason::NotANumber);
    }
    if !(MIN_GRADE..=MAX_GRADE).contains(&grade) {
        return Err(Reason::OutOfRange);
    }
    Ok(grade)
}

/// Parse grade text as typed into a form
pub fn parse_grade(input: &str) -> Result<f64, Reason> {
    let input = input.trim();
    if input.is_empty() {
        return Err(Reason::Required);
    }
    // `inf`/`NaN` literals parse, but are not numbers a user would type
    if input.chars().any(|c| c.is_alphabetic() && !matches!(c, 'e' | 'E')) {
        return Err(Reason::NotANumber);
    }
    let grade: f64 = input.parse().map_err(|_| Reason::NotANumber)?;
    check_grade(grade)
}

/// Validate form input, producing the record to store
pub fn validate(fields: &RecordFields, config: &Config) -> Result<Record, ValidationErrors> {
    let mut errors = Vec::new();

    errors.extend(check_text(Field::Name, &fields.name));
    let last_name = if config.has_last_name_field {
        let value = fields.last_name.as_deref().unwrap_or_default();
        errors.extend(check_text(Field::LastName, value));
        Some(value.to_string())
    } else {
        None
    };
    errors.extend(check_text(Field::Subject, &fields.subject));

    let grade = parse_grade(&fields.grade).map_err(|reason| ValidationError {
        field: Field::Grade,
        reason,
    });

    match grade {
        Ok(grade) if errors.is_empty() => Ok(Record {
            name: fields.name.clone(),
            last_name,
            subject: fields.subject.clone(),
            grade,
        }),
        Ok(_) => Err(ValidationErrors(errors)),
        Err(e) => {
            errors.push(e);
            Err(ValidationErrors(errors))
        }
    }
}

/// Validate a typed record (e.g. one read back from storage)
pub fn validate_record(record: &Record, config: &Config) -> Result<(), ValidationErrors> {
    let mut errors = Vec::new();

    errors.extend(check_text(Field::Name, &record.name));
    if config.has_last_name_field {
        errors.extend(check_text(
            Field::LastName,
            record.last_name.as_deref().unwrap_or_default(),
        ));
    }
    errors.extend(check_text(Field::Subject, &record.subject));
    if let Err(reason) = check_grade(record.grade) {
        errors.push(ValidationError {
            field: Field::Grade,
            reason,
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ValidationErrors(errors))
    }
}
