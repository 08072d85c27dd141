use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::StationField;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MalformedFieldError {
    #[error("field error must name a field")]
    BlankFieldName,
    #[error("field error must describe the problem")]
    BlankDescription,
}

/// A single offending field together with a human readable reason.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    field: String,
    description: String,
}

impl FieldError {
    pub fn new(
        field: impl Into<String>,
        description: impl Into<String>,
    ) -> Result<Self, MalformedFieldError> {
        let field = field.into();
        let description = description.into();
        if field.trim().is_empty() {
            return Err(MalformedFieldError::BlankFieldName);
        }
        if description.trim().is_empty() {
            return Err(MalformedFieldError::BlankDescription);
        }
        Ok(FieldError { field, description })
    }

    /// Field errors raised by the repository name a known station field, so
    /// construction cannot fail.
    pub(crate) fn station(field: StationField, description: &str) -> Self {
        FieldError {
            field: field.as_str().to_owned(),
            description: description.to_owned(),
        }
    }

    pub fn field(&self) -> &str {
        &self.field
    }

    pub fn description(&self) -> &str {
        &self.description
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.description)
    }
}

/// One or more invalid fields.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid fields: {}", format_errors(.errors))]
pub struct InvalidFields {
    errors: Vec<FieldError>,
}

fn format_errors(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

impl InvalidFields {
    pub fn new(first: FieldError) -> Self {
        InvalidFields {
            errors: vec![first],
        }
    }

    pub fn push(&mut self, error: FieldError) {
        self.errors.push(error);
    }

    pub fn errors(&self) -> &[FieldError] {
        &self.errors
    }

    /// Descriptions recorded against `field`.
    pub fn errors_for(&self, field: &str) -> Vec<&str> {
        self.errors
            .iter()
            .filter(|e| e.field == field)
            .map(|e| e.description.as_str())
            .collect()
    }

    pub fn has_errors(&self, field: &str) -> bool {
        self.errors.iter().any(|e| e.field == field)
    }

    /// Distinct offending field names, in the order they were first reported.
    pub fn invalid_fields(&self) -> Vec<&str> {
        let mut fields: Vec<&str> = Vec::new();
        for error in &self.errors {
            if !fields.contains(&error.field.as_str()) {
                fields.push(&error.field);
            }
        }
        fields
    }
}

impl From<FieldError> for InvalidFields {
    fn from(error: FieldError) -> Self {
        InvalidFields::new(error)
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StationError {
    #[error(transparent)]
    InvalidFields(#[from] InvalidFields),
    #[error("Station {id} not found")]
    NotFound { id: u32 },
    #[error("Station without an identifier must have both a name and a language")]
    IncompleteNewStation,
    #[error("No station identifiers left to assign")]
    IdentifiersExhausted,
}

impl StationError {
    pub(crate) fn duplicate_identifier() -> Self {
        StationError::InvalidFields(
            FieldError::station(StationField::Identifier, "duplicate identifier").into(),
        )
    }

    pub(crate) fn non_positive_identifier() -> Self {
        StationError::InvalidFields(
            FieldError::station(StationField::Identifier, "identifier must be positive").into(),
        )
    }
}
