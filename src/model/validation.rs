//! Field-level validation shared by every record draft.
//!
//! Drafts arrive with every field optional. Validation either produces the
//! strict record type or the full list of offending fields; it never stops at
//! the first problem within a single record.

use std::fmt;

use serde::Serialize;

/// What is wrong with a single field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FieldErrorKind {
    /// The field is absent from the payload.
    Required,
    /// A text field is present but empty or whitespace only.
    Blank,
    /// A text field exceeds its maximum length (in characters).
    TooLong { max: usize, actual: usize },
}

/// A validation failure attached to one field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: &'static str,
    #[serde(flatten)]
    pub kind: FieldErrorKind,
}

impl FieldError {
    pub fn required(field: &'static str) -> Self {
        Self {
            field,
            kind: FieldErrorKind::Required,
        }
    }

    pub fn blank(field: &'static str) -> Self {
        Self {
            field,
            kind: FieldErrorKind::Blank,
        }
    }

    pub fn too_long(field: &'static str, max: usize, actual: usize) -> Self {
        Self {
            field,
            kind: FieldErrorKind::TooLong { max, actual },
        }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            FieldErrorKind::Required => write!(f, "'{}' is required", self.field),
            FieldErrorKind::Blank => write!(f, "'{}' must not be blank", self.field),
            FieldErrorKind::TooLong { max, actual } => write!(
                f,
                "'{}' must be at most {} characters (got {})",
                self.field, max, actual
            ),
        }
    }
}

/// Ordered list of field errors for one record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(Vec<FieldError>);

impl FieldErrors {
    pub fn new(errors: Vec<FieldError>) -> Self {
        Self(errors)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldError> {
        self.0.iter()
    }

    /// True if any error names the given field.
    pub fn mentions(&self, field: &str) -> bool {
        self.0.iter().any(|e| e.field == field)
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, err) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, "; ")?;
            }
            write!(f, "{}", err)?;
        }
        Ok(())
    }
}

/// Accumulates field errors while a draft is being converted.
///
/// Every check hands the value back only when it passed, so a conversion can
/// match on all checked values being `Some` instead of unwrapping.
#[derive(Debug, Default)]
pub struct FieldChecks {
    errors: Vec<FieldError>,
}

impl FieldChecks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Required, non-blank text of at most `max` characters.
    pub fn text(&mut self, field: &'static str, value: Option<String>, max: usize) -> Option<String> {
        let Some(value) = value else {
            self.errors.push(FieldError::required(field));
            return None;
        };
        if value.trim().is_empty() {
            self.errors.push(FieldError::blank(field));
            return None;
        }
        let len = value.chars().count();
        if len > max {
            self.errors.push(FieldError::too_long(field, max, len));
            return None;
        }
        Some(value)
    }

    /// Required value of any type.
    pub fn present<T>(&mut self, field: &'static str, value: Option<T>) -> Option<T> {
        if value.is_none() {
            self.errors.push(FieldError::required(field));
        }
        value
    }

    pub fn into_errors(self) -> FieldErrors {
        FieldErrors(self.errors)
    }
}
