//! Field-level request validation.
//!
//! Request models derive [`validator::Validate`]. A failed check converts into
//! [`Error::Validation`] with `?`, carrying every field error in one `400` response:
//!
//! ```ignore
//! #[derive(Deserialize, Validate)]
//! struct SectionCreate {
//!     #[validate(length(min = 1, max = 200, message = "title must be between 1 and 200 characters"))]
//!     title: String,
//! }
//!
//! create.validate()?;
//! ```
//!
//! Nested errors are flattened into dotted paths, e.g. `sections.0.order_index`.

use std::borrow::Cow;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::{Validate, ValidationError, ValidationErrors, ValidationErrorsKind};

use crate::errors::Error;

/// A single rejected field and the reason it was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Flatten `validator` errors into one [`FieldError`] per failed check, sorted by path.
pub fn field_errors(errors: &ValidationErrors) -> Vec<FieldError> {
    let mut out = Vec::new();
    collect(errors, None, &mut out);
    out.sort_by(|a, b| a.field.cmp(&b.field));
    out
}

fn collect(errors: &ValidationErrors, prefix: Option<&str>, out: &mut Vec<FieldError>) {
    for (field, kind) in errors.errors() {
        let path = match prefix {
            Some(prefix) => format!("{prefix}.{field}"),
            None => field.to_string(),
        };

        match kind {
            ValidationErrorsKind::Field(failures) => {
                for failure in failures {
                    let message = match &failure.message {
                        Some(message) => message.to_string(),
                        None => format!("{path} is invalid"),
                    };
                    out.push(FieldError::new(path.clone(), message));
                }
            }
            ValidationErrorsKind::Struct(inner) => collect(inner, Some(&path), out),
            ValidationErrorsKind::List(items) => {
                for (index, inner) in items {
                    collect(inner, Some(&format!("{path}.{index}")), out);
                }
            }
        }
    }
}

impl From<ValidationErrors> for Error {
    fn from(errors: ValidationErrors) -> Self {
        Error::Validation {
            details: field_errors(&errors),
        }
    }
}

/// Validate a request together with checks that cannot be expressed as derive attributes,
/// reporting every failure in one error.
pub fn validate_with<T: Validate>(request: &T, extra: impl IntoIterator<Item = FieldError>) -> Result<(), Error> {
    let mut details = match request.validate() {
        Ok(()) => Vec::new(),
        Err(errors) => field_errors(&errors),
    };
    details.extend(extra);

    if details.is_empty() {
        return Ok(());
    }
    details.sort_by(|a, b| a.field.cmp(&b.field));
    Err(Error::Validation { details })
}

fn failure(code: &'static str, message: &'static str) -> ValidationError {
    let mut error = ValidationError::new(code);
    error.message = Some(Cow::Borrowed(message));
    error
}

/// `#RRGGBB`, either case.
pub fn hex_color(value: &str) -> Result<(), ValidationError> {
    let valid = value.len() == 7 && value.starts_with('#') && value[1..].chars().all(|c| c.is_ascii_hexdigit());
    if valid { Ok(()) } else { Err(failure("hex_color", "Invalid hex color")) }
}

/// Lowercase ASCII letters, digits and hyphens only. Callers normalize case first.
pub fn slug(value: &str) -> Result<(), ValidationError> {
    let valid = value.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-');
    if valid {
        Ok(())
    } else {
        Err(failure("slug", "slug may only contain lowercase letters, numbers and hyphens"))
    }
}

/// Character count within bounds taken from configuration.
pub fn length_between(field: &str, value: &str, min: usize, max: usize) -> Option<FieldError> {
    let len = value.chars().count();
    (!(min..=max).contains(&len)).then(|| FieldError::new(field, format!("{field} must be between {min} and {max} characters")))
}
