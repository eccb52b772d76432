//! Global application error types and handlers.
//!
//! This module defines the service-level error taxonomy shared by every
//! domain module. Handlers turn these into HTTP responses through
//! `api::common::service_error_to_http`.

use thiserror::Error;

/// Generic service error that can be used across all entities
#[derive(Debug, Error)]
pub enum ServiceError {
    /// `fields` holds `(path, message)` pairs when the failure is tied to
    /// specific input fields.
    #[error("Validation error: {message}")]
    Validation {
        message: String,
        fields: Vec<(String, String)>,
    },

    /// Credential mismatch, unknown account or a bad token. The message is
    /// one of a few fixed strings and never says which check failed.
    #[error("Unauthorized: {message}")]
    Unauthorized { message: String },

    #[error("{entity} not found: {identifier}")]
    NotFound { entity: String, identifier: String },

    #[error("{entity} already exists: {identifier}")]
    AlreadyExists { entity: String, identifier: String },

    #[error("Database error: {source}")]
    Database {
        #[from]
        source: anyhow::Error,
    },

    #[error("Internal error: {message}")]
    InternalError { message: String },
}

pub type ServiceResult<T> = Result<T, ServiceError>;

impl ServiceError {
    // Helper constructors for common patterns

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
            fields: Vec::new(),
        }
    }

    pub fn invalid_field(field: impl Into<String>, message: impl Into<String>) -> Self {
        let (field, message) = (field.into(), message.into());
        Self::Validation {
            message: format!("{}: {}", field, message),
            fields: vec![(field, message)],
        }
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::Unauthorized {
            message: message.into(),
        }
    }

    pub fn not_found(entity: impl Into<String>, identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity: entity.into(),
            identifier: identifier.into(),
        }
    }

    pub fn already_exists(entity: impl Into<String>, identifier: impl Into<String>) -> Self {
        Self::AlreadyExists {
            entity: entity.into(),
            identifier: identifier.into(),
        }
    }

    pub fn internal_error(message: impl Into<String>) -> Self {
        Self::InternalError {
            message: message.into(),
        }
    }
}

impl From<validator::ValidationErrors> for ServiceError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut fields = Vec::new();
        collect_validation_messages("", &errors, &mut fields);
        fields.sort();

        let message = fields
            .iter()
            .map(|(path, message)| format!("{}: {}", path, message))
            .collect::<Vec<_>>()
            .join(", ");

        ServiceError::Validation { message, fields }
    }
}

/// Flattens nested validation errors into ("path.field", message) entries.
fn collect_validation_messages(
    prefix: &str,
    errors: &validator::ValidationErrors,
    out: &mut Vec<(String, String)>,
) {
    use validator::ValidationErrorsKind;

    for (field, kind) in errors.errors() {
        let path = if prefix.is_empty() {
            field.to_string()
        } else {
            format!("{}.{}", prefix, field)
        };

        match kind {
            ValidationErrorsKind::Field(field_errors) => {
                out.extend(field_errors.iter().map(|error| {
                    (
                        path.clone(),
                        error
                            .message
                            .as_deref()
                            .unwrap_or("Invalid value")
                            .to_string(),
                    )
                }));
            }
            ValidationErrorsKind::Struct(nested) => {
                collect_validation_messages(&path, nested, out);
            }
            ValidationErrorsKind::List(items) => {
                for (index, nested) in items {
                    collect_validation_messages(&format!("{}[{}]", path, index), nested, out);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    #[derive(Validate)]
    struct Sample {
        #[validate(length(min = 1, message = "Name is required"))]
        name: String,
        #[validate(length(min = 1, message = "Email is required"))]
        email: String,
    }

    #[test]
    fn test_validation_errors_are_flattened_in_field_order() {
        let sample = Sample {
            name: String::new(),
            email: String::new(),
        };
        let error: ServiceError = sample.validate().unwrap_err().into();

        match error {
            ServiceError::Validation { message, fields } => {
                assert_eq!(message, "email: Email is required, name: Name is required");
                assert_eq!(fields.len(), 2);
                assert_eq!(fields[0], ("email".to_string(), "Email is required".to_string()));
            }
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[derive(Validate)]
    struct Outer {
        #[validate(nested)]
        inner: Vec<Inner>,
    }

    #[derive(Validate)]
    struct Inner {
        #[validate(range(min = 0, message = "Step must not be negative"))]
        step: i64,
    }

    #[test]
    fn test_nested_errors_carry_their_path() {
        let outer = Outer {
            inner: vec![Inner { step: 1 }, Inner { step: -1 }],
        };
        let error: ServiceError = outer.validate().unwrap_err().into();

        match error {
            ServiceError::Validation { message, fields } => {
                assert_eq!(message, "inner[1].step: Step must not be negative");
                assert_eq!(fields[0].0, "inner[1].step");
            }
            other => panic!("expected validation error, got {:?}", other),
        }
    }
}
