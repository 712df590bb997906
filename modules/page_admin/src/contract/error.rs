//! Contract error types for the page admin
//!
//! These errors are transport-agnostic and used for inter-module communication.

use super::form::FieldError;

/// Page admin domain errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageAdminError {
    /// Page, content or alias not found
    NotFound {
        /// Resource type (page, content, alias)
        resource: String,
        /// Resource identifier
        id: String,
    },
    /// Capability check failed
    Forbidden {
        /// Operation that was refused
        action: String,
    },
    /// Submitted form did not validate, nothing was written
    InvalidForm {
        /// Field level errors
        errors: Vec<FieldError>,
    },
    /// Conflict (duplicate alias url, ...)
    Conflict {
        /// Conflict reason
        reason: String,
    },
    /// Request level validation error
    Validation {
        /// Validation error message
        message: String,
    },
    /// Internal error
    Internal,
}

impl PageAdminError {
    pub fn page_not_found(id: impl ToString) -> Self {
        Self::NotFound {
            resource: "page".to_string(),
            id: id.to_string(),
        }
    }

    pub fn forbidden(action: impl Into<String>) -> Self {
        Self::Forbidden {
            action: action.into(),
        }
    }

    pub fn invalid_field(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidForm {
            errors: vec![FieldError::new(field, message)],
        }
    }
}

impl std::fmt::Display for PageAdminError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound { resource, id } => {
                write!(f, "{} not found: {}", resource, id)
            }
            Self::Forbidden { action } => {
                write!(f, "Forbidden: {}", action)
            }
            Self::InvalidForm { errors } => {
                let details: Vec<String> = errors
                    .iter()
                    .map(|e| format!("{}: {}", e.field, e.message))
                    .collect();
                write!(f, "Invalid form: {}", details.join(", "))
            }
            Self::Conflict { reason } => {
                write!(f, "Conflict: {}", reason)
            }
            Self::Validation { message } => {
                write!(f, "Validation error: {}", message)
            }
            Self::Internal => {
                write!(f, "Internal error")
            }
        }
    }
}

impl std::error::Error for PageAdminError {}
