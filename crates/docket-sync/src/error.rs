// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use docket_app::{BackendError, ValidationError};

/// Why a submit or delete did not go through. Every variant is recoverable
/// by retrying.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncError {
    /// The draft failed local checks; nothing was sent.
    Invalid(ValidationError),
    /// The backend call failed. `message` is what the user should see.
    Failed {
        message: String,
        source: BackendError,
    },
    /// A submission from this form is still in flight.
    Busy,
}

impl SyncError {
    pub(crate) fn failed(source: BackendError, generic: &str) -> Self {
        Self::Failed {
            message: source.user_message(generic),
            source,
        }
    }

    pub fn user_message(&self) -> String {
        match self {
            Self::Invalid(error) => error.to_string(),
            Self::Failed { message, .. } => message.clone(),
            Self::Busy => "a submission is already in progress".to_owned(),
        }
    }
}

impl std::fmt::Display for SyncError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.user_message())
    }
}

impl std::error::Error for SyncError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Invalid(error) => Some(error),
            Self::Failed { source, .. } => Some(source),
            Self::Busy => None,
        }
    }
}

impl From<ValidationError> for SyncError {
    fn from(error: ValidationError) -> Self {
        Self::Invalid(error)
    }
}

#[cfg(test)]
mod tests {
    use super::SyncError;
    use docket_app::{BackendError, ValidationError};

    #[test]
    fn failed_prefers_server_message() {
        let error = SyncError::failed(
            BackendError::Rejected {
                status: 409,
                message: Some("Email already exists".to_owned()),
            },
            "Failed to save client",
        );
        assert_eq!(error.to_string(), "Email already exists");
    }

    #[test]
    fn invalid_shows_validation_text() {
        let error = SyncError::from(ValidationError::MissingField("title"));
        assert_eq!(error.user_message(), "title is required");
    }
}
