// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use serde_json::Value;

use crate::{DashboardSummary, Record};

/// Failure of a call to the case-management backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendError {
    /// The request never produced an HTTP response.
    Network(String),
    /// The server answered with a non-success status.
    Rejected {
        status: u16,
        message: Option<String>,
    },
    /// No session, or the server refused the token.
    Unauthorized,
    /// A success response whose body could not be read.
    Decode(String),
}

impl BackendError {
    /// The server's own message when it sent one, otherwise `generic`.
    pub fn user_message(&self, generic: &str) -> String {
        match self {
            Self::Rejected {
                message: Some(message),
                ..
            } if !message.trim().is_empty() => message.clone(),
            Self::Unauthorized => self.to_string(),
            _ => generic.to_owned(),
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized)
    }
}

impl std::fmt::Display for BackendError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Network(detail) => write!(f, "cannot reach the server ({detail})"),
            Self::Rejected {
                status,
                message: Some(message),
            } => write!(f, "server error ({status}): {message}"),
            Self::Rejected {
                status,
                message: None,
            } => write!(f, "server returned {status}"),
            Self::Unauthorized => {
                f.write_str("invalid or expired token -- run `docket login` and retry")
            }
            Self::Decode(detail) => write!(f, "unexpected response from server: {detail}"),
        }
    }
}

impl std::error::Error for BackendError {}

pub type BackendResult<T> = std::result::Result<T, BackendError>;

/// The CRUD surface every management screen talks to.
///
/// Create and update return `None` when the server acknowledged the write
/// without echoing the persisted record.
pub trait Backend: Sync {
    fn list<T: Record>(&self) -> BackendResult<Vec<T>>;
    fn create<T: Record>(&self, payload: &Value) -> BackendResult<Option<T>>;
    fn update<T: Record>(&self, id: T::Id, payload: &Value) -> BackendResult<Option<T>>;
    fn delete<T: Record>(&self, id: T::Id) -> BackendResult<()>;
    fn dashboard(&self) -> BackendResult<DashboardSummary>;
}
