//! Error types for remote calls and local validation

use std::fmt;

/// A remote capability of the mail provider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    CheckAccess,
    RequestAccess,
    ListMessages,
    GetMessage,
    GetLabels,
    GetMessageCount,
    SendMessage,
    ListDrafts,
    CreateDraft,
    ModifyMessage,
}

impl Operation {
    /// Human-readable name used in error messages and logs
    pub fn name(self) -> &'static str {
        match self {
            Operation::CheckAccess => "check access",
            Operation::RequestAccess => "request access",
            Operation::ListMessages => "list messages",
            Operation::GetMessage => "get message",
            Operation::GetLabels => "get labels",
            Operation::GetMessageCount => "get message count",
            Operation::SendMessage => "send message",
            Operation::ListDrafts => "list drafts",
            Operation::CreateDraft => "create draft",
            Operation::ModifyMessage => "modify message",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Local validation failures that block an action before any network call
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Please specify at least one recipient")]
    MissingRecipient,
}

/// Errors surfaced by the mail service and the state machine
#[derive(Debug, thiserror::Error)]
pub enum MailError {
    #[error("Access denied while trying to {operation}")]
    AccessDenied { operation: Operation },

    #[error("Failed to {operation}: {message}")]
    RemoteRequestFailed {
        operation: Operation,
        status: Option<u16>,
        message: String,
    },

    #[error("Invalid response to {operation}: {message}")]
    InvalidResponse { operation: Operation, message: String },

    #[error(transparent)]
    Validation(#[from] ValidationError),
}

impl MailError {
    /// Error for a non-success HTTP status
    pub fn status(operation: Operation, status: u16) -> Self {
        if status == 401 || status == 403 {
            return MailError::AccessDenied { operation };
        }
        MailError::RemoteRequestFailed {
            operation,
            status: Some(status),
            message: format!("HTTP status {}", status),
        }
    }

    /// Error for a request that never produced a status (connection, TLS, ...)
    pub fn transport(operation: Operation, message: impl Into<String>) -> Self {
        MailError::RemoteRequestFailed {
            operation,
            status: None,
            message: message.into(),
        }
    }

    /// The remote operation that failed, if any
    pub fn operation(&self) -> Option<Operation> {
        match self {
            MailError::AccessDenied { operation }
            | MailError::RemoteRequestFailed { operation, .. }
            | MailError::InvalidResponse { operation, .. } => Some(*operation),
            MailError::Validation(_) => None,
        }
    }
}

pub type Result<T, E = MailError> = std::result::Result<T, E>;
