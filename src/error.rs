use serde::Serialize;
use thiserror::Error;

/// Failure reported by a resource client.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ClientError {
    #[error("network error: {0}")]
    Network(String),
    #[error("server error ({status}): {message}")]
    Server { status: u16, message: String },
}

impl ClientError {
    pub fn server(status: u16, message: impl Into<String>) -> Self {
        ClientError::Server {
            status,
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::server(404, message)
    }
}

impl From<opendal::Error> for ClientError {
    fn from(err: opendal::Error) -> Self {
        use opendal::ErrorKind;
        match err.kind() {
            ErrorKind::NotFound => ClientError::server(404, err.to_string()),
            ErrorKind::AlreadyExists | ErrorKind::ConditionNotMatch => {
                ClientError::server(409, err.to_string())
            }
            ErrorKind::PermissionDenied => ClientError::server(403, err.to_string()),
            _ => ClientError::Network(err.to_string()),
        }
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(err: serde_json::Error) -> Self {
        ClientError::server(500, format!("malformed record: {err}"))
    }
}

#[derive(Debug, Error)]
pub enum ConsoleError {
    #[error(transparent)]
    Client(#[from] ClientError),
    #[error("validation failed: {0}")]
    Validation(String),
    #[error("an edit is already in progress")]
    EditInProgress,
    #[error("no record is being edited")]
    NoPendingEdit,
    #[error("record not found: {0}")]
    UnknownRecord(String),
    #[error("invalid filter selection for {field}: {value}")]
    InvalidFilter { field: String, value: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NoticeLevel {
    Success,
    Error,
}

/// Transient, non-blocking message for the operator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.level == NoticeLevel::Error
    }
}
