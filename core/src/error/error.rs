use super::transport::TransportError;
use crate::session::TransitionError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error(transparent)]
    Transport(#[from] TransportError),
    #[error("server returned {status}: {detail}")]
    Status { status: u16, detail: String },
    #[error("session expired, signed out")]
    SessionExpired,
    #[error("unexpected response body: {0}")]
    Decode(String),
}

impl ApiError {
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }

    /// Connect or timeout failure: the server is unreachable rather than refusing.
    pub fn is_offline(&self) -> bool {
        matches!(self, Self::Transport(e) if e.is_unreachable())
    }

    /// Human readable reason, preferring the server-provided detail.
    pub fn detail(&self) -> String {
        match self {
            Self::Status { detail, .. } => detail.clone(),
            other => other.to_string(),
        }
    }
}

#[derive(Error, Debug)]
pub enum AuthError {
    #[error("verification code must be 6 digits")]
    InvalidCode,
    #[error("authentication rejected: {0}")]
    Rejected(String),
    #[error("no login in progress")]
    NoPendingLogin,
    #[error(transparent)]
    Transition(#[from] TransitionError),
    #[error(transparent)]
    Api(ApiError),
}

impl From<ApiError> for AuthError {
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::Status { status: 400 | 401, detail } => AuthError::Rejected(detail),
            other => AuthError::Api(other),
        }
    }
}

/// Failures of workspace controller actions (sidebar, history, status bar).
#[derive(Error, Debug)]
pub enum WorkspaceError {
    #[error("no file is open")]
    NoOpenFile,
    #[error("unknown file id {0}")]
    UnknownFile(i64),
    #[error("file name must not be empty")]
    EmptyName,
    #[error("import data is not valid: {0}")]
    InvalidImport(#[source] serde_json::Error),
    #[error(transparent)]
    Api(#[from] ApiError),
}

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("storage io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("storage serde error: {0}")]
    Serde(#[from] serde_json::Error),
}
