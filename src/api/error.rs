//! API client errors.

use crate::session::SessionError;

/// Coarse failure class, used by callers that only need to branch on the
/// kind of failure (the route guard collapses all of them).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// No credential available locally; no request was sent.
    AbsentCredential,
    /// The backend refused the credential (401/403).
    AuthRejected,
    /// The request never produced a response.
    Transport,
    /// The backend answered with any other non-2xx status.
    Rejected,
    /// Local failure unrelated to the backend's verdict.
    Local,
}

/// Errors produced by API client operations.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// No session token is stored.
    #[error("not logged in: no session token stored")]
    MissingToken,

    /// Login requires OAuth2 client credentials that are not configured.
    #[error("missing client credentials: set FISHON_API_CLIENT_ID and FISHON_API_CLIENT_SECRET")]
    MissingClientCredentials,

    /// An endpoint path placeholder had no value.
    #[error("{operation}: missing path parameter `{param}`")]
    MissingPathParam { operation: &'static str, param: String },

    /// The HTTP request failed before a response arrived.
    #[error("{operation}: request failed: {message}")]
    Transport { operation: &'static str, message: String },

    /// The backend returned a non-success HTTP status.
    #[error("{operation}: backend returned status {status}")]
    Status { operation: &'static str, status: u16, body: serde_json::Value },

    /// A success response lacked a field the client needs.
    #[error("{operation}: response is missing `{field}`")]
    MissingField { operation: &'static str, field: &'static str },

    /// The underlying HTTP client could not be constructed.
    #[error("HTTP client build failed: {0}")]
    HttpClientBuild(String),

    /// The session store could not be updated.
    #[error(transparent)]
    Session(#[from] SessionError),
}

impl ApiError {
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::MissingToken | Self::MissingClientCredentials => ErrorKind::AbsentCredential,
            Self::Status { status: 401 | 403, .. } => ErrorKind::AuthRejected,
            Self::Status { .. } => ErrorKind::Rejected,
            Self::Transport { .. } => ErrorKind::Transport,
            Self::MissingPathParam { .. } | Self::MissingField { .. } | Self::HttpClientBuild(_) | Self::Session(_) => {
                ErrorKind::Local
            }
        }
    }

    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::MissingToken => "E_MISSING_TOKEN",
            Self::MissingClientCredentials => "E_MISSING_CLIENT_CREDENTIALS",
            Self::MissingPathParam { .. } => "E_MISSING_PATH_PARAM",
            Self::Transport { .. } => "E_API_REQUEST",
            Self::Status { .. } => "E_API_RESPONSE",
            Self::MissingField { .. } => "E_MISSING_FIELD",
            Self::HttpClientBuild(_) => "E_HTTP_CLIENT_BUILD",
            Self::Session(e) => e.error_code(),
        }
    }

    /// HTTP status of a backend rejection, if this is one.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}
