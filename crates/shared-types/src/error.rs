use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Categorization of application errors.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum AppErrorKind {
    /// Rejected locally before any network call.
    ValidationError,
    /// Missing or expired token, or rejected credentials.
    Unauthorized,
    /// The request never produced an HTTP response.
    Network,
    /// The backend answered with a non-2xx status.
    Backend,
    /// Local data is not in a state the action needs (e.g. no remote id).
    Integrity,
    NotFound,
    InternalError,
}

impl fmt::Display for AppErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppErrorKind::ValidationError => write!(f, "ValidationError"),
            AppErrorKind::Unauthorized => write!(f, "Unauthorized"),
            AppErrorKind::Network => write!(f, "Network"),
            AppErrorKind::Backend => write!(f, "Backend"),
            AppErrorKind::Integrity => write!(f, "Integrity"),
            AppErrorKind::NotFound => write!(f, "NotFound"),
            AppErrorKind::InternalError => write!(f, "InternalError"),
        }
    }
}

/// Structured error surfaced by the API client and the dashboard controllers.
///
/// Every error is terminal for the action that produced it: nothing in the
/// client retries on its own. The UI renders `message` as an inline notice
/// and uses [`AppError::is_auth`] to decide whether to send the user back to
/// the login page.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AppError {
    pub kind: AppErrorKind,
    pub message: String,
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub field_errors: HashMap<String, String>,
    /// HTTP status returned by the backend, when there was one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
}

impl AppError {
    fn new(kind: AppErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            field_errors: HashMap::new(),
            status: None,
        }
    }

    pub fn validation(message: impl Into<String>, field_errors: HashMap<String, String>) -> Self {
        Self {
            field_errors,
            ..Self::new(AppErrorKind::ValidationError, message)
        }
    }

    /// Validation failure without per-field detail.
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::new(AppErrorKind::ValidationError, message)
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(AppErrorKind::Unauthorized, message)
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self::new(AppErrorKind::Network, message)
    }

    pub fn backend(status: u16, message: impl Into<String>) -> Self {
        Self {
            status: Some(status),
            ..Self::new(AppErrorKind::Backend, message)
        }
    }

    pub fn integrity(message: impl Into<String>) -> Self {
        Self::new(AppErrorKind::Integrity, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(AppErrorKind::NotFound, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(AppErrorKind::InternalError, message)
    }

    /// True when the caller should redirect to the login page.
    pub fn is_auth(&self) -> bool {
        self.kind == AppErrorKind::Unauthorized
    }

    /// Pull a human-readable message out of a backend JSON error body.
    ///
    /// The backend is not consistent about the key it uses (`msg`, `message`
    /// or `error`), so all three are tried in that order.
    pub fn backend_message(body: &str) -> Option<String> {
        let value: serde_json::Value = serde_json::from_str(body).ok()?;
        ["msg", "message", "error"]
            .iter()
            .find_map(|key| value.get(key).and_then(|v| v.as_str()))
            .map(str::to_string)
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)
    }
}

impl std::error::Error for AppError {}

#[cfg(feature = "validation")]
impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut field_errors = HashMap::new();
        for (field, errs) in errors.field_errors() {
            if let Some(first) = errs.first() {
                let msg = first
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("Valor no válido para {}", field));
                field_errors.insert(field.to_string(), msg);
            }
        }
        AppError::validation("Revisa los campos marcados.", field_errors)
    }
}

/// Result alias used throughout the client.
pub type ApiResult<T> = Result<T, AppError>;
