//! Structured errors for the JSON entry point.
//!
//! Every failure leaving the façade is a [`CoreError`] whose [`ErrorCode`]
//! lets a caller tell environment problems (not a repository, git failing,
//! a cancelled request) from "no symbol index attached yet" and from bad
//! input.

use std::fmt;

use churnlens_git::GitError;
use churnlens_settings::SettingsError;
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    /// The path is not inside a git work tree.
    NotARepository,
    /// A git subprocess could not run or exited non-zero.
    VcsFailure,
    /// The request's cancel token fired or its deadline passed.
    Cancelled,
    /// Change analysis was requested before a symbol index and parser were attached.
    NotReady,
    InvalidJson,
    InvalidSettings,
    UnknownMode,
    InternalError,
}

impl ErrorCode {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorCode::NotARepository => "not_a_repository",
            ErrorCode::VcsFailure => "vcs_failure",
            ErrorCode::Cancelled => "cancelled",
            ErrorCode::NotReady => "not_ready",
            ErrorCode::InvalidJson => "invalid_json",
            ErrorCode::InvalidSettings => "invalid_settings",
            ErrorCode::UnknownMode => "unknown_mode",
            ErrorCode::InternalError => "internal_error",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoreError {
    pub code: ErrorCode,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl CoreError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: None,
        }
    }

    #[must_use]
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    pub fn not_ready(what: &str) -> Self {
        Self::new(ErrorCode::NotReady, format!("{what} is not attached yet"))
    }

    pub fn invalid_json(err: impl fmt::Display) -> Self {
        Self::new(ErrorCode::InvalidJson, format!("Invalid JSON: {err}"))
    }

    pub fn invalid_settings(err: impl fmt::Display) -> Self {
        Self::new(ErrorCode::InvalidSettings, format!("Invalid settings: {err}"))
    }

    pub fn invalid_field(field: &str, expected: &str) -> Self {
        Self::new(
            ErrorCode::InvalidSettings,
            format!("Invalid value for '{field}': expected {expected}"),
        )
    }

    pub fn unknown_mode(mode: &str) -> Self {
        Self::new(ErrorCode::UnknownMode, format!("Unknown mode: {mode}"))
    }

    pub fn internal(err: impl fmt::Display) -> Self {
        Self::new(ErrorCode::InternalError, format!("Internal error: {err}"))
    }

    /// Whether the caller may retry once the engine is fully assembled.
    #[must_use]
    pub fn is_not_ready(&self) -> bool {
        self.code == ErrorCode::NotReady
    }
}

impl fmt::Display for CoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.details {
            Some(details) => write!(f, "[{}] {}: {}", self.code, self.message, details),
            None => write!(f, "[{}] {}", self.code, self.message),
        }
    }
}

impl std::error::Error for CoreError {}

fn git_code(err: &GitError) -> ErrorCode {
    match err {
        GitError::NotARepository { .. } => ErrorCode::NotARepository,
        GitError::Cancelled { .. } => ErrorCode::Cancelled,
        GitError::MissingBaseRef => ErrorCode::InvalidSettings,
        GitError::Spawn { .. }
        | GitError::CommandFailed { .. }
        | GitError::InvalidOutput { .. }
        | GitError::Io(_) => ErrorCode::VcsFailure,
    }
}

impl From<GitError> for CoreError {
    fn from(err: GitError) -> Self {
        Self::new(git_code(&err), err.to_string())
    }
}

impl From<SettingsError> for CoreError {
    fn from(err: SettingsError) -> Self {
        Self::invalid_settings(err)
    }
}

impl From<serde_json::Error> for CoreError {
    fn from(err: serde_json::Error) -> Self {
        Self::invalid_json(err)
    }
}

/// Classify by the first [`GitError`] or [`SettingsError`] in the chain.
/// The outermost context becomes the message and the full chain the details.
impl From<anyhow::Error> for CoreError {
    fn from(err: anyhow::Error) -> Self {
        let code = err
            .chain()
            .find_map(|cause| {
                if let Some(git) = cause.downcast_ref::<GitError>() {
                    Some(git_code(git))
                } else {
                    cause
                        .downcast_ref::<SettingsError>()
                        .map(|_| ErrorCode::InvalidSettings)
                }
            })
            .unwrap_or(ErrorCode::InternalError);
        let out = Self::new(code, err.to_string());
        if err.chain().count() > 1 {
            out.with_details(format!("{err:#}"))
        } else {
            out
        }
    }
}

/// `{"ok": true, "data": ...}` or `{"ok": false, "error": {...}}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResponseEnvelope {
    pub ok: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<CoreError>,
}

impl ResponseEnvelope {
    #[must_use]
    pub fn success(data: Value) -> Self {
        Self {
            ok: true,
            data: Some(data),
            error: None,
        }
    }

    #[must_use]
    pub fn error(err: &CoreError) -> Self {
        Self {
            ok: false,
            data: None,
            error: Some(err.clone()),
        }
    }

    /// Serialize, falling back to a minimal hand-built error envelope.
    #[must_use]
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|err| {
            format!(
                r#"{{"ok":false,"error":{{"code":"internal_error","message":{}}}}}"#,
                Value::String(err.to_string())
            )
        })
    }
}
