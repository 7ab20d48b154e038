//! Error types for wedding-rsvp
//!
//! Provides structured error handling with:
//! - Numeric error codes for machine parsing
//! - User-friendly messages with suggestions
//! - A split between backend failures (message shown verbatim to the guest)
//!   and unexpected failures (generic message)
//! - Exit codes for CLI

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for wedding-rsvp operations
pub type Result<T> = std::result::Result<T, Error>;

/// Numeric error codes for machine parsing and documentation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u16)]
pub enum ErrorCode {
    // Configuration errors (1xx)
    ConfigNotFound = 100,
    ConfigParseError = 101,
    ConfigValidation = 102,

    // IO errors (2xx)
    IoRead = 200,
    IoWrite = 201,
    IoPermission = 202,
    IoNotFound = 203,

    // Key-value storage errors (3xx)
    StorageCorrupt = 300,

    // Backend errors (4xx)
    BackendRequest = 400,
    BackendTimeout = 401,
    BackendRejected = 402,
    SubmissionFailed = 404,

    // Wizard errors (5xx)
    ValidationFailed = 500,
    InvalidTransition = 501,
    SubmissionInFlight = 502,
    PersonaNotSelected = 503,
    UnknownPersona = 504,

    // Internal errors (9xx)
    InternalError = 900,
}

impl ErrorCode {
    /// Get the string code (e.g., "E100")
    pub fn as_str(&self) -> String {
        format!("E{}", *self as u16)
    }

    /// Get the exit code for CLI (maps to 1-125 range)
    pub fn exit_code(&self) -> i32 {
        match *self as u16 {
            100..=199 => 10, // Config errors
            200..=299 => 20, // IO errors
            300..=399 => 30, // Storage errors
            400..=499 => 40, // Backend errors
            500..=599 => 50, // Wizard errors
            900..=999 => 90, // Internal errors
            _ => 1,
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Main error type
#[derive(Error, Debug)]
pub enum Error {
    // ─────────────────────────────────────────────────────────────
    // Configuration Errors
    // ─────────────────────────────────────────────────────────────

    /// Configuration file not found
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        path: PathBuf,
        #[source]
        source: Option<std::io::Error>,
    },

    /// Configuration parse error
    #[error("Failed to parse configuration: {message}")]
    ConfigParse {
        message: String,
        #[source]
        source: Option<toml::de::Error>,
    },

    /// Configuration validation error
    #[error("Configuration validation failed: {message}")]
    ConfigValidation { message: String, field: Option<String> },

    // ─────────────────────────────────────────────────────────────
    // IO Errors
    // ─────────────────────────────────────────────────────────────

    /// File read error
    #[error("Failed to read file: {path}")]
    IoRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// File write error
    #[error("Failed to write file: {path}")]
    IoWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Generic IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// TOML serialization error
    #[error("TOML serialization error: {0}")]
    Toml(#[from] toml::ser::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // ─────────────────────────────────────────────────────────────
    // Storage Errors
    // ─────────────────────────────────────────────────────────────

    /// The key-value store exists but cannot be decoded
    #[error("Storage file {path} is corrupt: {message}")]
    StorageCorrupt { path: PathBuf, message: String },

    // ─────────────────────────────────────────────────────────────
    // Backend Errors
    // ─────────────────────────────────────────────────────────────

    /// The request never produced a response (DNS, refused, TLS, ...)
    #[error("{message}")]
    BackendRequest { backend: &'static str, message: String },

    /// The request did not complete in time
    #[error("network timeout after {timeout_secs}s")]
    BackendTimeout { backend: &'static str, timeout_secs: u64 },

    /// The backend answered with an error
    #[error("{message}")]
    BackendRejected {
        backend: &'static str,
        status: u16,
        message: String,
    },

    /// A submission ran and the response was not saved
    #[error("{message}")]
    SubmissionFailed { message: String },

    // ─────────────────────────────────────────────────────────────
    // Wizard Errors
    // ─────────────────────────────────────────────────────────────

    /// Required RSVP fields are missing or malformed
    #[error("Missing information: {}", fields.join(", "))]
    ValidationFailed { fields: Vec<String> },

    /// The current step does not accept this action
    #[error("Cannot {action} from the {step} step")]
    InvalidTransition {
        step: &'static str,
        action: &'static str,
    },

    /// A submission is already running on this wizard
    #[error("An RSVP submission is already in progress")]
    SubmissionInFlight,

    /// No persona has been chosen yet
    #[error("No character selected")]
    PersonaNotSelected,

    /// A persona identifier outside the known set
    #[error("Unknown character '{value}'. Valid: wesley, heather, puffy")]
    UnknownPersona { value: String },

    // ─────────────────────────────────────────────────────────────
    // Internal Errors
    // ─────────────────────────────────────────────────────────────

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    // ─────────────────────────────────────────────────────────────
    // Error Classification
    // ─────────────────────────────────────────────────────────────

    /// Get the numeric error code
    pub fn code(&self) -> ErrorCode {
        match self {
            Error::ConfigNotFound { .. } => ErrorCode::ConfigNotFound,
            Error::ConfigParse { .. } => ErrorCode::ConfigParseError,
            Error::ConfigValidation { .. } => ErrorCode::ConfigValidation,

            Error::IoRead { .. } => ErrorCode::IoRead,
            Error::IoWrite { .. } => ErrorCode::IoWrite,
            Error::Io(e) => match e.kind() {
                std::io::ErrorKind::NotFound => ErrorCode::IoNotFound,
                std::io::ErrorKind::PermissionDenied => ErrorCode::IoPermission,
                _ => ErrorCode::IoRead,
            },
            Error::Toml(_) => ErrorCode::ConfigParseError,
            Error::Json(_) => ErrorCode::StorageCorrupt,

            Error::StorageCorrupt { .. } => ErrorCode::StorageCorrupt,

            Error::BackendRequest { .. } => ErrorCode::BackendRequest,
            Error::BackendTimeout { .. } => ErrorCode::BackendTimeout,
            Error::BackendRejected { .. } => ErrorCode::BackendRejected,
            Error::SubmissionFailed { .. } => ErrorCode::SubmissionFailed,

            Error::ValidationFailed { .. } => ErrorCode::ValidationFailed,
            Error::InvalidTransition { .. } => ErrorCode::InvalidTransition,
            Error::SubmissionInFlight => ErrorCode::SubmissionInFlight,
            Error::PersonaNotSelected => ErrorCode::PersonaNotSelected,
            Error::UnknownPersona { .. } => ErrorCode::UnknownPersona,

            Error::Internal(_) => ErrorCode::InternalError,
        }
    }

    /// Whether the backend reported this failure while storing a record.
    ///
    /// These carry a message meant for the guest; everything else is shown
    /// as a generic failure.
    pub fn is_backend_failure(&self) -> bool {
        matches!(
            self,
            Error::BackendRequest { .. }
                | Error::BackendTimeout { .. }
                | Error::BackendRejected { .. }
        )
    }

    /// Check if repeating the same action may succeed
    pub fn is_retryable(&self) -> bool {
        match self {
            Error::BackendRequest { .. }
            | Error::BackendTimeout { .. }
            | Error::SubmissionInFlight
            | Error::Io(_)
            | Error::IoRead { .. }
            | Error::IoWrite { .. } => true,
            Error::BackendRejected { status, .. } => *status >= 500 || *status == 429,
            _ => false,
        }
    }

    /// Get the exit code for CLI
    pub fn exit_code(&self) -> i32 {
        self.code().exit_code()
    }

    // ─────────────────────────────────────────────────────────────
    // User-Friendly Messages
    // ─────────────────────────────────────────────────────────────

    /// Get a user-friendly suggestion for how to fix this error
    pub fn suggestion(&self) -> Option<&'static str> {
        match self {
            Error::ConfigNotFound { .. } => Some(
                "Run 'wedding-rsvp config init' to create a default configuration file."
            ),
            Error::ConfigParse { .. } => Some(
                "Check your configuration file syntax. Run 'wedding-rsvp config validate' to see details."
            ),
            Error::ConfigValidation { .. } => Some(
                "Review the configuration file and fix the invalid values."
            ),

            Error::StorageCorrupt { .. } => Some(
                "Run 'wedding-rsvp persona clear' to reset the saved character."
            ),

            Error::BackendRequest { .. }
            | Error::BackendTimeout { .. }
            | Error::SubmissionFailed { .. } => Some(
                "Check your network connection and try submitting again."
            ),
            Error::BackendRejected { .. } => Some(
                "The RSVP service refused the response. Check the backend url, api_key and table."
            ),

            Error::ValidationFailed { .. } => Some(
                "Name, email and attendance are required."
            ),
            Error::SubmissionInFlight => Some(
                "Wait for the current submission to finish."
            ),
            Error::PersonaNotSelected => Some(
                "Run 'wedding-rsvp persona select <wesley|heather|puffy>' first."
            ),
            Error::UnknownPersona { .. } => Some(
                "Run 'wedding-rsvp persona list' to see the available characters."
            ),

            _ => None,
        }
    }

    /// Format the error for terminal display with colors
    pub fn format_for_terminal(&self) -> String {
        let code = self.code();
        let suggestion = self.suggestion();

        let mut output = format!(
            "\x1b[31mError [{}]\x1b[0m: {}\n",
            code.as_str(),
            self
        );

        if let Some(hint) = suggestion {
            output.push_str(&format!("\n\x1b[33mHint\x1b[0m: {}\n", hint));
        }

        output
    }

    /// Format the error for logging (no colors)
    pub fn format_for_log(&self) -> String {
        let code = self.code();
        format!("[{}] {}", code.as_str(), self)
    }
}

// ─────────────────────────────────────────────────────────────────
// Error Constructors (for ergonomic error creation)
// ─────────────────────────────────────────────────────────────────

impl Error {
    /// Create a config not found error
    pub fn config_not_found(path: impl Into<PathBuf>) -> Self {
        Error::ConfigNotFound {
            path: path.into(),
            source: None,
        }
    }

    /// Create a config validation error
    pub fn config_validation(message: impl Into<String>) -> Self {
        Error::ConfigValidation {
            message: message.into(),
            field: None,
        }
    }

    /// Create a config validation error with field name
    pub fn config_field_invalid(field: impl Into<String>, message: impl Into<String>) -> Self {
        Error::ConfigValidation {
            message: message.into(),
            field: Some(field.into()),
        }
    }

    /// Create a backend request error
    pub fn backend_request(backend: &'static str, message: impl Into<String>) -> Self {
        Error::BackendRequest {
            backend,
            message: message.into(),
        }
    }

    /// Create a backend rejection error
    pub fn backend_rejected(backend: &'static str, status: u16, message: impl Into<String>) -> Self {
        Error::BackendRejected {
            backend,
            status,
            message: message.into(),
        }
    }
}

// ─────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────
