//! Error types and handling for the hostel finder application

use thiserror::Error;

/// Closed set of user-facing authentication failure kinds.
///
/// Identity provider error codes are folded into this set before they
/// reach the presentation layer; unrecognized codes become `Unknown`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthErrorKind {
    /// Wrong password for an existing account
    InvalidCredentials,
    /// No account exists for the given email
    UnknownAccount,
    /// Email address is not syntactically valid
    InvalidEmailFormat,
    /// Provider throttled the request
    RateLimited,
    /// Account exists but the email has not been verified
    UnverifiedEmail,
    /// Anything the provider reported that we do not recognize
    Unknown,
}

/// Main error type for the hostel finder application
#[derive(Error, Debug)]
pub enum HostelError {
    /// Input validation errors; rejected before any network call
    #[error("Invalid input: {message}")]
    Validation { message: String },

    /// The geocoder returned no match for the city
    #[error("Could not resolve city: {city}")]
    Geocode { city: String },

    /// Upstream service failure or malformed response
    #[error("Upstream query failed: {message}")]
    Query { message: String },

    /// Upstream call exceeded the configured timeout
    #[error("Upstream query timed out: {message}")]
    QueryTimeout { message: String },

    /// Detail lookup matched no element
    #[error("Hostel not found")]
    NotFound,

    /// Identity provider failures, mapped to the closed kind set
    #[error("Authentication failed: {message}")]
    Auth {
        kind: AuthErrorKind,
        message: String,
    },

    /// Configuration-related errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// I/O operation errors
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
}

impl HostelError {
    /// Create a new validation error
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Create a new geocode error for an unresolvable city
    pub fn geocode<S: Into<String>>(city: S) -> Self {
        Self::Geocode { city: city.into() }
    }

    /// Create a new upstream query error
    pub fn query<S: Into<String>>(message: S) -> Self {
        Self::Query {
            message: message.into(),
        }
    }

    /// Create a new authentication error
    pub fn auth<S: Into<String>>(kind: AuthErrorKind, message: S) -> Self {
        Self::Auth {
            kind,
            message: message.into(),
        }
    }

    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Classify a transport failure, separating timeouts from other
    /// connection and protocol errors.
    pub fn from_transport(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::QueryTimeout {
                message: err.to_string(),
            }
        } else {
            Self::Query {
                message: err.to_string(),
            }
        }
    }

    /// Get a user-friendly error message
    ///
    /// This is the only error text allowed to cross the presentation
    /// boundary; raw upstream payloads never do.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            HostelError::Validation { message } => {
                format!("Invalid input: {message}")
            }
            HostelError::Geocode { city } => {
                format!("No location found for \"{city}\".")
            }
            HostelError::Query { .. } => {
                "Unable to reach the map data service. Please check your connection and try again."
                    .to_string()
            }
            HostelError::QueryTimeout { .. } => {
                "The map data service took too long to respond. Please try again.".to_string()
            }
            HostelError::NotFound => "Hostel not found".to_string(),
            HostelError::Auth { kind, .. } => kind.user_message().to_string(),
            HostelError::Config { .. } => {
                "Configuration error. Please check your config file and API keys.".to_string()
            }
            HostelError::Io { .. } => {
                "File operation failed. Please check file permissions.".to_string()
            }
        }
    }
}

impl AuthErrorKind {
    /// Human-readable message for this failure kind
    #[must_use]
    pub fn user_message(&self) -> &'static str {
        match self {
            AuthErrorKind::InvalidCredentials => "Incorrect email or password.",
            AuthErrorKind::UnknownAccount => "No account exists for this email address.",
            AuthErrorKind::InvalidEmailFormat => "Please enter a valid email address.",
            AuthErrorKind::RateLimited => {
                "Too many attempts. Please wait a moment before trying again."
            }
            AuthErrorKind::UnverifiedEmail => "Please verify your email before logging in.",
            AuthErrorKind::Unknown => "Authentication failed. Please try again.",
        }
    }
}
