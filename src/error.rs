//! Error and diagnostic types for mailhost-config

use std::fmt;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Validation(#[from] ValidationErrors),

    #[error("Render error: {0}")]
    Render(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

/// Why a single parameter was rejected.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FieldErrorKind {
    #[error("missing required parameter")]
    Missing,

    #[error("unknown parameter")]
    Unknown,

    #[error("expected {expected}, found {found}")]
    WrongType {
        expected: &'static str,
        found: String,
    },

    #[error("expected one of {}, found '{found}'", .expected.join(", "))]
    NotInEnum {
        expected: &'static [&'static str],
        found: String,
    },

    #[error("{value} is not a valid TCP port")]
    PortOutOfRange { value: String },

    #[error("must not be empty")]
    Empty,

    #[error("must be usable as a file name")]
    InvalidFileName,

    #[error("required when {reason} is enabled")]
    RequiredForTls { reason: &'static str },
}

/// A fatal problem with one parameter of a mail host declaration.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{field}: {kind}")]
pub struct FieldError {
    pub field: String,
    pub kind: FieldErrorKind,
}

impl FieldError {
    #[must_use]
    pub fn new(field: impl Into<String>, kind: FieldErrorKind) -> Self {
        Self {
            field: field.into(),
            kind,
        }
    }
}

/// Every fatal problem found in one mail host declaration.
///
/// Validation does not stop at the first bad field, so this carries the
/// complete list in the order the parameters were checked.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("mail host '{host}' failed validation: {}", join(.errors))]
pub struct ValidationErrors {
    pub host: String,
    pub errors: Vec<FieldError>,
}

impl ValidationErrors {
    #[must_use]
    pub const fn new(host: String, errors: Vec<FieldError>) -> Self {
        Self { host, errors }
    }
}

fn join(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// A recoverable problem. Processing continues with the normalized value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Warning {
    pub field: String,
    pub kind: WarningKind,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WarningKind {
    /// An integer parameter was given as a string, e.g. `"587"`.
    LegacyStringInteger { value: String },
    /// IPv6 listeners requested on a host without an IPv6 address.
    Ipv6Unavailable,
}

impl Warning {
    #[must_use]
    pub fn new(field: impl Into<String>, kind: WarningKind) -> Self {
        Self {
            field: field.into(),
            kind,
        }
    }
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            WarningKind::LegacyStringInteger { value } => write!(
                f,
                "{}: string-encoded integer '{value}' is deprecated, use a plain integer",
                self.field
            ),
            WarningKind::Ipv6Unavailable => write!(
                f,
                "{}: IPv6 listeners are enabled but this host has no IPv6 address, \
                 the proxy will fail to start",
                self.field
            ),
        }
    }
}
