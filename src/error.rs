//! Error taxonomy shared by settings construction, run loading and serialization.

use std::io;

/// Errors raised while building or writing a simulation configuration.
///
/// Domain violations surface when a section is constructed, never at
/// serialization time. The serializer only adds `Configuration` and `Io`.
#[derive(Debug, thiserror::Error)]
pub enum SimxError {
    /// A field value outside its physical domain, or malformed date/time text.
    #[error("invalid value for `{field}`: {message}")]
    InvalidValue {
        /// Dotted field path (e.g., `"main.wind_dir"`).
        field: &'static str,
        /// Human-readable constraint description.
        message: String,
    },

    /// Arguments that are individually valid but inconsistent with each other.
    #[error("invalid argument `{field}`: {message}")]
    InvalidArgument {
        /// Dotted field path.
        field: &'static str,
        /// Human-readable constraint description.
        message: String,
    },

    /// A run description that cannot produce a complete aggregate.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Failure to open, write or close the output resource, including
    /// failures surfaced through the XML writer.
    #[error("i/o error: {0}")]
    Io(#[from] io::Error),
}

impl SimxError {
    pub(crate) fn invalid_value(field: &'static str, message: impl Into<String>) -> Self {
        Self::InvalidValue {
            field,
            message: message.into(),
        }
    }

    pub(crate) fn invalid_argument(field: &'static str, message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            field,
            message: message.into(),
        }
    }
}

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, SimxError>;
