//! Manifest creation errors.
//!
//! Every failure while generating a manifest funnels into [`Error`]. All
//! variants are fatal to the generation attempt that raised them; callers
//! decide whether to drop the representation or the whole stream.

use std::fmt;

/// Error raised while creating a DASH manifest.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A descriptor field or caller input was missing or out of range.
    #[error("Could not add {element} element: {reason}")]
    InvalidField {
        /// The manifest element that could not be built.
        element: &'static str,
        /// Human-readable description of the offending value.
        reason: String,
    },

    /// The server answered with a status other than 200.
    #[error("Could not get the initialization response: HTTP response code {status}")]
    HttpStatus {
        /// The HTTP status code received.
        status: u16,
    },

    /// A response header required by the delivery type was absent.
    #[error("Missing required response header: {header}")]
    MissingHeader {
        /// Name of the header that was looked up.
        header: &'static str,
    },

    /// The HTTP capability itself failed.
    #[error("{context}: {source}")]
    Transport {
        /// What was being requested when the failure happened.
        context: String,
        /// The underlying transport error.
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// The body-redirect loop of an HTML5 client did not terminate.
    #[error("Too many redirects when trying to get the streaming URL response of a HTML5 client (limit {limit})")]
    TooManyRedirects {
        /// Maximum number of requests that were attempted.
        limit: u32,
    },

    /// Server-provided timing metadata did not match the expected grammar.
    #[error("Could not parse {what}: {reason}")]
    Parse {
        /// What was being parsed (e.g. "segment durations").
        what: &'static str,
        /// Why parsing failed.
        reason: String,
    },

    /// A tuning parameter (cache size, clear factor, ...) was rejected.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Writing the manifest document to a string failed.
    #[error("Could not convert the generated DASH manifest to a string: {0}")]
    Serialization(String),
}

impl Error {
    /// Convenience constructor for [`Error::InvalidField`].
    pub fn invalid_field(element: &'static str, reason: impl Into<String>) -> Self {
        Error::InvalidField {
            element,
            reason: reason.into(),
        }
    }

    /// Convenience constructor for [`Error::Transport`].
    pub fn transport(
        context: impl Into<String>,
        source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        Error::Transport {
            context: context.into(),
            source: source.into(),
        }
    }

    /// Convenience constructor for [`Error::Parse`].
    pub fn parse(what: &'static str, reason: impl fmt::Display) -> Self {
        Error::Parse {
            what,
            reason: reason.to_string(),
        }
    }

    /// Convenience constructor for [`Error::Serialization`].
    pub fn serialization(reason: impl fmt::Display) -> Self {
        Error::Serialization(reason.to_string())
    }

    /// Convenience constructor for [`Error::Validation`].
    pub fn validation(msg: impl Into<String>) -> Self {
        Error::Validation(msg.into())
    }

    /// Whether the failure came from the network side rather than from the
    /// descriptor or the document.
    pub fn is_network(&self) -> bool {
        matches!(
            self,
            Error::HttpStatus { .. }
                | Error::MissingHeader { .. }
                | Error::Transport { .. }
                | Error::TooManyRedirects { .. }
        )
    }
}

/// Result alias using the crate-level [`Error`].
pub type Result<T> = std::result::Result<T, Error>;
