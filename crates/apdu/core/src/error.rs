//! Error types for APDU operations

use crate::command::CommandError;
use crate::response::status::{StatusWord, common};
use crate::transport::TransportError;

/// Error type for APDU operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The byte channel failed or returned an unusable response
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The command could not be framed
    #[error(transparent)]
    Command(#[from] CommandError),

    /// Context with source error
    #[error("{context}: {source}")]
    Context {
        /// Contextual message
        context: String,
        /// Source error
        source: Box<Self>,
    },
}

impl Error {
    /// Create a new error with context information
    pub fn with_context<S: Into<String>>(self, context: S) -> Self {
        Self::Context {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// The error with any context layers removed
    pub fn root(&self) -> &Self {
        match self {
            Self::Context { source, .. } => source.root(),
            other => other,
        }
    }

    /// Local status word standing in for this failure
    ///
    /// These never come from a device: `6F00` for transport failures and
    /// `6700` for frames that could not be built.
    pub fn local_status(&self) -> StatusWord {
        match self.root() {
            Self::Command(_) => common::WRONG_LENGTH,
            _ => common::NO_CONNECTION,
        }
    }
}

/// Extension trait for Result with context addition
pub trait ResultExt<T> {
    /// Add context to an error
    fn context<S: Into<String>>(self, context: S) -> Result<T, Error>;
}

impl<T, E: Into<Error>> ResultExt<T> for Result<T, E> {
    fn context<S: Into<String>>(self, context: S) -> Result<T, Error> {
        self.map_err(|e| e.into().with_context(context))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_local_status_mapping() {
        let err = Error::from(TransportError::NotConnected);
        assert_eq!(err.local_status(), common::NO_CONNECTION);

        let err = Error::from(CommandError::PayloadTooLong { length: 300 })
            .with_context("framing write command");
        assert_eq!(err.local_status(), common::WRONG_LENGTH);
        assert!(matches!(err.root(), Error::Command(_)));
    }

    #[test]
    fn test_context_display() {
        let result: Result<(), TransportError> = Err(TransportError::ShortResponse { length: 1 });
        let err = result.context("reading status").unwrap_err();
        assert_eq!(
            err.to_string(),
            "reading status: Response too short: expected at least 2 bytes, got 1"
        );
    }
}
