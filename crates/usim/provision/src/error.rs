use std::path::PathBuf;

use usim_apdu_core::prelude::{CommandError, StatusWord, TransportError, status};

/// Result type for provisioning operations
pub type Result<T> = std::result::Result<T, Error>;

/// Why a human-supplied value was rejected
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// A character outside the allowed alphabet
    #[error("invalid character {character:?} at position {position}")]
    InvalidCharacter {
        /// Offending character
        character: char,
        /// Zero-based character position
        position: usize,
    },

    /// The value does not have the one length it must have
    #[error("incorrect length: expected {expected}, got {actual}")]
    IncorrectLength {
        /// Required length
        expected: usize,
        /// Length supplied
        actual: usize,
    },

    /// The value's length is outside the allowed range
    #[error("length {value} is out of range {min}..={max}")]
    OutOfRange {
        /// Length supplied
        value: usize,
        /// Minimum allowed length
        min: usize,
        /// Maximum allowed length
        max: usize,
    },

    /// An encoded record does not follow the packing rules
    #[error("malformed record: {0}")]
    Malformed(&'static str),
}

/// Error type for provisioning operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A profile value failed validation and was not transmitted
    #[error("Invalid {field}: {source}")]
    Validation {
        /// Field name
        field: &'static str,
        /// What was wrong with it
        #[source]
        source: ValidationError,
    },

    /// The command could not be framed
    #[error(transparent)]
    Frame(#[from] CommandError),

    /// The exchange did not complete
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The card answered `90 00` but sent less data than the instruction defines
    #[error("{operation} returned {actual} data bytes, expected {expected}")]
    Protocol {
        /// Operation name
        operation: &'static str,
        /// Data length the instruction defines
        expected: usize,
        /// Data length received
        actual: usize,
    },

    /// The card rejected the command
    #[error("Card returned status {status} ({})", .status.description().unwrap_or("unrecognised"))]
    Status {
        /// Raw status word
        status: StatusWord,
    },

    /// The IMSI read back differs from the one written
    #[error("IMSI read back as {actual}, expected {expected}")]
    ImsiMismatch {
        /// IMSI in the profile
        expected: String,
        /// IMSI stored on the card
        actual: String,
    },

    /// The profile file could not be read
    #[error("Failed to read profile {}: {source}", .path.display())]
    ProfileIo {
        /// Profile file path
        path: PathBuf,
        /// I/O failure
        #[source]
        source: std::io::Error,
    },

    /// The profile file is not valid JSON
    #[error("Failed to parse profile {}: {source}", .path.display())]
    ProfileJson {
        /// Profile file path
        path: PathBuf,
        /// Parse failure
        #[source]
        source: serde_json::Error,
    },
}

impl Error {
    /// Create a validation error for the named field
    pub const fn validation(field: &'static str, source: ValidationError) -> Self {
        Self::Validation { field, source }
    }

    /// Whether the value was rejected before any I/O
    pub const fn is_validation(&self) -> bool {
        matches!(self, Self::Validation { .. })
    }

    /// Whether the failure came from the channel rather than the card
    pub const fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_))
    }

    /// Status word to report for this failure
    ///
    /// Card rejections report the card's own status. Local failures report
    /// synthesized codes: `6F00` when there is no usable connection and `6700`
    /// when the payload could not be framed.
    pub const fn status_word(&self) -> Option<StatusWord> {
        match self {
            Self::Status { status } => Some(*status),
            Self::Transport(_) => Some(status::NO_CONNECTION),
            Self::Frame(_) => Some(status::WRONG_LENGTH),
            _ => None,
        }
    }
}

impl From<usim_apdu_core::Error> for Error {
    fn from(error: usim_apdu_core::Error) -> Self {
        match error {
            usim_apdu_core::Error::Transport(e) => Self::Transport(e),
            usim_apdu_core::Error::Command(e) => Self::Frame(e),
            usim_apdu_core::Error::Context { source, .. } => Self::from(*source),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_core_error_unwraps_context() {
        let core = usim_apdu_core::Error::from(TransportError::ShortResponse { length: 1 })
            .with_context("Transport error");
        let err = Error::from(core);
        assert!(err.is_transport());
        assert_eq!(err.status_word(), Some(status::NO_CONNECTION));
    }

    #[test]
    fn test_status_words() {
        let err = Error::from(CommandError::PayloadTooLong { length: 256 });
        assert_eq!(err.status_word(), Some(status::WRONG_LENGTH));

        let err = Error::Status {
            status: StatusWord::new(0x6B, 0x00),
        };
        assert_eq!(err.status_word(), Some(StatusWord::new(0x6B, 0x00)));
        assert_eq!(err.to_string(), "Card returned status 6B00 (wrong parameters)");

        let err = Error::Protocol {
            operation: "authenticate",
            expected: 54,
            actual: 53,
        };
        assert_eq!(err.status_word(), None);
    }

    #[test]
    fn test_validation_display() {
        let err = Error::validation(
            "PIN",
            ValidationError::OutOfRange {
                value: 3,
                min: 4,
                max: 8,
            },
        );
        assert!(err.is_validation());
        assert_eq!(err.to_string(), "Invalid PIN: length 3 is out of range 4..=8");
    }
}
