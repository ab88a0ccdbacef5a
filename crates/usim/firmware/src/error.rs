use std::path::PathBuf;

/// A record the parser could not accept
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HexError {
    /// The line does not begin with `:`
    #[error("line {line}: record does not start with ':'")]
    MissingStartCode {
        /// One-based line number
        line: usize,
    },

    /// The line ends before the fields its header announces
    #[error("line {line}: record is truncated")]
    Truncated {
        /// One-based line number
        line: usize,
    },

    /// A field is not valid hexadecimal
    #[error("line {line}: invalid hex in {field}")]
    InvalidHex {
        /// One-based line number
        line: usize,
        /// Field name
        field: &'static str,
    },

    /// The image places no data at all
    #[error("no data records found")]
    NoData,
}

/// Error type for firmware checks
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The image file could not be read
    #[error("Failed to read {}: {source}", .path.display())]
    Io {
        /// Image path
        path: PathBuf,
        /// I/O failure
        #[source]
        source: std::io::Error,
    },

    /// The image is not valid Intel HEX
    #[error(transparent)]
    Hex(#[from] HexError),
}
