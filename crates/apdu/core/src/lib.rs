//! Core traits and types for APDU (Application Protocol Data Unit) operations
//!
//! This crate provides the foundational types used to talk to a secure element
//! with a simplified ISO/IEC 7816-4 command/response exchange.
//!
//! ## Overview
//!
//! - Building command frames (CLA, INS, P1, P2, optional Lc + data, optional Le)
//! - Splitting raw responses into data and a status word
//! - Abstracting the byte channel the frames travel over
//! - Executing typed commands and mapping failures to local status words
//!
//! Only short (non-extended) APDUs are supported.
#![cfg_attr(not(test), warn(unused_crate_dependencies))]
#![forbid(unsafe_code)]
#![warn(missing_docs, rustdoc::missing_crate_level_docs)]

// Re-export bytes for convenience
pub use bytes::{Bytes, BytesMut};

// Main modules
pub mod card;
pub mod command;
pub mod error;
pub mod executor;
pub mod response;
pub mod transport;

pub use card::CardExecutor;
pub use command::{ApduCommand, Command, CommandError, ExpectedLength, build_frame};
pub use error::{Error, ResultExt};
pub use executor::Executor;
pub use response::status::StatusWord;
pub use response::{Response, split_response};
pub use transport::{CardTransport, TransportError};

/// Prelude module containing commonly used traits and types
pub mod prelude {
    // Core types
    pub use crate::{Bytes, BytesMut, Error, ResultExt};

    // Command related
    pub use crate::command::{ApduCommand, Command, CommandError, ExpectedLength};

    // Response related
    pub use crate::response::Response;
    pub use crate::response::status::{StatusWord, common as status};

    // Transport layer
    pub use crate::transport::{CardTransport, TransportError};

    // Executor layer
    pub use crate::card::CardExecutor;
    pub use crate::executor::Executor;
}
