//! Serial-line transport for APDU operations
//!
//! Frames are written to a duplex byte channel (normally a USB serial adapter
//! wired to the secure element), then after a fixed wait the available bytes
//! are read back as the response. The settle and read delays are plain
//! configuration values in [`SerialConfig`].
#![cfg_attr(not(test), warn(unused_crate_dependencies))]
#![forbid(unsafe_code)]
#![warn(missing_docs, rustdoc::missing_crate_level_docs)]

mod channel;
mod config;
mod transport;

pub use channel::{ByteChannel, SerialChannel};
pub use config::{
    DEFAULT_BAUD_RATE, DEFAULT_MAX_RESPONSE_LEN, DEFAULT_PORT, DEFAULT_READ_WAIT,
    DEFAULT_SETTLE_DELAY, DEFAULT_TIMEOUT, SerialConfig,
};
pub use transport::SerialTransport;
