//! Firmware size checking for Intel HEX images
//!
//! The card firmware must fit in the linearly addressable flash. This crate
//! scans an Intel HEX image, collects the data segments it places and
//! compares the highest address reached against a configurable limit.
#![forbid(unsafe_code)]
#![warn(missing_docs, rustdoc::missing_crate_level_docs)]

mod error;
mod ihex;
mod size;

pub use error::{Error, HexError};
pub use ihex::{Segment, parse_intel_hex, read_intel_hex};
pub use size::{DEFAULT_LIMIT, DEFAULT_WARN_RATIO, SizeLimits, SizeReport, Verdict, parse_size};
