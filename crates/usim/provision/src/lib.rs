//! Provisioning protocol engine for USIM secure elements
//!
//! Provisioning writes four values to the card (IMSI, secret key K, operator
//! constant OPc and PIN), reads back the card status and optionally runs an
//! authentication self-test. Every value is validated and encoded by
//! [`codec`] before any frame is built, so nothing unvalidated reaches the wire.
//!
//! ```no_run
//! use usim_apdu_core::{CardExecutor, transport::MockTransport};
//! use usim_provision::{Profile, Provisioner, RunOptions};
//!
//! let profile = Profile::default().normalize()?;
//! let transport = MockTransport::with_response(vec![0x90u8, 0x00]);
//! let mut provisioner = Provisioner::new(CardExecutor::new(transport));
//! let report = provisioner.run(&profile, &RunOptions::default());
//! assert!(report.all_fields_succeeded());
//! # Ok::<(), usim_provision::Error>(())
//! ```
#![cfg_attr(not(test), warn(unused_crate_dependencies))]
#![forbid(unsafe_code)]
#![warn(missing_docs, rustdoc::missing_crate_level_docs)]

pub mod codec;
pub mod commands;
pub mod constants;
mod error;
mod profile;
mod provisioner;
mod report;
mod types;

pub use constants::DataType;
pub use error::{Error, Result, ValidationError};
pub use profile::{NormalizedProfile, Profile, ProfileOverrides};
pub use provisioner::{Provisioner, RunOptions};
pub use report::{ProvisioningReport, StepOutcome};
pub use types::{AuthVectors, FirmwareVersion, SimState, SimStatus};
