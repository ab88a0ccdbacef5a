//! Provisioning orchestrator
//!
//! Sequences the exchanges of a provisioning run over an [`Executor`]. The
//! executor is held as an explicit `Option`: once it is gone, or its
//! transport reports it is no longer connected, every exchange fails locally
//! with [`TransportError::NotConnected`] and nothing is written.

use tracing::{debug, info, instrument, warn};
use usim_apdu_core::{ApduCommand, CardTransport, Executor, TransportError};

use crate::codec::decode_bcd_imsi;
use crate::commands::{AuthenticateCommand, ReadConfigCommand, ResetCommand, WriteConfigCommand};
use crate::constants::{DEFAULT_RAND, DataType, IMSI_RECORD_LEN, RAND_LEN};
use crate::error::{Error, Result};
use crate::profile::NormalizedProfile;
use crate::report::{ProvisioningReport, StepOutcome};
use crate::types::{AuthVectors, SimStatus};

/// Which optional steps a run performs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunOptions {
    /// Send a reset before writing anything
    pub reset: bool,
    /// Challenge for the authentication self-test, `None` to skip it
    pub challenge: Option<[u8; RAND_LEN]>,
    /// Read the IMSI back after the status read and compare it
    pub verify_imsi: bool,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            reset: true,
            challenge: Some(DEFAULT_RAND),
            verify_imsi: false,
        }
    }
}

impl RunOptions {
    /// Set whether to reset first
    pub const fn with_reset(mut self, reset: bool) -> Self {
        self.reset = reset;
        self
    }

    /// Set the authentication challenge, `None` to skip the self-test
    pub const fn with_challenge(mut self, challenge: Option<[u8; RAND_LEN]>) -> Self {
        self.challenge = challenge;
        self
    }

    /// Set whether to verify the IMSI after writing it
    pub const fn with_verify_imsi(mut self, verify_imsi: bool) -> Self {
        self.verify_imsi = verify_imsi;
        self
    }
}

/// Drives provisioning exchanges against one card
#[derive(Debug)]
pub struct Provisioner<E: Executor> {
    executor: Option<E>,
}

impl<E: Executor> Provisioner<E> {
    /// Create a provisioner over a connected executor
    pub const fn new(executor: E) -> Self {
        Self {
            executor: Some(executor),
        }
    }

    /// Create a provisioner with no connection
    ///
    /// Every operation fails with a transport error and performs no I/O.
    pub const fn disconnected() -> Self {
        Self { executor: None }
    }

    /// Whether exchanges can currently be attempted
    pub fn is_connected(&self) -> bool {
        self.executor
            .as_ref()
            .is_some_and(|executor| executor.transport().is_connected())
    }

    /// Give back the executor, if any
    pub fn into_executor(self) -> Option<E> {
        self.executor
    }

    fn execute<C>(&mut self, command: &C) -> Result<C::Success>
    where
        C: ApduCommand<Error = Error>,
    {
        match self.executor.as_mut() {
            Some(executor) if executor.transport().is_connected() => executor.execute(command),
            _ => Err(TransportError::NotConnected.into()),
        }
    }

    /// Write one encoded field
    #[instrument(level = "debug", skip(self, encoded), fields(len = encoded.len()))]
    pub fn configure_field(&mut self, data_type: DataType, encoded: &[u8]) -> Result<()> {
        self.execute(&WriteConfigCommand::new(
            data_type,
            bytes::Bytes::copy_from_slice(encoded),
        ))
    }

    /// Read and decode the card status block
    #[instrument(level = "debug", skip(self))]
    pub fn read_status(&mut self) -> Result<SimStatus> {
        let data = self.execute(&ReadConfigCommand::status())?;
        SimStatus::try_from(data.as_ref())
    }

    /// Read back the stored IMSI digits
    #[instrument(level = "debug", skip(self))]
    pub fn read_imsi(&mut self) -> Result<String> {
        let data = self.execute(&ReadConfigCommand::imsi())?;
        if data.len() < IMSI_RECORD_LEN {
            return Err(Error::Protocol {
                operation: "read IMSI",
                expected: IMSI_RECORD_LEN,
                actual: data.len(),
            });
        }
        decode_bcd_imsi(&data[..IMSI_RECORD_LEN]).map_err(|e| Error::validation("stored IMSI", e))
    }

    /// Run the authentication self-test on a challenge
    #[instrument(level = "debug", skip(self, rand))]
    pub fn test_authentication(&mut self, rand: &[u8; RAND_LEN]) -> Result<AuthVectors> {
        self.execute(&AuthenticateCommand::new(*rand))
    }

    /// Reset the card's session state
    #[instrument(level = "debug", skip(self))]
    pub fn reset(&mut self) -> Result<()> {
        self.execute(&ResetCommand)
    }

    /// Run a full provisioning sequence
    ///
    /// Steps run in a fixed order: optional reset, IMSI, key, OPc, PIN,
    /// status read, optional IMSI verification, optional authentication
    /// self-test. A failing step is recorded and the run carries on.
    pub fn run(&mut self, profile: &NormalizedProfile, options: &RunOptions) -> ProvisioningReport {
        info!("Starting provisioning run");

        let reset = options.reset.then(|| {
            let outcome = StepOutcome::new("Reset", self.reset());
            log_outcome(&outcome);
            outcome
        });

        let fields = [
            (DataType::Imsi, profile.imsi().as_slice()),
            (DataType::Key, profile.key().as_slice()),
            (DataType::Opc, profile.opc().as_slice()),
            (DataType::Pin, profile.pin().as_slice()),
        ]
        .into_iter()
        .map(|(data_type, encoded)| {
            debug!(field = %data_type, len = encoded.len(), "Writing field");
            let result = self.configure_field(data_type, encoded);
            let outcome = StepOutcome::new(data_type.label(), result);
            log_outcome(&outcome);
            outcome
        })
        .collect::<Vec<_>>();

        let status = self.read_status();
        match &status {
            Ok(status) => info!(%status, "Card status"),
            Err(e) => warn!(error = %e, "Status read failed"),
        }

        let imsi_check = options.verify_imsi.then(|| {
            let outcome = StepOutcome::new("IMSI read-back", self.verify_imsi(profile));
            log_outcome(&outcome);
            outcome
        });

        let authentication = options.challenge.map(|rand| {
            let result = self.test_authentication(&rand);
            match &result {
                Ok(vectors) => {
                    info!(res = %hex::encode_upper(vectors.res), "Authentication test passed")
                }
                Err(e) => warn!(error = %e, "Authentication test failed"),
            }
            result
        });

        let report = ProvisioningReport {
            reset,
            fields,
            status,
            imsi_check,
            authentication,
        };
        info!(complete = report.is_complete_success(), "Provisioning run finished");
        report
    }

    fn verify_imsi(&mut self, profile: &NormalizedProfile) -> Result<()> {
        let expected =
            decode_bcd_imsi(profile.imsi()).map_err(|e| Error::validation("IMSI", e))?;
        let actual = self.read_imsi()?;
        if actual != expected {
            return Err(Error::ImsiMismatch { expected, actual });
        }
        Ok(())
    }
}

fn log_outcome(outcome: &StepOutcome) {
    match &outcome.error {
        None => info!(step = outcome.label, "OK"),
        Some(e) => warn!(
            step = outcome.label,
            status = ?e.status_word().map(|sw| sw.to_string()),
            error = %e,
            "Step failed"
        ),
    }
}
