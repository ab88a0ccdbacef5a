//! Run outcomes

use usim_apdu_core::StatusWord;

use crate::error::{Error, Result};
use crate::types::{AuthVectors, SimStatus};

/// Outcome of one step of a run
#[derive(Debug)]
pub struct StepOutcome {
    /// Step name
    pub label: &'static str,
    /// Why the step failed, `None` on success
    pub error: Option<Error>,
}

impl StepOutcome {
    /// Record the result of a step
    pub fn new(label: &'static str, result: Result<()>) -> Self {
        Self {
            label,
            error: result.err(),
        }
    }

    /// Whether the step succeeded
    pub const fn success(&self) -> bool {
        self.error.is_none()
    }

    /// Status word behind a failure, real or synthesized
    pub fn status_word(&self) -> Option<StatusWord> {
        self.error.as_ref().and_then(Error::status_word)
    }
}

/// Everything a provisioning run observed
///
/// There is no overall verdict; callers decide what counts as success.
#[derive(Debug)]
pub struct ProvisioningReport {
    /// Reset step, if it was run
    pub reset: Option<StepOutcome>,
    /// Field writes in order: IMSI, key, OPc, PIN
    pub fields: Vec<StepOutcome>,
    /// Status read
    pub status: Result<SimStatus>,
    /// IMSI read-back check, if it was run
    pub imsi_check: Option<StepOutcome>,
    /// Authentication self-test, if it was run
    pub authentication: Option<Result<AuthVectors>>,
}

impl ProvisioningReport {
    /// All pass/fail steps in run order
    pub fn outcomes(&self) -> impl Iterator<Item = &StepOutcome> {
        self.reset
            .iter()
            .chain(self.fields.iter())
            .chain(self.imsi_check.iter())
    }

    /// Whether every field write succeeded
    pub fn all_fields_succeeded(&self) -> bool {
        self.fields.iter().all(StepOutcome::success)
    }

    /// Whether every step that ran succeeded
    pub fn is_complete_success(&self) -> bool {
        self.outcomes().all(StepOutcome::success)
            && self.status.is_ok()
            && self.authentication.as_ref().is_none_or(Result::is_ok)
    }

    /// Number of steps that failed, counting status read and self-test
    pub fn failure_count(&self) -> usize {
        self.outcomes().filter(|o| !o.success()).count()
            + usize::from(self.status.is_err())
            + usize::from(matches!(self.authentication, Some(Err(_))))
    }
}
