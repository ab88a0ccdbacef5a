//! The provisioning command: validate, connect, run, report

use std::error::Error;
use std::process::ExitCode;
use std::time::Duration;

use tracing::{debug, info};
use usim_apdu_core::CardExecutor;
use usim_apdu_transport_serial::{SerialConfig, SerialTransport};
use usim_provision::codec::decode_hex_array;
use usim_provision::constants::{DEFAULT_RAND, RAND_LEN};
use usim_provision::{
    Profile, ProfileOverrides, Provisioner, ProvisioningReport, RunOptions, StepOutcome,
};

use crate::Cli;
use crate::utils::display;

/// Exit code when the run is aborted before anything is written
pub(crate) const ABORTED: u8 = 1;

/// Exit code when `--strict` is set and a step failed
const STRICT_FAILURE: u8 = 2;

/// Run one provisioning pass as described by the command line
///
/// Errors returned here happen before or while connecting: nothing has been
/// written to the card when they occur.
pub(crate) fn provision_command(cli: &Cli) -> Result<ExitCode, Box<dyn Error>> {
    let mut profile = Profile::default();
    if let Some(path) = &cli.profile {
        profile = profile.merge(&ProfileOverrides::from_json_file(path)?);
    }
    let profile = profile.merge(&cli.overrides());
    let normalized = profile.normalize()?;
    let options = run_options(cli)?;

    let config = serial_config(cli);
    info!(port = %config.port, baud = config.baud_rate, "Opening serial port");
    let transport = SerialTransport::open(config)?;

    let mut provisioner = Provisioner::new(CardExecutor::new(transport));
    let report = provisioner.run(&normalized, &options);

    print_report(&report);

    if let Some(executor) = provisioner.into_executor() {
        executor.into_transport().close();
    }

    Ok(ExitCode::from(exit_code(&report, cli.strict)))
}

fn run_options(cli: &Cli) -> Result<RunOptions, usim_provision::Error> {
    let challenge = if cli.skip_auth {
        None
    } else {
        Some(decode_challenge(cli.rand.as_deref())?)
    };

    Ok(RunOptions::default()
        .with_reset(!cli.skip_reset)
        .with_challenge(challenge)
        .with_verify_imsi(cli.verify_imsi))
}

fn decode_challenge(rand: Option<&str>) -> Result<[u8; RAND_LEN], usim_provision::Error> {
    match rand {
        Some(text) => {
            decode_hex_array(text).map_err(|e| usim_provision::Error::validation("RAND", e))
        }
        None => Ok(DEFAULT_RAND),
    }
}

fn serial_config(cli: &Cli) -> SerialConfig {
    SerialConfig::new()
        .with_port(cli.port.clone())
        .with_baud_rate(cli.baud)
        .with_timeout(Duration::from_millis(cli.timeout_ms))
        .with_settle_delay(Duration::from_millis(cli.settle_ms))
        .with_read_wait(Duration::from_millis(cli.read_wait_ms))
}

/// Process exit code for a finished run
///
/// Failed steps only change the exit code in strict mode.
fn exit_code(report: &ProvisioningReport, strict: bool) -> u8 {
    if strict && !report.is_complete_success() {
        debug!(failures = report.failure_count(), "Strict mode: run had failures");
        STRICT_FAILURE
    } else {
        0
    }
}

fn step_line(outcome: &StepOutcome) -> String {
    match (&outcome.error, outcome.status_word()) {
        (None, _) => display::success(outcome.label),
        (Some(e), Some(sw)) => display::failure(&format!("{} [{sw}]: {e}", outcome.label)),
        (Some(e), None) => display::failure(&format!("{}: {e}", outcome.label)),
    }
}

fn print_report(report: &ProvisioningReport) {
    println!("{}", display::section_title("Provisioning"));
    for outcome in report.outcomes() {
        println!("  {}", step_line(outcome));
    }

    println!("{}", display::section_title("Card Status"));
    match &report.status {
        Ok(status) => println!(
            "{}",
            display::key_value_box(
                "Status",
                vec![
                    ("State", format!("{} ({:#04x})", status.state, status.state.raw())),
                    ("PIN retries", status.pin_retries.to_string()),
                    ("Firmware", status.version.to_string()),
                ]
            )
        ),
        Err(e) => println!("  {}", display::failure(&format!("Status read: {e}"))),
    }

    if let Some(authentication) = &report.authentication {
        println!("{}", display::section_title("Authentication Test"));
        match authentication {
            Ok(vectors) => println!(
                "{}",
                display::key_value_box(
                    "Vectors",
                    vec![
                        ("RES", hex::encode_upper(vectors.res)),
                        ("CK", hex::encode_upper(vectors.ck)),
                        ("IK", hex::encode_upper(vectors.ik)),
                        ("AK", hex::encode_upper(vectors.ak)),
                        ("KC", hex::encode_upper(vectors.kc)),
                    ]
                )
            ),
            Err(e) => println!("  {}", display::failure(&format!("Authentication: {e}"))),
        }
    }

    println!();
    if report.is_complete_success() {
        println!("{}", display::success("Provisioning complete"));
    } else {
        println!(
            "{}",
            display::warning(&format!(
                "Provisioning finished with {} failed step(s)",
                report.failure_count()
            ))
        );
    }
}
