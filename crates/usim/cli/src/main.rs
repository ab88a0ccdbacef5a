use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing::error;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::LevelFilter;
use usim_apdu_transport_serial::{
    DEFAULT_BAUD_RATE, DEFAULT_PORT, DEFAULT_READ_WAIT, DEFAULT_SETTLE_DELAY, DEFAULT_TIMEOUT,
};
use usim_provision::ProfileOverrides;

mod provision;
mod utils;

use utils::display;

#[derive(Parser, Debug)]
#[command(version, about = "Provision a USIM secure element over a serial link")]
struct Cli {
    /// Serial port the card reader is attached to
    #[arg(short, long, default_value = DEFAULT_PORT)]
    port: String,

    /// Baud rate
    #[arg(short, long, default_value_t = DEFAULT_BAUD_RATE)]
    baud: u32,

    /// JSON profile file with any of imsi, key, opc and pin
    #[arg(long)]
    profile: Option<PathBuf>,

    /// IMSI (6 to 15 digits)
    #[arg(long)]
    imsi: Option<String>,

    /// Secret key K (32 hex characters)
    #[arg(long)]
    key: Option<String>,

    /// Operator constant OPc (32 hex characters)
    #[arg(long)]
    opc: Option<String>,

    /// PIN (4 to 8 digits)
    #[arg(long)]
    pin: Option<String>,

    /// Authentication challenge RAND (32 hex characters)
    #[arg(long, conflicts_with = "skip_auth")]
    rand: Option<String>,

    /// Skip the authentication self-test
    #[arg(long)]
    skip_auth: bool,

    /// Skip the reset sent before writing
    #[arg(long)]
    skip_reset: bool,

    /// Read the IMSI back after writing and compare it
    #[arg(long)]
    verify_imsi: bool,

    /// Exit with code 2 when any step of the run fails
    #[arg(long)]
    strict: bool,

    /// Read timeout in milliseconds
    #[arg(long, default_value_t = DEFAULT_TIMEOUT.as_millis() as u64)]
    timeout_ms: u64,

    /// Delay after opening the port, in milliseconds
    #[arg(long, default_value_t = DEFAULT_SETTLE_DELAY.as_millis() as u64)]
    settle_ms: u64,

    /// Delay between sending a command and reading its response, in milliseconds
    #[arg(long, default_value_t = DEFAULT_READ_WAIT.as_millis() as u64)]
    read_wait_ms: u64,

    /// Debug level output
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    /// Profile values given on the command line
    fn overrides(&self) -> ProfileOverrides {
        ProfileOverrides {
            imsi: self.imsi.clone(),
            key: self.key.clone(),
            opc: self.opc.clone(),
            pin: self.pin.clone(),
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    setup_logging(cli.verbose);

    match provision::provision_command(&cli) {
        Ok(code) => code,
        Err(e) => {
            error!(error = %e, "Provisioning aborted");
            eprintln!("{}", display::failure(&e.to_string()));
            ExitCode::from(provision::ABORTED)
        }
    }
}

fn setup_logging(verbose: bool) {
    let directives = std::env::var(EnvFilter::DEFAULT_ENV).unwrap_or_default();

    tracing_subscriber::fmt()
        .with_env_filter(log_filter(verbose, &directives))
        .with_ansi(true)
        .init();
}

/// Filter from `RUST_LOG` style directives, defaulting to the `--verbose` level
fn log_filter(verbose: bool, directives: &str) -> EnvFilter {
    let level = if verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::INFO
    };

    EnvFilter::builder()
        .with_default_directive(level.into())
        .parse_lossy(directives)
}
