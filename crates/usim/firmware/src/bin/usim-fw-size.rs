//! Check that a firmware image fits in linear flash
//!
//! Exit codes: 0 when the image fits (possibly with a warning), 1 when it
//! extends past the limit, 2 when the image cannot be read or parsed.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use colored::Colorize;
use tracing::debug;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::LevelFilter;
use usim_firmware::{
    DEFAULT_LIMIT, DEFAULT_WARN_RATIO, SizeLimits, SizeReport, Verdict, parse_size,
    read_intel_hex,
};

const EXIT_OVER_LIMIT: u8 = 1;
const EXIT_INPUT_ERROR: u8 = 2;

#[derive(Parser, Debug)]
#[command(version, about = "Check an Intel HEX firmware image against the flash size limit")]
struct Cli {
    /// Intel HEX image (.ihx / .hex)
    file: PathBuf,

    /// Size limit in bytes, decimal or 0x-prefixed hex
    #[arg(long, value_parser = parse_size, default_value_t = DEFAULT_LIMIT)]
    limit: u64,

    /// Fraction of the limit above which a warning is printed
    #[arg(long, value_parser = parse_ratio, default_value_t = DEFAULT_WARN_RATIO)]
    warn_ratio: f64,

    /// Debug level output
    #[arg(short, long)]
    verbose: bool,
}

fn parse_ratio(text: &str) -> Result<f64, String> {
    let ratio: f64 = text.parse().map_err(|e| format!("invalid ratio {text:?}: {e}"))?;
    if (0.0..=1.0).contains(&ratio) {
        Ok(ratio)
    } else {
        Err(format!("ratio {ratio} is outside 0..=1"))
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    setup_logging(cli.verbose);

    let segments = match read_intel_hex(&cli.file) {
        Ok(segments) => segments,
        Err(e) => {
            eprintln!("❌ {}", e.to_string().red().bold());
            return ExitCode::from(EXIT_INPUT_ERROR);
        }
    };
    debug!(records = segments.len(), "Image scanned");

    let report = SizeReport::from_segments(&segments);
    let limits = SizeLimits::new(cli.limit, cli.warn_ratio);

    println!("{}", "Firmware size".bold().underline());
    println!("  {}: 0x{:04X}", "Highest address".bold(), report.highest_address());
    println!("  {}: {}", "Total bytes".bold(), report.total_bytes);
    println!("  {}: {} bytes (0x{:X})", "Limit".bold(), limits.limit, limits.limit);

    match limits.evaluate(&report) {
        Verdict::Within => {
            println!("✅ {}", "Image fits within the flash limit".green().bold());
            ExitCode::SUCCESS
        }
        Verdict::NearLimit => {
            println!("⚠️  {}", "Image is close to the flash limit".yellow().bold());
            ExitCode::SUCCESS
        }
        Verdict::OverLimit => {
            println!("❌ {}", "Image exceeds the flash limit".red().bold());
            ExitCode::from(EXIT_OVER_LIMIT)
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
