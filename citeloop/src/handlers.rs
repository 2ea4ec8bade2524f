use anyhow::Context;
use citeloop_core::CIRCULAR_MESSAGE;
use citeloop_core::audit::{AuditOptions, execute_audit};
use citeloop_core::report::{ReportFormat, generate_report, save_report};
use citeloop_scanner::fetch::DEFAULT_TIMEOUT_SECS;
use citeloop_scanner::{AuditError, Report, TargetSpecification};
use clap::ArgMatches;
use colored::Colorize;
use std::path::{Path, PathBuf};
use tracing::Level;

pub const EXIT_OK: i32 = 0;
pub const EXIT_ERROR: i32 = 1;
pub const EXIT_CIRCULAR: i32 = 2;

/// Command-line values for a single audit
#[derive(Debug, Clone)]
pub struct AuditArgs {
    pub url: String,
    pub max_gen: String,
    pub format: ReportFormat,
    pub output: Option<PathBuf>,
    pub timeout_secs: u64,
    pub quiet: bool,
    pub verbosity: u8,
}

impl AuditArgs {
    pub fn from_matches(matches: &ArgMatches) -> Self {
        Self {
            url: matches.get_one::<String>("TARGET_URL").cloned().unwrap_or_default(),
            max_gen: matches.get_one::<String>("MAX_GEN").cloned().unwrap_or_default(),
            format: matches
                .get_one::<String>("format")
                .and_then(|f| f.parse().ok())
                .unwrap_or(ReportFormat::Text),
            output: matches
                .get_one::<String>("output")
                .map(|p| resolve_output_path(p)),
            timeout_secs: matches
                .get_one::<u64>("timeout")
                .copied()
                .unwrap_or(DEFAULT_TIMEOUT_SECS),
            quiet: matches.get_flag("quiet"),
            verbosity: matches.get_count("verbose"),
        }
    }
}

/// Install the stderr log subscriber: warn by default, `-v` info, `-vv` debug.
pub fn init_logging(verbosity: u8) {
    let level = match verbosity {
        0 => Level::WARN,
        1 => Level::INFO,
        _ => Level::DEBUG,
    };
    let _ = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

/// Expand `~` in a report path
pub fn resolve_output_path(raw: &str) -> PathBuf {
    PathBuf::from(shellexpand::tilde(raw).as_ref())
}

/// Render the report and print it, or save it when an output path is given.
pub fn write_report(
    report: &Report,
    target: &TargetSpecification,
    format: ReportFormat,
    output: Option<&Path>,
) -> anyhow::Result<()> {
    let content = generate_report(report, target, format)
        .with_context(|| format!("Failed to render {} report", format))?;

    match output {
        Some(path) => {
            save_report(&content, path)
                .with_context(|| format!("Failed to write report to {}", path.display()))?;
            println!(
                "{} Report saved to {}",
                "✓".green().bold(),
                path.display().to_string().bright_white()
            );
        }
        None => print!("{}", content),
    }
    Ok(())
}

/// Run one audit end to end and return the process exit code.
pub async fn handle_audit(args: &AuditArgs) -> i32 {
    let options = match AuditOptions::from_args(&args.url, &args.max_gen) {
        Ok(options) => options
            .with_timeout(args.timeout_secs)
            .with_progress_bars(!args.quiet),
        Err(AuditError::Configuration(message)) => {
            eprintln!("{} {}", "✗".red().bold(), message);
            return EXIT_ERROR;
        }
        Err(e) => {
            tracing::debug!("Unexpected setup failure: {:?}", e);
            eprintln!("{} {}", "✗".red().bold(), e);
            return EXIT_ERROR;
        }
    };
    let target = options.target.clone();

    if !args.quiet {
        println!(
            "\n{} {} (MAX_GEN {})\n",
            "→ Auditing".blue().bold(),
            target.origin().as_str().bright_white(),
            target.max_generation()
        );
    }

    match execute_audit(options, None).await {
        Ok(report) => match write_report(&report, &target, args.format, args.output.as_deref()) {
            Ok(()) => EXIT_OK,
            Err(e) => {
                eprintln!("{} {:#}", "✗".red().bold(), e);
                EXIT_ERROR
            }
        },
        Err(e) if e.is_circular() => {
            println!("{}", CIRCULAR_MESSAGE.red().bold());
            EXIT_CIRCULAR
        }
        Err(e) => {
            eprintln!("{} Audit failed: {}", "✗".red().bold(), e);
            EXIT_ERROR
        }
    }
}
