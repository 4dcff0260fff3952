//! CLI definition and dispatch.

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::file_line_adapter::{FileLineSource, ReaderLineSource};
use crate::adapters::report_writer::{io_err, CsvReportWriter, JsonReportWriter, TextReportWriter};
use crate::domain::checker::ExcessiveCancellationsChecker;
use crate::domain::config_validation::{
    self, parse_delimiter, parse_window_seconds, validate_checker_config,
};
use crate::domain::error::CancelCheckError;
use crate::domain::record_parser::ParserOptions;
use crate::domain::window::{Ratio, WindowPolicy};
use crate::ports::config_port::ConfigPort;
use crate::ports::line_source_port::LineSource;
use crate::ports::report_port::ReportPort;

#[derive(Parser, Debug)]
#[command(
    name = "cancelcheck",
    about = "Flag companies with excessive order cancellations"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List companies with excessive cancellations, in order of first appearance
    Flagged {
        #[command(flatten)]
        check: CheckArgs,
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
    /// Print the number of well-behaved companies
    WellBehaved {
        #[command(flatten)]
        check: CheckArgs,
    },
    /// Print the verdict for every company
    Report {
        #[command(flatten)]
        check: CheckArgs,
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
    /// Validate a checker configuration file
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
}

#[derive(Args, Debug, Clone, Default)]
pub struct CheckArgs {
    /// Event file, or `-` for stdin
    pub input: PathBuf,
    #[arg(short, long)]
    pub config: Option<PathBuf>,
    #[arg(long)]
    pub window_seconds: Option<String>,
    #[arg(long)]
    pub max_cancel_ratio: Option<String>,
    #[arg(long)]
    pub delimiter: Option<String>,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Csv,
    Json,
}

impl OutputFormat {
    pub fn writer(self) -> Box<dyn ReportPort> {
        match self {
            OutputFormat::Text => Box::new(TextReportWriter),
            OutputFormat::Csv => Box::new(CsvReportWriter),
            OutputFormat::Json => Box::new(JsonReportWriter),
        }
    }
}

/// Installs a stderr `tracing` subscriber filtered by `RUST_LOG`.
pub fn init_tracing() {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let _ = tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "cancelcheck=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .try_init();
}

pub fn run(cli: Cli) -> ExitCode {
    let result = match cli.command {
        Command::Flagged { check, format } => run_flagged(&check, format),
        Command::WellBehaved { check } => run_well_behaved(&check),
        Command::Report { check, format } => run_report(&check, format),
        Command::Validate { config } => run_validate(&config),
    };
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            (&e).into()
        }
    }
}

pub fn load_config(path: &Path) -> Result<FileConfigAdapter, CancelCheckError> {
    FileConfigAdapter::from_file(path).map_err(|e| CancelCheckError::ConfigParse {
        file: path.display().to_string(),
        reason: e.to_string(),
    })
}

/// Builds the checker from the optional config file, then applies flag overrides.
pub fn build_checker(
    config: Option<&dyn ConfigPort>,
    args: &CheckArgs,
) -> Result<ExcessiveCancellationsChecker, CancelCheckError> {
    let (mut policy, mut parser) = match config {
        Some(c) => {
            validate_checker_config(c)?;
            (
                config_validation::policy_from_config(c)?,
                ParserOptions {
                    delimiter: config_validation::delimiter(c)?,
                },
            )
        }
        None => (WindowPolicy::default(), ParserOptions::default()),
    };

    if let Some(raw) = &args.window_seconds {
        policy.window_seconds =
            parse_window_seconds(raw).map_err(|reason| flag_invalid("window-seconds", reason))?;
    }
    if let Some(raw) = &args.max_cancel_ratio {
        policy.max_cancel_ratio = raw
            .parse::<Ratio>()
            .map_err(|e| flag_invalid("max-cancel-ratio", e.to_string()))?;
    }
    if let Some(raw) = &args.delimiter {
        parser.delimiter =
            parse_delimiter(raw).map_err(|reason| flag_invalid("delimiter", reason))?;
    }

    Ok(ExcessiveCancellationsChecker::new(policy, parser))
}

fn flag_invalid(flag: &str, reason: String) -> CancelCheckError {
    CancelCheckError::ConfigInvalid {
        section: "command line".to_string(),
        key: format!("--{flag}"),
        reason,
    }
}

fn prepare(args: &CheckArgs) -> Result<(ExcessiveCancellationsChecker, Box<dyn LineSource>), CancelCheckError> {
    let config = match &args.config {
        Some(path) => {
            eprintln!("Loading config from {}", path.display());
            Some(load_config(path)?)
        }
        None => None,
    };
    let checker = build_checker(config.as_ref().map(|c| c as &dyn ConfigPort), args)?;
    let source = open_source(&args.input)?;
    eprintln!(
        "Checking {} (window {}s, max cancel ratio {})",
        source.describe(),
        checker.policy.window_seconds,
        checker.policy.max_cancel_ratio
    );
    Ok((checker, source))
}

pub fn open_source(input: &Path) -> Result<Box<dyn LineSource>, CancelCheckError> {
    if input == Path::new("-") {
        return Ok(Box::new(ReaderLineSource::from_reader(io::stdin(), "<stdin>")));
    }
    Ok(Box::new(FileLineSource::open(input)?))
}

fn run_flagged(args: &CheckArgs, format: OutputFormat) -> Result<(), CancelCheckError> {
    let (checker, mut source) = prepare(args)?;
    let flagged = checker.companies_involved_in_excessive_cancellations(source.as_mut())?;
    let mut out = io::stdout().lock();
    format.writer().write_flagged(&flagged, &mut out)?;
    eprintln!("{} companies flagged", flagged.len());
    Ok(())
}

fn run_well_behaved(args: &CheckArgs) -> Result<(), CancelCheckError> {
    let (checker, mut source) = prepare(args)?;
    let count = checker.total_number_of_well_behaved_companies(source.as_mut())?;
    write_count(count, &mut io::stdout().lock())
}

pub fn write_count(count: usize, out: &mut dyn Write) -> Result<(), CancelCheckError> {
    writeln!(out, "{count}").map_err(io_err)
}

fn run_report(args: &CheckArgs, format: OutputFormat) -> Result<(), CancelCheckError> {
    let (checker, mut source) = prepare(args)?;
    let report = checker.report(source.as_mut())?;
    let mut out = io::stdout().lock();
    format.writer().write_report(&report, &mut out)
}

fn run_validate(config_path: &Path) -> Result<(), CancelCheckError> {
    eprintln!("Validating config: {}", config_path.display());
    let adapter = load_config(config_path)?;
    validate_checker_config(&adapter)?;

    let policy = config_validation::policy_from_config(&adapter)?;
    let delimiter = config_validation::delimiter(&adapter)?;
    eprintln!("  window_seconds:   {}", policy.window_seconds);
    eprintln!("  max_cancel_ratio: {}", policy.max_cancel_ratio);
    eprintln!("  delimiter:        {:?}", delimiter);
    eprintln!("\nConfiguration is valid.");
    Ok(())
}
