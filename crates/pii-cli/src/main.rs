//! pii-redact - PII field redaction for JSON-lines event streams
//!
//! Commands:
//! - `check`: compile a configuration and report its rules or every error
//! - `apply`: redact a stream of JSON-lines records
//! - `digest`: print pseudonymized digests of literal values

use clap::{Args, Parser, Subcommand};
use pii_cli::logging::generate_run_id;
use pii_cli::resolve::{resolve_and_load, resolve_config};
use pii_cli::{
    init_logging, load_rules, redact_stream, CliError, ExitCode, LogConfig, LogFormat, LogLevel,
};
use pii_redact::RedactionStrategy;
use std::fs::File;
use std::io::{self, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::{error, info, info_span};

/// Deterministic pseudonymization of PII fields in event records
#[derive(Parser)]
#[command(name = "pii-redact")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[command(flatten)]
    global: GlobalOpts,
}

/// Global options available to all commands
#[derive(Args, Debug)]
struct GlobalOpts {
    /// Increase verbosity (-v, -vv)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Log output format on stderr (human, jsonl)
    #[arg(long, global = true)]
    log_format: Option<LogFormat>,
}

#[derive(Subcommand)]
enum Commands {
    /// Compile a configuration and report its rules
    Check(ConfigArgs),

    /// Redact a JSON-lines record stream
    Apply(ApplyArgs),

    /// Print digests of literal values
    Digest(DigestArgs),
}

#[derive(Args, Debug)]
struct ConfigArgs {
    /// Path to the self-describing redaction configuration
    #[arg(long, short = 'c')]
    config: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct ApplyArgs {
    #[command(flatten)]
    config: ConfigArgs,

    /// Read records from this file instead of stdin
    #[arg(long, short = 'i')]
    input: Option<PathBuf>,

    /// Write records to this file instead of stdout
    #[arg(long, short = 'o')]
    output: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct DigestArgs {
    /// Hash function name (SHA-224, SHA-256, SHA-384, SHA-512, SHA-512/256, BLAKE3)
    #[arg(long, default_value = "SHA-256")]
    hash_function: String,

    /// Salt appended to every value before hashing
    #[arg(long)]
    salt: Option<String>,

    /// Values to digest
    #[arg(required = true)]
    values: Vec<String>,
}

fn main() -> std::process::ExitCode {
    let cli = Cli::parse();

    let cli_level = if cli.global.quiet {
        Some(LogLevel::Error)
    } else {
        match cli.global.verbose {
            0 => None,
            1 => Some(LogLevel::Debug),
            _ => Some(LogLevel::Trace),
        }
    };
    init_logging(&LogConfig::from_env(cli_level, cli.global.log_format));

    let run_id = generate_run_id();
    let _span = info_span!("pii_redact", run_id = %run_id).entered();

    let result = match cli.command {
        Commands::Check(args) => run_check(&args),
        Commands::Apply(args) => run_apply(&args),
        Commands::Digest(args) => run_digest(&args),
    };

    let code = match result {
        Ok(code) => code,
        Err(err) => {
            error!(error = %err, "command failed");
            eprintln!("pii-redact: {}", err);
            err.exit_code()
        }
    };
    code.into()
}

fn run_check(args: &ConfigArgs) -> Result<ExitCode, CliError> {
    let (path, source) = resolve_config(args.config.as_deref()).ok_or(CliError::NoConfig)?;

    match load_rules(&path) {
        Ok(rules) => {
            let summary = serde_json::json!({
                "status": "ok",
                "config": path.display().to_string(),
                "source": source.to_string(),
                "rules": rules.iter().map(|rule| serde_json::json!({
                    "field": rule.field_name(),
                    "kind": rule.kind(),
                    "rule": rule.to_string(),
                })).collect::<Vec<_>>(),
            });
            print_json(&summary)?;
            Ok(ExitCode::Clean)
        }
        Err(CliError::Config(errors)) => {
            let summary = serde_json::json!({
                "status": "error",
                "config": path.display().to_string(),
                "errors": errors.errors().iter().map(|e| e.to_string()).collect::<Vec<_>>(),
            });
            print_json(&summary)?;
            Ok(ExitCode::ConfigError)
        }
        Err(other) => Err(other),
    }
}

fn run_apply(args: &ApplyArgs) -> Result<ExitCode, CliError> {
    let (rules, config_path) = resolve_and_load(args.config.config.as_deref())?;
    info!(config = %config_path.display(), rules = rules.len(), "applying redaction");

    let stats = match (&args.input, &args.output) {
        (Some(input), Some(output)) => {
            redact_stream(&rules, BufReader::new(open(input)?), BufWriter::new(create(output)?))?
        }
        (Some(input), None) => {
            redact_stream(&rules, BufReader::new(open(input)?), io::stdout().lock())?
        }
        (None, Some(output)) => {
            redact_stream(&rules, io::stdin().lock(), BufWriter::new(create(output)?))?
        }
        (None, None) => redact_stream(&rules, io::stdin().lock(), io::stdout().lock())?,
    };

    if stats.failed > 0 {
        Ok(ExitCode::RecordsFailed)
    } else {
        Ok(ExitCode::Clean)
    }
}

fn run_digest(args: &DigestArgs) -> Result<ExitCode, CliError> {
    let mut strategy = RedactionStrategy::pseudonymize(&args.hash_function)?;
    if let Some(salt) = &args.salt {
        strategy = strategy.with_salt(salt.clone());
    }

    let mut stdout = io::stdout().lock();
    for value in &args.values {
        writeln!(stdout, "{}", strategy.scramble(value))?;
    }
    Ok(ExitCode::Clean)
}

fn print_json(value: &serde_json::Value) -> Result<(), CliError> {
    let mut stdout = io::stdout().lock();
    serde_json::to_writer_pretty(&mut stdout, value).map_err(io::Error::from)?;
    writeln!(stdout)?;
    Ok(())
}

fn open(path: &Path) -> Result<File, CliError> {
    File::open(path).map_err(|source| CliError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn create(path: &Path) -> Result<File, CliError> {
    File::create(path).map_err(|source| CliError::Io {
        path: path.to_path_buf(),
        source,
    })
}
