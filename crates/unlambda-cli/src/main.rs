//! `unlambda` — a command-line interpreter for the Unlambda programming
//! language.
//!
//! Argument parsing deliberately doesn't lean on `clap`'s usual derive
//! conventions for `-v`: the reference interpreter overloads that single
//! letter into "print the version and exit" when bare, or "set verbosity
//! N" when followed directly by a digit. `num_args(0..=1)` plus
//! `default_missing_value` is the idiomatic way to express that kind of
//! optionally-attached-value short flag in clap.

mod config;
mod error;
mod io;
mod run;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use config::{RunConfig, Source, Verbosity};
use error::{CliError, Result};

/// An interpreter for the Unlambda programming language.
#[derive(Parser, Debug)]
#[command(name = "unlambda")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "An interpreter for the Unlambda programming language", long_about = None)]
#[command(disable_version_flag = true)]
struct Cli {
    /// Print the version banner and exit. Followed directly by a digit
    /// (`-v0`..`-v3`) this instead sets the verbosity level: 0 silent,
    /// 1 prints the stats block, 2 also logs major collections, 3 also
    /// logs minor collections.
    #[arg(short = 'v', num_args = 0..=1, default_missing_value = "version", value_name = "LEVEL")]
    verbosity: Option<String>,

    /// Disable stdout buffering.
    #[arg(short = 'u')]
    unbuffered: bool,

    /// Shorthand for `-v1`, accepted for compatibility with other
    /// Unlambda interpreters that use it as their stats flag.
    #[arg(short = 's')]
    stats: bool,

    /// Program source file. Reads from standard input if omitted; if
    /// given more than once, the last occurrence wins.
    #[arg(value_name = "FILE")]
    sourcefile: Vec<PathBuf>,
}

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            // clap's own `DisplayHelp`/`DisplayVersion` paths already print
            // what the user asked for; everything else is the "other flag
            // starting with -" case, which spec treats as a fatal error
            // rather than clap's default usage-error exit code.
            use clap::error::ErrorKind;
            match e.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => {
                    print!("{e}");
                    return ExitCode::SUCCESS;
                }
                _ => {
                    eprint!("{e}");
                    return ExitCode::FAILURE;
                }
            }
        }
    };

    if cli.verbosity.as_deref() == Some("version") {
        println!("unlambda {}", env!("CARGO_PKG_VERSION"));
        return ExitCode::SUCCESS;
    }

    let config = match resolve_config(cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{e}");
            return ExitCode::FAILURE;
        }
    };

    init_tracing(config.verbosity);

    match run::run(&config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            if e.is_bug() {
                tracing::error!("{e}");
            } else {
                tracing::error!(error = %e, "run failed");
            }
            eprintln!("{e}");
            ExitCode::FAILURE
        }
    }
}

fn resolve_config(cli: Cli) -> Result<RunConfig> {
    let level = match cli.verbosity.as_deref() {
        None => None,
        Some("version") => unreachable!("handled before resolve_config"),
        Some(raw) => {
            let n: u8 = raw
                .parse()
                .map_err(|_| CliError::Usage(format!("invalid verbosity level: -v{raw}")))?;
            if n > 3 {
                return Err(CliError::Usage(format!(
                    "verbosity level must be 0-3, got -v{n}"
                )));
            }
            Some(n)
        }
    };
    let level = level.unwrap_or(if cli.stats { 1 } else { 0 });

    let source = match cli.sourcefile.into_iter().last() {
        Some(path) => Source::File(path),
        None => Source::Stdin,
    };

    Ok(RunConfig {
        source,
        verbosity: Verbosity::from_level(level),
        unbuffered: cli.unbuffered,
    })
}

fn init_tracing(verbosity: Verbosity) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(verbosity.tracing_filter()));
    let subscriber = fmt::layer()
        .with_target(false)
        .with_thread_ids(false)
        .with_thread_names(false)
        .with_writer(std::io::stderr);

    let _ = tracing_subscriber::registry().with(filter).with(subscriber).try_init();
}
