use crate::cli::{Cli, Commands};
use anyhow::Result;
use clap::Parser;
use std::sync::Once;

static TRACING_INIT: Once = Once::new();

/// Initializes logging to stderr, once per process.
///
/// `RUST_LOG` selects the filter; `--verbose` without `RUST_LOG` enables
/// debug output for this crate. Without either, nothing is installed.
pub fn init_tracing(verbose: bool) {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        let filter = if std::env::var("RUST_LOG").is_ok() {
            EnvFilter::from_default_env()
        } else if verbose {
            EnvFilter::new("keyview=debug")
        } else {
            return;
        };
        tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(true)
                    .with_level(true),
            )
            .with(filter)
            .init();
    });
}

/// Runs keyview with the given arguments (program name excluded).
///
/// # Errors
///
/// Returns an error if the command execution fails.
pub fn run_with_args(args: Vec<String>) -> Result<i32> {
    run_with_args_to(args, &mut std::io::stdout())
}

/// Run keyview with the given arguments, writing output to the specified writer.
///
/// This is the testable version of `run_with_args` that allows output capture.
///
/// # Errors
///
/// Returns an error if the command execution fails.
pub fn run_with_args_to<W: std::io::Write>(args: Vec<String>, writer: &mut W) -> Result<i32> {
    let mut program_args = vec!["keyview".to_owned()];
    program_args.extend(args);
    let cli = match Cli::try_parse_from(program_args) {
        Ok(c) => c,
        Err(e) => match e.kind() {
            clap::error::ErrorKind::DisplayHelp | clap::error::ErrorKind::DisplayVersion => {
                write!(writer, "{e}")?;
                writer.flush()?;
                return Ok(0);
            }
            _ => {
                eprint!("{e}");
                return Ok(2);
            }
        },
    };

    init_tracing(cli.command.common().verbose);
    tracing::debug!(version = env!("CARGO_PKG_VERSION"), command = ?cli.command, "starting");

    let code = match &cli.command {
        Commands::Check { common } => crate::commands::run_check(common, writer)?,
        Commands::Fix { common, dry_run } => crate::commands::run_fix(common, *dry_run, writer)?,
    };
    writer.flush()?;
    Ok(code)
}
