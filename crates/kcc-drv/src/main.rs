//! `kcc` - classify a C translation unit into a validated token stream.
//!
//! Thin CLI wrapper around [`kcc_drv::run`]; see `kcc-drv`'s crate docs
//! for the pipeline this drives.

use anyhow::Context;
use clap::Parser;
use kcc_drv::{color_enabled, exit_code, run, Config, EmitKind, DRIVER_IO_EXIT_CODE};
use std::path::PathBuf;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// kcc - preprocess and lex one C translation unit.
#[derive(Parser, Debug)]
#[command(name = "kcc")]
#[command(author = "kcc contributors")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Preprocess and lex a C translation unit", long_about = None)]
struct Cli {
    /// Source file to process
    file: PathBuf,

    /// Print the preprocessor's flattened pp-token stream instead of the
    /// classified language-token stream
    #[arg(long)]
    emit_pp_tokens: bool,

    /// Disable ANSI colour in rendered diagnostics (also honours NO_COLOR)
    #[arg(long)]
    no_color: bool,

    /// Raise logging verbosity (per-stage tracing spans); repeatable
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let color = color_enabled(cli.no_color);
    let emit = if cli.emit_pp_tokens { EmitKind::PpTokens } else { EmitKind::Tokens };
    let config = Config {
        input: cli.file,
        emit,
        color,
    };

    match run(&config) {
        Ok(outcome) => {
            print!("{}", outcome.report);
            std::process::exit(exit_code(&outcome));
        }
        Err(err) => {
            eprintln!("kcc: error: {:#}", anyhow::Error::new(err).context("failed to run the driver"));
            std::process::exit(DRIVER_IO_EXIT_CODE);
        }
    }
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _: Result<(), _> = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .try_init()
        .context("failed to install tracing subscriber");
}
