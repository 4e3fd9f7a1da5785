use crate::cli::{
    check_command::{CheckCommand, run_check},
    fmt_command::{FmtCommand, run_fmt},
    search_command::{SearchCommand, run_search},
};
use argh::FromArgs;
use fitch::{
    config::FitchConfig,
    diagnostics::Diagnostic,
    parse::load,
    proof::Proof,
    strings,
    util::ansi::{ANSI_BOLD, ANSI_RED, ANSI_RESET},
};
use std::{
    fmt::Display,
    fs, io,
    path::Path,
};
use tracing::warn;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

mod check_command;
mod fmt_command;
mod search_command;

/// Check, complete and format Fitch-style natural deduction proofs.
#[derive(FromArgs)]
struct Args {
    /// log what the checker is doing.
    #[argh(switch, short = 'v')]
    verbose: bool,

    #[argh(subcommand)]
    command: Command,
}

#[derive(FromArgs)]
#[argh(subcommand)]
enum Command {
    Check(CheckCommand),
    Search(SearchCommand),
    Fmt(FmtCommand),
}

pub fn run_cli() {
    let args: Args = argh::from_env();
    init_logging(args.verbose);

    match args.command {
        Command::Check(cmd) => run_check(cmd),
        Command::Search(cmd) => run_search(cmd),
        Command::Fmt(cmd) => run_fmt(cmd),
    }
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("fitch=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into())
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();
}

/// Prints `err` and exits with status 1.
pub(crate) fn exit_with(err: impl Display) -> ! {
    eprintln!("{ANSI_RED}{ANSI_BOLD}error:{ANSI_RESET} {err}");
    std::process::exit(1)
}

pub(crate) fn load_config(path: Option<&Path>) -> FitchConfig {
    FitchConfig::discover(path).unwrap_or_else(|err| exit_with(err))
}

/// Reads and loads a proof file. Load errors are printed against the source.
pub(crate) fn read_proof(path: &Path, config: &FitchConfig) -> Result<(String, Proof), String> {
    if path.extension().and_then(|e| e.to_str()) != Some(strings::FILE_EXTENSION.as_str()) {
        warn!(path = %path.display(), "proof file does not end in .{}", *strings::FILE_EXTENSION);
    }

    let text = fs::read_to_string(path)
        .map_err(|err| format!("could not read {}: {err}", path.display()))?;

    match load(&text, &config.load_options()) {
        Ok(proof) => Ok((text, proof)),
        Err(err) => {
            Diagnostic::err_load(&err).print(&text, &path.display().to_string());
            Err(format!("{} could not be loaded", path.display()))
        }
    }
}

pub(crate) fn write_proof(path: &Path, text: &str) {
    if let Err(err) = fs::write(path, text) {
        exit_with(format!("could not write {}: {err}", path.display()));
    }
}
