use crate::cli::{exit_with, load_config, read_proof};
use argh::FromArgs;
use crossterm::{
    cursor::MoveTo,
    execute,
    terminal::{Clear, ClearType},
};
use fitch::{
    config::FitchConfig,
    report::{display_report, format_marked_proof},
    semant::ProofStatuses,
};
use notify::Watcher;
use std::{
    io,
    path::{Path, PathBuf},
    sync::mpsc,
};
use tracing::debug;

/// Check every line of a proof.
#[derive(FromArgs)]
#[argh(subcommand, name = "check")]
pub struct CheckCommand {
    /// the proof file to check.
    #[argh(positional)]
    file: PathBuf,

    /// continually recheck on file changes.
    #[argh(switch, short = 'w')]
    watch: bool,

    /// path to fitch.toml config file.
    #[argh(option, short = 'c')]
    config: Option<PathBuf>,
}

pub fn run_check(cmd: CheckCommand) {
    let config = load_config(cmd.config.as_deref());

    if cmd.watch {
        let (tx, rx) = mpsc::channel::<notify::Result<notify::Event>>();
        let mut watcher = notify::recommended_watcher(tx).unwrap_or_else(|err| exit_with(err));
        watcher
            .watch(&cmd.file, notify::RecursiveMode::NonRecursive)
            .unwrap_or_else(|err| exit_with(err));

        for i in 1.. {
            let _ = rx.try_iter().count();

            // Clear the screen to print the new info
            _ = execute!(io::stdout(), Clear(ClearType::Purge), MoveTo(0, 0));

            if let Err(err) = check(&cmd.file, &config, Some(i)) {
                println!("{err}");
            }

            if !wait_for_change(&rx) {
                break;
            }
        }
    } else {
        match check(&cmd.file, &config, None) {
            Ok(true) => {}
            Ok(false) => std::process::exit(1),
            Err(err) => exit_with(err),
        }
    }
}

/// Loads, prints and reports on the proof. Returns whether it is valid.
fn check(file: &Path, config: &FitchConfig, iteration: Option<usize>) -> Result<bool, String> {
    let (_, proof) = read_proof(file, config)?;
    debug!(lines = proof.line_count(), "checking proof");

    print!("{}", format_marked_proof(&proof, config.indent_style()));
    println!();

    Ok(display_report(&ProofStatuses::collect(&proof), iteration))
}

/// Blocks until the file changes. False once the watcher has gone away.
fn wait_for_change(rx: &mpsc::Receiver<notify::Result<notify::Event>>) -> bool {
    loop {
        match rx.recv() {
            Ok(Ok(e)) if matches!(e.kind, notify::EventKind::Access(_)) => continue,
            Ok(Ok(_)) => return true,
            Ok(Err(err)) => {
                debug!(%err, "watch error");
                return true;
            }
            Err(_) => return false,
        }
    }
}
