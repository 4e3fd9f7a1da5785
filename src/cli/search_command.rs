use crate::cli::{exit_with, load_config, read_proof, write_proof};
use argh::FromArgs;
use fitch::report::format_search_report;
use std::path::PathBuf;

/// Fill in missing justifications, working back from the last line.
#[derive(FromArgs)]
#[argh(subcommand, name = "search")]
pub struct SearchCommand {
    /// the proof file to complete.
    #[argh(positional)]
    file: PathBuf,

    /// write the completed proof back to the file.
    #[argh(switch)]
    write: bool,

    /// path to fitch.toml config file.
    #[argh(option, short = 'c')]
    config: Option<PathBuf>,
}

pub fn run_search(cmd: SearchCommand) {
    let config = load_config(cmd.config.as_deref());
    let (_, mut proof) = read_proof(&cmd.file, &config).unwrap_or_else(|err| exit_with(err));

    let report = proof.search();
    let text = proof.to_text(config.indent_style());

    if cmd.write {
        write_proof(&cmd.file, &text);
    } else {
        print!("{text}");
        println!();
    }
    print!("{}", format_search_report(&report));

    if !report.is_complete() {
        std::process::exit(1);
    }
}
