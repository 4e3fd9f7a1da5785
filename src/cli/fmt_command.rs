use crate::cli::{exit_with, load_config, read_proof, write_proof};
use argh::FromArgs;
use std::path::PathBuf;

/// Renumber and re-indent a proof.
#[derive(FromArgs)]
#[argh(subcommand, name = "fmt")]
pub struct FmtCommand {
    /// the proof file to format.
    #[argh(positional)]
    file: PathBuf,

    /// indent with box-drawing bars instead of spaces.
    #[argh(switch)]
    bars: bool,

    /// write the result back to the file.
    #[argh(switch)]
    write: bool,

    /// path to fitch.toml config file.
    #[argh(option, short = 'c')]
    config: Option<PathBuf>,
}

pub fn run_fmt(cmd: FmtCommand) {
    let mut config = load_config(cmd.config.as_deref());
    if cmd.bars {
        config = config.with_bars();
    }

    let (original, proof) = read_proof(&cmd.file, &config).unwrap_or_else(|err| exit_with(err));
    let text = proof.to_text(config.indent_style());

    if !cmd.write {
        print!("{text}");
    } else if text != original {
        write_proof(&cmd.file, &text);
    }
}
