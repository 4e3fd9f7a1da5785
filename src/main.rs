mod cli;

fn main() {
    cli::run_cli();
}
