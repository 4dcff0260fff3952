use clap::Parser;
use cancelcheck::cli::{init_tracing, run, Cli};

fn main() -> std::process::ExitCode {
    init_tracing();
    run(Cli::parse())
}
