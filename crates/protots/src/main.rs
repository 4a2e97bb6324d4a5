use clap::Parser;
use protots::commands::{Cli, run};

fn main() {
    protots::init_tracing();

    match run(Cli::parse()) {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            eprintln!("error: {e:#}");
            std::process::exit(1);
        }
    }
}
