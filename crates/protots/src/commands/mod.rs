//! CLI commands.

pub mod generate;
pub mod plugin;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "protots", version, about = "Generate TypeScript Twirp clients from protobuf schemas")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Generate from a descriptor set file (JSON or binary)
    Generate(generate::GenerateArgs),
    /// Run as a protoc plugin: CodeGeneratorRequest on stdin, response on stdout
    Plugin,
}

/// Run a parsed command, returning the process exit code.
pub fn run(cli: Cli) -> anyhow::Result<i32> {
    match cli.command {
        Command::Generate(args) => generate::run(args),
        Command::Plugin => {
            plugin::run_stdio()?;
            Ok(0)
        }
    }
}
