use anyhow::Result;

use jdd_platform::cli::Command;
use jdd_platform::{
    handle_completions, handle_serve, handle_setup, handle_snapshot, handle_standings, interpret,
};

fn main() {
    setup_logging();
    parse_and_execute().unwrap_or_else(|e| {
        eprintln!("Error: {e}");
        std::process::exit(1);
    });
}

fn setup_logging() {
    sensible_env_logger::init!();
}

fn parse_and_execute() -> Result<()> {
    let command = interpret();
    execute_command(&command)
}

fn execute_command(command: &Command) -> Result<()> {
    match command {
        Command::Serve { port } => handle_serve(*port),
        Command::Setup => handle_setup(),
        Command::Standings { track } => handle_standings(track),
        Command::Snapshot { track } => handle_snapshot(track),
        Command::Completions { shell } => handle_completions(*shell),
    }
}
