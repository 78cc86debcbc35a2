use clap::{Parser, Subcommand};
use clap_complete::Shell;

#[derive(Parser, Debug)]
#[command(author, version, about = "jdd-platform rating and standings engine")]
pub struct Cli {
    /// Command
    #[clap(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
#[clap(rename_all = "lower_case")]
pub enum Command {
    /// Start the API server
    Serve {
        /// Port number (optional, defaults to 3000)
        #[arg(short, long, default_value_t = 3000)]
        port: u16,
    },
    /// Create the database schema, wiping any existing data
    Setup,
    /// Print the current standings table
    Standings {
        /// Rating track: elo or atp
        #[arg(short, long, default_value = "elo")]
        track: String,
    },
    /// Capture a rank snapshot for movement indicators
    Snapshot {
        /// Rating track: elo or atp
        #[arg(short, long, default_value = "elo")]
        track: String,
    },
    /// Generate shell completions
    Completions {
        /// Target shell
        #[arg(value_enum)]
        shell: Shell,
    },
}
