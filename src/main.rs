//! colima-vmnet - vde_vmnet daemon supervisor
//!
//! Starts vde_vmnet detached from the terminal for a colima session and
//! terminates it again, tracking both processes through pid files.

use clap::{Parser, Subcommand};
use vmnet_core::error::{DaemonError, SessionError, VmnetError};
use vmnet_core::init_logging;

mod cli;
mod daemon;

#[derive(Parser)]
#[command(name = "colima-vmnet")]
#[command(about = "vde_vmnet runner for vde_vmnet daemons")]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the daemon
    Start {
        /// Session (profile) identifier
        session: String,
    },
    /// Stop the daemon
    Stop {
        /// Session (profile) identifier
        session: String,
    },
    /// Show the daemon status
    Status {
        /// Session (profile) identifier
        session: String,
    },
}

fn exit_code(error: &VmnetError) -> i32 {
    match error {
        // Environment and setup errors (exit code 2)
        VmnetError::Session(SessionError::DirectoryResolution { .. }) => 2,
        VmnetError::Session(SessionError::InvalidIdentifier { .. }) => 2,
        VmnetError::Config(_) | VmnetError::Toml(_) => 2,
        VmnetError::Daemon(DaemonError::CreateDirectory { .. }) => 2,
        // Runtime errors (exit code 1)
        VmnetError::Daemon(_) => 1,
        VmnetError::Process(_) | VmnetError::Supervised(_) | VmnetError::Io(_) => 1,
    }
}

fn main() {
    let cli = Cli::parse();

    let logs = match init_logging(cli.verbose) {
        Ok(logs) => logs,
        Err(e) => {
            eprintln!("Failed to initialize logging: {}", e);
            std::process::exit(2);
        }
    };

    let result = match cli.command {
        Commands::Start { session } => cli::vmnet::run_start(&session, &logs),
        Commands::Stop { session } => cli::vmnet::run_stop(&session),
        Commands::Status { session } => cli::vmnet::run_status(&session),
    };

    match result {
        Ok(()) => std::process::exit(0),
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(exit_code(&e));
        }
    }
}
