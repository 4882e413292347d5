//! Hyperscale Replica Control
//!
//! Inspect and change the persisted primary/replica role of a validator.
//!
//! The replica state database is owned by a single process, so run this while
//! the validator is stopped; the next start picks up whatever was written here.
//!
//! # Usage
//!
//! ```bash
//! # Show the current role as JSON
//! hyperscale-replica-ctl --config replica.toml status
//!
//! # Hand over: become primary from block 1200 until block 5000
//! hyperscale-replica-ctl --data-dir /var/lib/hyperscale/replica start-at 1200
//! hyperscale-replica-ctl --data-dir /var/lib/hyperscale/replica stop-at 5000
//!
//! # Would this node sign block 1300?
//! hyperscale-replica-ctl --data-dir /var/lib/hyperscale/replica check 1300
//! ```

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use hyperscale_production::{
    init_logging, open_replica_state, ReplicaConfig, RocksDbReplicaState,
};
use hyperscale_replica::{ReplicaStateError, Role};
use hyperscale_types::BlockNumber;
use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::warn;

/// Hyperscale Replica Control
///
/// Reads and updates the durable primary/replica role of a validator.
#[derive(Parser, Debug)]
#[command(name = "hyperscale-replica-ctl")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Path to configuration file (TOML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Replica state data directory (overrides config)
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Default to replica when no record exists (overrides config)
    #[arg(long, conflicts_with = "primary")]
    replica: bool,

    /// Default to primary when no record exists (overrides config)
    #[arg(long)]
    primary: bool,

    /// Refuse to create a new database if none exists at the data directory
    #[arg(long)]
    no_create: bool,

    /// Log level filter (overrides RUST_LOG)
    #[arg(long, default_value = "warn")]
    log_level: String,

    /// Path to log file (redirects all logs to this file)
    #[arg(long)]
    logfile: Option<PathBuf>,

    /// Print Prometheus metrics after the command (requires metrics enabled)
    #[arg(long)]
    print_metrics: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the replica state summary as JSON
    Status,
    /// Become primary at this block (inclusive)
    StartAt { block: BlockNumber },
    /// Stop being primary at this block (exclusive)
    StopAt { block: BlockNumber },
    /// Clear the start block
    ClearStart,
    /// Clear the stop block
    ClearStop,
    /// Become primary now and clear any schedule
    MakePrimary,
    /// Become a replica now and clear any schedule
    MakeReplica,
    /// Report whether this node is primary for a sequence number
    Check { seq: BlockNumber },
}

fn apply_overrides(config: &mut ReplicaConfig, cli: &Cli) {
    if let Some(ref data_dir) = cli.data_dir {
        config.node.data_dir = data_dir.clone();
    }

    if cli.no_create {
        config.storage.create_if_missing = false;
    }

    if let Some(ref logfile) = cli.logfile {
        config.telemetry.log_file = Some(logfile.clone());
    }
}

fn role_override(cli: &Cli) -> Option<Role> {
    match (cli.primary, cli.replica) {
        (true, _) => Some(Role::Primary),
        (_, true) => Some(Role::Replica),
        _ => None,
    }
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    let mut stdout = std::io::stdout().lock();
    serde_json::to_writer_pretty(&mut stdout, value)?;
    writeln!(stdout)?;
    Ok(())
}

fn run(state: &RocksDbReplicaState, command: &Command) -> Result<(), ReplicaStateError> {
    match command {
        Command::Status => {}
        Command::StartAt { block } => state.set_start_block(Some(block.clone()))?,
        Command::StopAt { block } => state.set_stop_block(Some(block.clone()))?,
        Command::ClearStart => state.set_start_block(None)?,
        Command::ClearStop => state.set_stop_block(None)?,
        Command::MakePrimary => state.make_primary()?,
        Command::MakeReplica => state.make_replica()?,
        Command::Check { seq } => {
            println!("{}", state.is_primary_for_seq(seq));
            return Ok(());
        }
    }
    Ok(())
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => ReplicaConfig::load(path)?,
        None => ReplicaConfig::default(),
    };
    apply_overrides(&mut config, &cli);

    let _log_guard = init_logging(&cli.log_level, config.telemetry.log_file.as_deref())?;

    if config.metrics.enabled {
        hyperscale_metrics_prometheus::install();
    }

    let state = open_replica_state(&config, role_override(&cli))?;

    let outcome = run(&state, &cli.command);

    // The summary reflects memory, which is what the node would have acted on.
    if !matches!(cli.command, Command::Check { .. }) {
        print_json(&state.summary())?;
    }

    let exit = match outcome {
        Ok(()) => ExitCode::SUCCESS,
        Err(ReplicaStateError::InvalidRange(e)) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
        Err(e) if e.is_persist_failure() => {
            warn!(error = %e, "Replica state write failed");
            eprintln!(
                "warning: {e}\nwarning: the role shown above may not survive a restart; \
                 check the data directory and retry"
            );
            ExitCode::FAILURE
        }
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    };

    state
        .close()
        .context("Failed to close replica state database")?;

    if cli.print_metrics && config.metrics.enabled {
        let (_, body) =
            hyperscale_metrics_prometheus::encode_metrics().map_err(anyhow::Error::msg)?;
        std::io::stdout().write_all(&body)?;
    }

    Ok(exit)
}
