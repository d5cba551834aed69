//! CLI argument definitions using clap
//!
//! Commands:
//! - parking-registry init --config <path>
//! - parking-registry exec --config <path>
//! - parking-registry seed --config <path> --entity <kind> --file <path>

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::model::RecordKind;

/// Parking registry - parking lots, vehicles and parking sessions
#[derive(Parser, Debug)]
#[command(name = "parking-registry")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create an empty data file for the file store
    Init {
        /// Path to configuration file
        #[arg(long, default_value = "./parking-registry.json")]
        config: PathBuf,
    },

    /// Execute JSON commands from stdin, one per line
    Exec {
        /// Path to configuration file
        #[arg(long, default_value = "./parking-registry.json")]
        config: PathBuf,
    },

    /// Bulk-create records from a JSON array file
    Seed {
        /// Path to configuration file
        #[arg(long, default_value = "./parking-registry.json")]
        config: PathBuf,

        /// Collection to load into
        #[arg(long, value_enum)]
        entity: EntityArg,

        /// JSON file holding an array of records
        #[arg(long)]
        file: PathBuf,
    },
}

impl Command {
    pub fn config_path(&self) -> &PathBuf {
        match self {
            Command::Init { config } | Command::Exec { config } | Command::Seed { config, .. } => {
                config
            }
        }
    }
}

/// Collection names accepted on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum EntityArg {
    ParkingLot,
    Vehicle,
    ParkingSession,
}

impl From<EntityArg> for RecordKind {
    fn from(arg: EntityArg) -> Self {
        match arg {
            EntityArg::ParkingLot => RecordKind::ParkingLot,
            EntityArg::Vehicle => RecordKind::Vehicle,
            EntityArg::ParkingSession => RecordKind::ParkingSession,
        }
    }
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_seed() {
        let cli = Cli::try_parse_from([
            "parking-registry",
            "seed",
            "--config",
            "cfg.json",
            "--entity",
            "parking-session",
            "--file",
            "sessions.json",
        ])
        .unwrap();
        match cli.command {
            Command::Seed { entity, file, .. } => {
                assert_eq!(RecordKind::from(entity), RecordKind::ParkingSession);
                assert_eq!(file, PathBuf::from("sessions.json"));
            }
            other => panic!("expected Seed, got {:?}", other),
        }
    }

    #[test]
    fn test_default_config_path() {
        let cli = Cli::try_parse_from(["parking-registry", "exec"]).unwrap();
        assert_eq!(
            cli.command.config_path(),
            &PathBuf::from("./parking-registry.json")
        );
    }
}
