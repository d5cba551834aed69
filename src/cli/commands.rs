//! CLI command implementations
//!
//! Each command loads the configuration, installs logging, opens the
//! configured store and runs against a fresh service.

use std::path::Path;
use std::sync::Arc;

use serde_json::json;
use tokio::io::{AsyncBufRead, AsyncWrite, BufReader};

use crate::api::{Command as ApiCommand, CommandHandler, Reply};
use crate::config::{Config, StoreKind};
use crate::model::RecordKind;
use crate::observability::init_logging;
use crate::service::ParkingService;
use crate::storage::{FileStore, MemoryStore, ParkingStore};

use super::args::Command;
use super::errors::{CliError, CliResult};
use super::io::{next_line, read_records, write_reply};

/// Run a parsed CLI command
pub async fn run_command(command: Command) -> CliResult<()> {
    let config = Config::load(command.config_path())?;
    init_logging(&config).map_err(|e| CliError::Logging(e.to_string()))?;

    match command {
        Command::Init { .. } => init(&config).await,
        Command::Exec { .. } => exec(&config).await,
        Command::Seed { entity, file, .. } => seed(&config, entity.into(), &file).await,
    }
}

/// Create an empty data file
pub async fn init(config: &Config) -> CliResult<()> {
    if config.store != StoreKind::File {
        return Err(CliError::NoDataFile);
    }
    let path = config.data_path()?;
    FileStore::initialize(path).await?;
    tracing::info!(event = "data_file_initialized", path = %path.display());

    let reply = Reply::ok(json!({ "dataFile": path.display().to_string() }));
    write_reply(&mut tokio::io::stdout(), &reply).await
}

/// Serve stdin commands until end of input
pub async fn exec(config: &Config) -> CliResult<()> {
    let mut input = BufReader::new(tokio::io::stdin());
    let mut output = tokio::io::stdout();

    match config.store {
        StoreKind::Memory => {
            let handler = handler(config, MemoryStore::new());
            serve(&handler, &mut input, &mut output).await?;
        }
        StoreKind::File => {
            let handler = handler(config, FileStore::open(config.data_path()?).await?);
            serve(&handler, &mut input, &mut output).await?;
        }
    }
    Ok(())
}

/// Bulk-create the records of a JSON array file
///
/// Seeding a memory store would discard the records on exit, so only the
/// file store is accepted.
pub async fn seed(config: &Config, entity: RecordKind, file: &Path) -> CliResult<()> {
    if config.store != StoreKind::File {
        return Err(CliError::NoDataFile);
    }
    let store = FileStore::open(config.data_path()?).await?;
    let records = read_records(file).await?;

    let reply = handler(config, store)
        .dispatch(ApiCommand::BulkCreate { entity, records })
        .await;
    write_reply(&mut tokio::io::stdout(), &reply).await?;

    match reply.error {
        Some(error) => Err(CliError::Rejected {
            code: error.code,
            message: error.message,
        }),
        None => Ok(()),
    }
}

fn handler<S: ParkingStore>(config: &Config, store: S) -> CommandHandler<S> {
    CommandHandler::new(ParkingService::new(
        Arc::new(store),
        config.service_settings(),
    ))
}

/// Answer each input line with one reply line; returns the number handled
pub async fn serve<S, R, W>(
    handler: &CommandHandler<S>,
    input: &mut R,
    output: &mut W,
) -> CliResult<usize>
where
    S: ParkingStore,
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut handled = 0;
    while let Some(line) = next_line(input).await? {
        let reply = handler.handle(&line).await;
        write_reply(output, &reply).await?;
        handled += 1;
    }
    tracing::info!(event = "input_closed", commands = handled);
    Ok(handled)
}
