//! JSON I/O handling for CLI
//!
//! - Input: one JSON command per stdin line, UTF-8
//! - Output: one JSON reply per stdout line, flushed after each

use std::path::Path;

use serde_json::Value;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};

use crate::api::Reply;

use super::errors::{CliError, CliResult};

/// Read a JSON array of records from a file
pub async fn read_records(path: &Path) -> CliResult<Vec<Value>> {
    let content = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| CliError::Input {
            path: path.to_path_buf(),
            source,
        })?;
    Ok(serde_json::from_str(&content)?)
}

/// Next non-blank input line, or `None` at end of input
pub async fn next_line<R: AsyncBufRead + Unpin>(input: &mut R) -> CliResult<Option<String>> {
    let mut line = String::new();
    loop {
        line.clear();
        if input.read_line(&mut line).await? == 0 {
            return Ok(None);
        }
        if !line.trim().is_empty() {
            return Ok(Some(line.trim_end().to_string()));
        }
    }
}

/// Write one reply line
pub async fn write_reply<W: AsyncWrite + Unpin>(output: &mut W, reply: &Reply) -> CliResult<()> {
    let mut line = reply.to_json();
    line.push('\n');
    output.write_all(line.as_bytes()).await?;
    output.flush().await?;
    Ok(())
}
