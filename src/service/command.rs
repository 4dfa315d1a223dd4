use std::process::Stdio;
use std::time::Duration;

use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::process::Command;

use crate::config::InputMode;
use crate::search::record::{decode_line, SearchRecord};
use crate::service::{SearchError, SearchFuture, SearchResponse, SearchService, STATUS_OK};

/// Status reported when the search command exits unsuccessfully
pub const STATUS_COMMAND_FAILED: u16 = 500;

/// Runs a local command per query. The command receives the query on stdin
/// (or as its last argument) and prints one JSON record per line.
pub struct CommandSearch {
    command: Vec<String>,
    input: InputMode,
    timeout: Duration,
}

impl CommandSearch {
    pub fn new(command: Vec<String>, input: InputMode, timeout: Duration) -> Self {
        Self {
            command,
            input,
            timeout,
        }
    }
}

impl SearchService for CommandSearch {
    fn name(&self) -> &str {
        "command"
    }

    fn search(&self, query: &str) -> SearchFuture {
        let command = self.command.clone();
        let input = self.input.clone();
        let timeout = self.timeout;
        let query = query.to_string();
        Box::pin(async move { run_command(&command, &input, &query, timeout).await })
    }
}

async fn run_command(
    command: &[String],
    input: &InputMode,
    query: &str,
    timeout: Duration,
) -> Result<SearchResponse, SearchError> {
    let (program, args) = command
        .split_first()
        .ok_or_else(|| SearchError::NotConfigured("empty search command".into()))?;

    let mut cmd = Command::new(resolve_command(program));
    cmd.args(args);
    match input {
        InputMode::Stdin => {
            cmd.stdin(Stdio::piped());
        }
        InputMode::Arg => {
            cmd.arg(query);
            cmd.stdin(Stdio::null());
        }
    }
    cmd.stdout(Stdio::piped())
        .stderr(Stdio::null())
        .kill_on_drop(true);

    let mut child = cmd.spawn().map_err(|e| SearchError::Spawn {
        command: program.clone(),
        reason: e.to_string(),
    })?;

    if *input == InputMode::Stdin {
        if let Some(mut stdin) = child.stdin.take() {
            let _ = stdin.write_all(query.as_bytes()).await;
            let _ = stdin.write_all(b"\n").await;
            drop(stdin);
        }
    }

    let result = tokio::time::timeout(timeout, async {
        let (records, skipped) = read_records(&mut child).await;
        let status = child.wait().await;
        (records, skipped, status)
    })
    .await;

    match result {
        Ok((records, skipped, Ok(status))) => {
            let status = if status.success() {
                STATUS_OK
            } else {
                tracing::debug!("Search command {:?} exited with {}", command, status);
                STATUS_COMMAND_FAILED
            };
            Ok(SearchResponse {
                status,
                records,
                skipped,
            })
        }
        Ok((_, _, Err(e))) => Err(SearchError::Spawn {
            command: program.clone(),
            reason: e.to_string(),
        }),
        Err(_) => {
            tracing::warn!("Search command {:?} timed out after {:?}", command, timeout);
            let _ = child.kill().await;
            Err(SearchError::Timeout(timeout.as_millis() as u64))
        }
    }
}

async fn read_records(child: &mut tokio::process::Child) -> (Vec<SearchRecord>, usize) {
    let stdout = match child.stdout.take() {
        Some(s) => s,
        None => return (Vec::new(), 0),
    };

    let mut lines = BufReader::new(stdout).lines();
    let mut records = Vec::new();
    let mut skipped = 0;
    while let Ok(Some(line)) = lines.next_line().await {
        if line.trim().is_empty() {
            continue;
        }
        match decode_line(&line) {
            Some(record) => records.push(record),
            None => skipped += 1,
        }
    }
    (records, skipped)
}

/// Resolve a command name: if it's not an absolute path, check the directory
/// of our own executable first, then fall back to PATH lookup.
pub(crate) fn resolve_command(name: &str) -> String {
    let path = std::path::Path::new(name);
    if path.is_absolute() {
        return name.to_string();
    }
    if let Ok(exe) = std::env::current_exe() {
        if let Some(dir) = exe.parent() {
            let candidate = dir.join(name);
            if candidate.is_file() {
                return candidate.to_string_lossy().to_string();
            }
        }
    }
    name.to_string()
}
