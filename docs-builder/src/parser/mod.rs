//! Comment extraction: engine dispatch and the stream-then-decode wrapper.
//!
//! An engine turns one source file into a stream of serialized records (a
//! JSON array). The wrapper drains that stream into a single buffer and
//! decodes it once the stream ends.

pub mod command;
pub mod jsdoc;

use crate::config::EngineConfig;
use crate::error::{DocsError, Result};
use crate::model::RawDocRecord;
use async_trait::async_trait;
use serde_json::Value;
use std::path::{Path, PathBuf};
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::Child;

/// Raw engine output for one file.
pub struct EngineOutput {
    pub stream: Box<dyn AsyncRead + Unpin + Send>,
    /// Set when the stream is a child process' stdout; its exit status is
    /// checked once the stream is drained.
    pub child: Option<Child>,
}

/// A comment-parsing engine.
#[async_trait]
pub trait Engine: Send + Sync {
    fn name(&self) -> &str;
    async fn open(&self, path: &Path) -> Result<EngineOutput>;
}

/// Create the engine described by the config.
pub fn create_engine(config: &EngineConfig) -> Box<dyn Engine> {
    match config {
        EngineConfig::Native => Box::new(jsdoc::NativeEngine),
        EngineConfig::Command { program, args } => {
            Box::new(command::CommandEngine::new(program.clone(), args.clone()))
        }
    }
}

/// Extract all records from one file, in engine emission order.
pub async fn extract(engine: &dyn Engine, path: &Path) -> Result<Vec<RawDocRecord>> {
    let EngineOutput { mut stream, child } = engine.open(path).await?;
    let mut buf = Vec::new();

    match child {
        None => {
            stream
                .read_to_end(&mut buf)
                .await
                .map_err(|e| engine_error(engine, path, e.to_string()))?;
        }
        Some(mut child) => {
            // Drain stderr alongside stdout so a chatty engine can't block.
            let mut stderr = child.stderr.take();
            let mut diagnostics = Vec::new();
            let (read, _) = tokio::join!(stream.read_to_end(&mut buf), async {
                match stderr.as_mut() {
                    Some(err) => err.read_to_end(&mut diagnostics).await,
                    None => Ok(0),
                }
            });
            read.map_err(|e| engine_error(engine, path, e.to_string()))?;

            let status = child
                .wait()
                .await
                .map_err(|e| engine_error(engine, path, e.to_string()))?;
            if !status.success() {
                let stderr = String::from_utf8_lossy(&diagnostics);
                let message = match stderr.trim() {
                    "" => format!("exited with {}", status),
                    text => format!("exited with {}: {}", status, text),
                };
                return Err(engine_error(engine, path, message));
            }
        }
    }

    let decode_error = |source: serde_json::Error| DocsError::Decode {
        path: path.to_path_buf(),
        source,
    };
    let values: Vec<Value> = serde_json::from_slice(&buf).map_err(decode_error)?;
    values
        .into_iter()
        .map(|value| RawDocRecord::from_value(value).map_err(decode_error))
        .collect()
}

/// Fold over the file list one file at a time, keeping file order.
pub async fn extract_all(engine: &dyn Engine, files: &[PathBuf]) -> Result<Vec<RawDocRecord>> {
    let mut records = Vec::new();
    for path in files {
        let found = extract(engine, path).await?;
        tracing::debug!(file = %path.display(), records = found.len(), "extracted");
        records.extend(found);
    }
    Ok(records)
}

fn engine_error(engine: &dyn Engine, path: &Path, message: String) -> DocsError {
    DocsError::Engine {
        engine: engine.name().to_string(),
        path: path.to_path_buf(),
        message,
    }
}
