//! External-command engine: runs a parser program per file and streams its
//! stdout.

use super::{Engine, EngineOutput};
use crate::error::{DocsError, Result};
use async_trait::async_trait;
use std::path::Path;
use std::process::Stdio;
use tokio::process::Command;

pub struct CommandEngine {
    program: String,
    args: Vec<String>,
}

impl CommandEngine {
    pub fn new(program: String, args: Vec<String>) -> Self {
        CommandEngine { program, args }
    }
}

#[async_trait]
impl Engine for CommandEngine {
    fn name(&self) -> &str {
        &self.program
    }

    /// Spawn `program args... <path>`; the file path is always the last
    /// argument.
    async fn open(&self, path: &Path) -> Result<EngineOutput> {
        let engine_error = |message: String| DocsError::Engine {
            engine: self.program.clone(),
            path: path.to_path_buf(),
            message,
        };

        let mut child = Command::new(&self.program)
            .args(&self.args)
            .arg(path)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| engine_error(format!("failed to spawn: {}", e)))?;

        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| engine_error("stdout was not captured".to_string()))?;

        Ok(EngineOutput {
            stream: Box::new(stdout),
            child: Some(child),
        })
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use crate::parser::extract;
    use std::fs;
    use tempfile::TempDir;

    fn sh(script: &str) -> CommandEngine {
        // `sh -c script <path>` binds the path to $0
        CommandEngine::new("sh".into(), vec!["-c".into(), script.into()])
    }

    #[tokio::test]
    async fn streams_program_stdout() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("records.json");
        fs::write(&path, r#"[{"name":"addDays","category":"Day Helpers"}]"#).unwrap();

        let records = extract(&sh(r#"cat "$0""#), &path).await.unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].name, "addDays");
    }

    #[tokio::test]
    async fn nonzero_exit_is_fatal() {
        let err = extract(&sh("echo boom >&2; exit 3"), Path::new("x.js"))
            .await
            .unwrap_err();
        match err {
            DocsError::Engine { engine, message, .. } => {
                assert_eq!(engine, "sh");
                assert!(message.contains("boom"), "message was: {}", message);
            }
            other => panic!("unexpected error: {}", other),
        }
    }

    #[tokio::test]
    async fn missing_program_is_fatal() {
        let engine = CommandEngine::new("definitely-not-a-real-parser".into(), vec![]);
        let err = extract(&engine, Path::new("x.js")).await.unwrap_err();
        assert!(err.to_string().contains("failed to spawn"));
    }
}
