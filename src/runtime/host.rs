use crate::error::EpoxyError;

use tracing::debug;

use std::fs;
use std::io::Write;
use std::path::PathBuf;
use std::process::{Command, ExitStatus, Output, Stdio};
use std::sync::atomic::{AtomicUsize, Ordering};

static SCRIPT_COUNTER: AtomicUsize = AtomicUsize::new(0);

/// External interpreter that runs the generated text.
#[derive(Debug, Clone)]
pub struct Host {
    command: String,
}

/// Generated script on disk, removed when dropped.
struct ScriptFile {
    path: PathBuf,
}

impl ScriptFile {
    fn write(script: &str) -> Result<Self, EpoxyError> {
        let path = std::env::temp_dir().join(format!(
            "epoxy-{}-{}.cjs",
            std::process::id(),
            SCRIPT_COUNTER.fetch_add(1, Ordering::Relaxed)
        ));
        fs::write(&path, script)?;
        Ok(ScriptFile { path })
    }
}

impl Drop for ScriptFile {
    fn drop(&mut self) {
        let _ = fs::remove_file(&self.path);
    }
}

impl Host {
    pub fn new(command: impl Into<String>) -> Self {
        Host {
            command: command.into(),
        }
    }

    pub fn command(&self) -> &str {
        &self.command
    }

    /// Whether the interpreter can be started at all.
    pub fn available(&self) -> bool {
        Command::new(&self.command)
            .arg("--version")
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .is_ok_and(|status| status.success())
    }

    /// Runs `script` with inherited stdio.
    pub fn run(&self, script: &str) -> Result<ExitStatus, EpoxyError> {
        let file = ScriptFile::write(script)?;
        debug!(host = %self.command, path = %file.path.display(), "running generated script");
        Command::new(&self.command)
            .arg(&file.path)
            .status()
            .map_err(|source| self.spawn_error(source))
    }

    /// Runs `script` feeding `stdin` and capturing its output.
    pub fn run_captured(&self, script: &str, stdin: &str) -> Result<Output, EpoxyError> {
        let file = ScriptFile::write(script)?;
        let mut child = Command::new(&self.command)
            .arg(&file.path)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|source| self.spawn_error(source))?;

        if let Some(mut pipe) = child.stdin.take() {
            pipe.write_all(stdin.as_bytes())?;
        }
        Ok(child.wait_with_output()?)
    }

    fn spawn_error(&self, source: std::io::Error) -> EpoxyError {
        EpoxyError::Host {
            command: self.command.clone(),
            source,
        }
    }
}
