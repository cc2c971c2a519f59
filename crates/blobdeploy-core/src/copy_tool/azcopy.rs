//! Runs the azcopy binary as a child process.

use std::fmt;
use std::io::{self, Write};
use std::process::Stdio;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::process::Command;

use super::{copy_args, remove_args, render_command_line, sync_args};
use super::{CopyOptions, CopyTool, SyncOptions};
use crate::error::DeployError;
use crate::redact::Redactor;

/// azcopy v10 is installed as `azcopy10` on the Linux/macOS runners.
pub fn default_program() -> &'static str {
    if cfg!(windows) {
        "azcopy"
    } else {
        "azcopy10"
    }
}

type SharedWriter = Arc<Mutex<Box<dyn Write + Send>>>;

/// Where the echoed command line and the child's output go.
#[derive(Clone)]
enum Sink {
    Stdout,
    Stderr,
    Writer(SharedWriter),
}

impl Sink {
    fn write_line(&self, line: &str) {
        // Losing console output must not fail the copy itself.
        match self {
            Sink::Stdout => {
                let _ = writeln!(io::stdout().lock(), "{line}");
            }
            Sink::Stderr => {
                let _ = writeln!(io::stderr().lock(), "{line}");
            }
            Sink::Writer(w) => {
                let mut w = w.lock().unwrap_or_else(|e| e.into_inner());
                let _ = writeln!(w, "{line}");
                let _ = w.flush();
            }
        }
    }
}

#[derive(Clone)]
pub struct AzCopy {
    program: String,
    redactor: Redactor,
    output: Option<SharedWriter>,
}

impl fmt::Debug for AzCopy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AzCopy")
            .field("program", &self.program)
            .field("captured", &self.output.is_some())
            .finish()
    }
}

impl AzCopy {
    /// Uses `program` if given, else the platform default. Everything the child
    /// prints, and the echoed command line, goes through `redactor`.
    pub fn new(program: Option<String>, redactor: Redactor) -> Self {
        Self {
            program: program.unwrap_or_else(|| default_program().to_string()),
            redactor,
            output: None,
        }
    }

    /// Sends the echoed command and both child streams to `out` instead of
    /// the process's stdout and stderr.
    pub fn with_output(mut self, out: Box<dyn Write + Send>) -> Self {
        self.output = Some(Arc::new(Mutex::new(out)));
        self
    }

    fn sink(&self, fallback: Sink) -> Sink {
        match &self.output {
            Some(w) => Sink::Writer(Arc::clone(w)),
            None => fallback,
        }
    }

    async fn run(&self, args: Vec<String>) -> Result<i32, DeployError> {
        let line = render_command_line(&self.program, &args);
        let line = self.redactor.redact(&line);
        self.sink(Sink::Stdout).write_line(&format!("[command]{line}"));
        tracing::debug!(command = %line, "spawning copy tool");

        let mut child = Command::new(&self.program)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|source| DeployError::Tool {
                program: self.program.clone(),
                source,
            })?;

        let stdout = child.stdout.take();
        let stderr = child.stderr.take();
        let out_task = stdout
            .map(|s| tokio::spawn(forward_lines(s, self.redactor.clone(), self.sink(Sink::Stdout))));
        let err_task = stderr
            .map(|s| tokio::spawn(forward_lines(s, self.redactor.clone(), self.sink(Sink::Stderr))));

        let status = child.wait().await.map_err(|source| DeployError::Tool {
            program: self.program.clone(),
            source,
        })?;

        for task in [out_task, err_task].into_iter().flatten() {
            let _ = task.await;
        }

        // No exit code means the child was killed by a signal.
        let code = status.code().unwrap_or(-1);
        if code != 0 {
            tracing::warn!(command = %line, code, "copy tool exited with failure");
        }
        Ok(code)
    }
}

/// Copies child output to `sink` line by line with secrets masked.
///
/// Lines are decoded lossily: azcopy echoes local file names, which need not
/// be UTF-8, and the pipe has to be drained to EOF or the child dies of
/// SIGPIPE on its next write.
async fn forward_lines<R>(reader: R, redactor: Redactor, sink: Sink)
where
    R: AsyncRead + Unpin,
{
    let mut reader = BufReader::new(reader);
    let mut buf = Vec::new();
    loop {
        buf.clear();
        match reader.read_until(b'\n', &mut buf).await {
            Ok(0) => break,
            Ok(_) => {
                let text = String::from_utf8_lossy(&buf);
                let line = text.trim_end_matches(['\n', '\r']);
                sink.write_line(&redactor.redact(line));
            }
            Err(err) => {
                tracing::warn!("reading copy tool output failed: {}", err);
                break;
            }
        }
    }
}

#[async_trait]
impl CopyTool for AzCopy {
    fn program(&self) -> &str {
        &self.program
    }

    async fn copy(&self, src: &str, dst: &str, options: &CopyOptions) -> Result<i32, DeployError> {
        self.run(copy_args(src, dst, options)).await
    }

    async fn remove(&self, dst: &str, recursive: bool) -> Result<i32, DeployError> {
        self.run(remove_args(dst, recursive)).await
    }

    async fn sync(&self, src: &str, dst: &str, options: &SyncOptions) -> Result<i32, DeployError> {
        self.run(sync_args(src, dst, options)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflow::SharedBuffer;

    #[test]
    fn explicit_program_wins() {
        let tool = AzCopy::new(Some("/opt/azcopy".to_string()), Redactor::new());
        assert_eq!(tool.program(), "/opt/azcopy");
    }

    #[test]
    fn default_program_is_platform_specific() {
        let tool = AzCopy::new(None, Redactor::new());
        assert_eq!(tool.program(), default_program());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn reports_exit_codes() {
        let ok = AzCopy::new(Some("true".to_string()), Redactor::new());
        assert_eq!(ok.remove("https://a/c?q", true).await.unwrap(), 0);

        let failing = AzCopy::new(Some("false".to_string()), Redactor::new());
        assert_eq!(failing.remove("https://a/c?q", true).await.unwrap(), 1);
    }

    #[cfg(unix)]
    fn script(dir: &std::path::Path, body: &str) -> String {
        use std::os::unix::fs::PermissionsExt;
        let path = dir.join("tool.sh");
        std::fs::write(&path, format!("#!/bin/sh\n{body}")).unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
        path.to_string_lossy().into_owned()
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn non_utf8_output_is_drained_and_exit_code_kept() {
        let dir = tempfile::tempdir().unwrap();
        let program = script(
            dir.path(),
            "printf 'copying \\377\\376 file\\n'\n\
             i=0\n\
             while [ $i -lt 2000 ]; do echo \"progress $i\"; i=$((i+1)); done\n\
             exit 0\n",
        );
        let buf = SharedBuffer::new();
        let tool = AzCopy::new(Some(program), Redactor::new()).with_output(Box::new(buf.clone()));

        let code = tool.copy("dist/a", "https://a/c?q", &CopyOptions::default()).await.unwrap();
        assert_eq!(code, 0);
        let out = buf.contents();
        assert!(out.contains("copying \u{FFFD}\u{FFFD} file\n"));
        assert!(out.contains("progress 1999\n"));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn echo_and_child_output_are_redacted() {
        let dir = tempfile::tempdir().unwrap();
        let program = script(dir.path(), "echo \"INFO: $*\"\necho \"ERR: $2\" >&2\n");
        let buf = SharedBuffer::new();
        let redactor = Redactor::new().with_secret("sv=1&sig=HIDDEN");
        let tool = AzCopy::new(Some(program), redactor).with_output(Box::new(buf.clone()));

        let code = tool.remove("https://a/c?sv=1&sig=HIDDEN", true).await.unwrap();
        assert_eq!(code, 0);
        let out = buf.contents();
        assert!(out.contains("[command]"));
        assert!(out.contains("INFO: rm https://a/c?*** --recursive\n"));
        assert!(out.contains("ERR: https://a/c?***\n"));
        assert!(!out.contains("HIDDEN"));
    }

    #[tokio::test]
    async fn missing_binary_is_tool_error() {
        let tool = AzCopy::new(
            Some("blobdeploy-definitely-not-installed".to_string()),
            Redactor::new(),
        );
        let err = tool
            .copy("a", "b", &CopyOptions::default())
            .await
            .unwrap_err();
        assert!(matches!(err, DeployError::Tool { .. }));
    }
}
