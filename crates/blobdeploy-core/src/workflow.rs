//! CI console output using GitHub Actions workflow commands.
//!
//! `::group::` / `::endgroup::` fold the deploy and cleanup phases in the run
//! log, `::error::` marks the run as failed. Every line is masked with the
//! console's `Redactor` before it is written.

use std::io::{self, Write};
use std::sync::{Arc, Mutex};

use crate::redact::Redactor;

const RULE: &str = "------------------------------------------------------------";

pub struct Workflow {
    out: Box<dyn Write + Send>,
    redactor: Redactor,
}

impl Workflow {
    pub fn stdout() -> Self {
        Self::with_writer(Box::new(io::stdout()))
    }

    pub fn with_writer(out: Box<dyn Write + Send>) -> Self {
        Self {
            out,
            redactor: Redactor::new(),
        }
    }

    pub fn set_redactor(&mut self, redactor: Redactor) {
        self.redactor = redactor;
    }

    pub fn redactor(&self) -> &Redactor {
        &self.redactor
    }

    pub fn info(&mut self, message: &str) {
        self.line(message);
    }

    pub fn start_group(&mut self, title: &str) {
        self.line(&format!("::group::{title}"));
    }

    pub fn end_group(&mut self) {
        self.line("::endgroup::");
    }

    /// Marks the run as failed with `message`.
    pub fn set_failed(&mut self, message: &str) {
        self.line(&format!("::error::{}", escape_data(message)));
        tracing::error!("{}", self.redactor.redact(message));
    }

    pub fn success_banner(&mut self) {
        self.line("");
        self.line(RULE);
        self.line("Deployment was successful.");
        self.line(RULE);
    }

    fn line(&mut self, text: &str) {
        let text = self.redactor.redact(text);
        // Losing console output must not fail the deployment itself.
        let _ = writeln!(self.out, "{text}");
        let _ = self.out.flush();
    }
}

/// Escapes a workflow command's message; `%` goes first so the runner decodes
/// literal `%0A` back to itself.
fn escape_data(message: &str) -> String {
    message
        .replace('%', "%25")
        .replace('\r', "%0D")
        .replace('\n', "%0A")
}

/// In-memory sink that can be read back after handing a clone to `Workflow`.
#[derive(Debug, Clone, Default)]
pub struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

impl SharedBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contents(&self) -> String {
        let buf = self.0.lock().unwrap_or_else(|e| e.into_inner());
        String::from_utf8_lossy(&buf).into_owned()
    }
}

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
