use std::{
    fs,
    io::{self, BufRead, BufReader, Write},
    path::{Path, PathBuf},
    process::{Child, ChildStdin, ChildStdout, Command, Stdio},
};

use crate::{
    config::Config,
    diagnostics::{Diagnostic, DiagnosticKind, Result, SchlangeError},
    host::{
        protocol::{self, Outcome, Reply, Request, RECORD_SEPARATOR},
        ExecutionUnit, ExitStatus, Host, Session,
    },
};

const BOOTSTRAP: &str = include_str!("bootstrap.py");
const DRIVER: &str = include_str!("driver.py");

/// Runs rewritten programs with an external Python 3 interpreter.
#[derive(Debug, Clone)]
pub struct PythonHost {
    interpreter: PathBuf,
}

impl PythonHost {
    pub fn new(interpreter: impl Into<PathBuf>) -> Self {
        Self {
            interpreter: interpreter.into(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(&config.interpreter)
    }

    pub fn interpreter(&self) -> &Path {
        &self.interpreter
    }

    /// Whether the configured interpreter starts and is Python 3.
    pub fn is_available(&self) -> bool {
        Command::new(&self.interpreter)
            .arg("-c")
            .arg("import sys; sys.exit(0 if sys.version_info[0] == 3 else 1)")
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map(|status| status.success())
            .unwrap_or(false)
    }

    fn spawn_error(&self, err: io::Error) -> SchlangeError {
        Diagnostic::new(
            DiagnosticKind::Host,
            format!(
                "could not start Python interpreter `{}`: {err}",
                self.interpreter.display()
            ),
        )
        .with_note("set SCHLANGE_PYTHON or pass --python to choose another interpreter")
        .into()
    }
}

impl Default for PythonHost {
    fn default() -> Self {
        Self::from_config(&Config::from_env())
    }
}

impl Host for PythonHost {
    type Session = PythonSession;

    fn execute(&self, unit: &ExecutionUnit<'_>) -> Result<ExitStatus> {
        let report = tempfile::Builder::new()
            .prefix("schlange_report_")
            .suffix(".json")
            .tempfile()?;
        tracing::debug!(
            target: "schlange::host",
            interpreter = %self.interpreter.display(),
            identity = unit.identity,
            artifact = %unit.artifact.display(),
            "starting python"
        );
        let status = Command::new(&self.interpreter)
            .arg("-c")
            .arg(BOOTSTRAP)
            .arg(unit.artifact)
            .arg(unit.identity)
            .arg(report.path())
            .args(unit.argv)
            .status()
            .map_err(|err| self.spawn_error(err))?;

        let raw = fs::read_to_string(report.path())?;
        if raw.trim().is_empty() {
            // No report means the program left without unwinding, e.g. `os._exit`.
            return match status.code() {
                Some(code) => Ok(ExitStatus::new(code)),
                None => Err(Diagnostic::new(
                    DiagnosticKind::Host,
                    format!("python terminated without reporting an outcome ({status})"),
                )
                .with_origin(unit.identity)
                .into()),
            };
        }
        let outcome: Outcome =
            serde_json::from_str(&raw).map_err(|err| protocol::protocol_error("report", err))?;
        tracing::debug!(target: "schlange::host", ?outcome, "python finished");
        outcome.into_result(unit.identity)
    }

    fn open_session(&self) -> Result<PythonSession> {
        let mut child = Command::new(&self.interpreter)
            .arg("-u")
            .arg("-c")
            .arg(DRIVER)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .spawn()
            .map_err(|err| self.spawn_error(err))?;
        let (Some(stdin), Some(stdout)) = (child.stdin.take(), child.stdout.take()) else {
            let _ = child.kill();
            return Err(Diagnostic::new(
                DiagnosticKind::Host,
                "python session started without piped stdio",
            )
            .into());
        };
        tracing::debug!(target: "schlange::host", pid = child.id(), "opened python session");
        Ok(PythonSession {
            child,
            stdin: Some(stdin),
            stdout: BufReader::new(stdout),
        })
    }
}

/// A long-lived Python process holding the loop's namespace.
///
/// Program output is forwarded to this process's stdout; replies are split
/// off at the record separator.
pub struct PythonSession {
    child: Child,
    stdin: Option<ChildStdin>,
    stdout: BufReader<ChildStdout>,
}

impl PythonSession {
    fn request(&mut self, request: Request<'_>) -> Result<Reply> {
        let stdin = self.stdin.as_mut().ok_or_else(|| {
            SchlangeError::from(Diagnostic::new(
                DiagnosticKind::Host,
                "python session is closed",
            ))
        })?;
        let mut line = serde_json::to_string(&request)
            .map_err(|err| protocol::protocol_error("request", err))?;
        line.push('\n');
        if let Err(err) = stdin.write_all(line.as_bytes()).and_then(|()| stdin.flush()) {
            self.stdin = None;
            return Err(err.into());
        }
        self.read_reply()
    }

    fn read_reply(&mut self) -> Result<Reply> {
        let mut out = io::stdout().lock();
        let mut buffer = Vec::new();
        loop {
            buffer.clear();
            if self.stdout.read_until(b'\n', &mut buffer)? == 0 {
                self.stdin = None;
                return Err(Diagnostic::new(
                    DiagnosticKind::Host,
                    "python session ended unexpectedly",
                )
                .into());
            }
            match buffer.iter().position(|&byte| byte == RECORD_SEPARATOR) {
                Some(index) => {
                    out.write_all(&buffer[..index])?;
                    out.flush()?;
                    return serde_json::from_slice(&buffer[index + 1..])
                        .map_err(|err| protocol::protocol_error("reply", err));
                }
                None => {
                    out.write_all(&buffer)?;
                    out.flush()?;
                }
            }
        }
    }
}

impl Session for PythonSession {
    fn eval_expression(&mut self, source: &str) -> Result<Option<String>> {
        match self.request(Request::Eval { source })? {
            Reply::Value { repr } => Ok(Some(repr)),
            Reply::None => Ok(None),
            other => Err(other.into_failure().into()),
        }
    }

    fn exec_statement(&mut self, source: &str) -> Result<()> {
        match self.request(Request::Exec { source })? {
            Reply::Value { .. } | Reply::None => Ok(()),
            other => Err(other.into_failure().into()),
        }
    }

    fn is_alive(&mut self) -> bool {
        self.stdin.is_some() && matches!(self.child.try_wait(), Ok(None))
    }
}

impl Drop for PythonSession {
    fn drop(&mut self) {
        // Closing stdin ends the driver's request loop.
        self.stdin.take();
        let _ = self.child.wait();
    }
}
