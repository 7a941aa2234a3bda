#![allow(dead_code)]

use std::{
    cell::RefCell,
    fs,
    path::PathBuf,
};

use schlange::{
    diagnostics::{Diagnostic, DiagnosticKind, Result},
    host::{ExecutionUnit, ExitStatus, Host, Session},
    PythonHost,
};

/// What [`RecordingHost`] does when asked to execute a unit.
#[derive(Debug, Clone, Copy)]
pub enum Behaviour {
    Complete,
    Exit(i32),
    Raise,
    RejectSyntax,
}

#[derive(Debug, Clone)]
pub struct RecordedRun {
    pub identity: String,
    pub argv: Vec<String>,
    pub program_argv: Vec<String>,
    pub artifact: PathBuf,
    pub artifact_text: String,
}

pub struct RecordingHost {
    pub behaviour: Behaviour,
    pub runs: RefCell<Vec<RecordedRun>>,
}

impl RecordingHost {
    pub fn new(behaviour: Behaviour) -> Self {
        Self {
            behaviour,
            runs: RefCell::new(Vec::new()),
        }
    }

    pub fn last_run(&self) -> RecordedRun {
        self.runs
            .borrow()
            .last()
            .cloned()
            .expect("host should have executed a unit")
    }
}

impl Host for RecordingHost {
    type Session = ScriptedSession;

    fn execute(&self, unit: &ExecutionUnit<'_>) -> Result<ExitStatus> {
        let artifact_text = fs::read_to_string(unit.artifact)?;
        self.runs.borrow_mut().push(RecordedRun {
            identity: unit.identity.to_string(),
            argv: unit.argv.to_vec(),
            program_argv: unit.program_argv(),
            artifact: unit.artifact.to_path_buf(),
            artifact_text,
        });
        match self.behaviour {
            Behaviour::Complete => Ok(ExitStatus::SUCCESS),
            Behaviour::Exit(code) => Ok(ExitStatus::new(code)),
            Behaviour::Raise => Err(Diagnostic::new(
                DiagnosticKind::HostRuntime,
                "ValueError: kaputt",
            )
            .with_origin(unit.identity)
            .with_traceback(format!(
                "Traceback (most recent call last):\n  File \"{}\", line 1, in <module>\nValueError: kaputt\n",
                unit.identity
            ))
            .into()),
            Behaviour::RejectSyntax => Err(Diagnostic::new(
                DiagnosticKind::HostCompile,
                "invalid syntax",
            )
            .with_origin(unit.identity)
            .into()),
        }
    }

    fn open_session(&self) -> Result<ScriptedSession> {
        Ok(ScriptedSession::default())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Eval(String),
    Exec(String),
}

/// A tiny stand-in for a Python namespace: statements are recognised by
/// their leading keyword or an assignment, sums of integers evaluate,
/// division by zero fails at run time, and `os._exit` ends the session.
#[derive(Debug, Default)]
pub struct ScriptedSession {
    pub calls: Vec<Call>,
    pub exited: bool,
}

fn session_ended() -> schlange::SchlangeError {
    Diagnostic::new(DiagnosticKind::Host, "python session ended unexpectedly").into()
}

const STATEMENT_STARTS: [&str; 8] = [
    "for ", "if ", "while ", "import ", "def ", "class ", "try:", "pass",
];

fn looks_like_statement(source: &str) -> bool {
    STATEMENT_STARTS.iter().any(|start| source.starts_with(start)) || source.contains(" = ")
}

fn runtime_failure() -> schlange::SchlangeError {
    Diagnostic::new(
        DiagnosticKind::HostRuntime,
        "ZeroDivisionError: division by zero",
    )
    .into()
}

impl Session for ScriptedSession {
    fn eval_expression(&mut self, source: &str) -> Result<Option<String>> {
        self.calls.push(Call::Eval(source.to_string()));
        if self.exited {
            return Err(session_ended());
        }
        if looks_like_statement(source) {
            return Err(Diagnostic::new(DiagnosticKind::HostCompile, "invalid syntax").into());
        }
        if source.contains("/ 0") {
            return Err(runtime_failure());
        }
        if source.starts_with("print(") || source == "None" {
            return Ok(None);
        }
        let sum: Option<i64> = source
            .split('+')
            .map(|term| term.trim().parse::<i64>().ok())
            .sum();
        Ok(Some(sum.map_or_else(|| source.to_string(), |n| n.to_string())))
    }

    fn exec_statement(&mut self, source: &str) -> Result<()> {
        self.calls.push(Call::Exec(source.to_string()));
        if self.exited || source.contains("os._exit") {
            self.exited = true;
            return Err(session_ended());
        }
        if source.contains("/ 0") {
            return Err(runtime_failure());
        }
        Ok(())
    }

    fn is_alive(&mut self) -> bool {
        !self.exited
    }
}

/// A Python host when a Python 3 interpreter is installed.
pub fn python_host() -> Option<PythonHost> {
    let host = PythonHost::default();
    if host.is_available() {
        Some(host)
    } else {
        eprintln!(
            "skipping: no Python 3 interpreter at `{}`",
            host.interpreter().display()
        );
        None
    }
}
