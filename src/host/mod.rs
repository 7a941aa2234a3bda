//! The seam between the rewriting core and the language that runs its output.

pub mod protocol;
pub mod python;

use std::{fmt, path::Path};

use crate::diagnostics::Result;

pub use python::{PythonHost, PythonSession};

/// Exit status of a program run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExitStatus(i32);

impl ExitStatus {
    pub const SUCCESS: ExitStatus = ExitStatus(0);
    pub const FAILURE: ExitStatus = ExitStatus(1);

    pub const fn new(code: i32) -> Self {
        Self(code)
    }

    pub const fn code(self) -> i32 {
        self.0
    }

    pub const fn success(self) -> bool {
        self.0 == 0
    }
}

impl fmt::Display for ExitStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "exit status {}", self.0)
    }
}

/// A rewritten program ready to be compiled and run by a host.
#[derive(Debug, Clone, Copy)]
pub struct ExecutionUnit<'a> {
    /// Name diagnostics should mention, normally the script path as given.
    pub identity: &'a str,
    /// File holding the rewritten text for the duration of the run.
    pub artifact: &'a Path,
    /// Arguments after the script name.
    pub argv: &'a [String],
}

impl ExecutionUnit<'_> {
    /// The argument vector the program observes: its identity, then its arguments.
    pub fn program_argv(&self) -> Vec<String> {
        std::iter::once(self.identity.to_string())
            .chain(self.argv.iter().cloned())
            .collect()
    }
}

/// A compile-and-execute facility for rewritten programs.
pub trait Host {
    type Session: Session;

    /// Compiles the unit under its identity and runs it in a fresh namespace.
    ///
    /// A normal finish or a program-requested exit is `Ok`; a syntax failure
    /// is a `HostCompile` diagnostic and an uncaught failure a `HostRuntime`
    /// diagnostic.
    fn execute(&self, unit: &ExecutionUnit<'_>) -> Result<ExitStatus>;

    /// Starts a namespace that persists across evaluated lines.
    fn open_session(&self) -> Result<Self::Session>;
}

/// A persistent namespace that evaluates one line at a time.
pub trait Session {
    /// Evaluates `source` as an expression, returning the representation of
    /// any non-null result. Text that is not an expression fails with a
    /// `HostCompile` diagnostic.
    fn eval_expression(&mut self, source: &str) -> Result<Option<String>>;

    /// Executes `source` as a statement.
    fn exec_statement(&mut self, source: &str) -> Result<()>;

    /// Whether the session can still evaluate lines.
    fn is_alive(&mut self) -> bool {
        true
    }
}
