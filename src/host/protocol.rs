//! JSON messages exchanged with the Python shims.

use serde::{Deserialize, Serialize};

use crate::{
    diagnostics::{Diagnostic, DiagnosticKind, Position, Result, SchlangeError},
    host::ExitStatus,
};

/// Marks the start of a reply on the session's stdout.
pub const RECORD_SEPARATOR: u8 = 0x1e;

/// Identity the interactive session compiles lines under.
pub const SESSION_ORIGIN: &str = "<schlange>";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "op", rename_all = "lowercase")]
pub enum Request<'a> {
    Eval { source: &'a str },
    Exec { source: &'a str },
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum Reply {
    Value {
        repr: String,
    },
    None,
    Syntax {
        message: String,
        line: Option<usize>,
        column: Option<usize>,
    },
    Error {
        message: String,
        #[serde(default)]
        traceback: String,
    },
    Exit {
        code: i32,
    },
}

impl Reply {
    /// The failure a non-success reply stands for.
    pub fn into_failure(self) -> Diagnostic {
        match self {
            Reply::Syntax {
                message,
                line,
                column,
            } => compile_error(message, line, column, SESSION_ORIGIN),
            Reply::Error { message, traceback } => {
                Diagnostic::new(DiagnosticKind::HostRuntime, message).with_traceback(traceback)
            }
            Reply::Exit { code } => Diagnostic::new(
                DiagnosticKind::HostRuntime,
                format!("program requested exit with status {code}"),
            ),
            Reply::Value { .. } | Reply::None => {
                Diagnostic::new(DiagnosticKind::Host, "unexpected success reply")
            }
        }
    }
}

/// What the run bootstrap reports after executing a program.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Outcome {
    Completed,
    Exit {
        code: i32,
    },
    Compile {
        message: String,
        line: Option<usize>,
        column: Option<usize>,
        #[serde(default)]
        text: Option<String>,
    },
    Runtime {
        message: String,
        #[serde(default)]
        traceback: String,
    },
}

impl Outcome {
    pub fn into_result(self, identity: &str) -> Result<ExitStatus> {
        match self {
            Outcome::Completed => Ok(ExitStatus::SUCCESS),
            Outcome::Exit { code } => Ok(ExitStatus::new(code)),
            Outcome::Compile {
                message,
                line,
                column,
                text,
            } => {
                let mut diagnostic = compile_error(message, line, column, identity);
                if let Some(text) = text.filter(|text| !text.trim().is_empty()) {
                    diagnostic = diagnostic.with_note(text.trim_end().to_string());
                }
                Err(diagnostic.into())
            }
            Outcome::Runtime { message, traceback } => Err(Diagnostic::new(
                DiagnosticKind::HostRuntime,
                message,
            )
            .with_origin(identity)
            .with_traceback(traceback)
            .into()),
        }
    }
}

fn compile_error(
    message: String,
    line: Option<usize>,
    column: Option<usize>,
    origin: &str,
) -> Diagnostic {
    let diagnostic = Diagnostic::new(DiagnosticKind::HostCompile, message).with_origin(origin);
    match line {
        Some(line) => diagnostic.with_position(Position::new(line, column.unwrap_or(0))),
        None => diagnostic,
    }
}

pub(crate) fn protocol_error(context: &str, err: serde_json::Error) -> SchlangeError {
    Diagnostic::new(
        DiagnosticKind::Host,
        format!("malformed {context} from Python: {err}"),
    )
    .into()
}
