use std::{fmt, path::PathBuf};

use thiserror::Error;

/// Represents a byte span within a source file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceSpan {
    pub start: usize,
    pub end: usize,
}

impl SourceSpan {
    pub const fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub const fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// A 1-based line and 0-based character column, the way Python reports them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

impl Position {
    pub const fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// Classification of a diagnostic event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagnosticKind {
    /// Malformed lexical structure: unterminated literal, unbalanced brackets.
    Scan,
    /// Two vocabulary groups claim the same surface key.
    Ambiguity,
    /// The rewritten text is not valid under the host grammar.
    HostCompile,
    /// The executed program raised and did not handle a failure.
    HostRuntime,
    /// The host facility itself misbehaved or could not be started.
    Host,
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            DiagnosticKind::Scan => "ScanError",
            DiagnosticKind::Ambiguity => "SubstitutionAmbiguity",
            DiagnosticKind::HostCompile => "HostCompileError",
            DiagnosticKind::HostRuntime => "HostRuntimeError",
            DiagnosticKind::Host => "HostError",
        };
        f.write_str(label)
    }
}

/// Rich diagnostic information surfaced to end users.
#[derive(Debug, Clone)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    pub message: String,
    pub span: Option<SourceSpan>,
    pub position: Option<Position>,
    /// Script identity the position refers to, e.g. the script path.
    pub origin: Option<String>,
    pub notes: Vec<String>,
    pub traceback: Option<String>,
}

impl Diagnostic {
    pub fn new(kind: DiagnosticKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            span: None,
            position: None,
            origin: None,
            notes: Vec::new(),
            traceback: None,
        }
    }

    pub fn with_span(mut self, span: SourceSpan) -> Self {
        self.span = Some(span);
        self
    }

    pub fn with_position(mut self, position: Position) -> Self {
        self.position = Some(position);
        self
    }

    pub fn with_origin(mut self, origin: impl Into<String>) -> Self {
        self.origin = Some(origin.into());
        self
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.notes.push(note.into());
        self
    }

    pub fn with_traceback(mut self, traceback: impl Into<String>) -> Self {
        let traceback = traceback.into();
        if !traceback.trim().is_empty() {
            self.traceback = Some(traceback);
        }
        self
    }

    pub fn is(&self, kind: DiagnosticKind) -> bool {
        self.kind == kind
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)?;
        match (&self.origin, self.position) {
            (Some(origin), Some(position)) => write!(f, " ({origin}:{position})")?,
            (Some(origin), None) => write!(f, " ({origin})")?,
            (None, Some(position)) => write!(f, " (at {position})")?,
            (None, None) => {}
        }
        if !self.notes.is_empty() {
            writeln!(f)?;
            for note in &self.notes {
                writeln!(f, "  note: {note}")?;
            }
        }
        Ok(())
    }
}

impl std::error::Error for Diagnostic {}

/// Unified error type for the Schlange toolchain.
#[derive(Debug, Error)]
pub enum SchlangeError {
    #[error("{0}")]
    Diagnostic(#[from] Diagnostic),
    #[error("could not read `{}`: {source}", .path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl SchlangeError {
    /// The diagnostic behind this error, if it is one.
    pub fn diagnostic(&self) -> Option<&Diagnostic> {
        match self {
            SchlangeError::Diagnostic(diag) => Some(diag),
            SchlangeError::Read { .. } | SchlangeError::Io(_) => None,
        }
    }

    /// True when the host rejected the text as syntactically invalid.
    pub fn is_host_compile(&self) -> bool {
        self.diagnostic()
            .is_some_and(|diag| diag.is(DiagnosticKind::HostCompile))
    }
}

pub type Result<T> = std::result::Result<T, SchlangeError>;
