//! Schlange: write Python with an Old German vocabulary.
//!
//! Source is scanned with Python's lexical rules, vocabulary identifiers are
//! swapped for their Python spellings, and the result is run, printed, or
//! evaluated line by line through a Python host.

pub mod config;
pub mod diagnostics;
pub mod harness;
pub mod host;
pub mod lexer;
pub mod logging;
pub mod repl;
pub mod rewrite;
pub mod vocabulary;

pub use config::Config;
pub use diagnostics::{Diagnostic, DiagnosticKind, Position, SchlangeError, SourceSpan};
pub use harness::Harness;
pub use host::{ExitStatus, Host, PythonHost, Session};
pub use repl::Repl;
pub use rewrite::{rewrite, RewrittenSource, Rewriter};
pub use vocabulary::Vocabulary;
