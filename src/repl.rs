use rustyline::{error::ReadlineError, DefaultEditor};

use crate::{
    diagnostics::{DiagnosticKind, Result, SchlangeError},
    host::Session,
    rewrite::Rewriter,
    vocabulary::Vocabulary,
};

pub const PROMPT: &str = "schlange>>> ";
pub const EXIT_COMMANDS: [&str; 3] = ["ausgang", "exit", "quit"];
pub const FAREWELL: &str = "Auf Wiedersehen!";

/// Result of handling one input line.
#[derive(Debug)]
pub enum Step {
    /// Blank line.
    Skipped,
    /// An expression produced a non-null value; its representation.
    Echo(String),
    /// An expression produced null, or a statement ran.
    Executed,
    /// The line failed; the session stays usable.
    Failed(SchlangeError),
    /// The line failed and took the session down with it.
    Disconnected(SchlangeError),
    /// An exit command was entered.
    Terminated,
}

pub struct Repl<'v, S> {
    session: S,
    rewriter: Rewriter<'v>,
}

impl<'v, S: Session> Repl<'v, S> {
    pub fn new(session: S, vocabulary: &'v Vocabulary) -> Self {
        Self {
            session,
            rewriter: Rewriter::new(vocabulary),
        }
    }

    pub fn session(&self) -> &S {
        &self.session
    }

    pub fn into_session(self) -> S {
        self.session
    }

    pub fn handle_line(&mut self, line: &str) -> Step {
        let trimmed = line.trim();
        if EXIT_COMMANDS.contains(&trimmed) {
            return Step::Terminated;
        }
        if trimmed.is_empty() {
            return Step::Skipped;
        }
        match self.evaluate(trimmed) {
            Ok(Some(repr)) => Step::Echo(repr),
            Ok(None) => Step::Executed,
            Err(err) if !self.session.is_alive() => Step::Disconnected(err),
            Err(err) => Step::Failed(err),
        }
    }

    /// Tries the line as an expression first; only a syntax rejection falls
    /// back to running it as a statement.
    fn evaluate(&mut self, line: &str) -> Result<Option<String>> {
        let rewritten = self.rewriter.rewrite(line)?;
        match self.session.eval_expression(rewritten.as_str()) {
            Err(err) if err.is_host_compile() => {
                tracing::debug!(target: "schlange::repl", "not an expression, executing as statement");
                self.session.exec_statement(rewritten.as_str())?;
                Ok(None)
            }
            other => other,
        }
    }

    pub fn run(&mut self) -> Result<()> {
        let mut editor = DefaultEditor::new().map_err(|err| {
            SchlangeError::from(std::io::Error::new(std::io::ErrorKind::Other, err))
        })?;
        println!(
            "Schlange REPL v{} -- type 'ausgang' to exit",
            env!("CARGO_PKG_VERSION")
        );
        println!("Tip: verkuendet('Hallo Welt!')");
        loop {
            match editor.readline(PROMPT) {
                Ok(line) => {
                    if !line.trim().is_empty() {
                        editor.add_history_entry(line.trim()).ok();
                    }
                    match self.handle_line(&line) {
                        Step::Terminated => {
                            println!("{FAREWELL}");
                            break;
                        }
                        Step::Skipped | Step::Executed => {}
                        Step::Echo(repr) => println!("{repr}"),
                        Step::Failed(err) => eprintln!("Fehler: {}", describe(&err)),
                        Step::Disconnected(err) => return Err(err),
                    }
                }
                Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => {
                    println!("\n{FAREWELL}");
                    break;
                }
                Err(err) => {
                    return Err(SchlangeError::from(std::io::Error::new(
                        std::io::ErrorKind::Other,
                        err,
                    )));
                }
            }
        }
        Ok(())
    }
}

fn describe(err: &SchlangeError) -> String {
    match err.diagnostic() {
        Some(diag) if diag.is(DiagnosticKind::HostRuntime) => diag.message.clone(),
        _ => err.to_string().trim_end().to_string(),
    }
}
