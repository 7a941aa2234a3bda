use std::{fs, io::Write, path::Path};

use tempfile::NamedTempFile;

use crate::{
    diagnostics::{DiagnosticKind, Result, SchlangeError},
    host::{ExecutionUnit, ExitStatus, Host},
    repl::Repl,
    rewrite::{RewrittenSource, Rewriter},
    vocabulary::Vocabulary,
};

/// Rewrites Schlange source and hands it to a [`Host`].
pub struct Harness<'v, H> {
    host: H,
    vocabulary: &'v Vocabulary,
}

impl<H: Host> Harness<'static, H> {
    /// A harness over the standard vocabulary.
    pub fn new(host: H) -> Result<Self> {
        Ok(Self::with_vocabulary(host, Vocabulary::standard()?))
    }
}

impl<'v, H: Host> Harness<'v, H> {
    pub fn with_vocabulary(host: H, vocabulary: &'v Vocabulary) -> Self {
        Self { host, vocabulary }
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn vocabulary(&self) -> &'v Vocabulary {
        self.vocabulary
    }

    /// Rewrites without executing.
    pub fn emit(&self, source: &str) -> Result<RewrittenSource> {
        Ok(Rewriter::new(self.vocabulary).rewrite(source)?)
    }

    pub fn emit_file(&self, path: &Path) -> Result<RewrittenSource> {
        let source = read_source(path)?;
        self.emit(&source)
    }

    /// Rewrites `source` and runs it as the program `identity` with `argv`.
    ///
    /// The rewritten text lives in a temporary file only while the host runs;
    /// the file is removed on every exit path.
    pub fn run(&self, source: &str, identity: &str, argv: &[String]) -> Result<ExitStatus> {
        let rewritten = self.emit(source)?;
        let artifact = write_artifact(&rewritten)?;
        let unit = ExecutionUnit {
            identity,
            artifact: artifact.path(),
            argv,
        };
        tracing::info!(
            target: "schlange::harness",
            identity,
            args = argv.len(),
            substitutions = rewritten.substitutions(),
            "running script"
        );
        let result = self.host.execute(&unit);
        if let Err(err) = artifact.close() {
            tracing::warn!(target: "schlange::harness", %err, "could not remove rewritten artifact");
        }
        match &result {
            Ok(status) => tracing::info!(target: "schlange::harness", %status, "script finished"),
            Err(err) => tracing::info!(target: "schlange::harness", %err, "script failed"),
        }
        result
    }

    pub fn run_file(&self, path: &Path, argv: &[String]) -> Result<ExitStatus> {
        let source = read_source(path)?;
        self.run(&source, &path.to_string_lossy(), argv)
    }

    /// Opens a host session and wraps it in an interactive loop.
    pub fn open_repl(&self) -> Result<Repl<'v, H::Session>> {
        let session = self.host.open_session()?;
        Ok(Repl::new(session, self.vocabulary))
    }
}

fn read_source(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|source| SchlangeError::Read {
        path: path.to_path_buf(),
        source,
    })
}

fn write_artifact(rewritten: &RewrittenSource) -> Result<NamedTempFile> {
    let mut file = tempfile::Builder::new()
        .prefix("schlange_")
        .suffix(".py")
        .tempfile()?;
    file.write_all(rewritten.as_str().as_bytes())?;
    file.flush()?;
    Ok(file)
}

/// Converts the outcome of a run into a process exit status, printing any
/// failure to stderr.
pub fn report(result: Result<ExitStatus>) -> ExitStatus {
    match result {
        Ok(status) => status,
        Err(err) => {
            eprintln!("{}", render_error(&err));
            ExitStatus::FAILURE
        }
    }
}

/// Formats an error the way `report` prints it. Runtime failures show the
/// host traceback.
pub fn render_error(err: &SchlangeError) -> String {
    match err.diagnostic() {
        Some(diagnostic) if diagnostic.is(DiagnosticKind::HostRuntime) => {
            match &diagnostic.traceback {
                Some(traceback) => traceback.trim_end().to_string(),
                None => format!("error: {diagnostic}"),
            }
        }
        _ => format!("error: {}", err.to_string().trim_end()),
    }
}
