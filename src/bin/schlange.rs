use std::{fs, path::PathBuf, process::ExitCode};

use clap::{Parser, Subcommand};

use schlange::{
    config::{Config, LOG_ENV, PYTHON_ENV},
    harness::{self, Harness},
    logging,
    vocabulary::{Group, Vocabulary},
    ExitStatus, PythonHost, SchlangeError,
};

#[derive(Parser)]
#[command(
    name = "schlange",
    author,
    version,
    about = "Schlange -- write Python in Old German, run it for real"
)]
struct Args {
    /// Python 3 interpreter used to run rewritten code
    #[arg(long, global = true, env = PYTHON_ENV, value_name = "PATH")]
    python: Option<PathBuf>,
    /// Log filter, e.g. `debug` or `schlange::host=debug`
    #[arg(long, global = true, env = LOG_ENV, value_name = "FILTER")]
    log: Option<String>,
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Rewrite and execute a .schl.py script
    Run {
        script: PathBuf,
        /// Arguments passed to the script
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        args: Vec<String>,
    },
    /// Print the rewritten Python source
    Emit {
        script: PathBuf,
        /// Write the rewritten Python to a file instead of stdout
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },
    /// Start an interactive session
    Repl,
    /// Print the full keyword dictionary
    #[command(visible_alias = "vocabulary")]
    Woerterbuch,
}

fn main() -> ExitCode {
    let args = Args::parse();
    let config = Config::default()
        .with_interpreter(args.python)
        .with_log_filter(args.log);
    logging::init(&config);

    let harness = match Harness::new(PythonHost::from_config(&config)) {
        Ok(harness) => harness,
        Err(err) => return exit_code(harness::report(Err(err))),
    };

    let status = match args.command.unwrap_or(Command::Repl) {
        Command::Run { script, args } => harness::report(harness.run_file(&script, &args)),
        Command::Emit { script, output } => harness::report(emit(&harness, script, output)),
        Command::Repl => harness::report(repl(&harness)),
        Command::Woerterbuch => {
            print_vocabulary(harness.vocabulary());
            ExitStatus::SUCCESS
        }
    };
    exit_code(status)
}

fn emit(
    harness: &Harness<'_, PythonHost>,
    script: PathBuf,
    output: Option<PathBuf>,
) -> Result<ExitStatus, SchlangeError> {
    let rewritten = harness.emit_file(&script)?;
    match output {
        Some(path) => {
            fs::write(&path, rewritten.as_str())?;
            println!("Transpiled output written to {}", path.display());
        }
        None => println!("{rewritten}"),
    }
    Ok(ExitStatus::SUCCESS)
}

fn repl(harness: &Harness<'_, PythonHost>) -> Result<ExitStatus, SchlangeError> {
    let mut repl = harness.open_repl()?;
    repl.run()?;
    Ok(ExitStatus::SUCCESS)
}

fn print_vocabulary(vocabulary: &Vocabulary) {
    println!("=== Schluesselwoerter (Keywords) ===\n");
    for entry in vocabulary.group(Group::Keyword) {
        println!("  {:20} -> {}", entry.surface, entry.host);
    }
    println!("\n=== Eingebaute Funktionen (Builtins) ===\n");
    for entry in vocabulary.group(Group::Builtin) {
        println!("  {:20} -> {}", entry.surface, entry.host);
    }
}

fn exit_code(status: ExitStatus) -> ExitCode {
    ExitCode::from(status.code() as u8)
}
