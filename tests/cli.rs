mod common;

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::tempdir;

fn schlange() -> Command {
    Command::cargo_bin("schlange").expect("binary exists")
}

fn python_available() -> bool {
    common::python_host().is_some()
}

#[test]
fn schlange_version() {
    schlange()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("schlange"));
}

#[test]
fn schlange_emit_hello() {
    schlange()
        .arg("emit")
        .arg("demos/hello.schl.py")
        .assert()
        .success()
        .stdout(predicate::str::contains("print(\"Hallo Welt!\")"))
        .stdout(predicate::str::contains("'defn' bleibt"))
        .stdout(predicate::str::contains("verkuendet").not());
}

#[test]
fn schlange_emit_to_file() {
    let dir = tempdir().expect("create temp dir");
    let output = dir.path().join("hello.py");
    schlange()
        .arg("emit")
        .arg("demos/hello.schl.py")
        .arg("-o")
        .arg(&output)
        .assert()
        .success()
        .stdout(predicate::str::contains("Transpiled output written to"));
    let contents = fs::read_to_string(&output).expect("read emitted file");
    assert!(contents.contains("print(\"Hallo Welt!\")"));
    assert!(contents.starts_with("# Hallo Welt!"));
}

#[test]
fn schlange_emit_reports_scan_errors() {
    let dir = tempdir().expect("create temp dir");
    let script = dir.path().join("offen.schl.py");
    fs::write(&script, "verkuendet(\"offen\n").expect("write script");
    schlange()
        .arg("emit")
        .arg(&script)
        .assert()
        .code(1)
        .stderr(predicate::str::contains("ScanError: unterminated string literal"));
}

#[test]
fn schlange_woerterbuch_lists_both_groups() {
    schlange()
        .arg("woerterbuch")
        .assert()
        .success()
        .stdout(predicate::str::contains("Schluesselwoerter"))
        .stdout(predicate::str::contains("Eingebaute Funktionen"))
        .stdout(predicate::str::contains("verkuendet           -> print"))
        .stdout(predicate::str::contains("sofernschier         -> elif"));
}

#[test]
fn schlange_vocabulary_alias() {
    schlange()
        .arg("vocabulary")
        .assert()
        .success()
        .stdout(predicate::str::contains("alsfehler"));
}

#[test]
fn schlange_run_missing_script() {
    schlange()
        .arg("run")
        .arg("demos/gibt_es_nicht.schl.py")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("could not read"))
        .stderr(predicate::str::contains("demos/gibt_es_nicht.schl.py"));
}

#[test]
fn schlange_run_with_missing_interpreter() {
    schlange()
        .arg("--python")
        .arg("/gibt/es/nicht/python3")
        .arg("run")
        .arg("demos/hello.schl.py")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("could not start Python interpreter"));
}

#[test]
fn schlange_run_hello() {
    if !python_available() {
        return;
    }
    schlange()
        .arg("run")
        .arg("demos/hello.schl.py")
        .assert()
        .success()
        .stdout(predicate::str::contains("Hallo Welt!"))
        .stdout(predicate::str::contains("Gruss an Smutsahansi!"));
}

#[test]
fn schlange_run_loops() {
    if !python_available() {
        return;
    }
    schlange()
        .arg("run")
        .arg("demos/loops.schl.py")
        .assert()
        .success()
        .stdout(predicate::str::contains("4 ist gerade"))
        .stdout(predicate::str::contains("Summe: 30"))
        .stdout(predicate::str::contains("15 erreicht"));
}

#[test]
fn schlange_run_fehler() {
    if !python_available() {
        return;
    }
    schlange()
        .arg("run")
        .arg("demos/fehler.schl.py")
        .assert()
        .success()
        .stdout(predicate::str::contains("Fehler gefangen"))
        .stdout(predicate::str::contains("Endlich-Block ausgefuehrt"))
        .stdout(predicate::str::contains("nicht str"));
}

#[test]
fn schlange_run_passes_arguments_and_exit_code() {
    if !python_available() {
        return;
    }
    schlange()
        .arg("run")
        .arg("demos/argumente.schl.py")
        .arg("--fehlschlag")
        .arg("zwei")
        .assert()
        .code(3)
        .stdout(predicate::str::contains("0: --fehlschlag"))
        .stdout(predicate::str::contains("1: zwei"));
}

#[test]
fn schlange_run_reports_traceback() {
    if !python_available() {
        return;
    }
    let dir = tempdir().expect("create temp dir");
    let script = dir.path().join("kaputt.schl.py");
    fs::write(&script, "verkuendet(\"vorher\")\nwerfet KeyError(\"schluessel\")\n")
        .expect("write script");
    schlange()
        .arg("run")
        .arg(&script)
        .assert()
        .code(1)
        .stdout(predicate::str::contains("vorher"))
        .stderr(predicate::str::contains("Traceback (most recent call last)"))
        .stderr(predicate::str::contains("kaputt.schl.py\", line 2"))
        .stderr(predicate::str::contains("werfet KeyError"))
        .stderr(predicate::str::contains("KeyError: 'schluessel'"));
}

#[test]
fn schlange_repl_echoes_and_continues() {
    if !python_available() {
        return;
    }
    schlange()
        .arg("repl")
        .write_stdin("2 + 3\n1 / 0\nfuerwahr i inwendig bereich(2): verkuendet(i)\n\nausgang\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("5"))
        .stdout(predicate::str::contains("0\n1\n"))
        .stdout(predicate::str::contains("Auf Wiedersehen!"))
        .stderr(predicate::str::contains("Fehler: ZeroDivisionError"));
}

#[test]
fn schlange_repl_stops_when_session_dies() {
    if !python_available() {
        return;
    }
    schlange()
        .arg("repl")
        .write_stdin("importiert os; os._exit(0)\n2 + 2\nausgang\n")
        .assert()
        .code(1)
        .stdout(predicate::str::contains("Auf Wiedersehen!").not())
        .stderr(predicate::str::contains("python session ended unexpectedly"));
}

#[test]
fn schlange_run_hard_exit_status() {
    if !python_available() {
        return;
    }
    let dir = tempdir().expect("create temp dir");
    let script = dir.path().join("hart.schl.py");
    fs::write(&script, "importiert os\nos._exit(5)\n").expect("write script");
    schlange().arg("run").arg(&script).assert().code(5);
}
