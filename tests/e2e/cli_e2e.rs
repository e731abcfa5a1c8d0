//! End-to-end tests for the `repopack` binary.

use std::fs;
use std::io;
use std::path::Path;
use std::process::{Command, Output};

fn run_cli(root: &Path, args: &[&str], env: &[(&str, &str)]) -> io::Result<Output> {
    let mut command = Command::new(env!("CARGO_BIN_EXE_repopack"));
    command.args(args).current_dir(root);
    for (key, _) in std::env::vars() {
        if key.starts_with("REPOPACK_") || key == "RUST_LOG" {
            command.env_remove(key);
        }
    }
    command.env("REPOPACK_LOG_FORMAT", "off");
    command.envs(env.iter().copied());
    command.output()
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn fixture() -> io::Result<tempfile::TempDir> {
    let dir = tempfile::tempdir()?;
    let root = dir.path();
    fs::create_dir_all(root.join("src"))?;
    fs::create_dir_all(root.join("node_modules/dep"))?;
    fs::write(root.join("src/main.rs"), "fn main() {}\n\n\nfn helper() {}\n")?;
    fs::write(root.join("README.md"), "# demo\n")?;
    fs::write(root.join("notes.log"), "debug output\n")?;
    fs::write(root.join("node_modules/dep/index.js"), "module.exports = 1;\n")?;
    fs::write(root.join("logo.bin"), [0x89, 0x50, 0x00, 0x01])?;
    fs::write(root.join(".gitignore"), "*.log\n")?;
    Ok(dir)
}

#[test]
fn pack_writes_the_document_with_cli_flags() -> io::Result<()> {
    let dir = fixture()?;
    let output = run_cli(
        dir.path(),
        &["pack", "--remove-empty-lines", "--show-line-numbers", "--no-progress"],
        &[],
    )?;

    assert_eq!(output.status.code(), Some(0));
    assert!(stdout(&output).starts_with("status: ok\nfiles: 2\n"));

    let document = fs::read_to_string(dir.path().join("repopack-output.txt"))?;
    assert!(document.contains("File: src/main.rs\n================\n1 | fn main() {}\n2 | fn helper() {}\n"));
    assert!(document.contains("File: README.md"));
    assert!(!document.contains("File: .gitignore"));
    assert!(!document.contains("notes.log"));
    assert!(!document.contains("node_modules"));
    assert!(!document.contains("logo.bin"));
    Ok(())
}

#[test]
fn pack_json_reports_the_summary() -> io::Result<()> {
    let dir = fixture()?;
    let output = run_cli(
        dir.path(),
        &["--output", "json", "pack", "--output-file", "dist/pack.txt", "--top-files-len", "1"],
        &[],
    )?;

    assert_eq!(output.status.code(), Some(0));
    let value: serde_json::Value = serde_json::from_str(&stdout(&output)).map_err(io::Error::other)?;
    assert_eq!(value["status"], "ok");
    assert_eq!(value["summary"]["totalFiles"], 2);
    assert_eq!(value["summary"]["topFiles"][0]["path"], "src/main.rs");
    assert!(dir.path().join("dist/pack.txt").is_file());
    Ok(())
}

#[test]
fn env_overrides_beat_cli_flags() -> io::Result<()> {
    let dir = fixture()?;
    let output = run_cli(
        dir.path(),
        &["pack", "--output-file", "from-flag.txt", "--no-progress"],
        &[("REPOPACK_OUTPUT_FILE_PATH", "from-env.txt")],
    )?;

    assert_eq!(output.status.code(), Some(0));
    assert!(dir.path().join("from-env.txt").is_file());
    assert!(!dir.path().join("from-flag.txt").exists());
    Ok(())
}

#[test]
fn comment_removal_is_rejected() -> io::Result<()> {
    let dir = fixture()?;
    let output = run_cli(
        dir.path(),
        &["pack", "--no-progress"],
        &[("REPOPACK_OUTPUT_REMOVE_COMMENTS", "true")],
    )?;

    assert_eq!(output.status.code(), Some(2));
    assert!(stdout(&output).contains("code: sanitize:comment_removal_unsupported"));
    assert!(!dir.path().join("repopack-output.txt").exists());
    Ok(())
}

#[test]
fn missing_root_is_an_io_failure() -> io::Result<()> {
    let dir = tempfile::tempdir()?;
    let output = run_cli(dir.path(), &["pack", "does-not-exist", "--no-progress"], &[])?;

    assert_eq!(output.status.code(), Some(3));
    assert!(stdout(&output).starts_with("status: error\n"));
    Ok(())
}

#[test]
fn patterns_lists_sources_in_precedence_order() -> io::Result<()> {
    let dir = fixture()?;
    fs::write(dir.path().join(".repopackignore"), "fixtures/\n")?;
    let output = run_cli(
        dir.path(),
        &["patterns", "--no-default-patterns", "-i", "!keep.log", "--no-progress"],
        &[],
    )?;

    assert_eq!(output.status.code(), Some(0));
    assert_eq!(
        stdout(&output),
        "status: ok\ngitignore (1):\n  *.log\nrepopackignore (1):\n  fixtures/\ncustom (1):\n  !keep.log\n"
    );
    Ok(())
}

#[test]
fn config_show_is_deterministic() -> io::Result<()> {
    let dir = fixture()?;
    let first = run_cli(dir.path(), &["config", "show", "--no-progress"], &[])?;
    let second = run_cli(dir.path(), &["config", "show", "--no-progress"], &[])?;

    assert_eq!(first.status.code(), Some(0));
    assert_eq!(stdout(&first), stdout(&second));
    assert!(stdout(&first).contains("\"filePath\": \"repopack-output.txt\""));
    Ok(())
}

#[test]
fn json_logs_go_to_stderr() -> io::Result<()> {
    let dir = fixture()?;
    let output = run_cli(
        dir.path(),
        &["--agent", "pack"],
        &[("REPOPACK_LOG_FORMAT", "json")],
    )?;

    assert_eq!(output.status.code(), Some(0));
    let summary: serde_json::Value =
        serde_json::from_str(stdout(&output).trim()).map_err(io::Error::other)?;
    assert_eq!(summary["type"], "summary");
    assert!(String::from_utf8_lossy(&output.stderr).contains("\"pack.done\""));
    Ok(())
}
