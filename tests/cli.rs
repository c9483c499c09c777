#![cfg(unix)]
#![allow(deprecated)]

use assert_cmd::cargo::cargo_bin;
use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

fn verify_cmd() -> Command {
    let mut cmd = Command::new(cargo_bin("verify-assets"));
    cmd.env_remove("VERIFY_ASSETS_ROOT")
        .env_remove("VERIFY_ASSETS_VERIFIER")
        .env_remove("VERIFY_ASSETS_LOG");
    cmd
}

/// Writes `body` as `<root>/<rel>` with the given mode.
fn write_script(root: &Path, rel: &str, body: &str, mode: u32) -> PathBuf {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
    fs::set_permissions(&path, fs::Permissions::from_mode(mode)).unwrap();
    path
}

fn project(body: &str) -> TempDir {
    let temp = TempDir::new().unwrap();
    write_script(temp.path(), "tools/verify_assets.sh", body, 0o755);
    temp
}

#[test]
fn test_success_prints_stdout_and_exits_zero() {
    let temp = project(r#"echo "OK""#);

    verify_cmd()
        .current_dir(temp.path())
        .arg("a.mp4")
        .assert()
        .code(0)
        .stdout("OK\n")
        .stderr("");
}

#[test]
fn test_failure_code_and_stderr_are_relayed() {
    let temp = project(r#"echo "FAIL: bad codec" >&2; exit 3"#);

    verify_cmd()
        .current_dir(temp.path())
        .arg("b.mp4")
        .assert()
        .code(3)
        .stdout("")
        .stderr("FAIL: bad codec\n");
}

#[test]
fn test_arguments_pass_through_in_order() {
    let temp = project(r#"for a in "$@"; do echo "arg:$a"; done"#);

    verify_cmd()
        .current_dir(temp.path())
        .args(["assets_pub/b.mp4", "assets_pub/a file.mov", "--strict", "-v"])
        .assert()
        .success()
        .stdout("arg:assets_pub/b.mp4\narg:assets_pub/a file.mov\narg:--strict\narg:-v\n");
}

#[test]
fn test_both_streams_relayed_in_full() {
    let temp = project(
        r#"i=0; while [ $i -lt 2000 ]; do echo "line $i"; echo "warn $i" >&2; i=$((i+1)); done; exit 4"#,
    );

    let assert = verify_cmd()
        .current_dir(temp.path())
        .arg("a.mp4")
        .assert()
        .code(4);

    let output = assert.get_output();
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert_eq!(stdout.lines().count(), 2000);
    assert_eq!(stderr.lines().count(), 2000);
    assert_eq!(stdout.lines().last(), Some("line 1999"));
    assert_eq!(stderr.lines().filter(|l| *l == "warn 0").count(), 1);
}

#[test]
fn test_runs_in_project_root_from_subdirectory() {
    let temp = project("pwd -P");
    let nested = temp.path().join("assets_pub").join("intro");
    fs::create_dir_all(&nested).unwrap();
    let root = fs::canonicalize(temp.path()).unwrap();

    verify_cmd()
        .current_dir(&nested)
        .arg("clip.mp4")
        .assert()
        .success()
        .stdout(predicate::str::diff(format!("{}\n", root.display())));
}

#[test]
fn test_no_inputs_is_an_error() {
    let temp = project(r#"echo "should not run""#);

    verify_cmd()
        .current_dir(temp.path())
        .assert()
        .code(1)
        .stdout("")
        .stderr(predicate::str::contains("Pass at least one file"));
}

#[test]
fn test_missing_verifier_is_a_configuration_error() {
    let temp = TempDir::new().unwrap();

    verify_cmd()
        .current_dir(temp.path())
        .arg("a.mp4")
        .assert()
        .code(1)
        .stdout("")
        .stderr(predicate::str::contains("Verifier not found"))
        .stderr(predicate::str::contains("tools/verify_assets.sh"));
}

#[test]
fn test_non_executable_verifier_is_fixed_up() {
    let temp = TempDir::new().unwrap();
    let script = write_script(temp.path(), "tools/verify_assets.sh", r#"echo "OK""#, 0o644);

    verify_cmd()
        .current_dir(temp.path())
        .arg("a.mp4")
        .assert()
        .success()
        .stdout("OK\n");

    let mode = fs::metadata(&script).unwrap().permissions().mode();
    assert_eq!(mode & 0o111, 0o111);
}

#[test]
fn test_launch_failure_exits_one() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("tools/verify_assets.sh");
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(&path, "#!/nonexistent/interpreter\necho unreachable\n").unwrap();
    fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();

    verify_cmd()
        .current_dir(temp.path())
        .arg("a.mp4")
        .assert()
        .code(1)
        .stdout("")
        .stderr(predicate::str::contains("failed to launch verifier"));
}

#[test]
fn test_project_root_option() {
    let temp = project(r#"echo "from root""#);
    let elsewhere = TempDir::new().unwrap();

    verify_cmd()
        .current_dir(elsewhere.path())
        .arg("--project-root")
        .arg(temp.path())
        .arg("a.mp4")
        .assert()
        .success()
        .stdout("from root\n");
}

#[test]
fn test_project_root_env() {
    let temp = project(r#"echo "from env root""#);
    let elsewhere = TempDir::new().unwrap();

    verify_cmd()
        .current_dir(elsewhere.path())
        .env("VERIFY_ASSETS_ROOT", temp.path())
        .arg("a.mp4")
        .assert()
        .success()
        .stdout("from env root\n");
}

#[test]
fn test_verifier_from_config_file() {
    let temp = TempDir::new().unwrap();
    write_script(temp.path(), "scripts/check.sh", r#"echo "custom""#, 0o755);
    fs::write(
        temp.path().join("verify-assets.json"),
        r#"{"verifier": "scripts/check.sh"}"#,
    )
    .unwrap();

    verify_cmd()
        .current_dir(temp.path())
        .arg("a.mp4")
        .assert()
        .success()
        .stdout("custom\n");
}

#[test]
fn test_verifier_option_beats_env() {
    let temp = TempDir::new().unwrap();
    write_script(temp.path(), "scripts/cli.sh", r#"echo "cli""#, 0o755);
    write_script(temp.path(), "scripts/env.sh", r#"echo "env""#, 0o755);

    verify_cmd()
        .current_dir(temp.path())
        .env("VERIFY_ASSETS_VERIFIER", "scripts/env.sh")
        .args(["--verifier", "scripts/cli.sh", "a.mp4"])
        .assert()
        .success()
        .stdout("cli\n");
}

#[test]
fn test_malformed_config_file_is_reported() {
    let temp = project(r#"echo "OK""#);
    fs::write(temp.path().join("verify-assets.json"), "{ not json").unwrap();

    verify_cmd()
        .current_dir(temp.path())
        .arg("a.mp4")
        .assert()
        .code(1)
        .stdout("")
        .stderr(predicate::str::contains("Serialization error"));
}

#[test]
fn test_verbose_logs_to_stderr_only() {
    let temp = project(r#"echo "OK""#);

    verify_cmd()
        .current_dir(temp.path())
        .args(["-v", "a.mp4"])
        .assert()
        .success()
        .stdout("OK\n")
        .stderr(predicate::str::contains("running verifier"));
}

#[test]
fn test_non_utf8_file_names_reach_the_verifier() {
    use std::ffi::OsStr;
    use std::os::unix::ffi::OsStrExt;

    let temp = project(r#"printf '%s' "$1""#);

    let assert = verify_cmd()
        .current_dir(temp.path())
        .arg(OsStr::from_bytes(b"bad\xff.mp4"))
        .assert()
        .success();

    assert_eq!(assert.get_output().stdout, b"bad\xff.mp4");
}

#[test]
fn test_closed_stdout_keeps_stderr_and_exit_code() {
    use std::process::Stdio;

    let temp = project(
        r#"i=0; while [ $i -lt 20000 ]; do echo "line $i"; i=$((i+1)); done; echo "FAIL: bad codec" >&2; exit 3"#,
    );

    let mut child = std::process::Command::new(cargo_bin("verify-assets"))
        .env_remove("VERIFY_ASSETS_ROOT")
        .env_remove("VERIFY_ASSETS_VERIFIER")
        .env_remove("VERIFY_ASSETS_LOG")
        .current_dir(temp.path())
        .arg("a.mp4")
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .unwrap();
    drop(child.stdout.take());

    let output = child.wait_with_output().unwrap();
    let stderr = String::from_utf8_lossy(&output.stderr);

    assert_eq!(output.status.code(), Some(3));
    assert!(stderr.contains("FAIL: bad codec"), "stderr: {stderr}");
    assert!(!stderr.contains("Error:"), "stderr: {stderr}");
}
