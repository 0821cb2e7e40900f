//! End to end checks of the `procmgr` and `procplan` binaries
//!
//! These verify the process exit codes:
//! - 0 when the first process to finish exits cleanly
//! - 1 for usage errors
//! - 2 for procs file and supervision failures

use std::fs;
use std::path::Path;
use std::process::{Command, Output};

use procmgr::{Proc, Procs};

fn procmgr(args: &[&Path]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_procmgr"))
        .args(args)
        .env_remove("PROCMGR_TERMINATE_SIBLINGS")
        .output()
        .expect("failed to run procmgr")
}

fn write_procs(dir: &Path, procs: &Procs) -> std::path::PathBuf {
    let path = dir.join("procs.yml");
    procs.write_file(&path).expect("failed to write procs.yml");
    path
}

/// A clean exit of the shortest process is a clean exit of procmgr
#[test]
fn test_clean_exit() {
    let dir = tempfile::tempdir().unwrap();
    let mut procs = Procs::new();
    procs.add("greeting", Proc::new("echo", vec!["hello from procmgr"]));
    let path = write_procs(dir.path(), &procs);

    let output = procmgr(&[&path]);

    assert_eq!(output.status.code(), Some(0), "{:?}", output);
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("hello from procmgr"), "{}", stdout);
}

/// The report names the shortest process, the longer one is still running
#[test]
fn test_first_exit_wins() {
    let dir = tempfile::tempdir().unwrap();
    let mut procs = Procs::new();
    procs.add("a", Proc::new("sleep", vec!["1"]));
    procs.add("b", Proc::new("sleep", vec!["0.1"]));
    let path = write_procs(dir.path(), &procs);

    let output = procmgr(&[&path]);

    assert_eq!(output.status.code(), Some(0), "{:?}", output);
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("process b exited"), "{}", stderr);
}

#[test]
fn test_usage_error() {
    let output = procmgr(&[]);
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("USAGE"));

    let output = procmgr(&[Path::new("one.yml"), Path::new("two.yml")]);
    assert_eq!(output.status.code(), Some(1));
}

#[test]
fn test_malformed_procs_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("procs.yml");
    fs::write(&path, "processes: [not, a, map]\n").unwrap();

    let output = procmgr(&[&path]);

    assert_eq!(output.status.code(), Some(2));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("error loading/parsing procs file"), "{}", stderr);
    assert!(stderr.contains("not, a, map"), "{}", stderr);
}

#[test]
fn test_failing_process_is_named() {
    let dir = tempfile::tempdir().unwrap();
    let mut procs = Procs::new();
    procs.add("fpm", Proc::new("false", Vec::<String>::new()));
    let path = write_procs(dir.path(), &procs);

    let output = procmgr(&[&path]);

    assert_eq!(output.status.code(), Some(2));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("error running procs"), "{}", stderr);
    assert!(stderr.contains("fpm"), "{}", stderr);
}

#[test]
fn test_missing_executable_is_named() {
    let dir = tempfile::tempdir().unwrap();
    let mut procs = Procs::new();
    procs.add("ghost", Proc::new("idontexist", Vec::<String>::new()));
    let path = write_procs(dir.path(), &procs);

    let output = procmgr(&[&path]);

    assert_eq!(output.status.code(), Some(2));
    assert!(String::from_utf8_lossy(&output.stderr).contains("ghost"));
}

#[test]
fn test_missing_procs_file_has_nothing_to_run() {
    let dir = tempfile::tempdir().unwrap();
    let output = procmgr(&[&dir.path().join("absent.yml")]);

    assert_eq!(output.status.code(), Some(2));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("no processes to run"), "{}", stderr);
}

#[test]
fn test_procplan_writes_procs_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("procs.yml");

    let output = Command::new(env!("CARGO_BIN_EXE_procplan"))
        .arg(&path)
        .arg("--working-dir")
        .arg(dir.path())
        .env_remove("PHP_HTTPD_PATH")
        .env_remove("BP_LIVE_RELOAD_ENABLED")
        .env("PHP_NGINX_PATH", "nginx.conf")
        .env("PHP_FPM_PATH", "base.conf")
        .env("PHPRC", "etc")
        .output()
        .expect("failed to run procplan");
    assert_eq!(output.status.code(), Some(0), "{:?}", output);

    let procs = Procs::read_file(&path).unwrap();
    let prefix = dir.path().display().to_string();
    assert_eq!(
        procs.get("nginx"),
        Some(&Proc::new("nginx", vec!["-p", prefix.as_str(), "-c", "nginx.conf"]))
    );
    assert_eq!(
        procs.get("fpm"),
        Some(&Proc::new("php-fpm", vec!["-y", "base.conf", "-c", "etc"]))
    );
}

#[test]
fn test_procplan_rejects_missing_server() {
    let dir = tempfile::tempdir().unwrap();

    let output = Command::new(env!("CARGO_BIN_EXE_procplan"))
        .arg(dir.path().join("procs.yml"))
        .env_remove("PHP_HTTPD_PATH")
        .env_remove("PHP_NGINX_PATH")
        .output()
        .expect("failed to run procplan");

    assert_eq!(output.status.code(), Some(2));
    assert!(String::from_utf8_lossy(&output.stderr).contains("need exactly one of"));
}
