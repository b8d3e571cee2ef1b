//! Shared helpers for integration tests.

use std::path::Path;

use assert_cmd::Command;

/// Standard test credentials used across multiple tests.
#[allow(dead_code)]
pub const STANDARD_CREDENTIALS: &[(&str, &str)] = &[
    ("DATABASE_URL", "postgres://localhost/mydb"),
    ("API_KEY", "sk-test-12345"),
    ("JWT_SECRET", "super-secret-jwt-token"),
];

/// A `denv` invocation rooted in `dir`, with HOME pointed at the same
/// sandbox so no user-level config or global vault leaks in.
pub fn denv(dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("denv").unwrap();
    cmd.current_dir(dir).env("HOME", dir).env("NO_COLOR", "1");
    cmd
}

/// Initialize a local vault in `dir` and return the vault path argument
/// used for subsequent commands.
#[allow(dead_code)]
pub fn init_vault(dir: &Path) -> std::path::PathBuf {
    let vault = dir.join(".denv");
    denv(dir)
        .arg("--vault")
        .arg(&vault)
        .arg("init")
        .assert()
        .success();
    vault
}
