//! Shared test helpers for integration tests

#![allow(dead_code)]

use assert_cmd::cargo;
use assert_cmd::Command;
use tempfile::TempDir;

pub const ADMIN_EMAIL: &str = "owner@example.com";

/// A `gear` command isolated from the developer's own config
pub fn gear_in(tmp: &TempDir) -> Command {
    let mut cmd = Command::new(cargo::cargo_bin!("gear"));
    cmd.current_dir(tmp.path())
        .env("XDG_CONFIG_HOME", tmp.path().join(".xdg"))
        .env("HOME", tmp.path())
        .env("GEAR_AUTHOR", "Desk Tester")
        .env_remove("GEAR_EMAIL")
        .env_remove("RUST_LOG");
    cmd
}

/// A bare `gear` command with no working directory
pub fn gear() -> Command {
    Command::new(cargo::cargo_bin!("gear"))
}

pub fn setup_test_project() -> TempDir {
    let tmp = TempDir::new().unwrap();
    gear_in(&tmp).arg("init").assert().success();
    tmp
}

/// Create equipment and return its id
pub fn create_test_equipment(tmp: &TempDir, name: &str, category: &str, stock: u32) -> String {
    let output = gear_in(tmp)
        .args([
            "eqp",
            "new",
            "--name",
            name,
            "--category",
            category,
            "--stock",
            &stock.to_string(),
            "-f",
            "id",
        ])
        .output()
        .unwrap();
    assert!(output.status.success(), "eqp new failed: {:?}", output);
    String::from_utf8_lossy(&output.stdout).trim().to_string()
}

/// Check an item out and return the rental id
pub fn create_test_rental(tmp: &TempDir, equipment: &str, customer: &str) -> String {
    let output = gear_in(tmp)
        .args(["rent", "new", equipment, "--customer", customer, "-f", "id"])
        .output()
        .unwrap();
    assert!(output.status.success(), "rent new failed: {:?}", output);
    String::from_utf8_lossy(&output.stdout).trim().to_string()
}

/// Bootstrap an admin employee and run the rest of the test as them
pub fn create_admin(tmp: &TempDir) {
    gear_in(tmp)
        .args(["emp", "new", "--email", ADMIN_EMAIL, "--name", "Owner", "--admin"])
        .assert()
        .success();
}

/// Read a record file by id
pub fn read_record(tmp: &TempDir, dir: &str, id: &str) -> String {
    std::fs::read_to_string(tmp.path().join(dir).join(format!("{}.gear.yaml", id))).unwrap()
}
