//! `gear validate` and `gear dash` tests

mod common;

use common::{create_test_equipment, create_test_rental, gear_in, setup_test_project};
use predicates::prelude::*;

// ============================================================================
// validate
// ============================================================================

#[test]
fn test_validate_clean_project() {
    let tmp = setup_test_project();
    create_test_equipment(&tmp, "Sony A7S III", "Kamera", 1);
    create_test_rental(&tmp, "KSONY", "Acme Films");
    gear_in(&tmp)
        .args(["cust", "new", "--name", "Acme Films"])
        .assert()
        .success();

    gear_in(&tmp)
        .arg("validate")
        .assert()
        .success()
        .stdout(predicate::str::contains("Files checked:  3"))
        .stdout(predicate::str::contains("All files passed validation"));
}

#[test]
fn test_validate_reports_schema_violation() {
    let tmp = setup_test_project();
    let id = create_test_equipment(&tmp, "Sony A7S III", "Kamera", 1);
    let path = tmp.path().join("equipment").join(format!("{}.gear.yaml", id));
    let content = std::fs::read_to_string(&path)
        .unwrap()
        .replace("status: in_office", "status: lost");
    std::fs::write(&path, content).unwrap();

    gear_in(&tmp)
        .arg("validate")
        .assert()
        .failure()
        .stdout(predicate::str::contains("1 error(s)"))
        .stderr(predicate::str::contains("Validation failed: 1 file has errors"));
}

#[test]
fn test_validate_reports_yaml_syntax_error() {
    let tmp = setup_test_project();
    let path = tmp
        .path()
        .join("equipment/EQP-01HV8Z6Q4M3N5P7R9S2T4V6W8X.gear.yaml");
    std::fs::write(&path, "id: EQP-01HV8Z6Q4M3N5P7R9S2T4V6W8X\nname: [unclosed\n").unwrap();

    gear_in(&tmp)
        .args(["validate", "--summary"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("Files failed:   1"));
}

#[test]
fn test_validate_single_path() {
    let tmp = setup_test_project();
    let id = create_test_equipment(&tmp, "Sony A7S III", "Kamera", 1);
    create_test_equipment(&tmp, "Zeiss CP.3 50mm", "Lens", 1);

    gear_in(&tmp)
        .args(["validate", &format!("equipment/{}.gear.yaml", id)])
        .assert()
        .success()
        .stdout(predicate::str::contains("Files checked:  1"));
}

#[test]
fn test_validate_warns_on_code_collisions() {
    let tmp = setup_test_project();
    create_test_equipment(&tmp, "Sony A7S III", "Kamera", 1);
    create_test_equipment(&tmp, "Sony FX3", "Kamera", 1);

    gear_in(&tmp)
        .arg("validate")
        .assert()
        .success()
        .stdout(predicate::str::contains("short code KSONY is shared by 2 items"));
}

// ============================================================================
// dash
// ============================================================================

#[test]
fn test_dash_counts() {
    let tmp = setup_test_project();
    create_test_equipment(&tmp, "Sony A7S III", "Kamera", 1);
    create_test_equipment(&tmp, "Zeiss CP.3 50mm", "Lens", 1);
    create_test_equipment(&tmp, "Dead Battery", "Aksesuar", 0);
    create_test_rental(&tmp, "KSONY", "Acme Films");

    let output = gear_in(&tmp).args(["dash", "-f", "json"]).output().unwrap();
    assert!(output.status.success());
    let summary: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(summary["total_equipment"], 3);
    assert_eq!(summary["rented_equipment"], 1);
    assert_eq!(summary["active_rentals"], 1);
    assert_eq!(summary["due_today"], 0);
    assert_eq!(summary["total_customers"], 0);
    assert_eq!(summary["out_of_stock"][0]["name"], "Dead Battery");
}

#[test]
fn test_dash_human_output() {
    let tmp = setup_test_project();
    create_test_equipment(&tmp, "Dead Battery", "Aksesuar", 0);

    gear_in(&tmp)
        .arg("dash")
        .assert()
        .success()
        .stdout(predicate::str::contains("Rental Desk"))
        .stdout(predicate::str::contains("Out of stock:"))
        .stdout(predicate::str::contains("Dead Battery"));
}
