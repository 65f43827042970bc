//! Integration tests for the billing CLI.
//!
//! These tests run the actual binary against a temporary data directory and
//! drive the menu through stdin.

use assert_cmd::Command;
use electricity_billing::codec;
use electricity_billing::storage::{self, Loaded};
use electricity_billing::Tariff;
use predicates::prelude::*;
use std::fs;
use std::path::Path;

/// Run the binary against `dir`, feeding `script` on stdin, and return stdout
fn run_billing(dir: &Path, script: &str) -> String {
    let mut cmd = Command::cargo_bin("electricity-billing").unwrap();
    let assert = cmd
        .arg(dir)
        .env_remove("BILLING_CSV_EXPORT")
        .write_stdin(script)
        .assert()
        .success();
    String::from_utf8(assert.get_output().stdout.clone()).unwrap()
}

fn load_ids(dir: &Path) -> Vec<i32> {
    match storage::load_customers(&dir.join("customers.dat")).unwrap() {
        Loaded::Found(customers) => customers.iter().map(|c| c.customer_id).collect(),
        Loaded::Missing => panic!("customer file was not written"),
    }
}

#[test]
fn test_first_run_reports_missing_files() {
    let dir = tempfile::tempdir().unwrap();
    let output = run_billing(dir.path(), "12\n");

    assert!(output.contains("No existing data found. Starting with empty database."));
    assert!(output.contains("No tariff data found. Using default rates."));
    assert!(output.contains("Data saved successfully. Exiting..."));
}

#[test]
fn test_save_and_exit_writes_both_files() {
    let dir = tempfile::tempdir().unwrap();
    run_billing(dir.path(), "1\nJohn Doe\n1 Main St\n555-0100\n100\n250\n12\n");

    assert_eq!(load_ids(dir.path()), vec![1001]);

    let tariff_bytes = fs::read(dir.path().join("tariff.dat")).unwrap();
    assert_eq!(tariff_bytes.len(), codec::TARIFF_RECORD_LEN);
    assert_eq!(codec::decode_tariff(&tariff_bytes).unwrap(), Tariff::default());
}

#[test]
fn test_state_survives_restart() {
    let dir = tempfile::tempdir().unwrap();
    run_billing(
        dir.path(),
        "1\nJohn Doe\nA\nC\n100\n250\n7\n1001\ny\n10\n1\n6\n12\n",
    );

    let output = run_billing(dir.path(), "11\n12\n");
    assert!(output.contains("Loaded 1 customer records."));
    assert!(output.contains("Paid Bills: 1"));
    assert!(output.contains("Total Revenue Collected: Rs. 944.00"));
    assert!(output.contains("Domestic Rate: Rs. 6 per unit"));
}

#[test]
fn test_ids_continue_after_restart() {
    let dir = tempfile::tempdir().unwrap();
    run_billing(dir.path(), "1\nA\n\n\n0\n1\n1\nB\n\n\n0\n1\n12\n");
    run_billing(dir.path(), "1\nC\n\n\n0\n1\n12\n");

    assert_eq!(load_ids(dir.path()), vec![1001, 1002, 1003]);
}

#[test]
fn test_closed_input_does_not_save() {
    let dir = tempfile::tempdir().unwrap();
    let output = run_billing(dir.path(), "1\nJohn Doe\nA\nC\n100\n250\n");

    assert!(output.contains("Exiting without saving"));
    assert!(!dir.path().join("customers.dat").exists());
}

#[test]
fn test_corrupt_data_file_starts_empty() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("customers.dat"), [9u8, 9, 9]).unwrap();

    let output = run_billing(dir.path(), "3\n12\n");
    assert!(output.contains("Could not read customer data"));
    assert!(output.contains("No customers found!"));
}

#[test]
fn test_corrupt_data_file_survives_save() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("customers.dat"), [9u8, 9, 9]).unwrap();

    let output = run_billing(dir.path(), "12\n");
    assert!(output.contains("customers.dat.bad"));

    assert_eq!(
        fs::read(dir.path().join("customers.dat.bad")).unwrap(),
        vec![9u8, 9, 9]
    );
    assert!(load_ids(dir.path()).is_empty());
}

#[test]
fn test_csv_export_on_view_all() {
    let dir = tempfile::tempdir().unwrap();
    let export = dir.path().join("customers.csv");

    let mut cmd = Command::cargo_bin("electricity-billing").unwrap();
    cmd.arg(dir.path())
        .env("BILLING_CSV_EXPORT", &export)
        .write_stdin("1\nJohn Doe\nA\nC\n100\n250\n3\n12\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Exported 1 customers"));

    let csv = fs::read_to_string(&export).unwrap();
    assert!(csv.starts_with("id,name,address,contact"));
    assert!(csv.contains("1001,John Doe,A,C,100.0,250.0,150.0,944.00,"));
}

#[test]
fn test_unwritable_data_dir_reports_save_failure() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("does-not-exist");

    let output = run_billing(&missing, "12\n");
    assert!(output.contains("Error saving data to file!"));
    assert!(output.contains("Error saving tariff data!"));
}
