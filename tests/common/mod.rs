//! Shared test helpers for integration tests

#![allow(dead_code)]

use assert_cmd::cargo;
use assert_cmd::Command;
use tempfile::TempDir;

/// Helper to get a fitq command
pub fn fitq() -> Command {
    Command::new(cargo::cargo_bin!("fitq"))
}

/// Helper to create a test workspace in a temp directory
pub fn setup_test_workspace() -> TempDir {
    let tmp = TempDir::new().unwrap();
    fitq()
        .current_dir(tmp.path())
        .arg("init")
        .assert()
        .success();
    tmp
}

/// Helper to create a test workspace with the seeded catalog
pub fn setup_seeded_workspace() -> TempDir {
    let tmp = TempDir::new().unwrap();
    fitq()
        .current_dir(tmp.path())
        .args(["init", "--seed"])
        .assert()
        .success();
    tmp
}

/// Extract the first full entity id with the given prefix from output
pub fn extract_id(output: &[u8], prefix: &str) -> String {
    let stdout = String::from_utf8_lossy(output);
    stdout
        .split_whitespace()
        .map(|w| w.trim_matches(|c| c == '(' || c == ')'))
        .find(|w| w.starts_with(prefix) && !w.ends_with("..."))
        .map(|s| s.to_string())
        .unwrap_or_default()
}

/// Helper to create a test client, returning its full id
pub fn create_test_client(tmp: &TempDir, name: &str) -> String {
    let output = fitq()
        .current_dir(tmp.path())
        .args(["client", "new", name, "--phone", "9876543210"])
        .output()
        .unwrap();
    extract_id(&output.stdout, "CLT-")
}

/// Helper to create a test project, returning its full id
pub fn create_test_project(tmp: &TempDir, name: &str, client_id: &str) -> String {
    let output = fitq()
        .current_dir(tmp.path())
        .args(["project", "new", name, "--client", client_id])
        .output()
        .unwrap();
    extract_id(&output.stdout, "PRJ-")
}

/// Helper to create a test area, returning its full id
pub fn create_test_area(tmp: &TempDir, name: &str, project_id: &str) -> String {
    let output = fitq()
        .current_dir(tmp.path())
        .args(["area", "new", name, "--project", project_id])
        .output()
        .unwrap();
    extract_id(&output.stdout, "AREA-")
}

/// Helper to create a PER_UNIT product, returning its full id
pub fn create_per_unit_product(tmp: &TempDir, name: &str, rate: &str) -> String {
    let output = fitq()
        .current_dir(tmp.path())
        .args([
            "product", "new", name, "--model", "per-unit", "--rate", rate,
        ])
        .output()
        .unwrap();
    extract_id(&output.stdout, "PROD-")
}

/// Helper to open the draft quotation for a project, returning its id
pub fn open_draft(tmp: &TempDir, project_id: &str) -> String {
    let output = fitq()
        .current_dir(tmp.path())
        .args(["quote", "draft", "--project", project_id, "--format", "id"])
        .output()
        .unwrap();
    extract_id(&output.stdout, "QUOT-")
}

/// Helper to build a full client/project/area/product fixture.
/// Returns (client, project, area, product) ids.
pub fn setup_quote_fixture(tmp: &TempDir) -> (String, String, String, String) {
    let client = create_test_client(tmp, "Asha Rao");
    let project = create_test_project(tmp, "3BHK Renovation", &client);
    let area = create_test_area(tmp, "Kitchen", &project);
    let product = create_per_unit_product(tmp, "TV Unit Base", "15000");
    (client, project, area, product)
}
