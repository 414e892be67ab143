mod common;

use common::*;
use predicates::prelude::*;
use tempfile::TempDir;

/// Seeded fixture with a kitchen area and a draft quotation.
/// Returns (area, quote, kitchen base cabinet product) ids.
fn kitchen_fixture(tmp: &TempDir) -> (String, String, String) {
    let client = create_test_client(tmp, "Asha Rao");
    let project = create_test_project(tmp, "Kitchen Redo", &client);
    let area = create_test_area(tmp, "Kitchen", &project);
    let quote = open_draft(tmp, &project);

    let output = fitq()
        .current_dir(tmp.path())
        .args([
            "product", "list", "--search", "Kitchen Base", "--format", "id",
        ])
        .output()
        .unwrap();
    let cabinet = extract_id(&output.stdout, "PROD-");
    (area, quote, cabinet)
}

// ============================================================================
// Cutlist Generation Tests
// ============================================================================

#[test]
fn test_templated_item_expands_into_panels() {
    let tmp = setup_seeded_workspace();
    let (area, quote, cabinet) = kitchen_fixture(&tmp);

    fitq()
        .current_dir(tmp.path())
        .args([
            "item", "add", "--quote", &quote, "--area", &area, "--product", &cabinet,
            "--height", "850", "--width", "600", "--depth", "560",
        ])
        .assert()
        .success();

    // Side x2, Bottom, Top, Shelf, Back, Shutter
    fitq()
        .current_dir(tmp.path())
        .args(["cutlist", "generate", "--quote", &quote])
        .assert()
        .success()
        .stdout(predicate::str::contains("Generated 6 panel entries"));

    fitq()
        .current_dir(tmp.path())
        .args(["cutlist", "list", "--quote", &quote])
        .assert()
        .success()
        .stdout(predicate::str::contains("Side Panel"))
        .stdout(predicate::str::contains("Back Panel"))
        .stdout(predicate::str::contains("Shutter"))
        // Edge banding renders in its wire spelling
        .stdout(predicate::str::contains("FRONT_ONLY"))
        .stdout(predicate::str::contains("FRONTONLY").not());
}

#[test]
fn test_validation_failure_blocks_generation() {
    let tmp = setup_seeded_workspace();
    let (area, quote, cabinet) = kitchen_fixture(&tmp);

    // Width alone satisfies running-ft pricing, but the template's
    // W/H/D validation rule still wants all three
    fitq()
        .current_dir(tmp.path())
        .args([
            "item", "add", "--quote", &quote, "--area", &area, "--product", &cabinet,
            "--width", "600",
        ])
        .assert()
        .success();

    fitq()
        .current_dir(tmp.path())
        .args(["cutlist", "generate", "--quote", &quote])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Dimensions must be positive"));
}

#[test]
fn test_untemplated_item_yields_generic_panel() {
    let tmp = setup_test_workspace();
    let (_, project, area, _) = setup_quote_fixture(&tmp);
    let quote = open_draft(&tmp, &project);
    let panel_product = create_per_unit_product(&tmp, "Loose Panel", "800");

    fitq()
        .current_dir(tmp.path())
        .args([
            "item", "add", "--quote", &quote, "--area", &area, "--product", &panel_product,
            "--qty", "2", "--height", "2500", "--width", "1000", "--depth", "18",
        ])
        .assert()
        .success();

    fitq()
        .current_dir(tmp.path())
        .args(["cutlist", "generate", "--quote", &quote])
        .assert()
        .success()
        .stdout(predicate::str::contains("Generated 1 panel entries"));

    fitq()
        .current_dir(tmp.path())
        .args(["cutlist", "list", "--quote", &quote])
        .assert()
        .success()
        .stdout(predicate::str::contains("Loose Panel"))
        .stdout(predicate::str::contains("2500"));
}

#[test]
fn test_regeneration_replaces_previous_cutlist() {
    let tmp = setup_seeded_workspace();
    let (area, quote, cabinet) = kitchen_fixture(&tmp);

    fitq()
        .current_dir(tmp.path())
        .args([
            "item", "add", "--quote", &quote, "--area", &area, "--product", &cabinet,
            "--height", "850", "--width", "600", "--depth", "560",
        ])
        .assert()
        .success();

    for _ in 0..2 {
        fitq()
            .current_dir(tmp.path())
            .args(["cutlist", "generate", "--quote", &quote])
            .assert()
            .success()
            .stdout(predicate::str::contains("Generated 6 panel entries"));
    }

    let output = fitq()
        .current_dir(tmp.path())
        .args(["cutlist", "list", "--quote", &quote, "--format", "id"])
        .output()
        .unwrap();
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(stdout.lines().count(), 6);
}

#[test]
fn test_item_quantity_multiplies_panel_counts() {
    let tmp = setup_seeded_workspace();
    let (area, quote, cabinet) = kitchen_fixture(&tmp);

    fitq()
        .current_dir(tmp.path())
        .args([
            "item", "add", "--quote", &quote, "--area", &area, "--product", &cabinet,
            "--qty", "3", "--height", "850", "--width", "600", "--depth", "560",
        ])
        .assert()
        .success();

    fitq()
        .current_dir(tmp.path())
        .args(["cutlist", "generate", "--quote", &quote])
        .assert()
        .success();

    // Side Panel rule emits 2 per cabinet, so 6 across 3 cabinets
    let output = fitq()
        .current_dir(tmp.path())
        .args(["cutlist", "list", "--quote", &quote, "--format", "yaml"])
        .output()
        .unwrap();
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("quantity: 6"));
}

// ============================================================================
// Material Summary Tests
// ============================================================================

#[test]
fn test_material_summary_sheets_and_wastage() {
    let tmp = setup_test_workspace();
    let (_, project, area, _) = setup_quote_fixture(&tmp);
    let quote = open_draft(&tmp, &project);
    let panel_product = create_per_unit_product(&tmp, "Loose Panel", "800");

    // 2500 x 1000 x 2 panels = 5,000,000 mm2, just over one sheet
    fitq()
        .current_dir(tmp.path())
        .args([
            "item", "add", "--quote", &quote, "--area", &area, "--product", &panel_product,
            "--qty", "2", "--height", "2500", "--width", "1000", "--depth", "18",
        ])
        .assert()
        .success();

    fitq()
        .current_dir(tmp.path())
        .args(["cutlist", "generate", "--quote", &quote])
        .assert()
        .success();

    fitq()
        .current_dir(tmp.path())
        .args(["material", "summary", "--quote", &quote])
        .assert()
        .success()
        .stdout(predicate::str::contains("Sheets:     2"))
        .stdout(predicate::str::contains("16.02%"));
}

#[test]
fn test_material_summary_without_cutlist_is_zero() {
    let tmp = setup_test_workspace();
    let (_, project, _, _) = setup_quote_fixture(&tmp);
    let quote = open_draft(&tmp, &project);

    fitq()
        .current_dir(tmp.path())
        .args(["material", "summary", "--quote", &quote])
        .assert()
        .success()
        .stdout(predicate::str::contains("Sheets:     0"))
        .stdout(predicate::str::contains("0.00%"));
}
