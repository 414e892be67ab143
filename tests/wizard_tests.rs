mod common;

use common::*;
use predicates::prelude::*;

// ============================================================================
// Wizard Session Tests
// ============================================================================

#[test]
fn test_status_starts_at_client_step() {
    let tmp = setup_test_workspace();

    fitq()
        .current_dir(tmp.path())
        .env_remove("COLORFGBG")
        .args(["wizard", "status"])
        .assert()
        .success()
        .stdout(predicate::str::contains("▶ client"))
        .stdout(predicate::str::contains("Theme: light"));
}

#[test]
fn test_step_persists_across_invocations() {
    let tmp = setup_test_workspace();

    fitq()
        .current_dir(tmp.path())
        .args(["wizard", "step", "quotation"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Step set to quotation"));

    fitq()
        .current_dir(tmp.path())
        .args(["wizard", "status"])
        .assert()
        .success()
        .stdout(predicate::str::contains("▶ quotation"));

    assert!(tmp.path().join(".fitq/session.json").exists());
}

#[test]
fn test_invalid_step_is_rejected() {
    let tmp = setup_test_workspace();

    fitq()
        .current_dir(tmp.path())
        .args(["wizard", "step", "payment"])
        .assert()
        .failure();
}

#[test]
fn test_selections_persist_and_clear() {
    let tmp = setup_test_workspace();
    let client = create_test_client(&tmp, "Asha Rao");

    fitq()
        .current_dir(tmp.path())
        .args(["wizard", "select-client", &client])
        .assert()
        .success()
        .stdout(predicate::str::contains("Selected client"));

    fitq()
        .current_dir(tmp.path())
        .args(["wizard", "status"])
        .assert()
        .success()
        .stdout(predicate::str::contains(&client[..13]));

    // Omitting the id clears the selection
    fitq()
        .current_dir(tmp.path())
        .args(["wizard", "select-client"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Cleared client selection"));
}

#[test]
fn test_status_shows_workspace_counts() {
    let tmp = setup_seeded_workspace();
    let (_, project, area, product) = setup_quote_fixture(&tmp);
    let quote = open_draft(&tmp, &project);

    fitq()
        .current_dir(tmp.path())
        .args([
            "item", "add", "--quote", &quote, "--area", &area, "--product", &product,
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
        .args(["wizard", "select-quote", &quote])
        .assert()
        .success();

    // Seeded catalog plus the fixture product
    fitq()
        .current_dir(tmp.path())
        .args(["wizard", "status"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Workspace: 1 client(s), 1 project(s), 1 area(s)",
        ))
        .stdout(predicate::str::contains("Catalog:   6 product(s), 2 template(s)"))
        .stdout(predicate::str::contains("Quoting:   1 quotation(s), 1 item(s)"))
        .stdout(predicate::str::contains("Material:  1 panel entr(ies), 2 sheet(s)"));
}

#[test]
fn test_select_rejects_unknown_id() {
    let tmp = setup_test_workspace();

    fitq()
        .current_dir(tmp.path())
        .args(["wizard", "select-project", "PRJ-NOPE"])
        .assert()
        .failure();
}

#[test]
fn test_reset_keeps_theme() {
    let tmp = setup_test_workspace();

    fitq()
        .current_dir(tmp.path())
        .args(["wizard", "theme", "dark"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Theme set to dark"));

    fitq()
        .current_dir(tmp.path())
        .args(["wizard", "step", "material"])
        .assert()
        .success();

    fitq()
        .current_dir(tmp.path())
        .args(["wizard", "reset"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Session reset"));

    fitq()
        .current_dir(tmp.path())
        .args(["wizard", "status"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Theme: dark"))
        .stdout(predicate::str::contains("▶ client"));
}

#[test]
fn test_corrupt_session_file_starts_fresh() {
    let tmp = setup_test_workspace();

    std::fs::write(tmp.path().join(".fitq/session.json"), "{not json").unwrap();

    fitq()
        .current_dir(tmp.path())
        .args(["wizard", "status"])
        .assert()
        .success()
        .stdout(predicate::str::contains("▶ client"));
}
