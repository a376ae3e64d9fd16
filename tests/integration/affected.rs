use predicates::prelude::*;
use serde_json::json;

use crate::common::{TestProject, sample_site};

#[test]
fn test_affected_by_leaf_change() {
    let project = TestProject::with_partials(sample_site).unwrap();

    let value = project.json(&["affected", "cards/item"]);
    assert_eq!(value, json!(["cards/item", "cards/list", "site/page"]));
}

/// Changes inside a cycle reach every partial on and above it
#[test]
fn test_affected_through_cycle() {
    let project = TestProject::with_partials(sample_site).unwrap();

    project
        .pdeps()
        .args(["affected", "site/menu", "--format", "text"])
        .assert()
        .success()
        .stdout("site/footer\nsite/header\nsite/menu\nsite/nav\nsite/page\n");
}

#[test]
fn test_affected_unknown_key_is_ignored() {
    let project = TestProject::with_partials(sample_site).unwrap();

    project
        .pdeps()
        .args(["affected", "cards/list", "cards/gone"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"site/page\""))
        .stderr(predicate::str::contains("cards/gone"));
}

#[test]
fn test_affected_requires_a_key() {
    let project = TestProject::with_partials(sample_site).unwrap();

    project.pdeps().arg("affected").assert().failure();
}
