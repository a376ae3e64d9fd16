use predicates::prelude::*;

use crate::common::{TestProject, sample_site};

#[test]
fn test_validate_clean_project() {
    let project = TestProject::with_partials(|tree| {
        tree.referencing("site/page", &["site/header"]).partial("site/header", "")
    })
    .unwrap();

    project
        .pdeps()
        .arg("validate")
        .assert()
        .success()
        .stdout("✓ 2 partial(s) checked, no problems found\n");
}

/// Cycles are reported but do not fail validation
#[test]
fn test_validate_reports_cycles() {
    let project = TestProject::with_partials(sample_site).unwrap();

    project
        .pdeps()
        .args(["validate", "--strict"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Reference cycles:"))
        .stdout(predicate::str::contains("site/menu <-> site/nav"));
}

#[test]
fn test_validate_unresolved_reference() {
    let project = TestProject::with_partials(|tree| {
        tree.referencing("site/page", &["site/heder"]).partial("site/header", "")
    })
    .unwrap();

    project
        .pdeps()
        .arg("validate")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "site/page: \"site/heder\" (did you mean: site/header",
        ));
}

#[test]
fn test_validate_strict_fails_on_unresolved() {
    let project = TestProject::with_partials(|tree| {
        tree.referencing("site/page", &["site/heder"]).partial("site/header", "")
    })
    .unwrap();

    project
        .pdeps()
        .args(["validate", "--strict"])
        .assert()
        .failure()
        .code(1)
        .stdout(predicate::str::contains("Unresolved references:"))
        .stderr(predicate::str::contains("Validation failed: 1 unresolved partial reference(s)"));
}

/// A reference matching several keys uses the first discovered one
#[test]
fn test_validate_ambiguous_reference_json() {
    let project = TestProject::with_partials(|tree| {
        tree.referencing("site/page", &["cards/item-list"])
            .partial("cards/item", "")
            .partial("cards/item-list", "")
    })
    .unwrap();

    let value = project.json(&["validate", "--format", "json"]);
    assert_eq!(value["partials"], 3);
    assert_eq!(value["unresolved"], serde_json::json!([]));
    assert_eq!(value["ambiguous"][0]["owner"], "site/page");
    assert_eq!(value["ambiguous"][0]["reference"], "cards/item-list");
    assert_eq!(value["ambiguous"][0]["chosen"], "cards/item-list");
    assert_eq!(value["ambiguous"][0]["others"], serde_json::json!(["cards/item"]));
}
