use predicates::prelude::*;
use serde_json::json;

use crate::common::{TestProject, sample_site};

/// Every partial appears with its transitive dependencies in closure order
#[test]
fn test_resolve_all_partials() {
    let project = TestProject::with_partials(sample_site).unwrap();
    let value = project.json(&["resolve"]);

    let keys: Vec<&str> = value.as_object().unwrap().keys().map(String::as_str).collect();
    assert_eq!(
        keys,
        [
            "cards/item",
            "cards/list",
            "site/footer",
            "site/header",
            "site/menu",
            "site/nav",
            "site/page"
        ]
    );

    assert_eq!(value["cards/item"], json!([]));
    assert_eq!(value["cards/list"], json!([{ "type": "cards", "entry": "item" }]));
    assert_eq!(
        value["site/page"],
        json!([
            { "type": "site", "entry": "header" },
            { "type": "site", "entry": "nav" },
            { "type": "site", "entry": "menu" },
            { "type": "cards", "entry": "list" },
            { "type": "cards", "entry": "item" },
            { "type": "site", "entry": "footer" }
        ])
    );
}

/// Mutually referencing partials terminate and exclude themselves
#[test]
fn test_resolve_cycle() {
    let project = TestProject::with_partials(sample_site).unwrap();
    let value = project.json(&["resolve", "--partial", "site/nav"]);

    assert_eq!(value, json!({ "site/nav": [{ "type": "site", "entry": "menu" }] }));
}

#[test]
fn test_resolve_text_format() {
    let project = TestProject::with_partials(sample_site).unwrap();

    project
        .pdeps()
        .args(["resolve", "--partial", "site/header", "--format", "text"])
        .assert()
        .success()
        .stdout("site/header\n  site/nav\n  site/menu\n");
}

#[test]
fn test_resolve_with_fingerprints() {
    let project = TestProject::with_partials(sample_site).unwrap();
    let value = project.json(&["resolve", "--fingerprints"]);

    let header = value["site/header"]["fingerprint"].as_str().unwrap();
    let footer = value["site/footer"]["fingerprint"].as_str().unwrap();
    assert!(header.starts_with("sha256:"));
    assert_ne!(header, footer);
    assert_eq!(value["site/header"]["dependencies"][0]["entry"], "nav");
}

/// Editing a dependency changes the fingerprint of its dependents only
#[test]
fn test_fingerprint_follows_dependency_content() {
    let project = TestProject::with_partials(sample_site).unwrap();
    let before = project.json(&["resolve", "--fingerprints"]);

    project
        .write_partials("layouts/partials", |tree| tree.partial("cards/item", "<li>changed</li>"))
        .unwrap();
    let after = project.json(&["resolve", "--fingerprints"]);

    for key in ["cards/item", "cards/list", "site/page"] {
        assert_ne!(before[key]["fingerprint"], after[key]["fingerprint"], "{key}");
    }
    for key in ["site/nav", "site/header", "site/footer"] {
        assert_eq!(before[key]["fingerprint"], after[key]["fingerprint"], "{key}");
    }
}

#[test]
fn test_unknown_partial_suggests_similar_keys() {
    let project = TestProject::with_partials(sample_site).unwrap();

    project
        .pdeps()
        .args(["resolve", "--partial", "cards/lst"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Partial 'cards/lst' not found"))
        .stderr(predicate::str::contains("cards/list"));
}

#[test]
fn test_empty_partials_directory() {
    let project = TestProject::new().unwrap();
    std::fs::create_dir_all(project.path().join("layouts/partials")).unwrap();

    assert_eq!(project.json(&["resolve"]), json!({}));
}

#[test]
fn test_missing_partials_directory() {
    let project = TestProject::new().unwrap();

    project
        .pdeps()
        .arg("resolve")
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Partials directory not found"));
}

/// Partials that are not templates are never read
#[test]
fn test_other_extensions_are_ignored() {
    let project = TestProject::with_partials(|tree| {
        tree.referencing("site/page", &["site/data"]).partial("site/other", "")
    })
    .unwrap();
    std::fs::write(project.path().join("layouts/partials/site/data.json"), "{}").unwrap();

    let value = project.json(&["resolve"]);
    assert_eq!(value, json!({ "site/other": [], "site/page": [] }));
}
