use predicates::prelude::*;

use crate::common::{TestProject, sample_site};

#[test]
fn test_tree_single_partial() {
    let project = TestProject::with_partials(sample_site).unwrap();

    let expected = "\
site/page
├── site/header
│   └── site/nav
│       └── site/menu
│           └── site/nav (cycle)
├── cards/list
│   └── cards/item
└── site/footer
    └── site/nav (*)

(*) = subtree shown above
";
    project
        .pdeps()
        .args(["tree", "--partial", "site/page"])
        .assert()
        .success()
        .stdout(expected);
}

#[test]
fn test_tree_inverted() {
    let project = TestProject::with_partials(sample_site).unwrap();

    project
        .pdeps()
        .args(["tree", "--partial", "cards/item", "--invert"])
        .assert()
        .success()
        .stdout("cards/item\n└── cards/list\n    └── site/page\n");
}

#[test]
fn test_tree_depth_limit() {
    let project = TestProject::with_partials(sample_site).unwrap();

    project
        .pdeps()
        .args(["tree", "--partial", "site/page", "--depth", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("├── site/header"))
        .stdout(predicate::str::contains("site/nav").not());
}

#[test]
fn test_tree_all_partials() {
    let project = TestProject::with_partials(|tree| {
        tree.referencing("p/a", &["p/b"]).partial("p/b", "")
    })
    .unwrap();

    project.pdeps().arg("tree").assert().success().stdout("p/a\n└── p/b\n\np/b\n");
}

#[test]
fn test_tree_empty_project() {
    let project = TestProject::new().unwrap();
    std::fs::create_dir_all(project.path().join("layouts/partials")).unwrap();

    project
        .pdeps()
        .arg("tree")
        .assert()
        .success()
        .stdout(predicate::str::contains("No partials found"));
}
