use pdeps_cli::test_utils::PartialTree;
use predicates::prelude::*;
use serde_json::json;

use crate::common::TestProject;

fn small_site(tree: PartialTree) -> PartialTree {
    tree.referencing("site/page", &["nav"]).partial("site/nav", "")
}

#[test]
fn test_config_sets_directory_and_extension() {
    let project = TestProject::new().unwrap();
    project
        .write_partials("theme/partials", |tree| {
            tree.extension("tmpl").referencing("site/page", &["site/nav"]).partial("site/nav", "")
        })
        .unwrap();
    project
        .write_config(
            r#"
partials_dir = "theme/partials"
extension = "tmpl"
"#,
        )
        .unwrap();

    let value = project.json(&["resolve"]);
    assert_eq!(value["site/page"], json!([{ "type": "site", "entry": "nav" }]));
}

/// The nearest pdeps.toml is found from a subdirectory and paths in it are
/// relative to the file
#[test]
fn test_config_found_in_parent_directory() {
    let project = TestProject::new().unwrap();
    project.write_partials("theme/partials", small_site).unwrap();
    project.write_config("partials_dir = \"theme/partials\"\n").unwrap();
    let subdir = project.path().join("content/posts");
    std::fs::create_dir_all(&subdir).unwrap();

    project
        .pdeps()
        .current_dir(&subdir)
        .args(["resolve", "--format", "text"])
        .assert()
        .success()
        .stdout(predicate::str::contains("site/nav"));
}

/// Bare names only resolve when references are matched as globs
#[test]
fn test_glob_match_mode() {
    let project = TestProject::with_partials(small_site).unwrap();

    assert_eq!(project.json(&["resolve", "--partial", "site/page"]), json!({ "site/page": [] }));

    project.write_config("match_mode = \"glob\"\n").unwrap();
    assert_eq!(
        project.json(&["resolve", "--partial", "site/page"]),
        json!({ "site/page": [{ "type": "site", "entry": "nav" }] })
    );
}

#[test]
fn test_exclude_patterns() {
    let project = TestProject::with_partials(|tree| {
        tree.partial("site/page", "").partial("drafts/wip", "").partial("site/old", "")
    })
    .unwrap();
    project.write_config("exclude = [\"drafts/**\", \"**/old.html\"]\n").unwrap();

    assert_eq!(project.json(&["resolve"]), json!({ "site/page": [] }));
}

#[test]
fn test_partials_dir_flag_overrides_config() {
    let project = TestProject::new().unwrap();
    project.write_partials("other", small_site).unwrap();
    project.write_config("partials_dir = \"missing\"\n").unwrap();

    let value = project.json(&["--partials-dir", "other", "resolve"]);
    assert_eq!(value.as_object().unwrap().len(), 2);
}

#[test]
fn test_explicit_config_from_environment() {
    let project = TestProject::with_partials(small_site).unwrap();
    std::fs::write(project.path().join("glob.toml"), "match_mode = \"glob\"\n").unwrap();

    project
        .pdeps()
        .env("PDEPS_CONFIG", "glob.toml")
        .args(["resolve", "--partial", "site/page", "--format", "text"])
        .assert()
        .success()
        .stdout("site/page\n  site/nav\n");
}

#[test]
fn test_missing_explicit_config() {
    let project = TestProject::with_partials(small_site).unwrap();

    project
        .pdeps()
        .args(["--config", "nope.toml", "resolve"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Configuration file not found"));
}

#[test]
fn test_unknown_config_key() {
    let project = TestProject::with_partials(small_site).unwrap();
    project.write_config("partial_dir = \"layouts/partials\"\n").unwrap();

    project
        .pdeps()
        .arg("resolve")
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Invalid configuration file syntax"))
        .stderr(predicate::str::contains("partial_dir"));
}

#[test]
fn test_invalid_max_parallel() {
    let project = TestProject::with_partials(small_site).unwrap();
    project.write_config("max_parallel = 0\n").unwrap();

    project
        .pdeps()
        .arg("resolve")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid configuration"));
}
